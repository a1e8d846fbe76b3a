use std::path::PathBuf;

use serde_json::Map;

use dbrec_config::{
	Confidence, Config, Corpus, CorpusProfile, EmbeddingProviderConfig, LlmProviderConfig,
	Providers, Recommend, Service,
};
use dbrec_domain::AnswerSet;

/// A valid configuration whose providers point at an unroutable address.
///
/// Tests swap in provider doubles, so nothing here is ever contacted.
pub fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		corpus: Corpus {
			descriptions_dir: PathBuf::from("descriptions"),
			profiles: vec![
				CorpusProfile {
					name: "PostgreSQL".to_string(),
					file: "1-PostgreSQL.md".to_string(),
					highlight: Some("its robust ACID compliance".to_string()),
				},
				CorpusProfile {
					name: "Neo4j".to_string(),
					file: "5-Neo4j.md".to_string(),
					highlight: Some("its native graph storage".to_string()),
				},
				CorpusProfile {
					name: "Redis".to_string(),
					file: "7-Redis.md".to_string(),
					highlight: None,
				},
			],
		},
		providers: Providers {
			embedding: dummy_embedding_provider(3),
			llm_explainer: dummy_llm_provider(),
		},
		recommend: Recommend { top_k: 3, llm_explanations: true },
		confidence: Confidence::default(),
	}
}

pub fn dummy_embedding_provider(dimensions: u32) -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/embeddings".to_string(),
		model: "test-embedding".to_string(),
		dimensions,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn dummy_llm_provider() -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/chat/completions".to_string(),
		model: "test-llm".to_string(),
		temperature: 0.0,
		timeout_ms: 1_000,
		max_output_chars: 400,
		default_headers: Map::new(),
	}
}

pub fn answers(pairs: &[(&str, &[&str])]) -> AnswerSet {
	pairs
		.iter()
		.map(|(id, labels)| {
			(id.to_string(), labels.iter().map(|label| label.to_string()).collect())
		})
		.collect()
}
