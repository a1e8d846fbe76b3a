use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub corpus: Corpus,
	pub providers: Providers,
	#[serde(default)]
	pub recommend: Recommend,
	#[serde(default)]
	pub confidence: Confidence,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
	/// Relative paths are resolved against the process working directory.
	pub descriptions_dir: PathBuf,
	pub profiles: Vec<CorpusProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusProfile {
	pub name: String,
	/// File name inside `descriptions_dir`.
	pub file: String,
	/// Optional. One clause describing the engine's strengths, used by fallback explanations.
	pub highlight: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm_explainer: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default = "default_max_output_chars")]
	pub max_output_chars: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommend {
	#[serde(default = "default_top_k")]
	pub top_k: u32,
	#[serde(default = "default_llm_explanations")]
	pub llm_explanations: bool,
}
impl Default for Recommend {
	fn default() -> Self {
		Self { top_k: default_top_k(), llm_explanations: default_llm_explanations() }
	}
}

/// Score cut-offs for the confidence buckets shown in explanations.
///
/// A score at or above `high` is High, at or above `medium` is Medium, anything else is Low.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Confidence {
	#[serde(default = "default_confidence_high")]
	pub high: f32,
	#[serde(default = "default_confidence_medium")]
	pub medium: f32,
}
impl Default for Confidence {
	fn default() -> Self {
		Self { high: default_confidence_high(), medium: default_confidence_medium() }
	}
}

fn default_max_output_chars() -> u32 {
	1_200
}

fn default_top_k() -> u32 {
	3
}

fn default_llm_explanations() -> bool {
	true
}

fn default_confidence_high() -> f32 {
	0.75
}

fn default_confidence_medium() -> f32 {
	0.70
}
