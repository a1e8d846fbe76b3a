use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use futures::future;

use dbrec_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use dbrec_domain::ConfidenceLevel;
use dbrec_service::{
	BoxFuture, CorpusEntry, EmbeddingProvider, Error, ExplanationSource, LanguageModelProvider,
	Providers, Recommender, Result, StaticCorpus,
};
use dbrec_testkit::{answers, test_config};

const AXES: [&[&str]; 3] = [&["graph"], &["structured", "strong"], &["real-time", "high-speed"]];

/// Counts keyword hits per axis, so similarity is predictable from the text alone.
struct KeywordEmbedding {
	calls: Arc<AtomicUsize>,
}
impl KeywordEmbedding {
	fn new() -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)) }
	}

	fn vector(text: &str) -> Vec<f32> {
		AXES.iter()
			.map(|keywords| {
				keywords.iter().map(|keyword| text.matches(keyword).count()).sum::<usize>() as f32
			})
			.collect()
	}
}
impl EmbeddingProvider for KeywordEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let vectors = texts.iter().map(|text| Self::vector(text)).collect();

		Box::pin(async move { Ok(vectors) })
	}
}

/// Embeds the corpus normally, then fails every later call.
struct FlakyEmbedding {
	remaining_successes: AtomicUsize,
}
impl EmbeddingProvider for FlakyEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		let allowed = self
			.remaining_successes
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
			.is_ok();
		let vectors: Vec<Vec<f32>> =
			texts.iter().map(|text| KeywordEmbedding::vector(text)).collect();

		Box::pin(async move {
			if allowed {
				Ok(vectors)
			} else {
				Err(Error::EmbeddingUnavailable { message: "quota exceeded".to_string() })
			}
		})
	}
}

/// Returns vectors of the wrong width for queries.
struct WideQueryEmbedding;
impl EmbeddingProvider for WideQueryEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		let width = if texts.len() > 1 { 3 } else { 4 };
		let vectors = vec![vec![1.0; width]; texts.len()];

		Box::pin(async move { Ok(vectors) })
	}
}

/// Embeds the corpus normally, then never answers query requests.
struct StalledQueryEmbedding;
impl EmbeddingProvider for StalledQueryEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		if texts.len() > 1 {
			let vectors = texts.iter().map(|text| KeywordEmbedding::vector(text)).collect();

			return Box::pin(async move { Ok(vectors) });
		}

		Box::pin(future::pending::<Result<Vec<Vec<f32>>>>())
	}
}

struct EchoLlm {
	calls: Arc<AtomicUsize>,
}
impl EchoLlm {
	fn new() -> Self {
		Self { calls: Arc::new(AtomicUsize::new(0)) }
	}
}
impl LanguageModelProvider for EchoLlm {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let name = prompt
			.lines()
			.find_map(|line| line.strip_prefix("Database: "))
			.unwrap_or("unknown")
			.to_string();

		Box::pin(async move { Ok(format!("  {name} was picked by the model.  ")) })
	}
}

struct FailingLlm;
impl LanguageModelProvider for FailingLlm {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			Err(Error::GenerationUnavailable { message: "model is down".to_string() })
		})
	}
}

struct SlowLlm;
impl LanguageModelProvider for SlowLlm {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			tokio::time::sleep(Duration::from_secs(5)).await;

			Ok("too late".to_string())
		})
	}
}

struct VerboseLlm;
impl LanguageModelProvider for VerboseLlm {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok("x".repeat(1_000)) })
	}
}

struct BlankLlm;
impl LanguageModelProvider for BlankLlm {
	fn complete<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok("   ".to_string()) })
	}
}

fn corpus() -> StaticCorpus {
	StaticCorpus::new(vec![
		CorpusEntry {
			name: "PostgreSQL".to_string(),
			description: "Relational, structured tables with strong consistency.".to_string(),
			highlight: Some("its robust ACID compliance".to_string()),
		},
		CorpusEntry {
			name: "Neo4j".to_string(),
			description: "Native graph storage, graph traversal, strong transactions.".to_string(),
			highlight: Some("its native graph storage".to_string()),
		},
		CorpusEntry {
			name: "Redis".to_string(),
			description: "In-memory real-time and high-speed access.".to_string(),
			highlight: None,
		},
	])
}

async fn recommender(
	cfg: Config,
	embedding: Arc<dyn EmbeddingProvider>,
	llm: Arc<dyn LanguageModelProvider>,
) -> Recommender {
	Recommender::bootstrap(cfg, Providers::new(embedding, llm), &corpus())
		.await
		.expect("Failed to bootstrap recommender.")
}

#[tokio::test]
async fn ranks_profiles_and_uses_model_explanations() {
	let llm = Arc::new(EchoLlm::new());
	let service =
		recommender(test_config(), Arc::new(KeywordEmbedding::new()), llm.clone()).await;
	let response = service
		.recommend(&answers(&[("q1", &["graph"]), ("q4", &["strong"])]))
		.await
		.expect("Recommendation failed.");
	let names: Vec<&str> =
		response.recommendations.iter().map(|result| result.name.as_str()).collect();

	assert_eq!(names, vec!["Neo4j", "PostgreSQL", "Redis"]);
	assert!(response.recommendations[0].score > response.recommendations[1].score);
	assert_eq!(response.recommendations[2].score, 0.0);
	assert_eq!(llm.calls.load(Ordering::SeqCst), 3);

	for result in &response.recommendations {
		assert_eq!(result.explanation_source, ExplanationSource::Llm);
		assert_eq!(result.explanation, format!("{} was picked by the model.", result.name));
	}
}

#[tokio::test]
async fn query_summary_mentions_only_answered_dimensions() {
	let service =
		recommender(test_config(), Arc::new(KeywordEmbedding::new()), Arc::new(EchoLlm::new()))
			.await;
	let response = service
		.recommend(&answers(&[("q1", &["graph"]), ("q4", &["strong"])]))
		.await
		.expect("Recommendation failed.");

	assert!(response.query_summary.contains("data type: graph"));
	assert!(response.query_summary.contains("consistency needs: strong"));

	for topic in
		["performance requirements", "data volume", "deployment environment", "scaling approach"]
	{
		assert!(!response.query_summary.contains(topic), "{topic} should be omitted");
	}
}

#[tokio::test]
async fn failing_model_falls_back_for_every_result() {
	let service =
		recommender(test_config(), Arc::new(KeywordEmbedding::new()), Arc::new(FailingLlm)).await;
	let response = service
		.recommend(&answers(&[("q1", &["graph"]), ("q4", &["strong"])]))
		.await
		.expect("Recommendation failed.");

	assert_eq!(response.recommendations.len(), 3);

	for result in &response.recommendations {
		let expected = format!("Confidence level: {} ({:.3}).", result.confidence, result.score);

		assert_eq!(result.explanation_source, ExplanationSource::Fallback);
		assert!(result.explanation.starts_with(&result.name));
		assert!(result.explanation.ends_with(&expected), "Unexpected: {}", result.explanation);
	}

	assert_eq!(
		response.recommendations[0].explanation,
		"Neo4j is recommended for its native graph storage. It aligns with your data type (graph) \
		 and consistency needs (strong). Confidence level: High (0.949)."
	);
	assert_eq!(response.recommendations[1].confidence, ConfidenceLevel::Medium);
	assert_eq!(response.recommendations[2].confidence, ConfidenceLevel::Low);
}

#[tokio::test]
async fn fallback_text_is_repeatable() {
	let service =
		recommender(test_config(), Arc::new(KeywordEmbedding::new()), Arc::new(FailingLlm)).await;
	let input = answers(&[("q1", &["graph", "structured"]), ("q2", &["real-time"])]);
	let first = service.recommend(&input).await.expect("Recommendation failed.");
	let second = service.recommend(&input).await.expect("Recommendation failed.");
	let texts = |response: &dbrec_service::RecommendResponse| {
		response.recommendations.iter().map(|result| result.explanation.clone()).collect::<Vec<_>>()
	};

	assert_eq!(texts(&first), texts(&second));
	assert_ne!(first.request_id, second.request_id);
}

#[tokio::test]
async fn slow_model_times_out_into_fallback() {
	let mut cfg = test_config();

	cfg.providers.llm_explainer.timeout_ms = 50;

	let service = recommender(cfg, Arc::new(KeywordEmbedding::new()), Arc::new(SlowLlm)).await;
	let response = tokio::time::timeout(
		Duration::from_secs(2),
		service.recommend(&answers(&[("q2", &["real-time"])])),
	)
	.await
	.expect("Recommendation should not wait for the slow model.")
	.expect("Recommendation failed.");

	assert!(
		response
			.recommendations
			.iter()
			.all(|result| result.explanation_source == ExplanationSource::Fallback)
	);
	assert_eq!(response.recommendations[0].name, "Redis");
}

#[tokio::test]
async fn blank_model_output_falls_back() {
	let service =
		recommender(test_config(), Arc::new(KeywordEmbedding::new()), Arc::new(BlankLlm)).await;
	let response =
		service.recommend(&answers(&[("q1", &["graph"])])).await.expect("Recommendation failed.");

	assert!(response.recommendations.iter().all(|result| !result.explanation.trim().is_empty()));
	assert!(
		response
			.recommendations
			.iter()
			.all(|result| result.explanation_source == ExplanationSource::Fallback)
	);
}

#[tokio::test]
async fn model_output_is_truncated() {
	let mut cfg = test_config();

	cfg.providers.llm_explainer.max_output_chars = 120;

	let service = recommender(cfg, Arc::new(KeywordEmbedding::new()), Arc::new(VerboseLlm)).await;
	let response =
		service.recommend(&answers(&[("q1", &["graph"])])).await.expect("Recommendation failed.");

	assert_eq!(response.recommendations[0].explanation.chars().count(), 120);
}

#[tokio::test]
async fn disabled_model_is_never_called() {
	let mut cfg = test_config();

	cfg.recommend.llm_explanations = false;

	let llm = Arc::new(EchoLlm::new());
	let service = recommender(cfg, Arc::new(KeywordEmbedding::new()), llm.clone()).await;
	let response =
		service.recommend(&answers(&[("q1", &["graph"])])).await.expect("Recommendation failed.");

	assert!(!service.uses_llm_explanations());
	assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
	assert!(
		response
			.recommendations
			.iter()
			.all(|result| result.explanation_source == ExplanationSource::Fallback)
	);
}

#[tokio::test]
async fn top_k_is_respected_and_clamped() {
	let mut cfg = test_config();

	cfg.recommend.top_k = 2;

	let service =
		recommender(cfg, Arc::new(KeywordEmbedding::new()), Arc::new(FailingLlm)).await;
	let response =
		service.recommend(&answers(&[("q1", &["graph"])])).await.expect("Recommendation failed.");

	assert_eq!(response.recommendations.len(), 2);

	let mut cfg = test_config();

	cfg.recommend.top_k = 50;

	let service =
		recommender(cfg, Arc::new(KeywordEmbedding::new()), Arc::new(FailingLlm)).await;
	let response =
		service.recommend(&answers(&[("q1", &["graph"])])).await.expect("Recommendation failed.");

	assert_eq!(response.recommendations.len(), service.index().len());
}

#[tokio::test]
async fn embedding_outage_fails_the_request() {
	let embedding = Arc::new(FlakyEmbedding { remaining_successes: AtomicUsize::new(1) });
	let service = recommender(test_config(), embedding, Arc::new(EchoLlm::new())).await;
	let err = service
		.recommend(&answers(&[("q1", &["graph"])]))
		.await
		.expect_err("Expected embedding failure.");

	assert!(matches!(err, Error::EmbeddingUnavailable { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn query_dimension_mismatch_is_an_embedding_failure() {
	let service =
		recommender(test_config(), Arc::new(WideQueryEmbedding), Arc::new(EchoLlm::new())).await;
	let err = service
		.recommend(&answers(&[("q1", &["graph"])]))
		.await
		.expect_err("Expected dimension mismatch.");

	assert!(matches!(err, Error::EmbeddingUnavailable { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn invalid_answers_are_rejected_before_embedding() {
	let embedding = Arc::new(KeywordEmbedding::new());
	let service = recommender(test_config(), embedding.clone(), Arc::new(EchoLlm::new())).await;
	let calls_after_bootstrap = embedding.calls.load(Ordering::SeqCst);
	let err = service
		.recommend(&answers(&[("q1", &["graph"]), ("q4", &["sometimes"])]))
		.await
		.expect_err("Expected invalid answer.");

	assert!(
		matches!(err, Error::InvalidAnswer { ref question_id, .. } if question_id == "q4"),
		"Unexpected error: {err}"
	);
	assert_eq!(embedding.calls.load(Ordering::SeqCst), calls_after_bootstrap);
}

#[tokio::test]
async fn bootstrap_rejects_empty_corpus() {
	let result = Recommender::bootstrap(
		test_config(),
		Providers::new(Arc::new(KeywordEmbedding::new()), Arc::new(FailingLlm)),
		&StaticCorpus::new(Vec::new()),
	)
	.await;

	assert!(matches!(result, Err(Error::EmptyCorpus)));
}

#[tokio::test]
async fn bootstrap_fails_when_corpus_cannot_be_embedded() {
	let result = Recommender::bootstrap(
		test_config(),
		Providers::new(
			Arc::new(FlakyEmbedding { remaining_successes: AtomicUsize::new(0) }),
			Arc::new(FailingLlm),
		),
		&corpus(),
	)
	.await;

	assert!(matches!(result, Err(Error::EmbeddingUnavailable { .. })));
}

#[tokio::test]
async fn stalled_query_embedding_times_out() {
	let mut cfg = test_config();

	cfg.providers.embedding.timeout_ms = 50;

	let service = recommender(cfg, Arc::new(StalledQueryEmbedding), Arc::new(EchoLlm::new())).await;
	let err = tokio::time::timeout(
		Duration::from_secs(2),
		service.recommend(&answers(&[("q1", &["graph"])])),
	)
	.await
	.expect("Recommendation should not wait for a stalled embedding provider.")
	.expect_err("Expected embedding timeout.");

	match err {
		Error::EmbeddingUnavailable { message } => {
			assert_eq!(message, "Embedding provider test timed out after 50 ms.");
		},
		other => panic!("Unexpected error: {other}"),
	}
}

#[tokio::test]
async fn bootstrap_rejects_vectors_of_unconfigured_width() {
	let mut cfg = test_config();

	cfg.providers.embedding.dimensions = 1536;

	let result = Recommender::bootstrap(
		cfg,
		Providers::new(Arc::new(KeywordEmbedding::new()), Arc::new(FailingLlm)),
		&corpus(),
	)
	.await;

	match result {
		Err(Error::InvalidCorpus { message }) => {
			assert_eq!(message, "Index has 3 dimensions, providers.embedding.dimensions is 1536.");
		},
		Err(other) => panic!("Unexpected error: {other}"),
		Ok(_) => panic!("Expected dimension mismatch to be rejected."),
	}
}
