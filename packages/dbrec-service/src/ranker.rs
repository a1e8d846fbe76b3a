use std::time::Duration;

use dbrec_config::EmbeddingProviderConfig;
use dbrec_domain::{AnswerSet, BuiltQuery, Question, query};

use crate::{EmbeddingProvider, Error, Hit, Result, SimilarityIndex};

pub struct Ranking<'a> {
	pub query: BuiltQuery,
	pub hits: Vec<Hit<'a>>,
}

/// Builds the query, embeds it and returns the `top_k` nearest profiles.
///
/// There is no fallback here: without a query vector nothing can be ranked.
pub async fn rank<'a>(
	answers: &AnswerSet,
	questions: &[Question],
	index: &'a SimilarityIndex,
	embedding: &dyn EmbeddingProvider,
	cfg: &EmbeddingProviderConfig,
	top_k: usize,
) -> Result<Ranking<'a>> {
	let query = query::build(answers, questions)?;
	let texts = vec![query.text.clone()];
	let vector = embed_bounded(embedding, cfg, &texts)
		.await?
		.into_iter()
		.next()
		.ok_or_else(|| Error::EmbeddingUnavailable {
			message: "Embedding provider returned no vector for the query.".to_string(),
		})?;

	if vector.len() != index.dimensions() {
		return Err(Error::EmbeddingUnavailable {
			message: format!(
				"Query vector has {} dimensions, index expects {}.",
				vector.len(),
				index.dimensions()
			),
		});
	}

	let hits = index.search(&vector, top_k.min(index.len()));

	Ok(Ranking { query, hits })
}

/// Calls the embedding provider under `cfg.timeout_ms`.
///
/// Every failure, including the deadline, surfaces as [`Error::EmbeddingUnavailable`].
pub async fn embed_bounded(
	embedding: &dyn EmbeddingProvider,
	cfg: &EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let timeout = Duration::from_millis(cfg.timeout_ms);

	tracing::debug!(provider = %cfg.provider_id, inputs = texts.len(), "Embedding request.");

	match tokio::time::timeout(timeout, embedding.embed(cfg, texts)).await {
		Ok(Ok(vectors)) => Ok(vectors),
		Ok(Err(err @ Error::EmbeddingUnavailable { .. })) => Err(err),
		Ok(Err(other)) => Err(Error::EmbeddingUnavailable { message: other.to_string() }),
		Err(_) => Err(Error::EmbeddingUnavailable {
			message: format!(
				"Embedding provider {} timed out after {} ms.",
				cfg.provider_id, cfg.timeout_ms
			),
		}),
	}
}
