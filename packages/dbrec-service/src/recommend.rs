use futures::future;
use serde::Serialize;
use uuid::Uuid;

use dbrec_config::Config;
use dbrec_domain::{AnswerSet, ConfidenceLevel, Question, questions};

use crate::{
	CorpusStore, Error, ExplanationGenerator, ExplanationSource, Profile, Providers, Result,
	SimilarityIndex, ranker,
};

#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
	pub name: String,
	pub score: f32,
	pub confidence: ConfidenceLevel,
	pub explanation: String,
	pub explanation_source: ExplanationSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
	pub request_id: Uuid,
	pub recommendations: Vec<RankedResult>,
	pub query_summary: String,
}

pub struct Recommender {
	pub cfg: Config,
	pub providers: Providers,
	questions: &'static [Question],
	index: SimilarityIndex,
	explainer: ExplanationGenerator,
}
impl Recommender {
	/// Reads the corpus, embeds every description and builds the index.
	///
	/// Any failure here is fatal: the service must not answer requests without an index.
	pub async fn bootstrap(
		cfg: Config,
		providers: Providers,
		corpus: &dyn CorpusStore,
	) -> Result<Self> {
		let entries = corpus.list_profiles()?;

		if entries.is_empty() {
			return Err(Error::EmptyCorpus);
		}

		let texts: Vec<String> = entries.iter().map(|entry| entry.description.clone()).collect();
		let vectors = ranker::embed_bounded(
			providers.embedding.as_ref(),
			&cfg.providers.embedding,
			&texts,
		)
		.await?;

		if vectors.len() != entries.len() {
			return Err(Error::EmbeddingUnavailable {
				message: format!(
					"Embedding provider returned {} vectors for {} profiles.",
					vectors.len(),
					entries.len()
				),
			});
		}

		let profiles = entries
			.into_iter()
			.zip(vectors)
			.map(|(entry, vector)| Profile::from_entry(entry, vector))
			.collect();
		let index = SimilarityIndex::build(profiles)?;
		let configured = cfg.providers.embedding.dimensions as usize;

		if index.dimensions() != configured {
			return Err(Error::InvalidCorpus {
				message: format!(
					"Index has {} dimensions, providers.embedding.dimensions is {}.",
					index.dimensions(),
					configured
				),
			});
		}

		tracing::info!(
			provider = %cfg.providers.embedding.provider_id,
			profiles = index.len(),
			dimensions = index.dimensions(),
			"Similarity index built."
		);

		Ok(Self::new(cfg, providers, index))
	}

	pub fn new(cfg: Config, providers: Providers, index: SimilarityIndex) -> Self {
		let explainer = if cfg.recommend.llm_explanations {
			ExplanationGenerator::with_llm(
				providers.llm.clone(),
				cfg.providers.llm_explainer.clone(),
				cfg.confidence,
			)
		} else {
			ExplanationGenerator::fallback_only(cfg.confidence)
		};

		Self { cfg, providers, questions: questions::catalog(), index, explainer }
	}

	pub fn questions(&self) -> &[Question] {
		self.questions
	}

	pub fn index(&self) -> &SimilarityIndex {
		&self.index
	}

	pub fn uses_llm_explanations(&self) -> bool {
		self.explainer.uses_llm()
	}

	/// Ranks the corpus against the answers and explains each result.
	///
	/// Only invalid answers and an unavailable embedding service fail the request.
	pub async fn recommend(&self, answers: &AnswerSet) -> Result<RecommendResponse> {
		let request_id = Uuid::new_v4();
		let top_k = self.cfg.recommend.top_k as usize;
		let ranking = ranker::rank(
			answers,
			self.questions,
			&self.index,
			self.providers.embedding.as_ref(),
			&self.cfg.providers.embedding,
			top_k,
		)
		.await
		.inspect_err(|err| {
			tracing::warn!(request_id = %request_id, error = %err, "Recommendation failed.");
		})?;
		let summary = &ranking.query.summary;
		let explanations = future::join_all(
			ranking.hits.iter().map(|hit| self.explainer.explain(hit.profile, hit.score, summary)),
		)
		.await;
		let recommendations: Vec<RankedResult> = ranking
			.hits
			.iter()
			.zip(explanations)
			.map(|(hit, explanation)| RankedResult {
				name: hit.profile.name.clone(),
				score: hit.score,
				confidence: ConfidenceLevel::from_score(hit.score, &self.cfg.confidence),
				explanation: explanation.text,
				explanation_source: explanation.source,
			})
			.collect();

		tracing::info!(
			request_id = %request_id,
			answered = summary.len(),
			results = recommendations.len(),
			top = recommendations.first().map(|result| result.name.as_str()).unwrap_or(""),
			"Recommendation served."
		);

		Ok(RecommendResponse { request_id, recommendations, query_summary: ranking.query.text })
	}
}
