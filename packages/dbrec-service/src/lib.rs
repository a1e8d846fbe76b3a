pub mod corpus;
pub mod explain;
pub mod index;
pub mod ranker;
pub mod recommend;

mod error;

pub use corpus::{CorpusEntry, CorpusStore, DirectoryCorpus, StaticCorpus};
pub use error::{Error, Result};
pub use explain::{Explanation, ExplanationGenerator, ExplanationSource};
pub use index::{Hit, Profile, SimilarityIndex};
pub use recommend::{RankedResult, RecommendResponse, Recommender};

use std::{future::Future, pin::Pin, sync::Arc};

use dbrec_config::{EmbeddingProviderConfig, LlmProviderConfig};
use dbrec_providers::{completion, embedding};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait LanguageModelProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub llm: Arc<dyn LanguageModelProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, llm: Arc<dyn LanguageModelProvider>) -> Self {
		Self { embedding, llm }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), llm: provider }
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			embedding::embed(cfg, texts)
				.await
				.map_err(|err| Error::EmbeddingUnavailable { message: err.to_string() })
		})
	}
}

impl LanguageModelProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			completion::complete(cfg, prompt)
				.await
				.map_err(|err| Error::GenerationUnavailable { message: err.to_string() })
		})
	}
}
