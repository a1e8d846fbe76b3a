use std::sync::Arc;

use dbrec_service::{DirectoryCorpus, Providers, Recommender};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<Recommender>,
}
impl AppState {
	pub async fn new(config: dbrec_config::Config) -> color_eyre::Result<Self> {
		let corpus = DirectoryCorpus::new(&config.corpus);
		let service = Recommender::bootstrap(config, Providers::default(), &corpus).await?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: Recommender) -> Self {
		Self { service: Arc::new(service) }
	}
}
