pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid answer for {question_id}: {message}")]
	InvalidAnswer { question_id: String, message: String },
	#[error("Embedding unavailable: {message}")]
	EmbeddingUnavailable { message: String },
	#[error("Generation unavailable: {message}")]
	GenerationUnavailable { message: String },
	#[error("Corpus contains no profiles.")]
	EmptyCorpus,
	#[error("Invalid corpus: {message}")]
	InvalidCorpus { message: String },
}
impl From<dbrec_domain::Error> for Error {
	fn from(err: dbrec_domain::Error) -> Self {
		match err {
			dbrec_domain::Error::InvalidAnswer { question_id, message } => {
				Self::InvalidAnswer { question_id, message }
			},
		}
	}
}
