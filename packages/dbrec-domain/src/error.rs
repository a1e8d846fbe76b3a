pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Invalid answer for {question_id}: {message}")]
	InvalidAnswer { question_id: String, message: String },
}
