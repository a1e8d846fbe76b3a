pub mod confidence;
pub mod query;
pub mod questions;

mod error;

pub use confidence::ConfidenceLevel;
pub use error::{Error, Result};
pub use query::{AnswerSet, BuiltQuery, QuerySummary};
pub use questions::Question;
