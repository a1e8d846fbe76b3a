use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
	Error, Result,
	questions::{self, Question},
};

pub const ANSWER_SEPARATOR: &str = ", ";
pub const FRAGMENT_SEPARATOR: &str = "; ";
pub const QUERY_OPENING: &str = "I need a database for an application";
pub const QUERY_CLOSING: &str = "The database should be well-suited for these requirements and \
                                 provide good performance and reliability.";

/// Raw questionnaire answers keyed by question id.
pub type AnswerSet = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
	pub question_id: String,
	pub topic: String,
	pub answer: String,
}

/// Joined answer text per answered question, in questionnaire order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuerySummary {
	entries: Vec<SummaryEntry>,
}
impl QuerySummary {
	pub fn get(&self, question_id: &str) -> Option<&SummaryEntry> {
		self.entries.iter().find(|entry| entry.question_id == question_id)
	}

	pub fn entries(&self) -> &[SummaryEntry] {
		&self.entries
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
	pub text: String,
	pub summary: QuerySummary,
}

/// Checks every answered catalog question. Unknown ids are ignored.
pub fn validate(answers: &AnswerSet, questions: &[Question]) -> Result<()> {
	for (question_id, labels) in answers {
		let Some(question) = questions::find(questions, question_id) else {
			tracing::debug!(question_id = %question_id, "Ignoring answer for unknown question.");

			continue;
		};

		if labels.is_empty() {
			return Err(Error::InvalidAnswer {
				question_id: question_id.clone(),
				message: "at least one choice is required".to_string(),
			});
		}

		if let Some(label) = labels.iter().find(|label| !question.allows(label)) {
			return Err(Error::InvalidAnswer {
				question_id: question_id.clone(),
				message: format!("{label:?} is not one of {}", question.choices.join(", ")),
			});
		}
	}

	Ok(())
}

/// Renders validated answers into the query text and the per-question summary.
pub fn build(answers: &AnswerSet, questions: &[Question]) -> Result<BuiltQuery> {
	validate(answers, questions)?;

	let mut entries = Vec::new();

	for question in questions {
		let Some(labels) = answers.get(question.id) else {
			continue;
		};

		entries.push(SummaryEntry {
			question_id: question.id.to_string(),
			topic: question.topic.to_string(),
			answer: labels.join(ANSWER_SEPARATOR),
		});
	}

	let summary = QuerySummary { entries };

	Ok(BuiltQuery { text: render(&summary), summary })
}

fn render(summary: &QuerySummary) -> String {
	if summary.is_empty() {
		return format!("{QUERY_OPENING}. {QUERY_CLOSING}");
	}

	let fragments = summary
		.entries()
		.iter()
		.map(|entry| format!("{}: {}", entry.topic, entry.answer))
		.collect::<Vec<_>>()
		.join(FRAGMENT_SEPARATOR);

	format!("{QUERY_OPENING} with {fragments}. {QUERY_CLOSING}")
}
