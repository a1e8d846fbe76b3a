use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
	pub id: &'static str,
	pub prompt: &'static str,
	/// Short noun phrase used when the answer is rendered into the query text.
	#[serde(skip)]
	pub topic: &'static str,
	pub choices: &'static [&'static str],
}
impl Question {
	pub fn allows(&self, label: &str) -> bool {
		self.choices.contains(&label)
	}
}

static CATALOG: [Question; 10] = [
	Question {
		id: "q1",
		prompt: "What type of data are you primarily working with?",
		topic: "data type",
		choices: &["structured", "unstructured", "semi-structured", "graph", "time-series"],
	},
	Question {
		id: "q2",
		prompt: "What are your performance requirements?",
		topic: "performance requirements",
		choices: &["high-speed", "moderate", "high-throughput", "real-time", "batch"],
	},
	Question {
		id: "q3",
		prompt: "What is your expected data volume?",
		topic: "data volume",
		choices: &["small", "medium", "large", "massive", "growing"],
	},
	Question {
		id: "q4",
		prompt: "What consistency guarantees do you need?",
		topic: "consistency needs",
		choices: &["strong", "eventual", "weak", "custom", "none"],
	},
	Question {
		id: "q5",
		prompt: "What is your deployment environment?",
		topic: "deployment environment",
		choices: &["cloud", "on-premise", "hybrid", "edge", "distributed"],
	},
	Question {
		id: "q6",
		prompt: "What is your team's expertise level?",
		topic: "expertise level",
		choices: &["beginner", "intermediate", "expert", "mixed", "consulting"],
	},
	Question {
		id: "q7",
		prompt: "What is your budget constraint?",
		topic: "budget constraints",
		choices: &["low", "medium", "high", "enterprise", "open-source"],
	},
	Question {
		id: "q8",
		prompt: "What is your time-to-market requirement?",
		topic: "time requirements",
		choices: &["immediate", "quick", "moderate", "planned", "flexible"],
	},
	Question {
		id: "q9",
		prompt: "What integration requirements do you have?",
		topic: "integration needs",
		choices: &["simple", "moderate", "complex", "legacy", "modern"],
	},
	Question {
		id: "q10",
		prompt: "What is your scaling strategy?",
		topic: "scaling approach",
		choices: &["vertical", "horizontal", "auto", "manual", "hybrid"],
	},
];

/// The questionnaire in presentation order.
pub fn catalog() -> &'static [Question] {
	&CATALOG
}

pub fn find<'a>(questions: &'a [Question], id: &str) -> Option<&'a Question> {
	questions.iter().find(|question| question.id == id)
}
