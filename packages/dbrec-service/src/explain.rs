use std::{sync::Arc, time::Duration};

use serde::Serialize;

use dbrec_config::{Confidence, LlmProviderConfig};
use dbrec_domain::{ConfidenceLevel, QuerySummary, query::SummaryEntry};

use crate::{Error, LanguageModelProvider, Profile, Result};

/// Dimensions restated first by the fallback: data type, then consistency.
const PREFERRED_DIMENSIONS: [&str; 2] = ["q1", "q4"];
const MAX_FALLBACK_DIMENSIONS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
	Llm,
	Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
	pub text: String,
	pub source: ExplanationSource,
}

struct LlmExplainer {
	provider: Arc<dyn LanguageModelProvider>,
	cfg: LlmProviderConfig,
}
impl LlmExplainer {
	async fn generate(
		&self,
		profile: &Profile,
		score: f32,
		summary: &QuerySummary,
		thresholds: &Confidence,
	) -> Result<String> {
		let prompt = build_prompt(profile, score, summary, thresholds);
		let timeout = Duration::from_millis(self.cfg.timeout_ms);
		let text = tokio::time::timeout(timeout, self.provider.complete(&self.cfg, &prompt))
			.await
			.map_err(|_| Error::GenerationUnavailable {
				message: format!(
					"Language model {} timed out after {} ms.",
					self.cfg.provider_id, self.cfg.timeout_ms
				),
			})??;
		let text = text.trim();

		if text.is_empty() {
			return Err(Error::GenerationUnavailable {
				message: "Language model returned an empty explanation.".to_string(),
			});
		}

		Ok(truncate_chars(text, self.cfg.max_output_chars as usize))
	}
}

/// Produces one explanation per ranked profile and never fails.
///
/// With a language model attached the model's text is used when it arrives in time; every
/// other outcome, including running without a model, yields [`fallback_explanation`].
pub struct ExplanationGenerator {
	llm: Option<LlmExplainer>,
	thresholds: Confidence,
}
impl ExplanationGenerator {
	pub fn fallback_only(thresholds: Confidence) -> Self {
		Self { llm: None, thresholds }
	}

	pub fn with_llm(
		provider: Arc<dyn LanguageModelProvider>,
		cfg: LlmProviderConfig,
		thresholds: Confidence,
	) -> Self {
		Self { llm: Some(LlmExplainer { provider, cfg }), thresholds }
	}

	pub fn uses_llm(&self) -> bool {
		self.llm.is_some()
	}

	pub async fn explain(
		&self,
		profile: &Profile,
		score: f32,
		summary: &QuerySummary,
	) -> Explanation {
		let Some(llm) = self.llm.as_ref() else {
			return self.fallback(profile, score, summary);
		};

		match llm.generate(profile, score, summary, &self.thresholds).await {
			Ok(text) => Explanation { text, source: ExplanationSource::Llm },
			Err(err) => {
				tracing::warn!(
					provider = %llm.cfg.provider_id,
					error = %err,
					profile = %profile.name,
					"Language model explanation failed. Using fallback."
				);

				self.fallback(profile, score, summary)
			},
		}
	}

	fn fallback(&self, profile: &Profile, score: f32, summary: &QuerySummary) -> Explanation {
		Explanation {
			text: fallback_explanation(profile, score, summary, &self.thresholds),
			source: ExplanationSource::Fallback,
		}
	}
}

/// Template explanation built only from local data.
pub fn fallback_explanation(
	profile: &Profile,
	score: f32,
	summary: &QuerySummary,
	thresholds: &Confidence,
) -> String {
	let mut text = match profile.highlight.as_deref() {
		Some(highlight) => format!("{} is recommended for {highlight}.", profile.name),
		None => format!("{} is recommended based on your requirements.", profile.name),
	};
	let dimensions = fallback_dimensions(summary)
		.iter()
		.map(|entry| format!("{} ({})", entry.topic, entry.answer))
		.collect::<Vec<_>>();

	if !dimensions.is_empty() {
		text.push_str(&format!(" It aligns with your {}.", dimensions.join(" and ")));
	}

	text.push(' ');
	text.push_str(&confidence_line(score, thresholds));

	text
}

pub fn confidence_line(score: f32, thresholds: &Confidence) -> String {
	format!("Confidence level: {} ({score:.3}).", ConfidenceLevel::from_score(score, thresholds))
}

fn fallback_dimensions(summary: &QuerySummary) -> Vec<&SummaryEntry> {
	let preferred = PREFERRED_DIMENSIONS.iter().filter_map(|id| summary.get(id));
	let rest = summary
		.entries()
		.iter()
		.filter(|entry| !PREFERRED_DIMENSIONS.contains(&entry.question_id.as_str()));

	preferred.chain(rest).take(MAX_FALLBACK_DIMENSIONS).collect()
}

fn build_prompt(
	profile: &Profile,
	score: f32,
	summary: &QuerySummary,
	thresholds: &Confidence,
) -> String {
	let requirements = if summary.is_empty() {
		"- unspecified".to_string()
	} else {
		summary
			.entries()
			.iter()
			.map(|entry| format!("- {}: {}", entry.topic, entry.answer))
			.collect::<Vec<_>>()
			.join("\n")
	};
	let level = ConfidenceLevel::from_score(score, thresholds);

	format!(
		"You are a database expert explaining why a specific database was recommended.\n\n\
		 Database: {name}\n\
		 Database description: {description}\n\
		 User requirements:\n{requirements}\n\
		 Similarity score: {score:.3} ({level} confidence)\n\n\
		 Write a concise, professional explanation (2-3 sentences) of why this database is a good \
		 match for the requirements. Focus on specific strengths that align with the needs. Start \
		 with the database name and end with the confidence level.",
		name = profile.name,
		description = profile.description,
	)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((cut, _)) => text[..cut].trim_end().to_string(),
		None => text.to_string(),
	}
}
