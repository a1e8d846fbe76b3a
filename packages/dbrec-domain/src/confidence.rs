use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
	High,
	Medium,
	Low,
}
impl ConfidenceLevel {
	pub fn from_score(score: f32, thresholds: &dbrec_config::Confidence) -> Self {
		if score >= thresholds.high {
			Self::High
		} else if score >= thresholds.medium {
			Self::Medium
		} else {
			Self::Low
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::High => "High",
			Self::Medium => "Medium",
			Self::Low => "Low",
		}
	}
}

impl fmt::Display for ConfidenceLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
