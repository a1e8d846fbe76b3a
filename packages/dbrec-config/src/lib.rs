mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Confidence, Config, Corpus, CorpusProfile, EmbeddingProviderConfig, LlmProviderConfig,
	Providers, Recommend, Service,
};

use std::{collections::HashSet, fs, path::Path};

/// Upper bound for the explanation call. The fallback only fires once this elapses.
pub const MAX_LLM_TIMEOUT_MS: u64 = 10_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.corpus.profiles.is_empty() {
		return Err(Error::Validation {
			message: "corpus.profiles must be non-empty.".to_string(),
		});
	}

	let mut seen = HashSet::new();

	for profile in &cfg.corpus.profiles {
		if profile.name.trim().is_empty() {
			return Err(Error::Validation {
				message: "corpus.profiles.name must be non-empty.".to_string(),
			});
		}
		if profile.file.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("corpus.profiles.file must be non-empty for {}.", profile.name),
			});
		}
		if !seen.insert(profile.name.as_str()) {
			return Err(Error::Validation {
				message: format!("corpus.profiles.name {} is duplicated.", profile.name),
			});
		}
	}

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.llm_explainer.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm_explainer.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.llm_explainer.timeout_ms > MAX_LLM_TIMEOUT_MS {
		return Err(Error::Validation {
			message: format!(
				"providers.llm_explainer.timeout_ms must be {MAX_LLM_TIMEOUT_MS} or less."
			),
		});
	}
	if cfg.providers.llm_explainer.max_output_chars == 0 {
		return Err(Error::Validation {
			message: "providers.llm_explainer.max_output_chars must be greater than zero."
				.to_string(),
		});
	}
	if !cfg.providers.llm_explainer.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm_explainer.temperature must be a finite number.".to_string(),
		});
	}
	if cfg.recommend.top_k == 0 {
		return Err(Error::Validation {
			message: "recommend.top_k must be greater than zero.".to_string(),
		});
	}

	for (label, value) in
		[("confidence.high", cfg.confidence.high), ("confidence.medium", cfg.confidence.medium)]
	{
		if !value.is_finite() {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number."),
			});
		}
		if !(-1.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range -1.0-1.0."),
			});
		}
	}

	if cfg.confidence.medium > cfg.confidence.high {
		return Err(Error::Validation {
			message: "confidence.medium must not exceed confidence.high.".to_string(),
		});
	}
	if cfg.providers.embedding.api_key.is_empty() {
		return Err(Error::Validation {
			message: "Provider embedding api_key must be non-empty.".to_string(),
		});
	}
	if cfg.recommend.llm_explanations && cfg.providers.llm_explainer.api_key.is_empty() {
		return Err(Error::Validation {
			message: "Provider llm_explainer api_key must be non-empty when \
			 recommend.llm_explanations is true."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.providers.embedding.api_key = cfg.providers.embedding.api_key.trim().to_string();
	cfg.providers.llm_explainer.api_key = cfg.providers.llm_explainer.api_key.trim().to_string();

	for profile in &mut cfg.corpus.profiles {
		if profile.highlight.as_deref().map(|text| text.trim().is_empty()).unwrap_or(false) {
			profile.highlight = None;
		}
	}
}
