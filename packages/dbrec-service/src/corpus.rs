use std::{fs, path::PathBuf};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
	pub name: String,
	pub description: String,
	pub highlight: Option<String>,
}

/// Source of the profiles the similarity index is built from. Read once at startup.
pub trait CorpusStore
where
	Self: Send + Sync,
{
	fn list_profiles(&self) -> Result<Vec<CorpusEntry>>;
}

/// Reads one markdown description per configured profile.
///
/// Files that are missing or unreadable are skipped with a warning; an empty result is left for
/// the index builder to reject.
pub struct DirectoryCorpus {
	dir: PathBuf,
	profiles: Vec<dbrec_config::CorpusProfile>,
}
impl DirectoryCorpus {
	pub fn new(cfg: &dbrec_config::Corpus) -> Self {
		Self { dir: cfg.descriptions_dir.clone(), profiles: cfg.profiles.clone() }
	}
}

impl CorpusStore for DirectoryCorpus {
	fn list_profiles(&self) -> Result<Vec<CorpusEntry>> {
		let mut entries = Vec::with_capacity(self.profiles.len());

		for profile in &self.profiles {
			let path = self.dir.join(&profile.file);
			let description = match fs::read_to_string(&path) {
				Ok(raw) => raw.trim().to_string(),
				Err(err) => {
					tracing::warn!(
						error = %err,
						profile = %profile.name,
						path = %path.display(),
						"Skipping profile with unreadable description."
					);

					continue;
				},
			};

			if description.is_empty() {
				tracing::warn!(profile = %profile.name, "Skipping profile with empty description.");

				continue;
			}

			tracing::debug!(profile = %profile.name, "Loaded profile description.");

			entries.push(CorpusEntry {
				name: profile.name.clone(),
				description,
				highlight: profile.highlight.clone(),
			});
		}

		Ok(entries)
	}
}

/// In-memory corpus, mostly for tests and embedding the service elsewhere.
pub struct StaticCorpus {
	entries: Vec<CorpusEntry>,
}
impl StaticCorpus {
	pub fn new(entries: Vec<CorpusEntry>) -> Self {
		Self { entries }
	}
}

impl CorpusStore for StaticCorpus {
	fn list_profiles(&self) -> Result<Vec<CorpusEntry>> {
		Ok(self.entries.clone())
	}
}
