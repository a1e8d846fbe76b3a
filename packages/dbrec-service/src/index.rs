use std::{cmp::Ordering, collections::HashSet};

use crate::{Error, Result, corpus::CorpusEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
	pub name: String,
	pub description: String,
	pub highlight: Option<String>,
	pub vector: Vec<f32>,
}
impl Profile {
	pub fn from_entry(entry: CorpusEntry, vector: Vec<f32>) -> Self {
		Self {
			name: entry.name,
			description: entry.description,
			highlight: entry.highlight,
			vector,
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
	pub profile: &'a Profile,
	pub score: f32,
}

/// Exact cosine nearest-neighbor index over a fixed set of profiles.
///
/// Profiles keep their insertion order, which is also the tie-break order for equal scores.
#[derive(Debug)]
pub struct SimilarityIndex {
	profiles: Vec<Profile>,
	dimensions: usize,
}
impl SimilarityIndex {
	pub fn build(profiles: Vec<Profile>) -> Result<Self> {
		let Some(first) = profiles.first() else {
			return Err(Error::EmptyCorpus);
		};
		let dimensions = first.vector.len();

		if dimensions == 0 {
			return Err(Error::InvalidCorpus {
				message: format!("Profile {} has an empty vector.", first.name),
			});
		}

		let mut names = HashSet::with_capacity(profiles.len());

		for profile in &profiles {
			if profile.vector.len() != dimensions {
				return Err(Error::InvalidCorpus {
					message: format!(
						"Profile {} has {} dimensions, expected {dimensions}.",
						profile.name,
						profile.vector.len()
					),
				});
			}
			if !names.insert(profile.name.as_str()) {
				return Err(Error::InvalidCorpus {
					message: format!("Profile {} appears more than once.", profile.name),
				});
			}
		}

		Ok(Self { profiles, dimensions })
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions
	}

	pub fn len(&self) -> usize {
		self.profiles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.profiles.is_empty()
	}

	pub fn profiles(&self) -> &[Profile] {
		&self.profiles
	}

	/// Returns at most `k` profiles ordered by descending similarity.
	pub fn search(&self, query: &[f32], k: usize) -> Vec<Hit<'_>> {
		let mut hits: Vec<Hit<'_>> = self
			.profiles
			.iter()
			.map(|profile| Hit { profile, score: cosine_similarity(query, &profile.vector) })
			.collect();

		// `sort_by` is stable, so equal scores keep corpus order.
		hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
		hits.truncate(k);

		hits
	}
}

/// Cosine similarity, defined as 0 when either side has zero norm or the result is not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	let (mut dot, mut norm_a, mut norm_b) = (0.0_f32, 0.0_f32, 0.0_f32);

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	let score = dot / (norm_a.sqrt() * norm_b.sqrt());

	if score.is_finite() { score } else { 0.0 }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn profile(name: &str, vector: &[f32]) -> Profile {
		Profile {
			name: name.to_string(),
			description: format!("{name} description"),
			highlight: None,
			vector: vector.to_vec(),
		}
	}

	fn names<'a>(hits: &[Hit<'a>]) -> Vec<&'a str> {
		hits.iter().map(|hit| hit.profile.name.as_str()).collect()
	}

	#[test]
	fn ranks_known_vectors() {
		let index = SimilarityIndex::build(vec![
			profile("A", &[1.0, 0.0]),
			profile("B", &[0.0, 1.0]),
			profile("C", &[0.9, 0.1]),
		])
		.expect("build failed");
		let hits = index.search(&[1.0, 0.0], 2);

		assert_eq!(names(&hits), vec!["A", "C"]);
		assert!((hits[0].score - 1.0).abs() < 1e-6);
		assert!((hits[1].score - 0.9939).abs() < 1e-3);
	}

	#[test]
	fn ties_keep_insertion_order() {
		let index = SimilarityIndex::build(vec![
			profile("Zeta", &[1.0, 1.0]),
			profile("Alpha", &[0.0, 1.0]),
			profile("Mid", &[1.0, 1.0]),
			profile("Beta", &[1.0, 0.0]),
		])
		.expect("build failed");
		let hits = index.search(&[1.0, 1.0], 4);

		assert_eq!(names(&hits), vec!["Zeta", "Mid", "Alpha", "Beta"]);
	}

	#[test]
	fn k_larger_than_corpus_returns_everything() {
		let index =
			SimilarityIndex::build(vec![profile("A", &[1.0, 0.0]), profile("B", &[0.0, 1.0])])
				.expect("build failed");

		assert_eq!(index.search(&[1.0, 0.0], 10).len(), 2);
		assert!(index.search(&[1.0, 0.0], 0).is_empty());
	}

	#[test]
	fn zero_vector_profile_scores_zero() {
		let index = SimilarityIndex::build(vec![
			profile("Empty", &[0.0, 0.0]),
			profile("Opposite", &[-1.0, 0.0]),
			profile("Near", &[0.2, 1.0]),
		])
		.expect("build failed");
		let hits = index.search(&[1.0, 0.0], 3);

		assert_eq!(names(&hits), vec!["Near", "Empty", "Opposite"]);
		assert_eq!(hits[1].score, 0.0);
	}

	#[test]
	fn zero_query_scores_everything_zero() {
		assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
		assert_eq!(cosine_similarity(&[f32::NAN, 0.0], &[1.0, 0.0]), 0.0);
	}

	#[test]
	fn rejects_empty_and_inconsistent_corpora() {
		assert!(matches!(SimilarityIndex::build(Vec::new()), Err(Error::EmptyCorpus)));
		assert!(matches!(
			SimilarityIndex::build(vec![profile("A", &[1.0, 0.0]), profile("B", &[1.0])]),
			Err(Error::InvalidCorpus { .. })
		));
		assert!(matches!(
			SimilarityIndex::build(vec![profile("A", &[1.0]), profile("A", &[0.5])]),
			Err(Error::InvalidCorpus { .. })
		));
	}
}
