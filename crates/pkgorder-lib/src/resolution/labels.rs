//! Dependency labels and how they map onto graph edge kinds.

use serde::{Serialize, Deserialize};

/// The active label of a dependency, describing when it is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyLabel {
	Build,
	Install,
	Fetch,
	Run,
	Test,
	Post,
	Suggestion,
	Recommendation,
	CompileAgainst,
}

/// Result of looking at every active label on a dependency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelsClassifier {
	pub build: bool,
	pub run: bool,
	pub post: bool,
	/// Only needed to fetch, so the dependent's `fetched` node carries the edge.
	pub fetch: bool,
}

impl LabelsClassifier {
	pub fn classify<'a>(labels: impl IntoIterator<Item = &'a DependencyLabel>) -> Self {
		let mut result = Self::default();
		let mut non_fetch = false;

		for label in labels {
			match label {
				DependencyLabel::Build
				| DependencyLabel::Install
				| DependencyLabel::Test
				| DependencyLabel::CompileAgainst => {
					result.build = true;
					non_fetch = true;
				},
				DependencyLabel::Fetch => {
					result.build = true;
					result.fetch = true;
				},
				DependencyLabel::Run => {
					result.run = true;
					non_fetch = true;
				},
				DependencyLabel::Post
				| DependencyLabel::Suggestion
				| DependencyLabel::Recommendation => {
					result.post = true;
					non_fetch = true;
				},
			}
		}

		/* a fetch label mixed with anything else is needed beyond fetching */
		result.fetch &= !non_fetch;
		result
	}

	/// Build or run, i.e. something that orders the dependency first.
	pub fn is_build_or_run(&self) -> bool {
		self.build || self.run
	}

	pub fn is_classified(&self) -> bool {
		self.build || self.run || self.post
	}
}
