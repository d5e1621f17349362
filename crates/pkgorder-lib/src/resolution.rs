//! Output of the resolver, consumed read-only by the orderer.
//!
//! A [`Resolution`] ties a [`Resolvent`] to the [`Decision`] made for it and the
//! [`Constraint`]s (each carrying a [`Reason`]) that explain why it exists.
//! [`Resolutions`] owns all of them for a single ordering run.

use std::collections::HashMap;

use serde::{Serialize, Deserialize};

use crate::resolvent::Resolvent;

mod decision;
pub use decision::*;

mod reason;
pub use reason::Reason;
pub use reason::SanitisedDependency;

mod labels;
pub use labels::DependencyLabel;
pub use labels::LabelsClassifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
	pub reason: Reason,
}

impl From<Reason> for Constraint {
	fn from(reason: Reason) -> Self {
		Constraint { reason }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
	pub resolvent: Resolvent,
	pub constraints: Vec<Constraint>,
	pub decision: Decision,
}

/// Arena of resolutions, keyed by resolvent.
///
/// Iteration follows insertion order so that ordering runs are reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Resolution>", into = "Vec<Resolution>")]
pub struct Resolutions {
	resolutions: Vec<Resolution>,
	by_resolvent: HashMap<Resolvent, usize>,
}

impl Resolutions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `resolution`, replacing any existing one for the same resolvent.
	pub fn insert(&mut self, resolution: Resolution) {
		if let Some(&i) = self.by_resolvent.get(&resolution.resolvent) {
			self.resolutions[i] = resolution;
		} else {
			self.by_resolvent.insert(resolution.resolvent.clone(), self.resolutions.len());
			self.resolutions.push(resolution);
		}
	}

	pub fn get(&self, resolvent: &Resolvent) -> Option<&Resolution> {
		self.by_resolvent.get(resolvent).map(|&i| &self.resolutions[i])
	}

	pub fn get_mut(&mut self, resolvent: &Resolvent) -> Option<&mut Resolution> {
		self.by_resolvent.get(resolvent).map(|&i| &mut self.resolutions[i])
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Resolution> {
		self.resolutions.iter()
	}

	pub fn len(&self) -> usize {
		self.resolutions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.resolutions.is_empty()
	}
}

impl FromIterator<Resolution> for Resolutions {
	fn from_iter<T: IntoIterator<Item = Resolution>>(iter: T) -> Self {
		let mut result = Resolutions::new();
		for r in iter {
			result.insert(r);
		}
		result
	}
}

impl From<Vec<Resolution>> for Resolutions {
	fn from(value: Vec<Resolution>) -> Self {
		value.into_iter().collect()
	}
}

impl From<Resolutions> for Vec<Resolution> {
	fn from(value: Resolutions) -> Self {
		value.resolutions
	}
}

impl<'a> IntoIterator for &'a Resolutions {
	type Item = &'a Resolution;
	type IntoIter = std::slice::Iter<'a, Resolution>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
