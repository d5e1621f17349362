//! The result of an ordering run.

use serde::{Serialize, Deserialize};

use crate::job::JobLists;
use crate::nag::Nag;
use crate::resolution::{Decision, Resolutions};
use crate::resolvent::Resolvent;

/// Human readable explanation of how a decision ended up where it did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdererNotes {
	pub cycle_breaking: String,
}

impl OrdererNotes {
	pub fn new(cycle_breaking: impl Into<String>) -> Self {
		Self { cycle_breaking: cycle_breaking.into() }
	}

	/// Adds another note, separated from any existing text.
	pub fn append(&mut self, note: &str) {
		if !self.cycle_breaking.is_empty() {
			self.cycle_breaking.push_str("; ");
		}
		self.cycle_breaking.push_str(note);
	}
}

/// A decision in one of the classified lists, by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEntry {
	pub resolvent: Resolvent,
	/// Only present for decisions that went through cycle breaking.
	pub notes: Option<OrdererNotes>,
}

impl DecisionEntry {
	pub fn new(resolvent: Resolvent) -> Self {
		Self { resolvent, notes: None }
	}

	pub fn with_notes(resolvent: Resolvent, notes: OrdererNotes) -> Self {
		Self { resolvent, notes: Some(notes) }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DecisionLists {
	pub taken_change_or_remove: Vec<DecisionEntry>,
	pub untaken_change_or_remove: Vec<DecisionEntry>,
	pub taken_unable_to_make: Vec<DecisionEntry>,
	pub untaken_unable_to_make: Vec<DecisionEntry>,
	pub taken_unconfirmed: Vec<DecisionEntry>,
	pub taken_unorderable: Vec<DecisionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolved {
	resolutions: Resolutions,
	nag: Nag,
	decision_lists: DecisionLists,
	job_lists: JobLists,
}

impl Resolved {
	pub(crate) fn new(resolutions: Resolutions, nag: Nag, decision_lists: DecisionLists, job_lists: JobLists) -> Self {
		Self { resolutions, nag, decision_lists, job_lists }
	}

	/// The resolutions as ordered, including any `via_new_binary_in` the orderer filled in.
	pub fn resolutions(&self) -> &Resolutions {
		&self.resolutions
	}

	pub fn decision(&self, resolvent: &Resolvent) -> Option<&Decision> {
		self.resolutions.get(resolvent).map(|r| &r.decision)
	}

	pub fn nag(&self) -> &Nag {
		&self.nag
	}

	/// Installs and removals in the order they were scheduled.
	pub fn taken_change_or_remove_decisions(&self) -> &[DecisionEntry] {
		&self.decision_lists.taken_change_or_remove
	}

	pub fn untaken_change_or_remove_decisions(&self) -> &[DecisionEntry] {
		&self.decision_lists.untaken_change_or_remove
	}

	pub fn taken_unable_to_make_decisions(&self) -> &[DecisionEntry] {
		&self.decision_lists.taken_unable_to_make
	}

	pub fn untaken_unable_to_make_decisions(&self) -> &[DecisionEntry] {
		&self.decision_lists.untaken_unable_to_make
	}

	/// Decisions the user must confirm before the plan can be carried out.
	pub fn taken_unconfirmed_decisions(&self) -> &[DecisionEntry] {
		&self.decision_lists.taken_unconfirmed
	}

	/// Decisions caught in cycles that could not be broken. These have no install or uninstall job.
	pub fn taken_unorderable_decisions(&self) -> &[DecisionEntry] {
		&self.decision_lists.taken_unorderable
	}

	pub fn job_lists(&self) -> &JobLists {
		&self.job_lists
	}
}
