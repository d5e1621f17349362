use serde::{Serialize, Deserialize};

use crate::package::PackageId;

/// Something the user has to explicitly accept before a decision may be acted upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredConfirmation {
	Downgrade,
	NotBestVersion,
	Break,
	RemoveSystemPackage,
	Masked,
	ChangedChoices,
	UninstallBlocker,
}

/// What kind of change a [`ChangesToMakeDecision`] is, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
	NewPackage,
	SlotNewPackage,
	AddToSlot,
	Upgrade,
	Downgrade,
	Reinstall,
}

/// Where an install ends up and what it replaces there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
	pub repository: String,
	pub replacing: Vec<PackageId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsuitableCandidate {
	pub id: PackageId,
	pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnableToMakeDecision {
	pub taken: bool,
	pub unsuitable_candidates: Vec<UnsuitableCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NothingNoChangeDecision {
	pub taken: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingNoChangeDecision {
	pub taken: bool,
	pub existing_id: PackageId,
	/// The installed id is exactly what would otherwise have been chosen.
	pub is_same: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesToMakeDecision {
	pub taken: bool,
	pub origin_id: PackageId,
	pub change_type: ChangeType,
	pub destination: Destination,
	pub required_confirmations: Vec<RequiredConfirmation>,
	/// Set by the orderer when a binary for `origin_id` is being built into this repository first.
	#[serde(default)]
	pub via_new_binary_in: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveDecision {
	pub taken: bool,
	pub ids: Vec<PackageId>,
	pub required_confirmations: Vec<RequiredConfirmation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakDecision {
	pub taken: bool,
	pub existing_id: PackageId,
	pub required_confirmations: Vec<RequiredConfirmation>,
}

/// The resolver's verdict for a single resolvent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
	UnableToMake(UnableToMakeDecision),
	NothingNoChange(NothingNoChangeDecision),
	ExistingNoChange(ExistingNoChangeDecision),
	ChangesToMake(ChangesToMakeDecision),
	Remove(RemoveDecision),
	Break(BreakDecision),
}

impl Decision {
	/// Part of the active plan, as opposed to recorded only for reporting.
	pub fn taken(&self) -> bool {
		match self {
			Decision::UnableToMake(d) => d.taken,
			Decision::NothingNoChange(d) => d.taken,
			Decision::ExistingNoChange(d) => d.taken,
			Decision::ChangesToMake(d) => d.taken,
			Decision::Remove(d) => d.taken,
			Decision::Break(d) => d.taken,
		}
	}

	pub fn required_confirmations(&self) -> &[RequiredConfirmation] {
		match self {
			Decision::ChangesToMake(d) => &d.required_confirmations,
			Decision::Remove(d) => &d.required_confirmations,
			Decision::Break(d) => &d.required_confirmations,
			Decision::UnableToMake(_)
			| Decision::NothingNoChange(_)
			| Decision::ExistingNoChange(_) => &[],
		}
	}

	pub fn requires_confirmation(&self) -> bool {
		!self.required_confirmations().is_empty()
	}

	pub fn as_changes_to_make(&self) -> Option<&ChangesToMakeDecision> {
		if let Decision::ChangesToMake(d) = self { Some(d) } else { None }
	}

	pub fn as_changes_to_make_mut(&mut self) -> Option<&mut ChangesToMakeDecision> {
		if let Decision::ChangesToMake(d) = self { Some(d) } else { None }
	}

	pub fn kind_name(&self) -> &'static str {
		match self {
			Decision::UnableToMake(_) => "unable to make",
			Decision::NothingNoChange(_) => "nothing no change",
			Decision::ExistingNoChange(_) => "existing no change",
			Decision::ChangesToMake(_) => "changes to make",
			Decision::Remove(_) => "remove",
			Decision::Break(_) => "break",
		}
	}
}
