//! Identity of the thing being resolved.

use serde::{Serialize, Deserialize};

/// Where a resolved package ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DestinationType {
	/// Installed to the live filesystem.
	InstallToSlash,
	/// Installed to a chroot.
	InstallToChroot,
	/// Built into a binary package instead of being installed.
	CreateBinary,
}

impl DestinationType {
	pub const ALL: [DestinationType; 3] = [
		DestinationType::InstallToSlash,
		DestinationType::InstallToChroot,
		DestinationType::CreateBinary,
	];
}

impl std::fmt::Display for DestinationType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DestinationType::InstallToSlash => write!(f, "install_to_slash"),
			DestinationType::InstallToChroot => write!(f, "install_to_chroot"),
			DestinationType::CreateBinary => write!(f, "create_binary"),
		}
	}
}

/// A package in a given slot, destined for a given destination type.
///
/// Used as the key for resolutions, graph nodes and job lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resolvent {
	/// Qualified package name such as `sys-apps/paludis`.
	pub package: String,
	/// `None` for packages without a slot.
	pub slot: Option<String>,
	pub destination_type: DestinationType,
}

impl Resolvent {
	pub fn new(package: impl Into<String>, slot: Option<&str>, destination_type: DestinationType) -> Self {
		Self {
			package: package.into(),
			slot: slot.map(str::to_owned),
			destination_type,
		}
	}

	/// The same package and slot with a different destination.
	pub fn with_destination_type(&self, destination_type: DestinationType) -> Self {
		Self {
			package: self.package.clone(),
			slot: self.slot.clone(),
			destination_type,
		}
	}

	/// Short form for cycle notes, `package:slot` without the destination.
	pub fn nice_name(&self) -> String {
		match &self.slot {
			Some(slot) => format!("{}:{}", self.package, slot),
			None => self.package.clone(),
		}
	}
}

impl std::fmt::Display for Resolvent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} -> {}", self.nice_name(), self.destination_type)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_includes_slot_and_destination() {
		let r = Resolvent::new("cat/pkg", Some("2"), DestinationType::CreateBinary);
		assert_eq!(r.to_string(), "cat/pkg:2 -> create_binary");
		assert_eq!(r.nice_name(), "cat/pkg:2");
	}

	#[test]
	fn destination_is_part_of_identity() {
		let slash = Resolvent::new("cat/pkg", None, DestinationType::InstallToSlash);
		let binary = slash.with_destination_type(DestinationType::CreateBinary);
		assert_ne!(slash, binary);
		assert_eq!(binary.with_destination_type(DestinationType::InstallToSlash), slash);
	}
}
