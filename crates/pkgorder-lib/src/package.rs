//! Package ids and dependency specs as seen by the orderer.
//!
//! These are already resolved by the time the orderer sees them,
//! so they carry only the information needed for ordering and display.

use serde::{Serialize, Deserialize};

/// A specific version of a package in a specific repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId {
	pub name: String,
	pub version: String,
	pub repository: String,
}

impl PackageId {
	pub fn new(name: impl Into<String>, version: impl Into<String>, repository: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			version: version.into(),
			repository: repository.into(),
		}
	}

	/// The same package and version taken from another repository.
	///
	/// Used when an install is to be satisfied by a freshly built binary.
	pub fn in_repository(&self, repository: impl Into<String>) -> Self {
		Self {
			name: self.name.clone(),
			version: self.version.clone(),
			repository: repository.into(),
		}
	}
}

impl std::fmt::Display for PackageId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "={}-{}::{}", self.name, self.version, self.repository)
	}
}

/// How strongly a block dependency applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
	Weak,
	Strong,
	Manual,
	UpgradeBlockedBefore,
	UninstallBlockedBefore,
	UninstallBlockedAfter,
}

impl BlockKind {
	/// Normal blocks order the blocker like any other dependency.
	///
	/// The others only require the blocked package to be dealt with first,
	/// so they produce a reversed informational edge.
	pub fn is_normal(&self) -> bool {
		match self {
			BlockKind::Weak | BlockKind::UninstallBlockedBefore => false,
			BlockKind::Strong
			| BlockKind::Manual
			| BlockKind::UpgradeBlockedBefore
			| BlockKind::UninstallBlockedAfter => true,
		}
	}
}

/// A dependency spec after sanitising, either on a package or blocking one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencySpec {
	/// Textual form of the spec, kept for display only.
	pub text: String,
	pub block: Option<BlockKind>,
}

impl DependencySpec {
	pub fn package(text: impl Into<String>) -> Self {
		Self { text: text.into(), block: None }
	}

	pub fn block(text: impl Into<String>, kind: BlockKind) -> Self {
		Self { text: text.into(), block: Some(kind) }
	}
}

impl std::fmt::Display for DependencySpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.block {
			Some(BlockKind::Strong) => write!(f, "!!{}", self.text),
			Some(_) => write!(f, "!{}", self.text),
			None => write!(f, "{}", self.text),
		}
	}
}
