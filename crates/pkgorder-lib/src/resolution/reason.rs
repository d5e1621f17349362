use serde::{Serialize, Deserialize};

use crate::package::{DependencySpec, PackageId};
use crate::resolvent::Resolvent;
use super::DependencyLabel;

/// A dependency after the resolver has cleaned it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitisedDependency {
	pub spec: DependencySpec,
	pub active_dependency_labels: Vec<DependencyLabel>,
}

/// Why a resolution exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
	/// `from_resolvent` has a dependency that this resolution satisfies.
	Dependency {
		from_resolvent: Resolvent,
		sanitised_dependency: SanitisedDependency,
		/// The dependency is satisfied by what is already installed.
		already_met: bool,
	},
	/// Pulled in as a member of a named set.
	Set {
		set_name: String,
		reason_for_set: Option<Box<Reason>>,
	},
	/// Mirrors the reason of the same package for another destination type.
	LikeOtherDestinationType {
		other_resolvent: Resolvent,
		reason_for_other: Box<Reason>,
	},
	/// Supplied up front by the user or configuration.
	Preset,
	/// Needed so that `other_resolvent` can be installed from a binary.
	ViaBinary {
		other_resolvent: Resolvent,
	},
	/// Being removed because it depends upon something that is being removed.
	Dependent {
		id_being_removed: PackageId,
		resolvent_being_removed: Resolvent,
	},
	/// Explicitly asked for.
	Target,
	/// Installed packages that used this one and are being removed too.
	WasUsedBy {
		ids_and_resolvents_being_removed: Vec<(PackageId, Resolvent)>,
	},
}
