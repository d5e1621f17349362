//! Second pass, adding the edges between the nodes added for each resolution.

use super::IgnoreSets;
use crate::error::{Error, Result};
use crate::nag::*;
use crate::resolution::*;
use crate::resolvent::{Resolvent, DestinationType};

/// Adds the edges for every resolution not in `ignore.edges_from`.
///
/// Returns the `(resolvent, repository)` pairs of installs that are to come from a
/// binary being built in `repository`.
pub(super) fn add_edges(resolutions: &Resolutions, nag: &mut Nag, ignore: &IgnoreSets) -> Result<Vec<(Resolvent, String)>> {
	let mut via_new_binary = Vec::new();

	for resolution in resolutions {
		if ignore.edges_from.contains(&resolution.resolvent) {
			continue;
		}

		add_binary_cleverness(resolutions, resolution, nag, &mut via_new_binary)?;

		for constraint in &resolution.constraints {
			add_edges_from_reason(resolutions, nag, ignore, &resolution.resolvent, &constraint.reason)?;
		}
	}

	Ok(via_new_binary)
}

/// A binary being built for a package must exist before any other destination can fetch it.
fn add_binary_cleverness(resolutions: &Resolutions, resolution: &Resolution, nag: &mut Nag, via_new_binary: &mut Vec<(Resolvent, String)>) -> Result<()> {
	if resolution.resolvent.destination_type != DestinationType::CreateBinary {
		return Ok(());
	}
	let Some(binary_decision) = resolution.decision.as_changes_to_make() else {
		return Ok(());
	};

	for destination_type in DestinationType::ALL {
		if destination_type == DestinationType::CreateBinary {
			continue;
		}

		let other_resolvent = resolution.resolvent.with_destination_type(destination_type);
		let Some(other_decision) = resolutions.get(&other_resolvent).and_then(|r| r.decision.as_changes_to_make()) else {
			continue;
		};
		if !other_decision.taken {
			continue;
		}

		if other_decision.origin_id != binary_decision.origin_id {
			return Err(Error::InconsistentOrigin(other_resolvent));
		}

		log::debug!("{} can be installed from the binary built by {}", other_resolvent, resolution.resolvent);
		nag.add_edge(
			NagIndex::fetched(other_resolvent.clone()),
			NagIndex::done(resolution.resolvent.clone()),
			NagEdgeProperties {
				always: true,
				build: true,
				build_all_met: false,
				run: false,
				run_all_met: true,
			},
		);
		via_new_binary.push((other_resolvent, binary_decision.destination.repository.clone()));
	}

	Ok(())
}

fn add_edges_from_reason(resolutions: &Resolutions, nag: &mut Nag, ignore: &IgnoreSets, resolvent: &Resolvent, reason: &Reason) -> Result<()> {
	match reason {
		Reason::Dependency { from_resolvent, sanitised_dependency, already_met } => {
			if ignore.dependencies_from.contains(from_resolvent) {
				return Ok(());
			}

			let classifier = LabelsClassifier::classify(&sanitised_dependency.active_dependency_labels);
			if classifier.is_build_or_run() {
				let normal = sanitised_dependency.spec.block.map_or(true, |b| b.is_normal());
				if normal {
					let from = dependency_from_node(resolutions, nag, from_resolvent, &classifier);
					nag.add_edge(from, NagIndex::done(resolvent.clone()), NagEdgeProperties {
						always: false,
						build: classifier.build,
						build_all_met: *already_met || !classifier.build,
						run: classifier.run,
						run_all_met: *already_met || !classifier.run,
					});
				} else {
					/* the blocked package gets dealt with first */
					nag.add_edge(
						NagIndex::done(resolvent.clone()),
						NagIndex::done(from_resolvent.clone()),
						NagEdgeProperties::informational(),
					);
				}
			} else if !classifier.post {
				return Err(Error::NoClassification(resolvent.clone()));
			}
		},
		Reason::Set { reason_for_set, .. } => {
			if let Some(reason_for_set) = reason_for_set {
				add_edges_from_reason(resolutions, nag, ignore, resolvent, reason_for_set)?;
			}
		},
		Reason::LikeOtherDestinationType { reason_for_other, .. } => {
			add_edges_from_reason(resolutions, nag, ignore, resolvent, reason_for_other)?;
		},
		Reason::Preset | Reason::Target | Reason::ViaBinary { .. } => {},
		Reason::Dependent { resolvent_being_removed, .. } => {
			if !ignore.dependencies_from.contains(resolvent_being_removed) {
				nag.add_edge(
					NagIndex::done(resolvent_being_removed.clone()),
					NagIndex::done(resolvent.clone()),
					NagEdgeProperties::informational(),
				);
			}
		},
		Reason::WasUsedBy { ids_and_resolvents_being_removed } => {
			for (_, removed) in ids_and_resolvents_being_removed {
				if ignore.dependencies_from.contains(removed) {
					continue;
				}
				nag.add_edge(
					NagIndex::done(resolvent.clone()),
					NagIndex::done(removed.clone()),
					NagEdgeProperties::informational(),
				);
			}
		},
	}

	Ok(())
}

/// Which node of the depending resolvent needs the dependency.
fn dependency_from_node(resolutions: &Resolutions, nag: &Nag, from_resolvent: &Resolvent, classifier: &LabelsClassifier) -> NagIndex {
	if classifier.fetch {
		let fetched = NagIndex::fetched(from_resolvent.clone());
		/* existing packages have nothing left to fetch */
		if nag.has_node(&fetched) {
			return fetched;
		}
		return NagIndex::done(from_resolvent.clone());
	}

	/* build time only needs are for whatever does the building */
	if classifier.build && !classifier.run && from_resolvent.destination_type != DestinationType::CreateBinary {
		let binary_resolvent = from_resolvent.with_destination_type(DestinationType::CreateBinary);
		let binary_being_built = resolutions.get(&binary_resolvent)
			.and_then(|r| r.decision.as_changes_to_make())
			.is_some_and(|d| d.taken);
		let binary = NagIndex::done(binary_resolvent);
		if binary_being_built && nag.has_node(&binary) {
			return binary;
		}
	}

	NagIndex::done(from_resolvent.clone())
}
