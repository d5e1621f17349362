//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::path::PathBuf;

use pkgorder::job::{Job, JobList, JobNumber};
use pkgorder::package::{BlockKind, DependencySpec, PackageId};
use pkgorder::resolution::*;
use pkgorder::resolved::DecisionEntry;
use pkgorder::{DestinationType, OrdererConfig, Resolvent};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
	#[error("no resolution for {0}")]
	UnknownResolvent(Resolvent),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error(transparent)]
	Pkgorder(#[from] pkgorder::Error),
}

pub fn slash(name: &str) -> Resolvent {
	Resolvent::new(name, None, DestinationType::InstallToSlash)
}

pub fn binary(name: &str) -> Resolvent {
	Resolvent::new(name, None, DestinationType::CreateBinary)
}

/// Version 1.0 of `name` from the `repo` repository.
pub fn id(name: &str) -> PackageId {
	PackageId::new(name, "1.0", "repo")
}

pub fn repository_for(destination_type: DestinationType) -> &'static str {
	match destination_type {
		DestinationType::InstallToSlash => "installed",
		DestinationType::InstallToChroot => "chroot",
		DestinationType::CreateBinary => "binaries",
	}
}

enum Pending {
	Constraint(Resolvent, Constraint),
	Confirmation(Resolvent, RequiredConfirmation),
}

/// Composes a set of resolutions by package name.
///
/// Decisions are added in call order. Reasons and confirmations may refer to resolutions
/// added later, they are attached by [`ResolutionsBuilder::build()`].
#[derive(Default)]
pub struct ResolutionsBuilder {
	resolutions: Vec<Resolution>,
	pending: Vec<Pending>,
}

impl ResolutionsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn decision(mut self, resolvent: Resolvent, decision: Decision) -> Self {
		self.resolutions.push(Resolution { resolvent, constraints: vec![], decision });
		self
	}

	/// A taken install of `name` to `/`.
	pub fn install(self, name: &str) -> Self {
		self.install_to(slash(name), true)
	}

	pub fn untaken_install(self, name: &str) -> Self {
		self.install_to(slash(name), false)
	}

	pub fn install_to(self, resolvent: Resolvent, taken: bool) -> Self {
		let decision = Decision::ChangesToMake(ChangesToMakeDecision {
			taken,
			origin_id: id(&resolvent.package),
			change_type: ChangeType::NewPackage,
			destination: Destination {
				repository: repository_for(resolvent.destination_type).to_owned(),
				replacing: vec![],
			},
			required_confirmations: vec![],
			via_new_binary_in: None,
		});
		self.decision(resolvent, decision)
	}

	/// `name` is installed and stays as it is.
	pub fn existing(self, name: &str) -> Self {
		self.decision(slash(name), Decision::ExistingNoChange(ExistingNoChangeDecision {
			taken: true,
			existing_id: PackageId::new(name, "1.0", "installed"),
			is_same: true,
		}))
	}

	pub fn remove(self, name: &str) -> Self {
		self.remove_with(name, true)
	}

	pub fn untaken_remove(self, name: &str) -> Self {
		self.remove_with(name, false)
	}

	fn remove_with(self, name: &str, taken: bool) -> Self {
		self.decision(slash(name), Decision::Remove(RemoveDecision {
			taken,
			ids: vec![PackageId::new(name, "1.0", "installed")],
			required_confirmations: vec![],
		}))
	}

	pub fn unable(self, name: &str, taken: bool) -> Self {
		self.decision(slash(name), Decision::UnableToMake(UnableToMakeDecision {
			taken,
			unsuitable_candidates: vec![],
		}))
	}

	pub fn break_(self, name: &str, required_confirmations: Vec<RequiredConfirmation>) -> Self {
		self.decision(slash(name), Decision::Break(BreakDecision {
			taken: true,
			existing_id: PackageId::new(name, "1.0", "installed"),
			required_confirmations,
		}))
	}

	pub fn reason(mut self, resolvent: Resolvent, reason: Reason) -> Self {
		self.pending.push(Pending::Constraint(resolvent, reason.into()));
		self
	}

	pub fn target(self, name: &str) -> Self {
		self.reason(slash(name), Reason::Target)
	}

	pub fn confirm(mut self, resolvent: Resolvent, confirmation: RequiredConfirmation) -> Self {
		self.pending.push(Pending::Confirmation(resolvent, confirmation));
		self
	}

	/// `from` depends upon `to` with the given labels.
	pub fn depends(self, from: Resolvent, to: Resolvent, labels: &[DependencyLabel], already_met: bool) -> Self {
		let reason = Reason::Dependency {
			sanitised_dependency: SanitisedDependency {
				spec: DependencySpec::package(to.package.clone()),
				active_dependency_labels: labels.to_vec(),
			},
			from_resolvent: from,
			already_met,
		};
		self.reason(to, reason)
	}

	pub fn build_depends(self, from: &str, to: &str) -> Self {
		self.depends(slash(from), slash(to), &[DependencyLabel::Build], false)
	}

	pub fn run_depends(self, from: &str, to: &str) -> Self {
		self.depends(slash(from), slash(to), &[DependencyLabel::Run], false)
	}

	/// `from` blocks `to`.
	pub fn blocks(self, from: &str, to: &str, kind: BlockKind) -> Self {
		let reason = Reason::Dependency {
			from_resolvent: slash(from),
			sanitised_dependency: SanitisedDependency {
				spec: DependencySpec::block(to, kind),
				active_dependency_labels: vec![DependencyLabel::Run],
			},
			already_met: false,
		};
		self.reason(slash(to), reason)
	}

	/// `dependent` goes because it depends upon `removed`, which is also going.
	pub fn dependent(self, removed: &str, dependent: &str) -> Self {
		let reason = Reason::Dependent {
			id_being_removed: PackageId::new(removed, "1.0", "installed"),
			resolvent_being_removed: slash(removed),
		};
		self.reason(slash(dependent), reason)
	}

	/// `name` goes because the only things using it, `users`, are going.
	pub fn was_used_by(self, name: &str, users: &[&str]) -> Self {
		let reason = Reason::WasUsedBy {
			ids_and_resolvents_being_removed: users.iter()
				.map(|u| (PackageId::new(*u, "1.0", "installed"), slash(u)))
				.collect(),
		};
		self.reason(slash(name), reason)
	}

	pub fn build(self) -> Result<Resolutions, FixtureError> {
		let mut resolutions: Resolutions = self.resolutions.into();
		for pending in self.pending {
			match pending {
				Pending::Constraint(resolvent, constraint) => {
					let resolution = resolutions.get_mut(&resolvent).ok_or(FixtureError::UnknownResolvent(resolvent))?;
					resolution.constraints.push(constraint);
				},
				Pending::Confirmation(resolvent, confirmation) => {
					let resolution = resolutions.get_mut(&resolvent).ok_or_else(|| FixtureError::UnknownResolvent(resolvent.clone()))?;
					match &mut resolution.decision {
						Decision::ChangesToMake(d) => d.required_confirmations.push(confirmation),
						Decision::Remove(d) => d.required_confirmations.push(confirmation),
						Decision::Break(d) => d.required_confirmations.push(confirmation),
						_ => return Err(FixtureError::UnknownResolvent(resolvent)),
					}
				},
			}
		}
		Ok(resolutions)
	}
}

/// Requirements of a job as `"<job number> <flags>"` strings, in order.
pub fn stringify_requirements(job: &Job) -> Vec<String> {
	job.requirements().iter().map(|r| r.to_string()).collect()
}

/// Nice names of the resolvents in a decision list.
pub fn entry_names(entries: &[DecisionEntry]) -> Vec<String> {
	entries.iter().map(|e| e.resolvent.nice_name()).collect()
}

/// Notes attached to the entry for `name`, empty when there are none.
pub fn entry_notes(entries: &[DecisionEntry], name: &str) -> Option<String> {
	entries.iter()
		.find(|e| e.resolvent.package == name)
		.map(|e| e.notes.as_ref().map(|n| n.cycle_breaking.clone()).unwrap_or_default())
}

pub fn job_ids(list: &JobList) -> Vec<String> {
	list.iter().map(Job::string_id).collect()
}

/// Position of the job with prefix `kind` (`f`, `i` or `u`) for `resolvent`.
pub fn job_number(list: &JobList, kind: &str, resolvent: &Resolvent) -> Option<JobNumber> {
	let wanted = format!("{}:{}", kind, resolvent);
	list.iter().position(|j| j.string_id() == wanted)
}

/// Saves `config` into a new temporary directory, returning the directory and the file path.
///
/// The directory is removed when the returned [`tempfile::TempDir`] is dropped.
pub fn write_config(config: &OrdererConfig) -> Result<(tempfile::TempDir, PathBuf), FixtureError> {
	let dir = tempfile::tempdir()?;
	let path = dir.path().join("pkgorder").join("config.json");
	config.save_to_path(&path)?;
	Ok((dir, path))
}
