//! Executable units of work produced by the orderer.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::package::PackageId;
use crate::resolvent::{Resolvent, DestinationType};

mod job_lists;
pub use job_lists::*;

/// Position of a job in its [`JobList`].
pub type JobNumber = usize;

/// When a requirement on another job applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobRequirementIf {
	/// The required job must have succeeded for this one to count as satisfied.
	RequireForSatisfied,
	/// The required job must run before this one, even when not directly needed.
	RequireForIndependent,
	RequireAlways,
	/// Only relevant to the fetch phase.
	Fetching,
}

impl std::fmt::Display for JobRequirementIf {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			JobRequirementIf::RequireForSatisfied => write!(f, "satisfied"),
			JobRequirementIf::RequireForIndependent => write!(f, "independent"),
			JobRequirementIf::RequireAlways => write!(f, "always"),
			JobRequirementIf::Fetching => write!(f, "fetching"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobRequirement {
	pub job_number: JobNumber,
	pub required_if: BTreeSet<JobRequirementIf>,
}

impl JobRequirement {
	pub fn new(job_number: JobNumber, required_if: impl IntoIterator<Item = JobRequirementIf>) -> Self {
		Self {
			job_number,
			required_if: required_if.into_iter().collect(),
		}
	}

	pub fn has(&self, flag: JobRequirementIf) -> bool {
		self.required_if.contains(&flag)
	}
}

impl std::fmt::Display for JobRequirement {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.job_number)?;
		for flag in &self.required_if {
			write!(f, " {}", flag)?;
		}
		Ok(())
	}
}

/// Requirements of a single job, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRequirements(Vec<JobRequirement>);

impl JobRequirements {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, requirement: JobRequirement) {
		self.0.push(requirement);
	}

	/// Collapses duplicates and drops any requirement whose flags are a strict subset
	/// of another requirement's on the same job. The first occurrence keeps its place.
	pub fn minimise(&mut self) {
		let all = std::mem::take(&mut self.0);
		for (i, r) in all.iter().enumerate() {
			let implied = all.iter().enumerate().any(|(j, other)| {
				other.job_number == r.job_number && (
					(other.required_if.len() > r.required_if.len() && other.required_if.is_superset(&r.required_if))
					|| (other.required_if == r.required_if && j < i)
				)
			});
			if !implied {
				self.0.push(r.clone());
			}
		}
	}

	pub fn iter(&self) -> std::slice::Iter<'_, JobRequirement> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<'a> IntoIterator for &'a JobRequirements {
	type Item = &'a JobRequirement;
	type IntoIter = std::slice::Iter<'a, JobRequirement>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Dry run checks for an install, order independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PretendJob {
	pub resolvent: Resolvent,
	pub origin_id: PackageId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchJob {
	pub resolvent: Resolvent,
	pub origin_id: PackageId,
	pub requirements: JobRequirements,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallJob {
	pub resolvent: Resolvent,
	/// What to install, pointing at the binary repository when installing from a new binary.
	pub origin_id: PackageId,
	pub destination_repository: String,
	pub destination_type: DestinationType,
	pub replacing: Vec<PackageId>,
	pub requirements: JobRequirements,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallJob {
	pub resolvent: Resolvent,
	pub ids_to_remove: Vec<PackageId>,
	pub requirements: JobRequirements,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Job {
	Pretend(PretendJob),
	Fetch(FetchJob),
	Install(InstallJob),
	Uninstall(UninstallJob),
}

impl Job {
	pub fn resolvent(&self) -> &Resolvent {
		match self {
			Job::Pretend(j) => &j.resolvent,
			Job::Fetch(j) => &j.resolvent,
			Job::Install(j) => &j.resolvent,
			Job::Uninstall(j) => &j.resolvent,
		}
	}

	/// Pretend jobs never have requirements.
	pub fn requirements(&self) -> &[JobRequirement] {
		match self {
			Job::Pretend(_) => &[],
			Job::Fetch(j) => &j.requirements.0,
			Job::Install(j) => &j.requirements.0,
			Job::Uninstall(j) => &j.requirements.0,
		}
	}

	/// Stable identity such as `i:cat/pkg:1 -> install_to_slash`.
	pub fn string_id(&self) -> String {
		let prefix = match self {
			Job::Pretend(_) => "p",
			Job::Fetch(_) => "f",
			Job::Install(_) => "i",
			Job::Uninstall(_) => "u",
		};
		format!("{}:{}", prefix, self.resolvent())
	}
}

impl std::fmt::Display for Job {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Job::Pretend(j) => write!(f, "pretend {}", j.origin_id),
			Job::Fetch(j) => write!(f, "fetch {}", j.origin_id),
			Job::Install(j) => write!(f, "install {} to {}", j.origin_id, j.destination_repository),
			Job::Uninstall(j) => {
				let ids: Vec<_> = j.ids_to_remove.iter().map(|id| id.to_string()).collect();
				write!(f, "uninstall {}", ids.join(", "))
			},
		}
	}
}
