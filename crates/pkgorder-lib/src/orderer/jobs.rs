//! Turning scheduled nodes into jobs.

use std::collections::{HashSet, VecDeque};

use super::OrderingContext;
use crate::error::{Error, Result};
use crate::job::*;
use crate::nag::*;
use crate::package::PackageId;
use crate::resolution::*;
use crate::resolved::{DecisionEntry, OrdererNotes};

use JobRequirementIf::*;

/// What to fetch and install, the new binary's id if there is to be one.
fn origin_id(decision: &ChangesToMakeDecision) -> PackageId {
	match &decision.via_new_binary_in {
		Some(repository) => decision.origin_id.in_repository(repository.as_str()),
		None => decision.origin_id.clone(),
	}
}

impl OrderingContext<'_> {
	pub(super) fn schedule(&mut self, index: &NagIndex, notes: OrdererNotes) -> Result<()> {
		let resolutions = self.resolutions;
		let resolution = resolutions.get(&index.resolvent).ok_or_else(|| Error::NotChangeOrRemove(index.clone()))?;

		if index.role == NagIndexRole::Done {
			log::debug!("Scheduling {} {}", resolution.decision.kind_name(), index.resolvent);
			self.decision_lists.taken_change_or_remove.push(DecisionEntry::with_notes(index.resolvent.clone(), notes));
			if resolution.decision.requires_confirmation() {
				self.decision_lists.taken_unconfirmed.push(DecisionEntry::new(index.resolvent.clone()));
			}
		}

		self.create_jobs(index, &resolution.decision)
	}

	fn create_jobs(&mut self, index: &NagIndex, decision: &Decision) -> Result<()> {
		match (decision, index.role) {
			(Decision::ChangesToMake(d), NagIndexRole::Done) => {
				let fetch_job_number = *self.fetch_job_numbers.get(&index.resolvent)
					.ok_or_else(|| Error::MissingFetchJob(index.resolvent.clone()))?;

				self.job_lists.pretend_job_list_mut().append(Job::Pretend(PretendJob {
					resolvent: index.resolvent.clone(),
					origin_id: d.origin_id.clone(),
				}));

				let mut requirements = JobRequirements::new();
				requirements.push(JobRequirement::new(fetch_job_number, [RequireForSatisfied, RequireForIndependent, RequireAlways, Fetching]));
				self.populate_requirements(&mut requirements, index, false, false);
				requirements.minimise();

				let job_number = self.job_lists.execute_job_list_mut().append(Job::Install(InstallJob {
					resolvent: index.resolvent.clone(),
					origin_id: origin_id(d),
					destination_repository: d.destination.repository.clone(),
					destination_type: index.resolvent.destination_type,
					replacing: d.destination.replacing.clone(),
					requirements,
				}));
				self.change_or_remove_job_numbers.insert(index.clone(), job_number);
			},
			(Decision::ChangesToMake(d), NagIndexRole::Fetched) => {
				let mut requirements = JobRequirements::new();
				self.populate_requirements(&mut requirements, index, false, true);
				requirements.minimise();

				let job_number = self.job_lists.execute_job_list_mut().append(Job::Fetch(FetchJob {
					resolvent: index.resolvent.clone(),
					origin_id: origin_id(d),
					requirements,
				}));
				self.fetch_job_numbers.insert(index.resolvent.clone(), job_number);
			},
			(Decision::Remove(d), NagIndexRole::Done) => {
				let mut requirements = JobRequirements::new();
				self.populate_requirements(&mut requirements, index, true, false);
				requirements.minimise();

				let job_number = self.job_lists.execute_job_list_mut().append(Job::Uninstall(UninstallJob {
					resolvent: index.resolvent.clone(),
					ids_to_remove: d.ids.clone(),
					requirements,
				}));
				self.change_or_remove_job_numbers.insert(index.clone(), job_number);
			},
			(Decision::Remove(_), NagIndexRole::Fetched)
			| (Decision::UnableToMake(_), _)
			| (Decision::NothingNoChange(_), _)
			| (Decision::ExistingNoChange(_), _)
			| (Decision::Break(_), _) => return Err(Error::NotChangeOrRemove(index.clone())),
		}

		Ok(())
	}

	/// Adds requirements on the jobs for whatever `index` has edges to.
	///
	/// Unmet dependencies are needed for satisfaction. Everything reachable is needed for
	/// independence, except for uninstalls which wait for every direct dependency instead.
	/// Only scheduled install and uninstall jobs are ever required, fetches come in through
	/// the install that owns them.
	fn populate_requirements(&self, requirements: &mut JobRequirements, index: &NagIndex, is_uninstall: bool, is_fetch: bool) {
		let requirement = |job_number: JobNumber, flag: JobRequirementIf| {
			let mut required_if = vec![flag];
			if is_fetch {
				required_if.push(Fetching);
			}
			JobRequirement::new(job_number, required_if)
		};

		for (to, properties) in self.nag.edges_from(index) {
			let Some(&job_number) = self.change_or_remove_job_numbers.get(to) else {
				continue;
			};
			if properties.is_unmet() || is_uninstall {
				requirements.push(requirement(job_number, RequireForSatisfied));
			}
			if properties.always {
				requirements.push(requirement(job_number, RequireAlways));
			}
		}

		if is_uninstall {
			return;
		}

		/* run only cycles survive ordering, so guard against revisiting */
		let mut recursed = HashSet::<&NagIndex>::new();
		let mut queue = VecDeque::from([index]);
		while let Some(current) = queue.pop_front() {
			if !recursed.insert(current) {
				continue;
			}
			for (to, _) in self.nag.edges_from(current) {
				if let Some(&job_number) = self.change_or_remove_job_numbers.get(to) {
					requirements.push(requirement(job_number, RequireForIndependent));
				}
				queue.push_back(to);
			}
		}
	}
}
