use serde::{Serialize, Deserialize};

use super::{Job, JobNumber};

/// Append only sequence of jobs, numbered by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobList {
	jobs: Vec<Job>,
}

impl JobList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&mut self, job: Job) -> JobNumber {
		log::debug!("Job {} is {}", self.jobs.len(), job.string_id());
		self.jobs.push(job);
		self.jobs.len() - 1
	}

	pub fn fetch(&self, number: JobNumber) -> Option<&Job> {
		self.jobs.get(number)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Job> {
		self.jobs.iter()
	}

	pub fn len(&self) -> usize {
		self.jobs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.jobs.is_empty()
	}
}

impl<'a> IntoIterator for &'a JobList {
	type Item = &'a Job;
	type IntoIter = std::slice::Iter<'a, Job>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLists {
	pretend_job_list: JobList,
	execute_job_list: JobList,
}

impl JobLists {
	/// Dry run jobs, to be checked before anything in the execute list runs.
	pub fn pretend_job_list(&self) -> &JobList {
		&self.pretend_job_list
	}

	/// The ordered plan. Running it front to back honours every requirement.
	pub fn execute_job_list(&self) -> &JobList {
		&self.execute_job_list
	}

	pub(crate) fn pretend_job_list_mut(&mut self) -> &mut JobList {
		&mut self.pretend_job_list
	}

	pub(crate) fn execute_job_list_mut(&mut self) -> &mut JobList {
		&mut self.execute_job_list
	}
}
