//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

use crate::nag::NagIndex;
use crate::resolvent::Resolvent;

/// Errors that stop an ordering run or a configuration load.
///
/// Everything other than the I/O and parsing variants indicates a defect in the orderer
/// or a malformed decision graph from the resolver, never a condition the user can fix.
/// Unorderable cycles are not errors, see [`crate::Resolved::taken_unorderable_decisions()`].
#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("invalid package pattern: {0}")]
	Pattern(#[from] regex::Error),
	#[error("missing node for edge {from} -> {to}")]
	MissingNode { from: NagIndex, to: NagIndex },
	#[error("no fetch job was scheduled for {0}")]
	MissingFetchJob(Resolvent),
	#[error("{0} has conflicting origin ids for its destinations")]
	InconsistentOrigin(Resolvent),
	#[error("dependency of {0} has no build, run or post classification")]
	NoClassification(Resolvent),
	#[error("{0} does not have a change or remove decision")]
	NotChangeOrRemove(NagIndex),
}
