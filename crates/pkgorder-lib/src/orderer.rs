//! Turns the resolver's decisions into an ordered, requirement annotated list of jobs.
//!
//! # Usage
//! 1. Create an [`OrdererBuilder`] from the [`Resolutions`] to order.
//! 1. Optionally give it an `order_early` hint, usually from [`crate::config::OrderEarlyMatcher`].
//! 1. [`OrdererBuilder::build()`] to get an [`Orderer`].
//! 1. [`Orderer::resolve()`] to get a [`Resolved`] holding the classified decisions and the job lists.
//!
//! # Process
//! Every taken install or removal becomes one or two nodes in a [`Nag`], with edges for the
//! dependencies between them. The graph is split into strongly connected components which are
//! scheduled dependencies first. Cycles are broken by ignoring dependencies that are already met,
//! whatever remains is reported in [`Resolved::taken_unorderable_decisions()`].

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::Result;
use crate::job::{JobLists, JobNumber};
use crate::nag::*;
use crate::resolution::*;
use crate::resolved::*;
use crate::resolvent::Resolvent;

mod orderer_builder;
pub use orderer_builder::OrdererBuilder;
mod edges;
mod cycles;
mod jobs;

/// Progress reported through [`OrdererBuilder::notifier()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdererEvent {
	/// A new stage has started.
	Stage(&'static str),
	/// One strongly connected component has been ordered.
	Step,
}

pub(crate) type OrderEarlyFn<'f> = Box<dyn Fn(&Resolution) -> Option<bool> + 'f>;
pub(crate) type NotifierFn<'f> = Box<dyn FnMut(OrdererEvent) + 'f>;

pub struct Orderer<'f> {
	resolutions: Resolutions,
	order_early: OrderEarlyFn<'f>,
	notifier: NotifierFn<'f>,
}

/// Resolvents whose reasons or outgoing edges are left out of the graph.
#[derive(Debug, Default)]
struct IgnoreSets {
	/// Anything depending *from* these contributes no edge.
	dependencies_from: HashSet<Resolvent>,
	/// Nothing is acted upon for these, so their own edges are irrelevant.
	edges_from: HashSet<Resolvent>,
}

impl<'f> Orderer<'f> {
	pub(super) fn new(resolutions: Resolutions, order_early: OrderEarlyFn<'f>, notifier: NotifierFn<'f>) -> Self {
		Self { resolutions, order_early, notifier }
	}

	/// Runs the whole ordering process.
	///
	/// # Errors
	/// Only for a malformed set of resolutions, see [`crate::Error`]. Cycles that cannot be
	/// broken are reported in the result instead.
	pub fn resolve(self) -> Result<Resolved> {
		let Orderer { mut resolutions, order_early, mut notifier } = self;

		let mut nag = Nag::new();
		let mut decision_lists = DecisionLists::default();
		let mut change_or_remove_indices = BTreeSet::<NagIndex>::new();
		let mut ignore = IgnoreSets::default();

		log::info!("Nodifying decisions");
		notifier(OrdererEvent::Stage("Nodifying Decisions"));
		for resolution in &resolutions {
			let has_edges = nodify(resolution, &mut nag, &mut decision_lists, &mut change_or_remove_indices, &mut ignore);
			if !has_edges {
				ignore.edges_from.insert(resolution.resolvent.clone());
			}
		}

		log::info!("Building NAG edges");
		notifier(OrdererEvent::Stage("Building NAG Edges"));
		let via_new_binary = edges::add_edges(&resolutions, &mut nag, &ignore)?;
		for (resolvent, repository) in via_new_binary {
			if let Some(decision) = resolutions.get_mut(&resolvent).and_then(|r| r.decision.as_changes_to_make_mut()) {
				decision.via_new_binary_in = Some(repository);
			}
		}
		nag.verify_edges()?;
		log::debug!("NAG has {} nodes and {} edges", nag.node_count(), nag.edge_count());

		log::info!("Finding NAG SCCs");
		notifier(OrdererEvent::Stage("Finding NAG SCCs"));
		let order_early_index = |index: &NagIndex| -> Option<bool> {
			resolutions.get(&index.resolvent).and_then(|r| order_early(r))
		};
		let sccs = nag.sorted_strongly_connected_components(&order_early_index)?;

		log::info!("Ordering SCCs");
		notifier(OrdererEvent::Stage("Ordering SCCs"));
		let mut context = OrderingContext::new(&resolutions, &nag, &change_or_remove_indices, decision_lists);
		for scc in &sccs {
			context.order_scc(scc, &order_early_index)?;
			notifier(OrdererEvent::Step);
		}
		let (decision_lists, job_lists) = context.finish();

		Ok(Resolved::new(resolutions, nag, decision_lists, job_lists))
	}
}

/// Adds the graph nodes for a single resolution.
///
/// Returns whether edges should later be built from this resolution.
fn nodify(
	resolution: &Resolution,
	nag: &mut Nag,
	decision_lists: &mut DecisionLists,
	change_or_remove_indices: &mut BTreeSet<NagIndex>,
	ignore: &mut IgnoreSets,
) -> bool {
	let resolvent = &resolution.resolvent;
	let decision = &resolution.decision;
	log::debug!("{} is {} ({})", resolvent, decision.kind_name(), if decision.taken() { "taken" } else { "untaken" });

	let has_edges = match decision {
		Decision::UnableToMake(d) => {
			if d.taken {
				decision_lists.taken_unable_to_make.push(DecisionEntry::new(resolvent.clone()));
			} else {
				decision_lists.untaken_unable_to_make.push(DecisionEntry::new(resolvent.clone()));
			}
			false
		},
		Decision::NothingNoChange(NothingNoChangeDecision { taken, .. })
		| Decision::ExistingNoChange(ExistingNoChangeDecision { taken, .. }) => {
			if *taken {
				nag.add_node(NagIndex::done(resolvent.clone()));
			}
			*taken
		},
		Decision::ChangesToMake(d) => {
			if d.taken {
				let fetched = NagIndex::fetched(resolvent.clone());
				let done = NagIndex::done(resolvent.clone());
				nag.add_node(fetched.clone());
				nag.add_node(done.clone());
				/* can't be done before we're fetched */
				nag.add_edge(done.clone(), fetched.clone(), NagEdgeProperties {
					always: false,
					build: true,
					build_all_met: false,
					run: false,
					run_all_met: true,
				});
				change_or_remove_indices.insert(fetched);
				change_or_remove_indices.insert(done);
			} else {
				decision_lists.untaken_change_or_remove.push(DecisionEntry::new(resolvent.clone()));
			}
			d.taken
		},
		Decision::Remove(d) => {
			if d.taken {
				let done = NagIndex::done(resolvent.clone());
				nag.add_node(done.clone());
				change_or_remove_indices.insert(done);
			} else {
				decision_lists.untaken_change_or_remove.push(DecisionEntry::new(resolvent.clone()));
			}
			d.taken
		},
		Decision::Break(d) => {
			if d.taken && decision.requires_confirmation() {
				decision_lists.taken_unconfirmed.push(DecisionEntry::new(resolvent.clone()));
			}
			false
		},
	};

	/* nothing in the graph to point at, so nothing may depend on it either */
	if !has_edges {
		ignore.dependencies_from.insert(resolvent.clone());
	}
	has_edges
}

/// State for the scheduling half of a single [`Orderer::resolve()`].
struct OrderingContext<'r> {
	resolutions: &'r Resolutions,
	nag: &'r Nag,
	change_or_remove_indices: &'r BTreeSet<NagIndex>,

	decision_lists: DecisionLists,
	job_lists: JobLists,
	fetch_job_numbers: HashMap<Resolvent, JobNumber>,
	change_or_remove_job_numbers: HashMap<NagIndex, JobNumber>,
	/// Installs whose fetch was caught in an unsolvable cycle.
	unorderable_fetches: HashSet<Resolvent>,
}

impl<'r> OrderingContext<'r> {
	fn new(resolutions: &'r Resolutions, nag: &'r Nag, change_or_remove_indices: &'r BTreeSet<NagIndex>, decision_lists: DecisionLists) -> Self {
		Self {
			resolutions,
			nag,
			change_or_remove_indices,
			decision_lists,
			job_lists: JobLists::default(),
			fetch_job_numbers: HashMap::new(),
			change_or_remove_job_numbers: HashMap::new(),
			unorderable_fetches: HashSet::new(),
		}
	}

	fn finish(self) -> (DecisionLists, JobLists) {
		(self.decision_lists, self.job_lists)
	}
}
