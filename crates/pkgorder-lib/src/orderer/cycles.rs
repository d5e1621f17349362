//! Scheduling of strongly connected components, breaking cycles where possible.

use super::OrderingContext;
use crate::error::Result;
use crate::nag::*;
use crate::resolved::{DecisionEntry, OrdererNotes};

/// How a node depends upon itself, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SelfDependency {
	AlreadyMet,
	RuntimeOnly,
	Unsolvable,
}

impl SelfDependency {
	fn classify(properties: &NagEdgeProperties) -> Self {
		if properties.is_met() {
			SelfDependency::AlreadyMet
		} else if properties.build {
			SelfDependency::Unsolvable
		} else {
			SelfDependency::RuntimeOnly
		}
	}

	fn note(&self) -> &'static str {
		match self {
			SelfDependency::AlreadyMet => "Self dependent (already met)",
			SelfDependency::RuntimeOnly => "Self dependent (runtime only)",
			SelfDependency::Unsolvable => "Self dependent (unsolvable)",
		}
	}
}

/// Whether every edge between members of `scc` is free of build requirements.
fn no_build_dependencies(nag: &Nag, scc: &StronglyConnectedComponent) -> bool {
	scc.nodes.iter().all(|n| {
		nag.edges_from(n).iter().all(|(to, properties)| !scc.contains(to) || !properties.build)
	})
}

/// The graph restricted to `nodes`, keeping only edges between them.
fn sub_nag<'a>(nag: &Nag, nodes: impl IntoIterator<Item = &'a NagIndex> + Clone, keep: impl Fn(&NagEdgeProperties) -> Option<NagEdgeProperties>) -> Result<Nag> {
	let mut result = Nag::new();
	for n in nodes.clone() {
		result.add_node(n.clone());
	}
	for n in nodes {
		for (to, properties) in nag.edges_from(n) {
			if !result.has_node(to) {
				continue;
			}
			if let Some(properties) = keep(properties) {
				result.add_edge(n.clone(), to.clone(), properties);
			}
		}
	}
	result.verify_edges()?;
	Ok(result)
}

impl OrderingContext<'_> {
	pub(super) fn order_scc(&mut self, scc: &StronglyConnectedComponent, order_early: &dyn Fn(&NagIndex) -> Option<bool>) -> Result<()> {
		let changes_in_scc: Vec<&NagIndex> = scc.nodes.iter()
			.filter(|n| self.change_or_remove_indices.contains(*n))
			.collect();

		match changes_in_scc.as_slice() {
			/* only existing packages, nothing to do */
			[] => Ok(()),
			[single] => self.check_self_deps_and_schedule(single, OrdererNotes::default()),
			_ => {
				let scc_nag = sub_nag(self.nag, changes_in_scc.iter().copied(), |p| Some(*p))?;
				let sub_sccs = scc_nag.sorted_strongly_connected_components(order_early)?;
				self.order_sub_sccs(&scc_nag, scc, &sub_sccs, true, order_early)
			},
		}
	}

	fn order_sub_sccs(
		&mut self,
		scc_nag: &Nag,
		top_scc: &StronglyConnectedComponent,
		sub_sccs: &[StronglyConnectedComponent],
		can_recurse: bool,
		order_early: &dyn Fn(&NagIndex) -> Option<bool>,
	) -> Result<()> {
		for sub_scc in sub_sccs {
			if let [single] = sub_scc.nodes.as_slice() {
				let notes = if can_recurse {
					/* the cycle went through packages that are not being changed */
					OrdererNotes::new(format!("In dependency cycle with existing packages: {}", nice_names(scc_nag.nodes())))
				} else {
					OrdererNotes::new(format!("In dependency cycle with: {}", top_scc.nice_names()))
				};
				self.check_self_deps_and_schedule(single, notes)?;
			} else if no_build_dependencies(scc_nag, sub_scc) {
				/* any order will do for runtime only cycles */
				let mut note = format!("In run dependency cycle with: {}", sub_scc.nice_names());
				if can_recurse {
					note.push_str(&format!(" in dependency cycle with {}", top_scc.nice_names()));
				}
				for n in &sub_scc.nodes {
					self.check_self_deps_and_schedule(n, OrdererNotes::new(note.clone()))?;
				}
			} else if can_recurse {
				log::debug!("Trying to break cycle by ignoring met dependencies: {}", sub_scc.nice_names());
				let unmet_nag = sub_nag(scc_nag, &sub_scc.nodes, |p| {
					(!p.is_met()).then(|| NagEdgeProperties {
						always: p.always,
						build: p.build && !p.build_all_met,
						build_all_met: p.build_all_met,
						run: p.run && !p.run_all_met,
						run_all_met: p.run_all_met,
					})
				})?;
				let unmet_sccs = unmet_nag.sorted_strongly_connected_components(order_early)?;
				self.order_sub_sccs(&unmet_nag, top_scc, &unmet_sccs, false, order_early)?;
			} else {
				let note = format!("In unsolvable dependency cycle with: {}", sub_scc.nice_names());
				for n in &sub_scc.nodes {
					/* reporting the done node covers its fetch */
					if n.role == NagIndexRole::Fetched && sub_scc.contains(&NagIndex::done(n.resolvent.clone())) {
						continue;
					}
					self.unorderable(n, OrdererNotes::new(note.clone()));
				}
			}
		}

		Ok(())
	}

	fn check_self_deps_and_schedule(&mut self, index: &NagIndex, mut notes: OrdererNotes) -> Result<()> {
		if index.role == NagIndexRole::Done && self.unorderable_fetches.contains(&index.resolvent) {
			log::warn!("Not scheduling {} as its fetch could not be ordered", index.resolvent);
			return Ok(());
		}

		let self_dependency = self.nag.edges_from(index).iter()
			.filter(|(to, _)| to == index)
			.map(|(_, properties)| SelfDependency::classify(properties))
			.max();

		if let Some(self_dependency) = self_dependency {
			notes.append(self_dependency.note());
			if self_dependency == SelfDependency::Unsolvable {
				self.unorderable(index, notes);
				return Ok(());
			}
		}

		self.schedule(index, notes)
	}

	fn unorderable(&mut self, index: &NagIndex, notes: OrdererNotes) {
		log::warn!("Unable to order {}: {}", index, notes.cycle_breaking);
		if self.unorderable_fetches.contains(&index.resolvent) {
			/* already listed through its fetch */
			return;
		}
		if index.role == NagIndexRole::Fetched {
			self.unorderable_fetches.insert(index.resolvent.clone());
		}
		self.decision_lists.taken_unorderable.push(DecisionEntry::with_notes(index.resolvent.clone(), notes));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn self_dependency_classification() {
		let met = NagEdgeProperties { build: true, build_all_met: true, run: true, run_all_met: true, ..Default::default() };
		assert_eq!(SelfDependency::classify(&met), SelfDependency::AlreadyMet);

		let run = NagEdgeProperties { build: false, build_all_met: true, run: true, run_all_met: false, ..Default::default() };
		assert_eq!(SelfDependency::classify(&run), SelfDependency::RuntimeOnly);

		let build = NagEdgeProperties { build: true, build_all_met: false, run: false, run_all_met: true, ..Default::default() };
		assert_eq!(SelfDependency::classify(&build), SelfDependency::Unsolvable);

		/* unmet at run time but needed at build time too */
		let both = NagEdgeProperties { build: true, build_all_met: true, run: true, run_all_met: false, ..Default::default() };
		assert_eq!(SelfDependency::classify(&both), SelfDependency::Unsolvable);
	}

	#[test]
	fn strongest_self_dependency_wins() {
		let all = [SelfDependency::RuntimeOnly, SelfDependency::Unsolvable, SelfDependency::AlreadyMet];
		assert_eq!(all.into_iter().max(), Some(SelfDependency::Unsolvable));
	}
}
