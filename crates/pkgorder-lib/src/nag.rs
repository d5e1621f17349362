//! The NAG, a dependency graph over `(Resolvent, Role)` nodes used to derive job ordering.
//!
//! An edge `a -> b` means `a` needs `b` first. Edges are never merged, adding the same
//! pair twice keeps both edges with their own properties.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::prelude::*;
use serde::{Serialize, Deserialize};

use crate::resolvent::Resolvent;

/// Which stage of a resolvent's lifecycle a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NagIndexRole {
	/// Source or binary retrieved, ready to build.
	Fetched,
	/// Fully installed or removed.
	Done,
}

impl std::fmt::Display for NagIndexRole {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			NagIndexRole::Fetched => write!(f, "fetched"),
			NagIndexRole::Done => write!(f, "done"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NagIndex {
	pub resolvent: Resolvent,
	pub role: NagIndexRole,
}

impl NagIndex {
	pub fn fetched(resolvent: Resolvent) -> Self {
		Self { resolvent, role: NagIndexRole::Fetched }
	}

	pub fn done(resolvent: Resolvent) -> Self {
		Self { resolvent, role: NagIndexRole::Done }
	}
}

impl std::fmt::Display for NagIndex {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.role, self.resolvent)
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NagEdgeProperties {
	/// Honoured even when the dependency is already satisfied.
	pub always: bool,
	pub build: bool,
	pub build_all_met: bool,
	pub run: bool,
	pub run_all_met: bool,
}

impl NagEdgeProperties {
	/// An ordering-only edge: no build or run requirement, nothing to satisfy.
	pub fn informational() -> Self {
		Self {
			always: false,
			build: false,
			build_all_met: true,
			run: false,
			run_all_met: true,
		}
	}

	/// Both categories are already satisfied.
	pub fn is_met(&self) -> bool {
		self.build_all_met && self.run_all_met
	}

	/// A build or run requirement that is not yet satisfied.
	pub fn is_unmet(&self) -> bool {
		(self.build && !self.build_all_met) || (self.run && !self.run_all_met)
	}
}

/// A maximal set of mutually reachable nodes, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StronglyConnectedComponent {
	pub nodes: Vec<NagIndex>,
}

impl StronglyConnectedComponent {
	pub fn contains(&self, index: &NagIndex) -> bool {
		self.nodes.binary_search(index).is_ok()
	}

	/// Comma separated nice names of the members, for cycle notes.
	pub fn nice_names(&self) -> String {
		nice_names(&self.nodes)
	}
}

/// Comma separated package names of sorted `nodes`, each named once.
pub fn nice_names<'a>(nodes: impl IntoIterator<Item = &'a NagIndex>) -> String {
	let mut names: Vec<_> = nodes.into_iter().map(|n| n.resolvent.nice_name()).collect();
	names.dedup();
	names.join(", ")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "NagData", try_from = "NagData")]
pub struct Nag {
	nodes: BTreeSet<NagIndex>,
	edges: BTreeMap<NagIndex, Vec<(NagIndex, NagEdgeProperties)>>,
}

impl Nag {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a node, doing nothing if it already exists.
	pub fn add_node(&mut self, index: NagIndex) {
		self.nodes.insert(index);
	}

	/// Adds an edge, both ends are checked later by [`Nag::verify_edges()`].
	pub fn add_edge(&mut self, from: NagIndex, to: NagIndex, properties: NagEdgeProperties) {
		log::trace!("Adding edge {} -> {} {:?}", from, to, properties);
		self.edges.entry(from).or_default().push((to, properties));
	}

	/// # Errors
	/// [`crate::Error::MissingNode`] if any edge refers to a node that was never added.
	pub fn verify_edges(&self) -> crate::Result<()> {
		for (from, targets) in &self.edges {
			for (to, _) in targets {
				if !self.nodes.contains(from) || !self.nodes.contains(to) {
					return Err(crate::Error::MissingNode { from: from.clone(), to: to.clone() });
				}
			}
		}
		Ok(())
	}

	pub fn has_node(&self, index: &NagIndex) -> bool {
		self.nodes.contains(index)
	}

	pub fn nodes(&self) -> impl Iterator<Item = &NagIndex> {
		self.nodes.iter()
	}

	pub fn edges_from(&self, index: &NagIndex) -> &[(NagIndex, NagEdgeProperties)] {
		self.edges.get(index).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.values().map(Vec::len).sum()
	}

	/// Strongly connected components, dependencies before the things that need them.
	///
	/// `order_early` is asked about members of single node components only. Among the
	/// components that could come next, `Some(true)` ones are taken first and `Some(false)`
	/// ones last, remaining ties go to the smallest node. The result only depends on the
	/// graph and the answers given by `order_early`.
	///
	/// [`Nag::verify_edges()`] must have succeeded first.
	pub fn sorted_strongly_connected_components(&self, order_early: impl Fn(&NagIndex) -> Option<bool>) -> crate::Result<Vec<StronglyConnectedComponent>> {
		let mut graph = DiGraph::<&NagIndex, ()>::with_capacity(self.nodes.len(), self.edge_count());
		let mut graph_indices = BTreeMap::<&NagIndex, NodeIndex>::new();
		for n in &self.nodes {
			graph_indices.insert(n, graph.add_node(n));
		}
		for (from, targets) in &self.edges {
			for (to, _) in targets {
				match (graph_indices.get(from), graph_indices.get(to)) {
					(Some(&a), Some(&b)) => { graph.add_edge(a, b, ()); },
					_ => return Err(crate::Error::MissingNode { from: from.clone(), to: to.clone() }),
				}
			}
		}

		let mut components: Vec<StronglyConnectedComponent> = petgraph::algo::tarjan_scc(&graph)
			.into_iter()
			.map(|members| {
				let mut nodes: Vec<NagIndex> = members.into_iter().map(|i| graph[i].clone()).collect();
				nodes.sort();
				StronglyConnectedComponent { nodes }
			})
			.collect();
		/* tarjan's output order follows petgraph internals, we want our own */
		components.sort_by(|a, b| a.nodes[0].cmp(&b.nodes[0]));

		let mut component_of = vec![0; graph.node_count()];
		for (c, component) in components.iter().enumerate() {
			for n in &component.nodes {
				component_of[graph_indices[n].index()] = c;
			}
		}

		/* edges between components, as "number of things I still need" and "who needs me" */
		let mut remaining = vec![BTreeSet::<usize>::new(); components.len()];
		let mut needed_by = vec![BTreeSet::<usize>::new(); components.len()];
		for e in graph.edge_references() {
			let (a, b) = (component_of[e.source().index()], component_of[e.target().index()]);
			if a != b {
				remaining[a].insert(b);
				needed_by[b].insert(a);
			}
		}

		let hint_for = |c: usize| -> Option<bool> {
			match components[c].nodes.as_slice() {
				[single] => order_early(single),
				_ => None,
			}
		};

		/* components are numbered in node order, so the lowest number is the smallest node */
		let mut early = BTreeSet::<usize>::new();
		let mut normal = BTreeSet::<usize>::new();
		let mut late = BTreeSet::<usize>::new();
		let make_orderable = |c: usize, early: &mut BTreeSet<usize>, normal: &mut BTreeSet<usize>, late: &mut BTreeSet<usize>| {
			match hint_for(c) {
				Some(true) => early.insert(c),
				None => normal.insert(c),
				Some(false) => late.insert(c),
			};
		};

		for c in 0..components.len() {
			if remaining[c].is_empty() {
				make_orderable(c, &mut early, &mut normal, &mut late);
			}
		}

		let mut order = Vec::<usize>::with_capacity(components.len());
		while let Some(c) = early.pop_first().or_else(|| normal.pop_first()).or_else(|| late.pop_first()) {
			order.push(c);
			for &d in &needed_by[c] {
				remaining[d].remove(&c);
				if remaining[d].is_empty() {
					make_orderable(d, &mut early, &mut normal, &mut late);
				}
			}
		}

		/* the condensation of a graph has no cycles, everything gets ordered */
		debug_assert_eq!(order.len(), components.len());

		let mut slots: Vec<Option<StronglyConnectedComponent>> = components.into_iter().map(Some).collect();
		Ok(order.into_iter().filter_map(|c| slots[c].take()).collect())
	}
}

/// Flat form of a [`Nag`] for serialising.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NagData {
	nodes: Vec<NagIndex>,
	edges: Vec<NagEdgeData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NagEdgeData {
	from: NagIndex,
	to: NagIndex,
	properties: NagEdgeProperties,
}

impl From<Nag> for NagData {
	fn from(value: Nag) -> Self {
		let mut edges = Vec::new();
		for (from, targets) in value.edges {
			for (to, properties) in targets {
				edges.push(NagEdgeData { from: from.clone(), to, properties });
			}
		}
		NagData { nodes: value.nodes.into_iter().collect(), edges }
	}
}

impl TryFrom<NagData> for Nag {
	type Error = crate::Error;

	fn try_from(value: NagData) -> Result<Self, Self::Error> {
		let mut nag = Nag::new();
		for n in value.nodes {
			nag.add_node(n);
		}
		for e in value.edges {
			nag.add_edge(e.from, e.to, e.properties);
		}
		nag.verify_edges()?;
		Ok(nag)
	}
}
