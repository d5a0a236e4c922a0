//! This module contains the reachability filter that trims a declaration set
//! down to the declarations connected to one or more base contracts.
//!
//! The filter treats the declaration set as a directed graph whose edges are
//! the declarations' associations, every edge weighing 1, and keeps the
//! declarations whose shortest-path distance from a base contract is within
//! the requested depth. Filtering ahead of layout keeps the layout engine
//! from chasing declarations that have nothing to do with the contract being
//! analyzed.

use std::collections::{HashMap, HashSet};

use petgraph::{
    algo::dijkstra,
    graph::{DiGraph, NodeIndex},
};
use tracing::debug;

use crate::{
    declaration::DeclarationSet,
    error::reachability::{Error, Result},
};

/// Filters `declarations` down to those connected to at least one of the
/// `roots` by a path of `depth` or fewer associations.
///
/// A `depth` of [`None`] keeps everything reachable regardless of path
/// length, while a depth of zero keeps the roots alone. Roots are looked up
/// by their exact name. The relative order of the surviving declarations is
/// preserved.
///
/// # Errors
///
/// Returns [`Err`] if any of the `roots` does not name a declaration in the
/// set.
pub fn connected_to_roots<S: AsRef<str>>(
    declarations: &DeclarationSet,
    roots: &[S],
    depth: Option<usize>,
) -> Result<DeclarationSet> {
    let (graph, nodes) = load_graph(declarations);

    let mut connected: HashSet<usize> = HashSet::new();
    for root in roots {
        let root = root.as_ref();
        let base = declarations
            .find(root)
            .ok_or_else(|| Error::RootNotFound {
                name: root.to_string(),
            })?;

        let distances = dijkstra(&graph, nodes[&base.id], None, |_| 1_usize);
        for declaration in declarations.iter() {
            let Some(distance) = distances.get(&nodes[&declaration.id]) else {
                continue;
            };
            if depth.map_or(true, |bound| *distance <= bound) {
                connected.insert(declaration.id);
            }
        }
    }

    let filtered: DeclarationSet = declarations
        .iter()
        .filter(|declaration| connected.contains(&declaration.id))
        .cloned()
        .collect();

    debug!(
        roots = roots.len(),
        total = declarations.len(),
        connected = filtered.len(),
        "Filtered the declaration graph"
    );

    Ok(filtered)
}

/// Builds the association graph for `declarations`.
///
/// Vertices are declarations, keyed by their stable identifiers, and each
/// association that resolves to a declaration in the set contributes one
/// directed edge. Associations that do not resolve contribute nothing.
fn load_graph(declarations: &DeclarationSet) -> (DiGraph<usize, ()>, HashMap<usize, NodeIndex>) {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    for declaration in declarations.iter() {
        let node = graph.add_node(declaration.id);
        nodes.insert(declaration.id, node);
    }

    for source in declarations.iter() {
        for association in &source.associations {
            let Some(target) = declarations.resolve(&association.target) else {
                continue;
            };
            graph.add_edge(nodes[&source.id], nodes[&target.id], ());
        }
    }

    (graph, nodes)
}
