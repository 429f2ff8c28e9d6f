//! Computation registry
//!
//! Structural algorithms live outside this crate. A graph only knows them
//! by name: each entry maps a name to a fixed-signature callable producing
//! one value per queried entity. Reserved-marker predicates in `select`
//! and [`EntitySeq::compute`](crate::graph::EntitySeq::compute) dispatch
//! through here.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{GraphError, Result};
use crate::graph::{EntityKind, Graph};
use crate::storage::Value;

/// Callable evaluated only for the requested entity indices
pub type IndexedFn = dyn Fn(&Graph, &[usize]) -> Vec<Value> + Send + Sync;

/// Callable producing one value for every entity of its kind
pub type WholeFn = dyn Fn(&Graph) -> Vec<Value> + Send + Sync;

/// A registered computation
#[derive(Clone)]
pub enum Computation {
    /// Receives the queried indices, answers in the same order
    Indexed(Arc<IndexedFn>),
    /// Runs over the whole graph; results are projected onto the query
    Whole(Arc<WholeFn>),
}

impl Computation {
    pub fn indexed<F>(f: F) -> Self
    where
        F: Fn(&Graph, &[usize]) -> Vec<Value> + Send + Sync + 'static,
    {
        Computation::Indexed(Arc::new(f))
    }

    pub fn whole<F>(f: F) -> Self
    where
        F: Fn(&Graph) -> Vec<Value> + Send + Sync + 'static,
    {
        Computation::Whole(Arc::new(f))
    }

    /// One value per entry of `indices`, in the same order
    pub fn evaluate(&self, graph: &Graph, indices: &[usize]) -> Result<Vec<Value>> {
        match self {
            Computation::Indexed(f) => {
                let values = f(graph, indices);
                if values.len() != indices.len() {
                    return Err(GraphError::LengthMismatch {
                        expected: indices.len(),
                        actual: values.len(),
                    });
                }
                Ok(values)
            }
            Computation::Whole(f) => {
                let all = f(graph);
                indices
                    .iter()
                    .map(|&i| {
                        all.get(i).cloned().ok_or(GraphError::LengthMismatch {
                            expected: i + 1,
                            actual: all.len(),
                        })
                    })
                    .collect()
            }
        }
    }
}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Computation::Indexed(_) => f.write_str("Computation::Indexed"),
            Computation::Whole(_) => f.write_str("Computation::Whole"),
        }
    }
}

/// Name -> computation tables, one per entity kind
#[derive(Clone, Default)]
pub struct ComputationRegistry {
    vertex: HashMap<String, Computation>,
    edge: HashMap<String, Computation>,
}

impl ComputationRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the structural reads every graph answers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(EntityKind::Vertex, "degree", Computation::whole(|g| degrees(g, true, true)));
        registry.register(EntityKind::Vertex, "indegree", Computation::whole(|g| degrees(g, false, true)));
        registry.register(EntityKind::Vertex, "outdegree", Computation::whole(|g| degrees(g, true, false)));
        registry.register(EntityKind::Edge, "is_loop", Computation::indexed(is_loop));
        registry.register(EntityKind::Edge, "is_multiple", Computation::whole(is_multiple));
        registry.register(EntityKind::Edge, "count_multiple", Computation::whole(count_multiple));
        registry.register(EntityKind::Edge, "is_mutual", Computation::indexed(is_mutual));
        registry
    }

    /// Register (or replace) a computation
    pub fn register(&mut self, kind: EntityKind, name: &str, computation: Computation) {
        self.table_mut(kind).insert(name.to_string(), computation);
    }

    pub fn unregister(&mut self, kind: EntityKind, name: &str) -> Option<Computation> {
        self.table_mut(kind).remove(name)
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.table(kind).contains_key(name)
    }

    /// Look up a computation; absent names are a delegation error
    pub fn get(&self, kind: EntityKind, name: &str) -> Result<&Computation> {
        self.table(kind).get(name).ok_or_else(|| GraphError::Delegation {
            name: name.to_string(),
            kind: kind.as_str(),
        })
    }

    /// Registered names, sorted
    pub fn names(&self, kind: EntityKind) -> Vec<&str> {
        let mut names: Vec<&str> = self.table(kind).keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn table(&self, kind: EntityKind) -> &HashMap<String, Computation> {
        match kind {
            EntityKind::Vertex => &self.vertex,
            EntityKind::Edge => &self.edge,
        }
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut HashMap<String, Computation> {
        match kind {
            EntityKind::Vertex => &mut self.vertex,
            EntityKind::Edge => &mut self.edge,
        }
    }
}

impl fmt::Debug for ComputationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputationRegistry")
            .field("vertex", &self.names(EntityKind::Vertex))
            .field("edge", &self.names(EntityKind::Edge))
            .finish()
    }
}

// ============================================================================
// Built-in structural reads
// ============================================================================

/// Endpoint counts per vertex. Undirected graphs count both endpoints
/// regardless of the requested direction; a loop counts twice.
fn degrees(graph: &Graph, out: bool, inc: bool) -> Vec<Value> {
    let (out, inc) = if graph.is_directed() { (out, inc) } else { (true, true) };
    let mut counts = vec![0i64; graph.vcount()];
    for &(src, dst) in graph.edges() {
        if out {
            counts[src] += 1;
        }
        if inc {
            counts[dst] += 1;
        }
    }
    counts.into_iter().map(Value::Int).collect()
}

fn is_loop(graph: &Graph, indices: &[usize]) -> Vec<Value> {
    indices
        .iter()
        .map(|&e| Value::Bool(graph.edges()[e].0 == graph.edges()[e].1))
        .collect()
}

fn edge_key(graph: &Graph, (src, dst): (usize, usize)) -> (usize, usize) {
    if graph.is_directed() || src <= dst {
        (src, dst)
    } else {
        (dst, src)
    }
}

/// True for every edge that repeats the endpoints of an earlier one
fn is_multiple(graph: &Graph) -> Vec<Value> {
    let mut seen = HashSet::new();
    graph
        .edges()
        .iter()
        .map(|&pair| Value::Bool(!seen.insert(edge_key(graph, pair))))
        .collect()
}

/// Multiplicity of each edge's endpoint pair (itself included)
fn count_multiple(graph: &Graph) -> Vec<Value> {
    let mut counts: HashMap<(usize, usize), i64> = HashMap::new();
    for &pair in graph.edges() {
        *counts.entry(edge_key(graph, pair)).or_insert(0) += 1;
    }
    graph
        .edges()
        .iter()
        .map(|&pair| Value::Int(counts[&edge_key(graph, pair)]))
        .collect()
}

/// Whether the reverse edge exists. Undirected edges are always mutual.
fn is_mutual(graph: &Graph, indices: &[usize]) -> Vec<Value> {
    if !graph.is_directed() {
        return vec![Value::Bool(true); indices.len()];
    }
    let pairs: HashSet<(usize, usize)> = graph.edges().iter().copied().collect();
    indices
        .iter()
        .map(|&e| {
            let (src, dst) = graph.edges()[e];
            Value::Bool(pairs.contains(&(dst, src)))
        })
        .collect()
}
