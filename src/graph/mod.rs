//! Graph structure, attribute stores and entity views

pub mod engine;
pub mod id_gen;
pub mod seq;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::select::Query;
use crate::storage::{AttributeStore, Scope, Value, Values};

pub use engine::{Computation, ComputationRegistry};
pub use id_gen::UniqueIdGenerator;
pub use seq::{EdgeSeq, Entity, EntitySeq, VertexSeq};

/// Entity kinds a sequence can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Vertex,
    Edge,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Vertex => "vertex",
            EntityKind::Edge => "edge",
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            EntityKind::Vertex => Scope::Vertex,
            EntityKind::Edge => Scope::Edge,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributed graph.
///
/// Vertices are `0..vcount()`, edges are `0..ecount()` in insertion order.
/// The graph owns every attribute column; sequences and entity views only
/// carry indices. Removing an entity shifts all later indices down by one,
/// so views created before a structural change must not be reused.
#[derive(Debug, Clone)]
pub struct Graph {
    directed: bool,
    edges: Vec<(usize, usize)>,
    graph_attrs: AttributeStore,
    vertex_attrs: AttributeStore,
    edge_attrs: AttributeStore,
    registry: ComputationRegistry,
}

impl Graph {
    /// Graph with `n` isolated vertices
    pub fn new(n: usize, directed: bool) -> Self {
        Self {
            directed,
            edges: Vec::new(),
            graph_attrs: AttributeStore::new(Scope::Graph, 1),
            vertex_attrs: AttributeStore::new(Scope::Vertex, n),
            edge_attrs: AttributeStore::new(Scope::Edge, 0),
            registry: ComputationRegistry::with_builtins(),
        }
    }

    /// Graph from an edge list; the vertex count grows to cover every endpoint
    pub fn with_edges(n: usize, edges: Vec<(usize, usize)>, directed: bool) -> Self {
        let needed = edges
            .iter()
            .map(|&(s, d)| s.max(d) + 1)
            .max()
            .unwrap_or(0);
        let mut graph = Self::new(n.max(needed), directed);
        graph.edge_attrs.insert_slots(edges.len());
        graph.edges = edges;
        graph
    }

    /// Graph from an edge list plus whole attribute columns.
    ///
    /// Columns follow the usual assignment rules: shorter ones are cycled,
    /// longer ones are rejected.
    pub fn from_columns(
        n: usize,
        edges: Vec<(usize, usize)>,
        directed: bool,
        vertex_attrs: IndexMap<String, Vec<Value>>,
        edge_attrs: IndexMap<String, Vec<Value>>,
    ) -> Result<Self> {
        let mut graph = Self::with_edges(n, edges, directed);
        for (name, column) in vertex_attrs {
            graph.vertex_attrs.set(&name, Values::Seq(column))?;
        }
        for (name, column) in edge_attrs {
            graph.edge_attrs.set(&name, Values::Seq(column))?;
        }
        Ok(graph)
    }

    pub fn vcount(&self) -> usize {
        self.vertex_attrs.len()
    }

    pub fn ecount(&self) -> usize {
        self.edges.len()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Edge list in edge-index order
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// `(source, target)` of edge `index`
    pub fn edge(&self, index: usize) -> Option<(usize, usize)> {
        self.edges.get(index).copied()
    }

    // === STRUCTURE ===

    /// Append `count` vertices; their attributes start as null
    pub fn add_vertices(&mut self, count: usize) {
        self.vertex_attrs.insert_slots(count);
    }

    /// Append one edge, returning its index
    pub fn add_edge(&mut self, source: usize, target: usize) -> Result<usize> {
        self.check_vertex(source)?;
        self.check_vertex(target)?;
        self.edges.push((source, target));
        self.edge_attrs.insert_slots(1);
        Ok(self.edges.len() - 1)
    }

    /// Append several edges; nothing is added if any endpoint is out of range
    pub fn add_edges<I>(&mut self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let edges: Vec<(usize, usize)> = edges.into_iter().collect();
        for &(source, target) in &edges {
            self.check_vertex(source)?;
            self.check_vertex(target)?;
        }
        self.edge_attrs.insert_slots(edges.len());
        self.edges.extend(edges);
        Ok(())
    }

    /// Remove edges by index; remaining edges keep their relative order
    pub fn delete_edges(&mut self, indices: &[usize]) -> Result<()> {
        self.edge_attrs.remove_slots(indices)?;
        let mut doomed = vec![false; self.edges.len()];
        for &i in indices {
            doomed[i] = true;
        }
        let mut slot = 0;
        self.edges.retain(|_| {
            let keep = !doomed[slot];
            slot += 1;
            keep
        });
        debug!(removed = indices.len(), remaining = self.edges.len(), "deleted edges");
        Ok(())
    }

    /// Remove vertices by index together with their incident edges.
    /// Later vertices shift down and edge endpoints are renumbered.
    pub fn delete_vertices(&mut self, indices: &[usize]) -> Result<()> {
        for &v in indices {
            self.check_vertex(v)?;
        }
        let mut doomed = vec![false; self.vcount()];
        for &v in indices {
            doomed[v] = true;
        }

        let incident: Vec<usize> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| doomed[edge.0] || doomed[edge.1])
            .map(|(e, _)| e)
            .collect();
        self.delete_edges(&incident)?;

        let mut remap = vec![0usize; doomed.len()];
        let mut next = 0;
        for (v, &gone) in doomed.iter().enumerate() {
            remap[v] = next;
            if !gone {
                next += 1;
            }
        }
        for edge in &mut self.edges {
            *edge = (remap[edge.0], remap[edge.1]);
        }
        self.vertex_attrs.remove_slots(indices)?;
        debug!(removed = indices.len(), remaining = self.vcount(), "deleted vertices");
        Ok(())
    }

    /// Delete the edges an edge `select` with `query` yields
    pub fn delete_edges_where(&mut self, query: &Query<'_>) -> Result<usize> {
        let doomed = self.es().select(query)?.indices().to_vec();
        self.delete_edges(&doomed)?;
        Ok(doomed.len())
    }

    /// Delete the vertices a vertex `select` with `query` yields
    pub fn delete_vertices_where(&mut self, query: &Query<'_>) -> Result<usize> {
        let doomed = self.vs().select(query)?.indices().to_vec();
        self.delete_vertices(&doomed)?;
        Ok(doomed.len())
    }

    fn check_vertex(&self, v: usize) -> Result<()> {
        if v < self.vcount() {
            Ok(())
        } else {
            Err(GraphError::lookup(format!(
                "vertex index {} out of range (vcount {})",
                v,
                self.vcount()
            )))
        }
    }

    // === ATTRIBUTES ===

    /// Graph-level attribute
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.graph_attrs.value(name, 0)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.graph_attrs.set_value(name, 0, value)
    }

    pub fn delete_attribute(&mut self, name: &str) -> Option<Value> {
        self.graph_attrs.delete(name).and_then(|mut col| col.pop())
    }

    pub fn graph_attrs(&self) -> &AttributeStore {
        &self.graph_attrs
    }

    pub fn vertex_attrs(&self) -> &AttributeStore {
        &self.vertex_attrs
    }

    pub fn vertex_attrs_mut(&mut self) -> &mut AttributeStore {
        &mut self.vertex_attrs
    }

    pub fn edge_attrs(&self) -> &AttributeStore {
        &self.edge_attrs
    }

    pub fn edge_attrs_mut(&mut self) -> &mut AttributeStore {
        &mut self.edge_attrs
    }

    /// Store for the given entity kind
    pub fn store(&self, kind: EntityKind) -> &AttributeStore {
        match kind {
            EntityKind::Vertex => &self.vertex_attrs,
            EntityKind::Edge => &self.edge_attrs,
        }
    }

    pub fn store_mut(&mut self, kind: EntityKind) -> &mut AttributeStore {
        match kind {
            EntityKind::Vertex => &mut self.vertex_attrs,
            EntityKind::Edge => &mut self.edge_attrs,
        }
    }

    // === COMPUTATIONS ===

    pub fn registry(&self) -> &ComputationRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ComputationRegistry {
        &mut self.registry
    }

    /// Register a per-vertex computation answering only the queried vertices
    pub fn register_vertex_computation<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Graph, &[usize]) -> Vec<Value> + Send + Sync + 'static,
    {
        self.registry.register(EntityKind::Vertex, name, Computation::indexed(f));
    }

    /// Register a whole-graph vertex computation; callers see it projected
    pub fn register_vertex_computation_whole<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Graph) -> Vec<Value> + Send + Sync + 'static,
    {
        self.registry.register(EntityKind::Vertex, name, Computation::whole(f));
    }

    pub fn register_edge_computation<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Graph, &[usize]) -> Vec<Value> + Send + Sync + 'static,
    {
        self.registry.register(EntityKind::Edge, name, Computation::indexed(f));
    }

    pub fn register_edge_computation_whole<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&Graph) -> Vec<Value> + Send + Sync + 'static,
    {
        self.registry.register(EntityKind::Edge, name, Computation::whole(f));
    }

    // === VIEWS ===

    /// All vertices, read-only
    pub fn vs(&self) -> VertexSeq<&Graph> {
        EntitySeq::full(self, EntityKind::Vertex)
    }

    /// All edges, read-only
    pub fn es(&self) -> EdgeSeq<&Graph> {
        EntitySeq::full(self, EntityKind::Edge)
    }

    /// All vertices, with attribute writes
    pub fn vs_mut(&mut self) -> VertexSeq<&mut Graph> {
        EntitySeq::full(self, EntityKind::Vertex)
    }

    /// All edges, with attribute writes
    pub fn es_mut(&mut self) -> EdgeSeq<&mut Graph> {
        EntitySeq::full(self, EntityKind::Edge)
    }

    /// Short textual description: counts, direction, attribute names
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} vertices, {} edges, {}directed",
            self.vcount(),
            self.ecount(),
            if self.directed { "" } else { "un" }
        );
        for store in [&self.graph_attrs, &self.vertex_attrs, &self.edge_attrs] {
            let names: Vec<&str> = store.names().collect();
            if !names.is_empty() {
                out.push_str(&format!("\n{} attributes: {}", store.scope(), names.join(", ")));
            }
        }
        out
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
