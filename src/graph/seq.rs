//! Vertex and edge sequences
//!
//! An [`EntitySeq`] is an ordered list of absolute vertex or edge indices
//! plus a handle on the owning [`Graph`]. The handle is generic: a
//! sequence over `&Graph` reads, a sequence over `&mut Graph` can also
//! write attributes for exactly its own entities.

use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::error::{GraphError, Result};
use crate::graph::{EntityKind, Graph};
use crate::select::{self, Query};
use crate::storage::{Value, Values};

/// Ordered view over some of a graph's vertices or edges
#[derive(Debug, Clone)]
pub struct EntitySeq<G> {
    graph: G,
    kind: EntityKind,
    indices: Vec<usize>,
}

/// Sequence over vertices
pub type VertexSeq<G> = EntitySeq<G>;

/// Sequence over edges
pub type EdgeSeq<G> = EntitySeq<G>;

impl<G: Deref<Target = Graph>> EntitySeq<G> {
    /// Every entity of `kind`, in index order
    pub fn full(graph: G, kind: EntityKind) -> Self {
        let count = graph.store(kind).len();
        Self {
            graph,
            kind,
            indices: (0..count).collect(),
        }
    }

    /// Explicit absolute indices; out-of-range entries are rejected
    pub fn with_indices(graph: G, kind: EntityKind, indices: Vec<usize>) -> Result<Self> {
        let count = graph.store(kind).len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= count) {
            return Err(GraphError::lookup(format!(
                "{} index {} out of range ({} {}s)",
                kind, bad, count, kind
            )));
        }
        Ok(Self { graph, kind, indices })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Absolute indices in sequence order
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Entity at relative position `pos`
    pub fn get(&self, pos: usize) -> Option<Entity<&Graph>> {
        self.indices.get(pos).map(|&index| Entity {
            graph: &*self.graph,
            kind: self.kind,
            index,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity<&Graph>> + '_ {
        let graph: &Graph = &self.graph;
        let kind = self.kind;
        self.indices
            .iter()
            .map(move |&index| Entity { graph, kind, index })
    }

    /// Attribute values for exactly this sequence's entities, in sequence order
    pub fn attribute(&self, name: &str) -> Result<Vec<Value>> {
        self.graph.store(self.kind).get_at(name, &self.indices)
    }

    /// Attribute names of the underlying scope
    pub fn attribute_names(&self) -> Vec<&str> {
        self.graph.store(self.kind).names().collect()
    }

    /// Run a registered computation and return one value per entity, in
    /// sequence order. Whole-graph computations are projected onto this
    /// sequence.
    pub fn compute(&self, name: &str) -> Result<Vec<Value>> {
        let computation = self.graph.registry().get(self.kind, name)?;
        computation.evaluate(&self.graph, &self.indices)
    }

    /// Source vertex of every edge in the sequence
    pub fn sources(&self) -> Vec<usize> {
        self.endpoints(|(s, _)| s)
    }

    /// Target vertex of every edge in the sequence
    pub fn targets(&self) -> Vec<usize> {
        self.endpoints(|(_, t)| t)
    }

    fn endpoints(&self, pick: impl Fn((usize, usize)) -> usize) -> Vec<usize> {
        match self.kind {
            EntityKind::Edge => self
                .indices
                .iter()
                .map(|&e| pick(self.graph.edges()[e]))
                .collect(),
            EntityKind::Vertex => Vec::new(),
        }
    }

    /// Narrow in place of `self`, keeping the graph handle (and with it
    /// write access when the handle is `&mut Graph`)
    pub fn narrow(mut self, query: &Query<'_>) -> Result<Self> {
        self.indices = select::resolve(&self.graph, self.kind, &self.indices, query)?;
        Ok(self)
    }

    fn covers_whole_scope(&self) -> bool {
        self.indices.len() == self.graph.store(self.kind).len()
            && self.indices.iter().enumerate().all(|(i, &x)| i == x)
    }
}

impl<G: Deref<Target = Graph> + Clone> EntitySeq<G> {
    /// Narrow to the entities `query` keeps. The result shares this
    /// sequence's graph handle, so selections chain freely.
    pub fn select(&self, query: &Query<'_>) -> Result<EntitySeq<G>> {
        let indices = select::resolve(&self.graph, self.kind, &self.indices, query)?;
        trace!(kind = %self.kind, before = self.len(), after = indices.len(), "select");
        Ok(EntitySeq {
            graph: self.graph.clone(),
            kind: self.kind,
            indices,
        })
    }

    /// Same as [`select`](Self::select)
    pub fn call(&self, query: &Query<'_>) -> Result<EntitySeq<G>> {
        self.select(query)
    }
}

impl<G: DerefMut<Target = Graph>> EntitySeq<G> {
    /// Assign an attribute to this sequence's entities.
    ///
    /// Scalars are broadcast, shorter lists cycled over the sequence, longer
    /// lists rejected. Entities outside the sequence are left untouched.
    pub fn set_attribute(&mut self, name: &str, values: impl Into<Values>) -> Result<()> {
        let whole = self.covers_whole_scope();
        let store = self.graph.store_mut(self.kind);
        if whole {
            store.set(name, values)
        } else {
            store.set_at(name, &self.indices, values)
        }
    }

    /// Drop the attribute column for the whole scope
    pub fn delete_attribute(&mut self, name: &str) -> Option<Vec<Value>> {
        self.graph.store_mut(self.kind).delete(name)
    }

    /// Writable entity at relative position `pos`
    pub fn entity_mut(&mut self, pos: usize) -> Option<Entity<&mut Graph>> {
        let index = *self.indices.get(pos)?;
        Some(Entity {
            graph: &mut *self.graph,
            kind: self.kind,
            index,
        })
    }
}

/// Single vertex or edge bound to one absolute index
#[derive(Debug, Clone, Copy)]
pub struct Entity<G> {
    graph: G,
    kind: EntityKind,
    index: usize,
}

impl<G: Deref<Target = Graph>> Entity<G> {
    pub(crate) fn new(graph: G, kind: EntityKind, index: usize) -> Self {
        Entity { graph, kind, index }
    }

    /// Absolute index in the graph
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Attribute value, `None` if the attribute does not exist
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.graph.store(self.kind).value(name, self.index)
    }

    /// Attribute value, failing on unknown names
    pub fn attribute(&self, name: &str) -> Result<Value> {
        self.get(name).cloned().ok_or_else(|| {
            GraphError::lookup(format!("no {} attribute named '{}'", self.kind, name))
        })
    }

    /// All attributes of this entity
    pub fn attributes(&self) -> Vec<(&str, &Value)> {
        self.graph
            .store(self.kind)
            .columns()
            .map(|(name, column)| (name, &column[self.index]))
            .collect()
    }

    /// Registered computation evaluated for this entity alone
    pub fn compute(&self, name: &str) -> Result<Value> {
        let computation = self.graph.registry().get(self.kind, name)?;
        let mut values = computation.evaluate(&self.graph, &[self.index])?;
        Ok(values.pop().unwrap_or_default())
    }

    /// `(source, target)` for edges
    pub fn tuple(&self) -> Option<(usize, usize)> {
        match self.kind {
            EntityKind::Edge => self.graph.edge(self.index),
            EntityKind::Vertex => None,
        }
    }

    pub fn source(&self) -> Option<usize> {
        self.tuple().map(|(s, _)| s)
    }

    pub fn target(&self) -> Option<usize> {
        self.tuple().map(|(_, t)| t)
    }
}

impl<G: DerefMut<Target = Graph>> Entity<G> {
    /// Set one attribute of this entity only
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index;
        self.graph.store_mut(self.kind).set_value(name, index, value)
    }
}
