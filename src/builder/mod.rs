//! Graph construction from keyed records
//!
//! Vertices come from an optional stream of records carrying a name key;
//! edges come from records carrying two endpoint keys that refer to those
//! names. Names never seen among the vertex records become new vertices,
//! in the order they are first met.
//!
//! Two modes produce the same graph:
//! - **batch** stages `(position, value)` pairs per key, then materialises
//!   dense columns and builds the graph in one go;
//! - **incremental** appends vertices and edges to a live graph as records
//!   arrive, which keeps only one record in flight.

mod record;

pub use record::Record;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GraphError, Result};
use crate::graph::{Graph, UniqueIdGenerator};
use crate::storage::Value;

/// How records are turned into a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub directed: bool,
    /// Vertex record key holding the vertex name
    pub name_key: String,
    /// Edge record keys holding the source and target names
    pub endpoint_keys: (String, String),
    pub incremental: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            directed: false,
            name_key: "name".to_string(),
            endpoint_keys: ("source".to_string(), "target".to_string()),
            incremental: false,
        }
    }
}

impl BuildOptions {
    /// Options from a JSON document; missing fields take their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::File::open(path.as_ref())?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Per-key staging: `(position, value)` pairs in arrival order
type Staged = IndexMap<String, Vec<(usize, Value)>>;

fn stage(staged: &mut Staged, position: usize, fields: Vec<(String, Value)>) {
    for (key, value) in fields {
        staged.entry(key).or_default().push((position, value));
    }
}

/// Dense columns of length `len`, null where a record lacked the key
fn materialize(staged: Staged, len: usize) -> IndexMap<String, Vec<Value>> {
    staged
        .into_iter()
        .map(|(key, pairs)| {
            let mut column = vec![Value::Null; len];
            for (position, value) in pairs {
                column[position] = value;
            }
            (key, column)
        })
        .collect()
}

/// Builds a [`Graph`] from vertex and edge records
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.options.directed = directed;
        self
    }

    pub fn name_key(mut self, key: &str) -> Self {
        self.options.name_key = key.to_string();
        self
    }

    pub fn endpoint_keys(mut self, source: &str, target: &str) -> Self {
        self.options.endpoint_keys = (source.to_string(), target.to_string());
        self
    }

    pub fn incremental(mut self, incremental: bool) -> Self {
        self.options.incremental = incremental;
        self
    }

    /// Build from edge records alone; every vertex is discovered from them
    pub fn build_from_edges<E>(&self, edges: E) -> Result<Graph>
    where
        E: IntoIterator,
        E::Item: Record,
    {
        self.build(None::<Vec<serde_json::Value>>, edges)
    }

    /// Build from optional vertex records and edge records.
    ///
    /// Nothing is returned unless every record was consumed successfully.
    pub fn build<V, E>(&self, vertices: Option<V>, edges: E) -> Result<Graph>
    where
        V: IntoIterator,
        V::Item: Record,
        E: IntoIterator,
        E::Item: Record,
    {
        let (names, vertex_columns) = self.vertex_columns(vertices)?;
        debug!(
            vertices = names.len(),
            incremental = self.options.incremental,
            "building graph"
        );

        let graph = if self.options.incremental {
            self.edges_incremental(names, vertex_columns, edges)?
        } else {
            self.edges_batch(names, vertex_columns, edges)?
        };

        info!(
            vertices = graph.vcount(),
            edges = graph.ecount(),
            directed = graph.is_directed(),
            "graph built"
        );
        Ok(graph)
    }

    /// Dense vertex columns plus a generator seeded with the vertex names
    fn vertex_columns<V>(
        &self,
        vertices: Option<V>,
    ) -> Result<(UniqueIdGenerator<Value>, IndexMap<String, Vec<Value>>)>
    where
        V: IntoIterator,
        V::Item: Record,
    {
        let name_key = &self.options.name_key;
        let mut columns = match vertices {
            Some(records) => {
                let mut staged = Staged::new();
                let mut n = 0;
                for (position, record) in records.into_iter().enumerate() {
                    stage(&mut staged, position, record.fields()?);
                    n = position + 1;
                }
                if n > 0 && !staged.contains_key(name_key) {
                    return Err(GraphError::lookup(format!(
                        "no vertex record carries the name key '{}'",
                        name_key
                    )));
                }
                materialize(staged, n)
            }
            None => IndexMap::new(),
        };

        let names = columns.entry(name_key.clone()).or_default();
        let mut seen = HashSet::with_capacity(names.len());
        if let Some(dup) = names.iter().find(|name| !seen.insert(*name)) {
            return Err(GraphError::Uniqueness(format!(
                "'{}' appears more than once under '{}'",
                dup, name_key
            )));
        }

        let generator = UniqueIdGenerator::with_initial(names.iter().cloned());
        Ok((generator, columns))
    }

    /// Endpoint names of one edge record plus its remaining fields
    fn split_edge<R: Record>(&self, position: usize, record: &R) -> Result<(Value, Value, Vec<(String, Value)>)> {
        let (source_key, target_key) = &self.options.endpoint_keys;
        let mut source = None;
        let mut target = None;
        let mut rest = Vec::new();
        for (key, value) in record.fields()? {
            if &key == source_key {
                source = Some(value);
            } else if &key == target_key {
                target = Some(value);
            } else {
                rest.push((key, value));
            }
        }

        let missing = |key: &str| {
            GraphError::lookup(format!("edge record {} has no endpoint key '{}'", position, key))
        };
        let source = source.ok_or_else(|| missing(source_key))?;
        let target = target.ok_or_else(|| missing(target_key))?;
        Ok((source, target, rest))
    }

    fn edges_batch<E>(
        &self,
        mut names: UniqueIdGenerator<Value>,
        mut vertex_columns: IndexMap<String, Vec<Value>>,
        edges: E,
    ) -> Result<Graph>
    where
        E: IntoIterator,
        E::Item: Record,
    {
        let known = names.len();
        let mut edge_list = Vec::new();
        let mut staged = Staged::new();
        for (position, record) in edges.into_iter().enumerate() {
            let (source, target, rest) = self.split_edge(position, &record)?;
            edge_list.push((names.id(source), names.id(target)));
            stage(&mut staged, position, rest);
        }
        let edge_columns = materialize(staged, edge_list.len());

        let n = names.len();
        if n > known {
            debug!(discovered = n - known, "vertices discovered from edges");
            for column in vertex_columns.values_mut() {
                column.resize(n, Value::Null);
            }
            vertex_columns.insert(self.options.name_key.clone(), names.into_keys());
        }

        Graph::from_columns(n, edge_list, self.options.directed, vertex_columns, edge_columns)
    }

    fn edges_incremental<E>(
        &self,
        mut names: UniqueIdGenerator<Value>,
        vertex_columns: IndexMap<String, Vec<Value>>,
        edges: E,
    ) -> Result<Graph>
    where
        E: IntoIterator,
        E::Item: Record,
    {
        let name_key = &self.options.name_key;
        let known = names.len();
        let mut graph = Graph::from_columns(
            known,
            Vec::new(),
            self.options.directed,
            vertex_columns,
            IndexMap::new(),
        )?;

        for (position, record) in edges.into_iter().enumerate() {
            let (source, target, rest) = self.split_edge(position, &record)?;
            let mut endpoint = |name: Value, graph: &mut Graph| -> Result<usize> {
                let id = names.id(name.clone());
                if id == graph.vcount() {
                    graph.add_vertices(1);
                    graph.vertex_attrs_mut().set_value(name_key, id, name)?;
                }
                Ok(id)
            };
            let s = endpoint(source, &mut graph)?;
            let t = endpoint(target, &mut graph)?;
            let e = graph.add_edge(s, t)?;
            for (key, value) in rest {
                graph.edge_attrs_mut().set_value(&key, e, value)?;
            }
        }

        if graph.vcount() > known {
            debug!(discovered = graph.vcount() - known, "vertices discovered from edges");
        }
        Ok(graph)
    }
}
