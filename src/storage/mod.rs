//! Columnar attribute storage
//!
//! One [`AttributeStore`] exists per scope (graph, vertex, edge). Every
//! column holds exactly one value per entity of its scope; structural
//! changes go through [`AttributeStore::insert_slots`] and
//! [`AttributeStore::remove_slots`] so columns never drift out of length.

pub mod value;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

pub use value::{Value, Values};

/// Which kind of entity a store (or a sequence) addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Graph,
    Vertex,
    Edge,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Graph => "graph",
            Scope::Vertex => "vertex",
            Scope::Edge => "edge",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named value columns for one scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeStore {
    scope: Scope,
    len: usize,
    columns: IndexMap<String, Vec<Value>>,
}

impl AttributeStore {
    pub fn new(scope: Scope, len: usize) -> Self {
        Self {
            scope,
            len,
            columns: IndexMap::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Number of entities every column covers
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Attribute names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Full column in entity order
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Single value; `None` if either the column or the slot is missing
    pub fn value(&self, name: &str, index: usize) -> Option<&Value> {
        self.columns.get(name).and_then(|col| col.get(index))
    }

    /// Values at the given absolute indices, in the order given
    pub fn get_at(&self, name: &str, indices: &[usize]) -> Result<Vec<Value>> {
        let column = self.column(name)?;
        indices
            .iter()
            .map(|&i| {
                column.get(i).cloned().ok_or_else(|| {
                    GraphError::lookup(format!("{} index {} out of range", self.scope, i))
                })
            })
            .collect()
    }

    /// Rewrite a whole column, broadcasting or cycling `values`
    pub fn set(&mut self, name: &str, values: impl Into<Values>) -> Result<()> {
        let column = values.into().expand(self.len)?;
        self.columns.insert(name.to_string(), column);
        Ok(())
    }

    /// Write only the slots at `indices`, leaving the rest of the column alone.
    /// A column that does not exist yet is created null-filled first.
    pub fn set_at(&mut self, name: &str, indices: &[usize], values: impl Into<Values>) -> Result<()> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len) {
            return Err(GraphError::lookup(format!(
                "{} index {} out of range (len {})",
                self.scope, bad, self.len
            )));
        }
        let expanded = values.into().expand(indices.len())?;
        let len = self.len;
        let column = self
            .columns
            .entry(name.to_string())
            .or_insert_with(|| vec![Value::Null; len]);
        for (&i, v) in indices.iter().zip(expanded) {
            column[i] = v;
        }
        Ok(())
    }

    /// Write a single slot
    pub fn set_value(&mut self, name: &str, index: usize, value: impl Into<Value>) -> Result<()> {
        self.set_at(name, &[index], Values::Scalar(value.into()))
    }

    /// Drop a column, returning its values
    pub fn delete(&mut self, name: &str) -> Option<Vec<Value>> {
        self.columns.shift_remove(name)
    }

    /// Append `count` null slots to every column
    pub fn insert_slots(&mut self, count: usize) {
        self.len += count;
        let len = self.len;
        for column in self.columns.values_mut() {
            column.resize(len, Value::Null);
        }
    }

    /// Remove slot `index` from every column; later slots shift down by one
    pub fn remove_slot(&mut self, index: usize) -> Result<()> {
        self.remove_slots(&[index])
    }

    /// Remove several slots at once, preserving the relative order of the rest
    pub fn remove_slots(&mut self, indices: &[usize]) -> Result<()> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len) {
            return Err(GraphError::lookup(format!(
                "{} index {} out of range (len {})",
                self.scope, bad, self.len
            )));
        }
        let mut doomed = vec![false; self.len];
        for &i in indices {
            doomed[i] = true;
        }
        for column in self.columns.values_mut() {
            let mut slot = 0;
            column.retain(|_| {
                let keep = !doomed[slot];
                slot += 1;
                keep
            });
        }
        self.len -= doomed.iter().filter(|&&d| d).count();
        Ok(())
    }

    /// Iterate `(name, column)` pairs
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn column(&self, name: &str) -> Result<&Vec<Value>> {
        self.columns.get(name).ok_or_else(|| {
            GraphError::lookup(format!("no {} attribute named '{}'", self.scope, name))
        })
    }
}
