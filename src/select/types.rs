//! Core selection types: Operator, Predicate, Operand, Query

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;

use crate::error::{GraphError, Result};
use crate::graph::{Entity, EntityKind, EntitySeq, Graph};
use crate::storage::Value;

/// Comparison applied between an entity's value and the predicate operand
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    In,
    NotIn,
}

impl Operator {
    /// Operator named by a keyword's trailing token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Operator::Eq),
            "ne" => Some(Operator::Ne),
            "lt" => Some(Operator::Lt),
            "gt" => Some(Operator::Gt),
            "le" => Some(Operator::Le),
            "ge" => Some(Operator::Ge),
            "in" => Some(Operator::In),
            "notin" => Some(Operator::NotIn),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Gt => "gt",
            Operator::Le => "le",
            Operator::Ge => "ge",
            Operator::In => "in",
            Operator::NotIn => "notin",
        }
    }

    /// Membership operators test against a set
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Parsed keyword: attribute (or reserved property) plus operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    attribute: String,
    operator: Operator,
}

impl Predicate {
    pub fn new(attribute: &str, operator: Operator) -> Self {
        Predicate {
            attribute: attribute.to_string(),
            operator,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Property name after the reserved marker, if the attribute carries one
    pub fn property(&self) -> Option<&str> {
        self.attribute.strip_prefix(super::RESERVED_MARKER)
    }
}

/// Right-hand side of a predicate
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Scalar(Value),
    List(Vec<Value>),
    /// Vertex indices, or any set of values
    Set(HashSet<Value>),
    /// Indices of an edge sequence; never stands for a vertex set
    EdgeSet(HashSet<Value>),
    /// Two sides, as `_between` expects
    Pair(Box<Operand>, Box<Operand>),
}

impl Operand {
    /// Collapse into a single value (lists and sets become `Value::List`)
    pub fn into_value(self) -> Value {
        match self {
            Operand::Scalar(v) => v,
            Operand::List(items) => Value::List(items),
            Operand::Set(items) | Operand::EdgeSet(items) => Value::List(items.into_iter().collect()),
            Operand::Pair(a, b) => Value::List(vec![a.into_value(), b.into_value()]),
        }
    }

    /// Coerce to a membership set; scalars only qualify when they hold a list
    pub fn to_set(&self) -> Result<HashSet<Value>> {
        match self {
            Operand::Set(items) => Ok(items.clone()),
            Operand::List(items) => Ok(items.iter().cloned().collect()),
            Operand::Scalar(Value::List(items)) => Ok(items.iter().cloned().collect()),
            Operand::Pair(a, b) => Ok([a.clone().into_value(), b.clone().into_value()]
                .into_iter()
                .collect()),
            Operand::EdgeSet(_) => Err(GraphError::configuration(
                "an edge sequence cannot be used as a set operand",
            )),
            Operand::Scalar(other) => Err(GraphError::configuration(format!(
                "expected a collection, got {}",
                other
            ))),
        }
    }

    /// Members as a vertex-index set
    pub fn to_index_set(&self) -> Result<HashSet<usize>> {
        self.to_set()?
            .iter()
            .map(|v| {
                v.as_index().ok_or_else(|| {
                    GraphError::configuration(format!("{} is not a vertex index", v))
                })
            })
            .collect()
    }

    /// Elements of a list-like operand, each itself an operand
    pub fn elements(&self) -> Option<Vec<Operand>> {
        if let Operand::Pair(a, b) = self {
            return Some(vec![(**a).clone(), (**b).clone()]);
        }
        let items: Vec<Value> = match self {
            Operand::List(items) => items.clone(),
            Operand::Set(items) => items.iter().cloned().collect(),
            Operand::Scalar(Value::List(items)) => items.clone(),
            Operand::Scalar(_) | Operand::EdgeSet(_) | Operand::Pair(..) => return None,
        };
        Some(items.into_iter().map(Operand::Scalar).collect())
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Scalar(v)
    }
}

impl From<HashSet<Value>> for Operand {
    fn from(items: HashSet<Value>) -> Self {
        Operand::Set(items)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Operand {
    fn from(items: [T; N]) -> Self {
        Operand::List(items.into_iter().map(Into::into).collect())
    }
}

/// A sequence stands for the set of its absolute indices
impl<G: Deref<Target = Graph>> From<&EntitySeq<G>> for Operand {
    fn from(seq: &EntitySeq<G>) -> Self {
        let indices = seq.indices().iter().map(|&i| Value::from(i)).collect();
        match seq.kind() {
            EntityKind::Vertex => Operand::Set(indices),
            EntityKind::Edge => Operand::EdgeSet(indices),
        }
    }
}

/// Pair of sets, as `_between` expects
impl<A: Into<Operand>, B: Into<Operand>> From<(A, B)> for Operand {
    fn from((a, b): (A, B)) -> Self {
        Operand::Pair(Box::new(a.into()), Box::new(b.into()))
    }
}

macro_rules! scalar_operand {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Scalar(Value::from(v))
                }
            }
        )*
    };
}

scalar_operand!(bool, i64, i32, u32, usize, f64, &str, String);

/// Callable filter applied to each entity
pub type EntityFilter<'q> = Box<dyn Fn(Entity<&Graph>) -> bool + 'q>;

/// Positional part of a query, evaluated before any keyword predicate
pub enum Positional<'q> {
    /// Select nothing
    Nothing,
    /// Keep entities the callable accepts
    Filter(EntityFilter<'q>),
    /// Relative positions into the current sequence
    Positions(Vec<usize>),
}

impl fmt::Debug for Positional<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Positional::Nothing => f.write_str("Nothing"),
            Positional::Filter(_) => f.write_str("Filter(..)"),
            Positional::Positions(p) => f.debug_tuple("Positions").field(p).finish(),
        }
    }
}

/// Selection request: optional positional part plus keyword predicates,
/// applied in the order they were added
#[derive(Debug, Default)]
pub struct Query<'q> {
    positional: Option<Positional<'q>>,
    predicates: Vec<(String, Operand)>,
}

impl<'q> Query<'q> {
    pub fn new() -> Self {
        Query {
            positional: None,
            predicates: Vec::new(),
        }
    }

    /// Select nothing at all
    pub fn none(mut self) -> Self {
        self.positional = Some(Positional::Nothing);
        self
    }

    /// Keep entities for which `f` returns true
    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(Entity<&Graph>) -> bool + 'q,
    {
        self.positional = Some(Positional::Filter(Box::new(f)));
        self
    }

    /// Keep the entities at these relative positions, in this order
    pub fn positions<I: IntoIterator<Item = usize>>(mut self, positions: I) -> Self {
        self.positional = Some(Positional::Positions(positions.into_iter().collect()));
        self
    }

    /// Append one relative position
    pub fn position(mut self, pos: usize) -> Self {
        match &mut self.positional {
            Some(Positional::Positions(list)) => list.push(pos),
            _ => self.positional = Some(Positional::Positions(vec![pos])),
        }
        self
    }

    /// Add a keyword predicate such as `("age_gt", 30)` or `("_source_in", [0, 2])`
    pub fn pred(mut self, keyword: &str, operand: impl Into<Operand>) -> Self {
        self.predicates.push((keyword.to_string(), operand.into()));
        self
    }

    pub fn positional(&self) -> Option<&Positional<'q>> {
        self.positional.as_ref()
    }

    pub fn predicates(&self) -> &[(String, Operand)] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_none() && self.predicates.is_empty()
    }
}

/// Keyword predicates from any string-keyed map
impl<'q, K: AsRef<str>, V: Into<Operand>> FromIterator<(K, V)> for Query<'q> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Query::new(), |q, (k, v)| q.pred(k.as_ref(), v))
    }
}
