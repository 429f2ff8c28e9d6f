//! Selection evaluator
//!
//! Narrows a list of absolute indices with a [`Query`]. The positional part
//! runs first; every keyword predicate then narrows the result of the
//! previous one. Each predicate computes its candidate values against the
//! sequence as it stood when that predicate started.

use std::collections::HashSet;

use tracing::trace;

use crate::error::{GraphError, Result};
use crate::graph::{Entity, EntityKind, Graph};
use crate::select::parser::parse_keyword;
use crate::select::types::{Operand, Operator, Positional, Predicate, Query};
use crate::storage::Value;

/// Indices kept by `query`, as absolute indices in result order
pub fn resolve(graph: &Graph, kind: EntityKind, indices: &[usize], query: &Query<'_>) -> Result<Vec<usize>> {
    let mut current = match query.positional() {
        None => indices.to_vec(),
        Some(positional) => apply_positional(graph, kind, indices, positional)?,
    };

    for (keyword, operand) in query.predicates() {
        let predicate = parse_keyword(keyword)?;
        let kept = evaluate(graph, kind, &current, &predicate, operand)?;
        trace!(
            keyword = %keyword,
            attribute = predicate.attribute(),
            op = %predicate.operator(),
            before = current.len(),
            after = kept.len(),
            "predicate applied"
        );
        current = kept.into_iter().map(|pos| current[pos]).collect();
    }

    Ok(current)
}

fn apply_positional(
    graph: &Graph,
    kind: EntityKind,
    indices: &[usize],
    positional: &Positional<'_>,
) -> Result<Vec<usize>> {
    match positional {
        Positional::Nothing => Ok(Vec::new()),
        Positional::Filter(f) => Ok(indices
            .iter()
            .copied()
            .filter(|&index| f(Entity::new(graph, kind, index)))
            .collect()),
        Positional::Positions(positions) => positions
            .iter()
            .map(|&pos| {
                indices.get(pos).copied().ok_or_else(|| {
                    GraphError::lookup(format!(
                        "position {} out of range for a sequence of {} {}s",
                        pos,
                        indices.len(),
                        kind
                    ))
                })
            })
            .collect(),
    }
}

/// Relative positions (into `current`) that satisfy one predicate
fn evaluate(
    graph: &Graph,
    kind: EntityKind,
    current: &[usize],
    predicate: &Predicate,
    operand: &Operand,
) -> Result<Vec<usize>> {
    let Some(property) = predicate.property() else {
        let values = graph.store(kind).get_at(predicate.attribute(), current)?;
        return compare(&values, predicate.operator(), operand);
    };

    if kind == EntityKind::Edge {
        let edges = graph.edges();
        match property {
            "source" | "from" => {
                let values: Vec<Value> = current.iter().map(|&e| Value::from(edges[e].0)).collect();
                return compare(&values, predicate.operator(), operand);
            }
            "target" | "to" => {
                let values: Vec<Value> = current.iter().map(|&e| Value::from(edges[e].1)).collect();
                return compare(&values, predicate.operator(), operand);
            }
            "within" => {
                let inside = operand.to_index_set()?;
                return Ok(positions_where(current, |e| {
                    let (s, t) = edges[e];
                    inside.contains(&s) && inside.contains(&t)
                }));
            }
            "between" => {
                let (left, right) = between_sets(operand)?;
                return Ok(positions_where(current, |e| {
                    let (s, t) = edges[e];
                    (left.contains(&s) && right.contains(&t)) || (right.contains(&s) && left.contains(&t))
                }));
            }
            _ => {}
        }
    }

    let values = graph.registry().get(kind, property)?.evaluate(graph, current)?;
    compare(&values, predicate.operator(), operand)
}

fn positions_where(current: &[usize], keep: impl Fn(usize) -> bool) -> Vec<usize> {
    current
        .iter()
        .enumerate()
        .filter(|&(_, &index)| keep(index))
        .map(|(pos, _)| pos)
        .collect()
}

fn between_sets(operand: &Operand) -> Result<(HashSet<usize>, HashSet<usize>)> {
    let sides = operand.elements().unwrap_or_default();
    match sides.as_slice() {
        [left, right] => Ok((left.to_index_set()?, right.to_index_set()?)),
        _ => Err(GraphError::configuration(format!(
            "_between needs exactly two vertex sets, got {}",
            sides.len()
        ))),
    }
}

/// Right-hand side prepared once per predicate
enum Rhs {
    Value(Value),
    Set(HashSet<Value>),
}

fn compare(values: &[Value], op: Operator, operand: &Operand) -> Result<Vec<usize>> {
    let rhs = if op.is_membership() {
        Rhs::Set(operand.to_set()?)
    } else {
        Rhs::Value(operand.clone().into_value())
    };

    Ok(values
        .iter()
        .enumerate()
        .filter(|(_, v)| matches(v, op, &rhs))
        .map(|(pos, _)| pos)
        .collect())
}

fn matches(lhs: &Value, op: Operator, rhs: &Rhs) -> bool {
    match (op, rhs) {
        (Operator::Eq, Rhs::Value(r)) => lhs == r,
        (Operator::Ne, Rhs::Value(r)) => lhs != r,
        (Operator::Lt, Rhs::Value(r)) => lhs < r,
        (Operator::Gt, Rhs::Value(r)) => lhs > r,
        (Operator::Le, Rhs::Value(r)) => lhs <= r,
        (Operator::Ge, Rhs::Value(r)) => lhs >= r,
        (Operator::In, Rhs::Set(set)) => set.contains(lhs),
        (Operator::NotIn, Rhs::Set(set)) => !set.contains(lhs),
        _ => false,
    }
}
