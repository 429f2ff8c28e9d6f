//! Keyword-predicate selection over vertex and edge sequences
//!
//! A [`Query`] carries an optional positional part and a list of keyword
//! predicates. Keywords are `<attribute>[_<operator>]`; a leading `_`
//! (the reserved marker) turns the attribute into a structural or
//! computed property.
//!
//! # Example
//! ```
//! use attrgraph::{Graph, Query};
//!
//! # fn main() -> attrgraph::Result<()> {
//! let mut g = Graph::with_edges(4, vec![(0, 1), (1, 2), (2, 3), (0, 3)], false);
//! g.vs_mut().set_attribute("age", vec![20, 35, 41, 18])?;
//!
//! let adults = g.vs().select(&Query::new().pred("age_ge", 21))?;
//! assert_eq!(adults.indices(), &[1, 2]);
//!
//! let inner = g.es().select(&Query::new().pred("_within", vec![0, 1, 3]))?;
//! assert_eq!(inner.indices(), &[0, 3]);
//! # Ok(())
//! # }
//! ```

mod eval;
mod parser;
mod types;

pub use eval::resolve;
pub use parser::{parse_keyword, RESERVED_MARKER};
pub use types::*;

#[cfg(test)]
mod tests;
