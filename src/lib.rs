//! attrgraph - attributed vertex/edge query and construction layer
//!
//! # Architecture
//!
//! - **Attribute stores**: one insertion-ordered column per attribute name,
//!   kept for the graph, vertex and edge scopes
//! - **Entity sequences**: ordered index views over vertices or edges,
//!   narrowed with keyword predicates (`age_gt`, `_source_in`, `_within`)
//! - **Computation registry**: named per-entity computations (`degree`,
//!   `is_loop`, user-registered ones) reachable through `_<name>` keywords
//! - **Builder**: vertices and edges from keyed records, endpoints resolved
//!   by name, batch or incremental
//!
//! # Usage example
//!
//! ```
//! use attrgraph::{GraphBuilder, Query};
//! use serde_json::json;
//!
//! # fn main() -> attrgraph::Result<()> {
//! let edges = vec![
//!     json!({"source": "alice", "target": "bob", "weight": 3}),
//!     json!({"source": "alice", "target": "carol", "weight": 1}),
//!     json!({"source": "bob", "target": "carol", "weight": 5}),
//! ];
//! let g = GraphBuilder::default().build_from_edges(edges)?;
//!
//! let heavy = g.es().select(&Query::new().pred("weight_ge", 3))?;
//! assert_eq!(heavy.len(), 2);
//!
//! let hub = g.vs().select(&Query::new().pred("_degree", 2).pred("name", "alice"))?;
//! assert_eq!(hub.indices(), &[0]);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod select;
pub mod storage;

pub use builder::{BuildOptions, GraphBuilder, Record};
pub use error::{GraphError, Result};
pub use graph::{
    Computation, ComputationRegistry, EdgeSeq, Entity, EntityKind, EntitySeq, Graph,
    UniqueIdGenerator, VertexSeq,
};
pub use select::{Operand, Operator, Predicate, Query};
pub use storage::{AttributeStore, Scope, Value, Values};
