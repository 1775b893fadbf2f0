//! Naming - Collision-free name assignment
//!
//! Builders describe a forest of namespaces and the entities that need
//! names; the resolver hands each entity a string that respects
//! dependency order and the forbidden relations between namespaces.

pub mod graph;
pub mod ids;
pub mod namer;
pub mod resolver;

pub use graph::{Combiner, NameGraph, Named, NamedKind, Namespace, NamespaceBuilder};
pub use ids::{EntityId, IdMap, IdSet, NamedId, NamerId, NamespaceId};
pub use namer::{CountingNamer, Namer};
pub use resolver::{assign_names, NameResolver, Resolution, ResolveOptions};
