//! # Namegraph - Identifier assignment for code generators
//!
//! Turns a forest of namespaces full of entities that need names into a
//! collision-free mapping from entity to string.
//!
//! Namegraph provides:
//! - An arena-backed namespace/entity graph with directed "forbidden" relations
//! - Fixed, simple and dependency-based entities
//! - Pluggable naming functions, with a counting disambiguator built in
//! - A fixpoint resolver that names entities in dependency order
//! - A TOML/JSON manifest format and CLI for inspecting resolutions

pub mod naming;
pub mod manifest;
pub mod config;
pub mod report;
pub mod ui;

// Re-exports for convenient access
pub use naming::{
    assign_names, CountingNamer, NameGraph, NameResolver, Named, NamedId, NamedKind, Namer,
    NamerId, Namespace, NamespaceId, Resolution, ResolveOptions,
};
pub use manifest::Manifest;
pub use report::ResolutionReport;

/// Result type alias for Namegraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Namegraph operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{entity} was assigned twice (had `{existing}`, got `{attempted}`)")]
    DoubleAssignment {
        entity: String,
        existing: String,
        attempted: String,
    },

    #[error("name `{name}` for {entity} conflicts with {holder}")]
    AssignmentConflict {
        entity: String,
        holder: String,
        name: String,
    },

    #[error("naming function contract violation: {0}")]
    NamingFunctionContractViolation(String),

    #[error("invalid naming request: {0}")]
    InvalidRequest(String),

    #[error("{entity} proposed a name before dependency {dependency} was resolved")]
    DependencyNotResolved { entity: String, dependency: String },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
