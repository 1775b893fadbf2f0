//! Resolution report - what the CLI prints
//!
//! Flattens a [`Resolution`] over a built manifest into rows labelled with
//! manifest ids, ready for JSON output or a terminal table.

use serde::Serialize;

use crate::manifest::BuiltManifest;
use crate::naming::{IdSet, NamedId, NamedKind, Resolution};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedName {
    pub namespace: String,
    pub entity: String,
    pub kind: &'static str,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedEntity {
    pub namespace: String,
    pub entity: String,
    /// Dependencies that never received a name
    pub waiting_on: Vec<String>,
    /// Forbidden namespaces that never became fully named
    pub blocked_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub complete: bool,
    pub rounds: usize,
    pub assignments: Vec<AssignedName>,
    pub unresolved: Vec<UnresolvedEntity>,
}

fn kind_label(kind: &NamedKind) -> &'static str {
    match kind {
        NamedKind::Fixed(_) => "fixed",
        NamedKind::Simple(_) => "simple",
        NamedKind::DependencyBased { .. } => "dependent",
    }
}

impl ResolutionReport {
    pub fn new(built: &BuiltManifest, resolution: &Resolution) -> Self {
        let graph = &built.graph;

        let assignments = resolution
            .iter()
            .map(|(id, name)| {
                let named = &graph[id];
                AssignedName {
                    namespace: graph[named.namespace()].name().to_string(),
                    entity: built.label(id).to_string(),
                    kind: kind_label(named.kind()),
                    name: name.to_string(),
                }
            })
            .collect();

        let unresolved = resolution
            .unresolved()
            .iter()
            .map(|id| {
                let named = &graph[*id];
                let pending: IdSet<NamedId> = named
                    .dependencies()
                    .iter()
                    .copied()
                    .filter(|dep| resolution.get(*dep).is_none())
                    .collect();
                let waiting_on = pending
                    .iter()
                    .map(|dep| built.label(dep).to_string())
                    .collect();

                let ns = named.namespace();
                let blocked_by = graph[ns]
                    .forbidden()
                    .iter()
                    .filter(|other| **other != ns)
                    .filter(|other| {
                        graph[**other]
                            .members()
                            .iter()
                            .any(|member| resolution.get(*member).is_none())
                    })
                    .map(|other| graph[*other].name().to_string())
                    .collect();

                UnresolvedEntity {
                    namespace: graph[ns].name().to_string(),
                    entity: built.label(*id).to_string(),
                    waiting_on,
                    blocked_by,
                }
            })
            .collect();

        Self {
            complete: resolution.is_complete(),
            rounds: resolution.rounds(),
            assignments,
            unresolved,
        }
    }
}
