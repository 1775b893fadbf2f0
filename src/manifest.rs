//! Manifest - Declarative description of a namespace forest
//!
//! A manifest is a TOML or JSON document listing naming functions,
//! namespaces and the members that need names:
//!
//! ```toml
//! [namers.default]
//! filler = "_"
//!
//! [[namespace]]
//! name = "keywords"
//! keywords = ["type", "fn"]
//!
//! [[namespace]]
//! name = "types"
//! forbid = ["keywords"]
//! forbid_self = true
//! members = [
//!     { kind = "simple", id = "person", propose = "Person" },
//!     { kind = "dependent", id = "person_value", depends = ["person"], template = "{0}Value" },
//! ]
//! ```
//!
//! Namespaces and members may refer to ones declared later, except that a
//! parent must be declared before its children.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::naming::{
    CountingNamer, EntityId, NameGraph, NameResolver, NamedId, NamerId, NamespaceId, Resolution,
    ResolveOptions,
};
use crate::{Error, Result};

/// Name of the naming function members use when they name none
pub const DEFAULT_NAMER: &str = "default";

fn default_filler() -> char {
    CountingNamer::DEFAULT_FILLER
}

/// A counting naming function declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamerSpec {
    #[serde(default = "default_filler")]
    pub filler: char,
}

impl Default for NamerSpec {
    fn default() -> Self {
        Self {
            filler: default_filler(),
        }
    }
}

/// A namespace declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Namespaces whose names members of this one must avoid
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forbid: Vec<String>,
    #[serde(default)]
    pub forbid_self: bool,
    /// Reserved words, added as fixed members
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberSpec>,
}

/// A member declaration, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberSpec {
    Fixed {
        id: String,
        name: String,
    },
    Simple {
        id: String,
        propose: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namer: Option<String>,
    },
    Dependent {
        id: String,
        depends: Vec<String>,
        /// `{0}`, `{1}`, … stand for the dependencies' names
        template: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namer: Option<String>,
    },
}

impl MemberSpec {
    pub fn id(&self) -> &str {
        match self {
            MemberSpec::Fixed { id, .. }
            | MemberSpec::Simple { id, .. }
            | MemberSpec::Dependent { id, .. } => id,
        }
    }

    fn namer(&self) -> Option<&str> {
        match self {
            MemberSpec::Fixed { .. } => None,
            MemberSpec::Simple { namer, .. } | MemberSpec::Dependent { namer, .. } => {
                Some(namer.as_deref().unwrap_or(DEFAULT_NAMER))
            }
        }
    }
}

/// Root manifest document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub namers: BTreeMap<String, NamerSpec>,
    #[serde(default, rename = "namespace")]
    pub namespaces: Vec<NamespaceSpec>,
}

/// A manifest turned into a graph ready for resolution
#[derive(Debug)]
pub struct BuiltManifest {
    pub graph: NameGraph,
    /// Every root namespace, in declaration order
    pub roots: Vec<NamespaceId>,
    ids: BTreeMap<String, NamedId>,
    labels: HashMap<NamedId, String>,
}

impl BuiltManifest {
    /// Handle of the member declared with `id`
    pub fn lookup(&self, id: &str) -> Option<NamedId> {
        self.ids.get(id).copied()
    }

    /// Manifest id of a member, or the keyword for keyword entities
    pub fn label(&self, id: NamedId) -> &str {
        self.labels
            .get(&id)
            .map(String::as_str)
            .unwrap_or_else(|| self.graph[id].name())
    }

    pub fn resolve(&self, options: ResolveOptions) -> Result<Resolution> {
        NameResolver::new(&self.graph)
            .with_options(options)
            .resolve(&self.roots)
    }
}

impl Manifest {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load a manifest, picking the format from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    pub fn member_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.members.len()).sum()
    }

    /// Build with the default naming function's filler
    pub fn build(&self) -> Result<BuiltManifest> {
        self.build_with(default_filler())
    }

    /// Build the graph; `default_filler` configures the `default` naming
    /// function unless the manifest declares one itself.
    pub fn build_with(&self, default_filler: char) -> Result<BuiltManifest> {
        let mut graph = NameGraph::new();

        let mut namers: BTreeMap<&str, NamerId> = BTreeMap::new();
        if !self.namers.contains_key(DEFAULT_NAMER) {
            namers.insert(DEFAULT_NAMER, graph.add_namer(CountingNamer::new(default_filler)));
        }
        for (name, spec) in &self.namers {
            namers.insert(name.as_str(), graph.add_namer(CountingNamer::new(spec.filler)));
        }

        let namespace_ids = self.namespace_ids()?;
        let member_ids = self.member_ids()?;

        let mut roots = Vec::new();
        let mut labels = HashMap::new();
        for (index, spec) in self.namespaces.iter().enumerate() {
            let lookup_ns = |name: &str| {
                namespace_ids.get(name).copied().ok_or_else(|| {
                    Error::Manifest(format!(
                        "namespace `{}` refers to unknown namespace `{}`",
                        spec.name, name
                    ))
                })
            };

            let mut builder = graph.namespace(spec.name.clone());
            if let Some(parent) = &spec.parent {
                let parent_id = lookup_ns(parent.as_str())?;
                if parent_id.index() >= index {
                    return Err(Error::Manifest(format!(
                        "parent `{}` of `{}` must be declared first",
                        parent, spec.name
                    )));
                }
                builder = builder.parent(parent_id);
            }
            for forbidden in &spec.forbid {
                builder = builder.forbid(lookup_ns(forbidden.as_str())?);
            }
            if spec.forbid_self {
                builder = builder.forbid_self();
            }
            let ns = builder.build();
            if spec.parent.is_none() {
                roots.push(ns);
            }

            for keyword in &spec.keywords {
                graph.add_fixed(ns, keyword.clone());
            }

            for member in &spec.members {
                let lookup_namer = |name: &str| {
                    namers.get(name).copied().ok_or_else(|| {
                        Error::Manifest(format!(
                            "member `{}` uses unknown namer `{}`",
                            member.id(),
                            name
                        ))
                    })
                };

                let id = match member {
                    MemberSpec::Fixed { name, .. } => graph.add_fixed(ns, name.clone()),
                    MemberSpec::Simple { propose, .. } => {
                        let namer = lookup_namer(member.namer().unwrap_or(DEFAULT_NAMER))?;
                        graph.add_simple(ns, namer, propose.clone())
                    }
                    MemberSpec::Dependent {
                        id,
                        depends,
                        template,
                        ..
                    } => {
                        let namer = lookup_namer(member.namer().unwrap_or(DEFAULT_NAMER))?;
                        let dependencies = depends
                            .iter()
                            .map(|dep| {
                                member_ids.get(dep.as_str()).copied().ok_or_else(|| {
                                    Error::Manifest(format!(
                                        "member `{}` depends on unknown member `{}`",
                                        id, dep
                                    ))
                                })
                            })
                            .collect::<Result<Vec<_>>>()?;
                        check_template(id, template, dependencies.len())?;
                        let template = template.clone();
                        graph.add_dependent(ns, namer, id.clone(), dependencies, move |names| {
                            render_template(&template, names)
                        })
                    }
                };
                if member_ids.get(member.id()) != Some(&id) {
                    return Err(Error::Manifest(format!(
                        "member `{}` was not created in declaration order",
                        member.id()
                    )));
                }
                labels.insert(id, member.id().to_string());
            }
        }

        tracing::debug!(
            "Built manifest: {} namespaces, {} entities, {} roots",
            graph.namespace_count(),
            graph.named_count(),
            roots.len()
        );

        Ok(BuiltManifest {
            graph,
            roots,
            ids: member_ids.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            labels,
        })
    }

    /// Handles namespaces will receive, keyed by name
    fn namespace_ids(&self) -> Result<HashMap<&str, NamespaceId>> {
        let mut ids = HashMap::new();
        for (index, spec) in self.namespaces.iter().enumerate() {
            if ids
                .insert(spec.name.as_str(), NamespaceId::from_index(index))
                .is_some()
            {
                return Err(Error::Manifest(format!(
                    "duplicate namespace `{}`",
                    spec.name
                )));
            }
        }
        Ok(ids)
    }

    /// Handles members will receive, keyed by id. Keywords take handles too.
    fn member_ids(&self) -> Result<HashMap<&str, NamedId>> {
        let mut ids = HashMap::new();
        let mut next = 0;
        for spec in &self.namespaces {
            next += spec.keywords.len();
            for member in &spec.members {
                if ids.insert(member.id(), NamedId::from_index(next)).is_some() {
                    return Err(Error::Manifest(format!(
                        "duplicate member id `{}`",
                        member.id()
                    )));
                }
                next += 1;
            }
        }
        Ok(ids)
    }
}

/// Placeholder indices used by `template`
fn placeholders(template: &str) -> Vec<usize> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                if let Ok(index) = after[..end].parse::<usize>() {
                    found.push(index);
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    found
}

fn check_template(id: &str, template: &str, dependencies: usize) -> Result<()> {
    match placeholders(template).into_iter().find(|i| *i >= dependencies) {
        Some(index) => Err(Error::Manifest(format!(
            "member `{}` template uses {{{}}} but has {} dependencies",
            id, index, dependencies
        ))),
        None => Ok(()),
    }
}

/// Substitute `{N}` with the N-th name; anything else is kept verbatim
pub fn render_template(template: &str, names: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let substituted = after.find('}').and_then(|end| {
            let index = after[..end].parse::<usize>().ok()?;
            names.get(index).map(|name| (*name, end))
        });
        match substituted {
            Some((name, end)) => {
                out.push_str(name);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
