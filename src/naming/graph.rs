//! Name graph data structure
//!
//! The name graph tracks:
//! - Namespace hierarchy (parent/child relationships, insertion ordered)
//! - Named entities owned by each namespace
//! - Directed "forbidden" relations between namespaces
//! - Registered naming functions
//!
//! Everything is stored in arenas and referenced by handle, so identity is
//! the handle and never the display name.

use std::fmt;
use std::ops::Index;

use super::ids::{EntityId, IdMap, IdSet, NamedId, NamerId, NamespaceId};
use super::namer::Namer;
use crate::{Error, Result};

/// Combines the resolved names of a dependency-based entity's dependencies
/// (in declaration order, duplicates preserved) into a proposed name.
pub type Combiner = Box<dyn Fn(&[&str]) -> String + Send + Sync>;

/// A scope that owns named entities and child namespaces
#[derive(Debug)]
pub struct Namespace {
    id: NamespaceId,
    /// Display name, diagnostics only
    name: String,
    parent: Option<NamespaceId>,
    children: Vec<NamespaceId>,
    members: Vec<NamedId>,
    /// Namespaces whose assigned names members of this one must avoid
    forbidden: IdSet<NamespaceId>,
}

impl Namespace {
    pub fn id(&self) -> NamespaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NamespaceId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Child namespaces in insertion order
    pub fn children(&self) -> &[NamespaceId] {
        &self.children
    }

    /// Member entities in insertion order
    pub fn members(&self) -> &[NamedId] {
        &self.members
    }

    pub fn forbidden(&self) -> &[NamespaceId] {
        self.forbidden.as_slice()
    }

    /// Whether members of this namespace must avoid names held in `other`.
    ///
    /// The relation is directed: `a.forbids(b)` says nothing about `b.forbids(a)`.
    pub fn forbids(&self, other: NamespaceId) -> bool {
        self.forbidden.contains(other)
    }

    fn add(&mut self, member: NamedId) {
        self.members.push(member);
    }
}

/// How a named entity arrives at its name
pub enum NamedKind {
    /// The name is an authoritative input
    Fixed(String),
    /// A single context-free proposal
    Simple(String),
    /// A proposal computed from the resolved names of other entities
    DependencyBased {
        dependencies: Vec<NamedId>,
        combine: Combiner,
    },
}

impl fmt::Debug for NamedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedKind::Fixed(name) => f.debug_tuple("Fixed").field(name).finish(),
            NamedKind::Simple(proposed) => f.debug_tuple("Simple").field(proposed).finish(),
            NamedKind::DependencyBased { dependencies, .. } => f
                .debug_struct("DependencyBased")
                .field("dependencies", dependencies)
                .finish_non_exhaustive(),
        }
    }
}

/// An entity requiring an assigned name
#[derive(Debug)]
pub struct Named {
    id: NamedId,
    namespace: NamespaceId,
    /// Diagnostic name
    name: String,
    /// Absent exactly when the entity is fixed
    namer: Option<NamerId>,
    kind: NamedKind,
}

impl Named {
    pub fn id(&self) -> NamedId {
        self.id
    }

    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namer(&self) -> Option<NamerId> {
        self.namer
    }

    pub fn kind(&self) -> &NamedKind {
        &self.kind
    }

    pub fn is_fixed(&self) -> bool {
        self.namer.is_none()
    }

    /// Entities whose names feed this entity's proposal. Order matters and
    /// duplicates are kept.
    pub fn dependencies(&self) -> &[NamedId] {
        match &self.kind {
            NamedKind::DependencyBased { dependencies, .. } => dependencies,
            NamedKind::Fixed(_) | NamedKind::Simple(_) => &[],
        }
    }

    /// Whether every dependency already has a name in `names`
    pub fn is_ready(&self, names: &IdMap<NamedId, String>) -> bool {
        self.dependencies().iter().all(|dep| names.contains_key(*dep))
    }

    /// Compute this entity's candidate name from the current assignments.
    pub fn propose_name(&self, names: &IdMap<NamedId, String>) -> Result<String> {
        match &self.kind {
            NamedKind::Fixed(name) => Ok(name.clone()),
            NamedKind::Simple(proposed) => Ok(proposed.clone()),
            NamedKind::DependencyBased {
                dependencies,
                combine,
            } => {
                let resolved = dependencies
                    .iter()
                    .map(|dep| {
                        names.get(*dep).map(String::as_str).ok_or_else(|| {
                            Error::DependencyNotResolved {
                                entity: self.to_string(),
                                dependency: dep.to_string(),
                            }
                        })
                    })
                    .collect::<Result<Vec<&str>>>()?;
                Ok(combine(&resolved))
            }
        }
    }
}

impl fmt::Display for Named {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` ({})", self.name, self.id)
    }
}

/// Arena of namespaces, named entities and naming functions
#[derive(Debug, Default)]
pub struct NameGraph {
    namespaces: Vec<Namespace>,
    named: Vec<Named>,
    namers: Vec<Box<dyn Namer>>,
}

impl NameGraph {
    /// Create a new empty name graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a namespace
    pub fn namespace(&mut self, name: impl Into<String>) -> NamespaceBuilder<'_> {
        NamespaceBuilder {
            graph: self,
            name: name.into(),
            parent: None,
            forbidden: Vec::new(),
            forbid_self: false,
        }
    }

    /// Create a namespace with the given parent and forbidden set
    pub fn add_namespace(
        &mut self,
        name: impl Into<String>,
        parent: Option<NamespaceId>,
        forbidden: &[NamespaceId],
    ) -> NamespaceId {
        let mut builder = self.namespace(name).forbid_all(forbidden.iter().copied());
        if let Some(parent) = parent {
            builder = builder.parent(parent);
        }
        builder.build()
    }

    /// Create a root namespace holding one fixed entity per keyword.
    ///
    /// Working namespaces list it as forbidden so emitted identifiers never
    /// collide with reserved words.
    pub fn add_keyword_namespace<I, S>(&mut self, name: impl Into<String>, keywords: I) -> NamespaceId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ns = self.add_namespace(name, None, &[]);
        for keyword in keywords {
            self.add_fixed(ns, keyword);
        }
        ns
    }

    /// Register a naming function
    pub fn add_namer(&mut self, namer: impl Namer + 'static) -> NamerId {
        let id = NamerId::from_index(self.namers.len());
        self.namers.push(Box::new(namer));
        id
    }

    /// Add an entity whose name is given verbatim
    pub fn add_fixed(&mut self, namespace: NamespaceId, name: impl Into<String>) -> NamedId {
        let name = name.into();
        self.push_named(namespace, name.clone(), None, NamedKind::Fixed(name))
    }

    /// Add an entity with one context-free proposal
    pub fn add_simple(
        &mut self,
        namespace: NamespaceId,
        namer: NamerId,
        proposed: impl Into<String>,
    ) -> NamedId {
        let proposed = proposed.into();
        self.push_named(
            namespace,
            proposed.clone(),
            Some(namer),
            NamedKind::Simple(proposed),
        )
    }

    /// Add an entity whose proposal is computed from its dependencies' names
    pub fn add_dependent<F>(
        &mut self,
        namespace: NamespaceId,
        namer: NamerId,
        name: impl Into<String>,
        dependencies: Vec<NamedId>,
        combine: F,
    ) -> NamedId
    where
        F: Fn(&[&str]) -> String + Send + Sync + 'static,
    {
        self.push_named(
            namespace,
            name.into(),
            Some(namer),
            NamedKind::DependencyBased {
                dependencies,
                combine: Box::new(combine),
            },
        )
    }

    /// The handle the next added entity will receive.
    ///
    /// Lets builders wire a dependency on an entity that is declared later.
    pub fn next_named_id(&self) -> NamedId {
        NamedId::from_index(self.named.len())
    }

    fn push_named(
        &mut self,
        namespace: NamespaceId,
        name: String,
        namer: Option<NamerId>,
        kind: NamedKind,
    ) -> NamedId {
        let id = self.next_named_id();
        self.named.push(Named {
            id,
            namespace,
            name,
            namer,
            kind,
        });
        // An unknown namespace leaves the entity orphaned; `validate` reports it
        if let Some(ns) = self.namespaces.get_mut(namespace.index()) {
            ns.add(id);
        }
        id
    }

    pub fn get_namespace(&self, id: NamespaceId) -> Option<&Namespace> {
        self.namespaces.get(id.index())
    }

    pub fn get_named(&self, id: NamedId) -> Option<&Named> {
        self.named.get(id.index())
    }

    pub fn get_namer(&self, id: NamerId) -> Option<&dyn Namer> {
        self.namers.get(id.index()).map(|namer| namer.as_ref())
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    pub fn named(&self) -> impl Iterator<Item = &Named> {
        self.named.iter()
    }

    /// Namespaces without a parent, in creation order
    pub fn roots(&self) -> Vec<NamespaceId> {
        self.namespaces
            .iter()
            .filter(|ns| ns.is_root())
            .map(Namespace::id)
            .collect()
    }

    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }

    pub fn named_count(&self) -> usize {
        self.named.len()
    }

    /// Check that every referenced handle exists in this graph
    pub fn validate(&self) -> Result<()> {
        for ns in &self.namespaces {
            if let Some(parent) = ns.parent {
                if self.get_namespace(parent).is_none() {
                    return Err(Error::UnknownEntity(format!(
                        "namespace `{}` has missing parent {}",
                        ns.name, parent
                    )));
                }
            }
            if let Some(forbidden) = ns.forbidden().iter().find(|f| self.get_namespace(**f).is_none()) {
                return Err(Error::UnknownEntity(format!(
                    "namespace `{}` forbids missing {}",
                    ns.name, forbidden
                )));
            }
        }
        for named in &self.named {
            if self.get_namespace(named.namespace).is_none() {
                return Err(Error::UnknownEntity(format!(
                    "{} belongs to missing {}",
                    named, named.namespace
                )));
            }
            if let Some(namer) = named.namer {
                if self.get_namer(namer).is_none() {
                    return Err(Error::UnknownEntity(format!(
                        "{} uses unregistered {}",
                        named, namer
                    )));
                }
            }
            for dep in named.dependencies() {
                if self.get_named(*dep).is_none() {
                    return Err(Error::UnknownEntity(format!(
                        "{} depends on missing {}",
                        named, dep
                    )));
                }
            }
        }
        Ok(())
    }

    /// Every namespace reachable from `roots`: parents before children,
    /// children in insertion order, each namespace once.
    pub fn flatten(&self, roots: &[NamespaceId]) -> Result<Vec<NamespaceId>> {
        let mut seen = IdSet::new();
        let mut stack: Vec<NamespaceId> = roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let ns = self
                .get_namespace(id)
                .ok_or_else(|| Error::UnknownEntity(id.to_string()))?;
            if !seen.insert(id) {
                continue;
            }
            stack.extend(ns.children.iter().rev().copied());
        }
        Ok(seen.as_slice().to_vec())
    }
}

impl Index<NamespaceId> for NameGraph {
    type Output = Namespace;

    fn index(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }
}

impl Index<NamedId> for NameGraph {
    type Output = Named;

    fn index(&self, id: NamedId) -> &Named {
        &self.named[id.index()]
    }
}

/// Builder for a namespace; the parent and forbidden set are fixed once
/// [`build`](Self::build) runs.
pub struct NamespaceBuilder<'g> {
    graph: &'g mut NameGraph,
    name: String,
    parent: Option<NamespaceId>,
    forbidden: Vec<NamespaceId>,
    forbid_self: bool,
}

impl NamespaceBuilder<'_> {
    pub fn parent(mut self, parent: NamespaceId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Members must avoid names assigned in `other`
    pub fn forbid(mut self, other: NamespaceId) -> Self {
        self.forbidden.push(other);
        self
    }

    pub fn forbid_all(mut self, others: impl IntoIterator<Item = NamespaceId>) -> Self {
        self.forbidden.extend(others);
        self
    }

    /// Members must also avoid names already assigned to their siblings
    pub fn forbid_self(mut self) -> Self {
        self.forbid_self = true;
        self
    }

    pub fn build(self) -> NamespaceId {
        let id = NamespaceId::from_index(self.graph.namespaces.len());
        let mut forbidden: IdSet<NamespaceId> = self.forbidden.into_iter().collect();
        if self.forbid_self {
            forbidden.insert(id);
        }
        self.graph.namespaces.push(Namespace {
            id,
            name: self.name,
            parent: self.parent,
            children: Vec::new(),
            members: Vec::new(),
            forbidden,
        });
        // An unknown parent is kept as-is and rejected by `validate`
        if let Some(parent) = self.parent {
            if let Some(parent_ns) = self.graph.namespaces.get_mut(parent.index()) {
                parent_ns.children.push(id);
            }
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::namer::CountingNamer;

    #[test]
    fn test_namespace_hierarchy() {
        let mut graph = NameGraph::new();
        let root = graph.add_namespace("global", None, &[]);
        let a = graph.add_namespace("a", Some(root), &[]);
        let b = graph.add_namespace("b", Some(root), &[]);
        let c = graph.add_namespace("c", Some(a), &[]);

        assert!(graph[root].is_root());
        assert_eq!(graph[root].children(), &[a, b]);
        assert_eq!(graph[a].children(), &[c]);
        assert_eq!(graph[c].parent(), Some(a));
        assert_eq!(graph.roots(), vec![root]);
    }

    #[test]
    fn test_namespaces_compare_by_identity() {
        let mut graph = NameGraph::new();
        let first = graph.add_namespace("same", None, &[]);
        let second = graph.add_namespace("same", None, &[]);
        assert_ne!(first, second);
        assert_eq!(graph[first].name(), graph[second].name());
    }

    #[test]
    fn test_forbidden_relation_is_directed() {
        let mut graph = NameGraph::new();
        let keywords = graph.add_keyword_namespace("keywords", ["type", "fn"]);
        let types = graph.namespace("types").forbid(keywords).forbid(keywords).build();
        let mutual = graph.namespace("mutual").forbid_self().build();

        assert!(graph[types].forbids(keywords));
        assert!(!graph[keywords].forbids(types));
        assert_eq!(graph[types].forbidden(), &[keywords]);
        assert!(graph[mutual].forbids(mutual));
        assert_eq!(graph[keywords].members().len(), 2);
    }

    #[test]
    fn test_members_register_with_namespace() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);

        let fixed = graph.add_fixed(ns, "Type");
        let simple = graph.add_simple(ns, namer, "Foo");
        let dependent =
            graph.add_dependent(ns, namer, "FooValue", vec![simple, simple], |names| names.concat());

        assert_eq!(graph[ns].members(), &[fixed, simple, dependent]);
        assert!(graph[fixed].is_fixed());
        assert!(!graph[simple].is_fixed());
        assert_eq!(graph[dependent].dependencies(), &[simple, simple]);
        assert!(graph[simple].dependencies().is_empty());
    }

    #[test]
    fn test_propose_name() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);
        let foo = graph.add_simple(ns, namer, "Foo");
        let value =
            graph.add_dependent(ns, namer, "value", vec![foo], |names| format!("{}Value", names[0]));

        let mut names = IdMap::new();
        assert!(!graph[value].is_ready(&names));
        assert!(matches!(
            graph[value].propose_name(&names),
            Err(Error::DependencyNotResolved { .. })
        ));

        names.insert(foo, "Foo".to_string());
        assert!(graph[value].is_ready(&names));
        assert_eq!(graph[value].propose_name(&names).unwrap(), "FooValue");
        assert_eq!(graph[foo].propose_name(&names).unwrap(), "Foo");
    }

    #[test]
    fn test_flatten_is_preorder_and_deduplicated() {
        let mut graph = NameGraph::new();
        let root = graph.add_namespace("root", None, &[]);
        let a = graph.add_namespace("a", Some(root), &[]);
        let a1 = graph.add_namespace("a1", Some(a), &[]);
        let b = graph.add_namespace("b", Some(root), &[]);
        let other = graph.add_namespace("other", None, &[]);

        let flat = graph.flatten(&[root, a, other]).unwrap();
        assert_eq!(flat, vec![root, a, a1, b, other]);
    }

    #[test]
    fn test_validate_rejects_dangling_dependency() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);
        let missing = NamedId(42);
        graph.add_dependent(ns, namer, "broken", vec![missing], |names| names.concat());

        assert!(matches!(graph.validate(), Err(Error::UnknownEntity(_))));
    }

    #[test]
    fn test_validate_rejects_dangling_namespace_handles() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[NamespaceId(99)]);
        graph.add_simple(ns, namer, "Foo");
        assert!(matches!(graph.validate(), Err(Error::UnknownEntity(_))));

        let mut graph = NameGraph::new();
        graph.add_namespace("orphan", Some(NamespaceId(7)), &[]);
        assert!(matches!(graph.validate(), Err(Error::UnknownEntity(_))));

        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        graph.add_namespace("types", None, &[]);
        graph.add_simple(NamespaceId(42), namer, "Foo");
        assert!(matches!(graph.validate(), Err(Error::UnknownEntity(_))));
    }

    #[test]
    fn test_forward_reference_via_next_id() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);
        let b_id = NamedId(graph.next_named_id().0 + 1);
        let a = graph.add_dependent(ns, namer, "a", vec![b_id], |names| names.concat());
        let b = graph.add_dependent(ns, namer, "b", vec![a], |names| names.concat());

        assert_eq!(b, b_id);
        assert!(graph.validate().is_ok());
    }
}
