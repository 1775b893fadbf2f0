//! Name Resolver - Assigns names to every entity in a namespace forest
//!
//! Resolution algorithm:
//! 1. Flatten the forest (parents before children, children in insertion order)
//! 2. Assign every fixed entity its literal name
//! 3. Repeat until nothing is ready:
//!    a. Pick the first namespace whose forbidden namespaces are fully named
//!       and which has a ready member (unnamed, all dependencies named)
//!    b. Collect the names it must avoid
//!    c. Batch its ready members by naming function, then by proposed name
//!    d. Let each batch's naming function pick names and assign them
//! 4. Report anything left unnamed (a dependency cycle, or a forbidden
//!    namespace outside the resolved forest)

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::graph::NameGraph;
use super::ids::{IdMap, NamedId, NamerId, NamespaceId};
use crate::{Error, Result};

/// Knobs for a resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Also avoid names already held by the namespace's own members,
    /// including those handed out earlier in the same round.
    ///
    /// When off, a namespace only avoids what its forbidden set holds, and
    /// two batches of one round proposing the same string fail with
    /// [`Error::AssignmentConflict`] unless the namespace forbids itself.
    pub guard_own_namespace: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            guard_own_namespace: true,
        }
    }
}

/// Outcome of a resolution run
#[derive(Debug, Clone)]
pub struct Resolution {
    names: IdMap<NamedId, String>,
    unresolved: Vec<NamedId>,
    rounds: usize,
}

impl Resolution {
    /// Name assigned to an entity
    pub fn get(&self, id: NamedId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn names(&self) -> &IdMap<NamedId, String> {
        &self.names
    }

    pub fn into_names(self) -> IdMap<NamedId, String> {
        self.names
    }

    /// Assigned names in entity order
    pub fn iter(&self) -> impl Iterator<Item = (NamedId, &str)> + '_ {
        self.names.iter().map(|(id, name)| (id, name.as_str()))
    }

    /// Reachable entities that never became ready, in forest order
    pub fn unresolved(&self) -> &[NamedId] {
        &self.unresolved
    }

    /// True when every reachable entity received a name
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Number of namespace rounds the fixpoint loop ran
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

/// Entities disambiguated together by one naming-function call
#[derive(Debug)]
struct Batch {
    namer: NamerId,
    proposed: String,
    members: Vec<NamedId>,
}

/// Algorithm-local state of one run
struct NamingContext<'a> {
    graph: &'a NameGraph,
    namespaces: Vec<NamespaceId>,
    names: IdMap<NamedId, String>,
    /// Reverse index: assigned string → entities holding it
    holders: HashMap<String, Vec<NamedId>>,
}

impl<'a> NamingContext<'a> {
    fn new(graph: &'a NameGraph, namespaces: Vec<NamespaceId>) -> Self {
        Self {
            graph,
            namespaces,
            names: IdMap::with_capacity(graph.named_count()),
            holders: HashMap::new(),
        }
    }

    fn is_fully_named(&self, ns: NamespaceId) -> bool {
        self.graph[ns]
            .members()
            .iter()
            .all(|member| self.names.contains_key(*member))
    }

    /// Every forbidden namespace other than `ns` itself is fully named.
    ///
    /// A self-forbidding namespace is naming its own members right now, so
    /// it cannot wait on itself.
    fn is_eligible(&self, ns: NamespaceId) -> bool {
        self.graph[ns]
            .forbidden()
            .iter()
            .filter(|other| **other != ns)
            .all(|other| self.is_fully_named(*other))
    }

    fn ready_members(&self, ns: NamespaceId) -> Vec<NamedId> {
        self.graph[ns]
            .members()
            .iter()
            .copied()
            .filter(|member| !self.names.contains_key(*member))
            .filter(|member| self.graph[*member].is_ready(&self.names))
            .collect()
    }

    /// First eligible namespace, in forest order, that has ready members
    fn next_namespace(&self) -> Option<(NamespaceId, Vec<NamedId>)> {
        self.namespaces
            .iter()
            .copied()
            .filter(|ns| self.is_eligible(*ns))
            .map(|ns| (ns, self.ready_members(ns)))
            .find(|(_, ready)| !ready.is_empty())
    }

    fn forbidden_names(&self, ns: NamespaceId, guard_own_namespace: bool) -> HashSet<String> {
        let namespace = &self.graph[ns];
        let own = guard_own_namespace.then_some(ns);
        namespace
            .forbidden()
            .iter()
            .copied()
            .chain(own)
            .flat_map(|other| self.graph[other].members().iter().copied())
            .filter_map(|member| self.names.get(member).cloned())
            .collect()
    }

    /// Group ready members by naming function, then by proposal, keeping
    /// first-appearance order at both levels.
    fn batches(&self, ready: &[NamedId]) -> Result<Vec<Batch>> {
        let mut groups: Vec<(NamerId, Vec<(String, Vec<NamedId>)>)> = Vec::new();
        for &member in ready {
            let named = &self.graph[member];
            let Some(namer) = named.namer() else {
                continue;
            };
            let proposed = named.propose_name(&self.names)?;

            let index = match groups.iter().position(|(id, _)| *id == namer) {
                Some(index) => index,
                None => {
                    groups.push((namer, Vec::new()));
                    groups.len() - 1
                }
            };
            let by_proposal = &mut groups[index].1;
            match by_proposal.iter_mut().find(|(p, _)| *p == proposed) {
                Some((_, members)) => members.push(member),
                None => by_proposal.push((proposed, vec![member])),
            }
        }

        Ok(groups
            .into_iter()
            .flat_map(|(namer, by_proposal)| {
                by_proposal
                    .into_iter()
                    .map(move |(proposed, members)| Batch {
                        namer,
                        proposed,
                        members,
                    })
            })
            .collect())
    }

    /// Another entity holding `name` that `id` must not share it with
    fn conflicting_holder(&self, id: NamedId, name: &str) -> Option<NamedId> {
        let ns = self.graph[id].namespace();
        let namespace = &self.graph[ns];
        self.holders.get(name)?.iter().copied().find(|holder| {
            let holder_ns = self.graph[*holder].namespace();
            *holder != id && (holder_ns == ns || namespace.forbids(holder_ns))
        })
    }

    fn assign(&mut self, id: NamedId, name: String, check_conflicts: bool) -> Result<()> {
        if let Some(existing) = self.names.get(id) {
            return Err(Error::DoubleAssignment {
                entity: self.graph[id].to_string(),
                existing: existing.clone(),
                attempted: name,
            });
        }
        if check_conflicts {
            if let Some(holder) = self.conflicting_holder(id, &name) {
                return Err(Error::AssignmentConflict {
                    entity: self.graph[id].to_string(),
                    holder: self.graph[holder].to_string(),
                    name,
                });
            }
        }
        self.holders.entry(name.clone()).or_default().push(id);
        self.names.insert(id, name);
        Ok(())
    }

    fn assign_fixed(&mut self) -> Result<()> {
        let graph = self.graph;
        for ns in self.namespaces.clone() {
            for &member in graph[ns].members() {
                let named = &graph[member];
                if !named.is_fixed() {
                    continue;
                }
                let name = named.propose_name(&self.names)?;
                if let Some(holder) = self.conflicting_holder(member, &name) {
                    tracing::warn!(
                        "Fixed name `{}` of {} clashes with {}",
                        name,
                        named,
                        graph[holder]
                    );
                }
                self.assign(member, name, false)?;
            }
        }
        Ok(())
    }

    fn unresolved(&self) -> Vec<NamedId> {
        self.namespaces
            .iter()
            .flat_map(|ns| self.graph[*ns].members().iter().copied())
            .filter(|member| !self.names.contains_key(*member))
            .collect()
    }
}

/// Check a naming function's output against its contract
fn check_contract(
    batch: &Batch,
    names: &[String],
    forbidden: &HashSet<String>,
) -> Result<()> {
    if names.len() != batch.members.len() {
        return Err(Error::NamingFunctionContractViolation(format!(
            "{} returned {} names for `{}`, expected {}",
            batch.namer,
            names.len(),
            batch.proposed,
            batch.members.len()
        )));
    }
    let distinct: HashSet<&str> = names.iter().map(String::as_str).collect();
    if distinct.len() != names.len() {
        return Err(Error::NamingFunctionContractViolation(format!(
            "{} returned duplicate names for `{}`: {:?}",
            batch.namer, batch.proposed, names
        )));
    }
    if let Some(name) = names.iter().find(|name| forbidden.contains(*name)) {
        return Err(Error::NamingFunctionContractViolation(format!(
            "{} returned forbidden name `{}` for `{}`",
            batch.namer, name, batch.proposed
        )));
    }
    Ok(())
}

/// Name resolver over a fully built [`NameGraph`]
pub struct NameResolver<'a> {
    graph: &'a NameGraph,
    options: ResolveOptions,
}

impl<'a> NameResolver<'a> {
    /// Create a new resolver
    pub fn new(graph: &'a NameGraph) -> Self {
        Self {
            graph,
            options: ResolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Name every entity reachable from `roots`.
    ///
    /// A stall is not an error: the returned [`Resolution`] lists the
    /// entities that could not be named.
    pub fn resolve(&self, roots: &[NamespaceId]) -> Result<Resolution> {
        self.graph.validate()?;
        let namespaces = self.graph.flatten(roots)?;
        tracing::debug!(
            "Resolving {} namespaces from {} roots",
            namespaces.len(),
            roots.len()
        );

        let mut ctx = NamingContext::new(self.graph, namespaces);
        ctx.assign_fixed()?;

        let mut rounds = 0;
        while let Some((ns, ready)) = ctx.next_namespace() {
            rounds += 1;
            let mut forbidden = ctx.forbidden_names(ns, self.options.guard_own_namespace);
            let batches = ctx.batches(&ready)?;
            tracing::debug!(
                "Round {}: naming {} members of `{}` in {} batches",
                rounds,
                ready.len(),
                self.graph[ns].name(),
                batches.len()
            );

            for batch in batches {
                let namer = self
                    .graph
                    .get_namer(batch.namer)
                    .ok_or_else(|| Error::UnknownEntity(batch.namer.to_string()))?;
                let names = namer.name(&batch.proposed, &forbidden, batch.members.len())?;
                check_contract(&batch, &names, &forbidden)?;

                if self.options.guard_own_namespace {
                    forbidden.extend(names.iter().cloned());
                }
                for (member, name) in batch.members.iter().zip(names) {
                    ctx.assign(*member, name, true)?;
                }
            }
        }

        let unresolved = ctx.unresolved();
        if unresolved.is_empty() {
            tracing::info!("Named {} entities in {} rounds", ctx.names.len(), rounds);
        } else {
            tracing::warn!(
                "Resolution stalled with {} unnamed entities",
                unresolved.len()
            );
        }

        Ok(Resolution {
            names: ctx.names,
            unresolved,
            rounds,
        })
    }
}

/// Resolve `roots` in `graph` with default options
pub fn assign_names(graph: &NameGraph, roots: &[NamespaceId]) -> Result<Resolution> {
    NameResolver::new(graph).resolve(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::namer::{CountingNamer, Namer};

    /// Returns its proposal `count` times, ignoring everything else
    #[derive(Debug)]
    struct EchoNamer;

    impl Namer for EchoNamer {
        fn name(&self, proposed: &str, _forbidden: &HashSet<String>, count: usize) -> Result<Vec<String>> {
            Ok(vec![proposed.to_string(); count])
        }
    }

    /// Always returns a single name
    #[derive(Debug)]
    struct ShortNamer;

    impl Namer for ShortNamer {
        fn name(&self, proposed: &str, _forbidden: &HashSet<String>, _count: usize) -> Result<Vec<String>> {
            Ok(vec![proposed.to_string()])
        }
    }

    fn assert_no_forbidden_collision(graph: &NameGraph, resolution: &Resolution) {
        for (a, a_name) in resolution.iter() {
            for (b, b_name) in resolution.iter() {
                if a == b || a_name != b_name {
                    continue;
                }
                let a_ns = graph[a].namespace();
                let b_ns = graph[b].namespace();
                // Fixed names are authoritative inputs
                if graph[a].is_fixed() && graph[b].is_fixed() {
                    continue;
                }
                assert!(
                    a_ns != b_ns && !graph[a_ns].forbids(b_ns),
                    "{} and {} share `{}`",
                    graph[a],
                    graph[b],
                    a_name
                );
            }
        }
    }

    #[test]
    fn test_distinct_proposals_kept() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);
        let a = graph.add_simple(ns, namer, "Foo");
        let b = graph.add_simple(ns, namer, "Bar");
        let c = graph.add_simple(ns, namer, "Baz");

        let resolution = assign_names(&graph, &[ns]).unwrap();
        assert!(resolution.is_complete());
        assert_eq!(resolution.get(a), Some("Foo"));
        assert_eq!(resolution.get(b), Some("Bar"));
        assert_eq!(resolution.get(c), Some("Baz"));
    }

    #[test]
    fn test_same_proposal_is_batched() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);
        let a = graph.add_simple(ns, namer, "Foo");
        let b = graph.add_simple(ns, namer, "Foo");

        let resolution = assign_names(&graph, &[ns]).unwrap();
        assert_eq!(resolution.get(a), Some("Foo0"));
        assert_eq!(resolution.get(b), Some("Foo1"));
        assert_eq!(resolution.rounds(), 1);
    }

    #[test]
    fn test_fixed_name_wins_over_proposal() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.namespace("types").forbid_self().build();
        let fixed = graph.add_fixed(ns, "Type");
        let simple = graph.add_simple(ns, namer, "Type");

        let options = ResolveOptions {
            guard_own_namespace: false,
        };
        let resolution = NameResolver::new(&graph)
            .with_options(options)
            .resolve(&[ns])
            .unwrap();
        assert_eq!(resolution.get(fixed), Some("Type"));
        assert_eq!(resolution.get(simple), Some("Type_"));
    }

    #[test]
    fn test_fixed_names_are_unconditional() {
        let mut graph = NameGraph::new();
        let ns = graph.namespace("types").forbid_self().build();
        let a = graph.add_fixed(ns, "Same");
        let b = graph.add_fixed(ns, "Same");

        let resolution = assign_names(&graph, &[ns]).unwrap();
        assert_eq!(resolution.get(a), Some("Same"));
        assert_eq!(resolution.get(b), Some("Same"));
    }

    #[test]
    fn test_dependency_based_name() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);
        let foo = graph.add_simple(ns, namer, "Foo");
        let value =
            graph.add_dependent(ns, namer, "value", vec![foo], |names| format!("{}Value", names[0]));

        let resolution = assign_names(&graph, &[ns]).unwrap();
        assert_eq!(resolution.get(foo), Some("Foo"));
        assert_eq!(resolution.get(value), Some("FooValue"));
    }

    #[test]
    fn test_dependencies_resolved_first_across_namespaces() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let root = graph.add_namespace("root", None, &[]);
        let early = graph.add_namespace("early", Some(root), &[]);
        let late = graph.add_namespace("late", Some(root), &[]);

        // `early` comes first in forest order but depends on `late`
        let base_id = NamedId(graph.next_named_id().0 + 1);
        let derived = graph.add_dependent(early, namer, "derived", vec![base_id, base_id], |names| {
            names.join("And")
        });
        let base = graph.add_simple(late, namer, "Base");

        let resolution = assign_names(&graph, &[root]).unwrap();
        assert_eq!(base, base_id);
        assert_eq!(resolution.get(base), Some("Base"));
        assert_eq!(resolution.get(derived), Some("BaseAndBase"));
    }

    #[test]
    fn test_cycle_is_reported_unresolved() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);
        let free = graph.add_simple(ns, namer, "Free");
        let b_id = NamedId(graph.next_named_id().0 + 1);
        let a = graph.add_dependent(ns, namer, "a", vec![b_id], |names| names.concat());
        let b = graph.add_dependent(ns, namer, "b", vec![a], |names| names.concat());

        let resolution = assign_names(&graph, &[ns]).unwrap();
        assert!(!resolution.is_complete());
        assert_eq!(resolution.unresolved(), &[a, b]);
        assert_eq!(resolution.get(free), Some("Free"));
        assert_eq!(resolution.get(a), None);
    }

    #[test]
    fn test_forbidden_namespace_is_avoided() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let keywords = graph.add_keyword_namespace("keywords", ["type", "fn"]);
        let classes = graph.add_namespace("classes", None, &[keywords]);
        let props = graph.add_namespace("props", Some(classes), &[keywords, classes]);

        let class = graph.add_simple(classes, namer, "type");
        let prop = graph.add_simple(props, namer, "type");
        let other = graph.add_simple(props, namer, "fn");

        let resolution = assign_names(&graph, &[keywords, classes]).unwrap();
        assert!(resolution.is_complete());
        assert_eq!(resolution.get(class), Some("type_"));
        assert_eq!(resolution.get(prop), Some("type__"));
        assert_eq!(resolution.get(other), Some("fn_"));
        assert_no_forbidden_collision(&graph, &resolution);
    }

    #[test]
    fn test_forbidden_relation_does_not_protect_the_other_side() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let a = graph.add_namespace("a", None, &[]);
        let b = graph.add_namespace("b", None, &[a]);
        let in_a = graph.add_simple(a, namer, "Foo");
        let in_b = graph.add_simple(b, namer, "Foo");
        let c = graph.add_namespace("c", None, &[]);
        let in_c = graph.add_simple(c, namer, "Foo");

        let resolution = assign_names(&graph, &[a, b, c]).unwrap();
        assert_eq!(resolution.get(in_a), Some("Foo"));
        assert_eq!(resolution.get(in_b), Some("Foo_"));
        // `c` forbids nothing, so it may reuse `a`'s name
        assert_eq!(resolution.get(in_c), Some("Foo"));
    }

    #[test]
    fn test_namespace_waits_for_forbidden_namespace() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let first = graph.add_namespace("first", None, &[]);
        let second = graph.add_namespace("second", None, &[]);
        // `first` comes earlier but must wait for `second` to finish
        graph.add_namespace("unused", Some(first), &[]);
        let waiting_ns = graph.add_namespace("waiting", Some(first), &[second]);
        let waiting = graph.add_simple(waiting_ns, namer, "Name");
        let blocker = graph.add_simple(second, namer, "Name");

        let resolution = assign_names(&graph, &[first, second]).unwrap();
        assert_eq!(resolution.get(blocker), Some("Name"));
        assert_eq!(resolution.get(waiting), Some("Name_"));
    }

    #[test]
    fn test_unreachable_forbidden_namespace_stalls() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let keywords = graph.add_keyword_namespace("keywords", ["type"]);
        let ns = graph.add_namespace("types", None, &[keywords]);
        let member = graph.add_simple(ns, namer, "Foo");

        let resolution = assign_names(&graph, &[ns]).unwrap();
        assert_eq!(resolution.unresolved(), &[member]);
    }

    #[test]
    fn test_cross_batch_collision_guarded() {
        let mut graph = NameGraph::new();
        let first = graph.add_namer(CountingNamer::default());
        let second = graph.add_namer(CountingNamer::new('x'));
        let ns = graph.add_namespace("types", None, &[]);
        let a = graph.add_simple(ns, first, "Foo");
        let b = graph.add_simple(ns, second, "Foo");

        let resolution = assign_names(&graph, &[ns]).unwrap();
        assert_eq!(resolution.get(a), Some("Foo"));
        assert_eq!(resolution.get(b), Some("Foox"));
    }

    #[test]
    fn test_cross_batch_collision_unguarded_is_conflict() {
        let mut graph = NameGraph::new();
        let first = graph.add_namer(CountingNamer::default());
        let second = graph.add_namer(CountingNamer::new('x'));
        let ns = graph.add_namespace("types", None, &[]);
        graph.add_simple(ns, first, "Foo");
        graph.add_simple(ns, second, "Foo");

        let options = ResolveOptions {
            guard_own_namespace: false,
        };
        let result = NameResolver::new(&graph).with_options(options).resolve(&[ns]);
        assert!(matches!(result, Err(Error::AssignmentConflict { .. })));
    }

    #[test]
    fn test_later_round_avoids_own_members() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[]);
        let foo = graph.add_simple(ns, namer, "Foo");
        // Proposes "Foo" as well, but only becomes ready in the second round
        let echo = graph.add_dependent(ns, namer, "echo", vec![foo], |names| names[0].to_string());

        let resolution = assign_names(&graph, &[ns]).unwrap();
        assert_eq!(resolution.rounds(), 2);
        assert_eq!(resolution.get(foo), Some("Foo"));
        assert_eq!(resolution.get(echo), Some("Foo_"));
    }

    #[test]
    fn test_duplicate_names_violate_contract() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(EchoNamer);
        let ns = graph.add_namespace("types", None, &[]);
        graph.add_simple(ns, namer, "Foo");
        graph.add_simple(ns, namer, "Foo");

        let result = assign_names(&graph, &[ns]);
        assert!(matches!(result, Err(Error::NamingFunctionContractViolation(_))));
    }

    #[test]
    fn test_forbidden_name_violates_contract() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(EchoNamer);
        let keywords = graph.add_keyword_namespace("keywords", ["type"]);
        let ns = graph.add_namespace("types", None, &[keywords]);
        graph.add_simple(ns, namer, "type");

        let result = assign_names(&graph, &[keywords, ns]);
        assert!(matches!(result, Err(Error::NamingFunctionContractViolation(_))));
    }

    #[test]
    fn test_wrong_count_violates_contract() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(ShortNamer);
        let ns = graph.add_namespace("types", None, &[]);
        graph.add_simple(ns, namer, "Foo");
        graph.add_simple(ns, namer, "Foo");

        let result = assign_names(&graph, &[ns]);
        assert!(matches!(result, Err(Error::NamingFunctionContractViolation(_))));
    }

    #[test]
    fn test_totality_and_determinism() {
        fn build() -> (NameGraph, Vec<NamespaceId>) {
            let mut graph = NameGraph::new();
            let namer = graph.add_namer(CountingNamer::default());
            let keywords = graph.add_keyword_namespace("keywords", ["class", "Object"]);
            let global = graph.namespace("global").forbid(keywords).forbid_self().build();
            let mut classes = Vec::new();
            for proposal in ["Object", "Person", "Person", "Address"] {
                classes.push(graph.add_simple(global, namer, proposal));
            }
            for (i, class) in classes.iter().enumerate() {
                let props = graph
                    .namespace(format!("props{i}"))
                    .parent(global)
                    .forbid(keywords)
                    .build();
                let name = graph.add_simple(props, namer, "name");
                graph.add_simple(props, namer, "name");
                graph.add_dependent(props, namer, "getter", vec![*class, name], |names| {
                    format!("get{}{}", names[0], names[1])
                });
            }
            (graph, vec![keywords, global])
        }

        let (graph, roots) = build();
        let first = assign_names(&graph, &roots).unwrap();
        assert!(first.is_complete());
        assert_eq!(first.names().len(), graph.named_count());
        assert_no_forbidden_collision(&graph, &first);

        let (graph, roots) = build();
        let second = assign_names(&graph, &roots).unwrap();
        assert_eq!(first.names(), second.names());
    }

    #[test]
    fn test_dangling_forbidden_namespace_is_error() {
        let mut graph = NameGraph::new();
        let namer = graph.add_namer(CountingNamer::default());
        let ns = graph.add_namespace("types", None, &[NamespaceId(99)]);
        graph.add_simple(ns, namer, "Foo");

        let result = assign_names(&graph, &[ns]);
        assert!(matches!(result, Err(Error::UnknownEntity(_))));
    }

    #[test]
    fn test_unknown_root_is_error() {
        let graph = NameGraph::new();
        let result = assign_names(&graph, &[NamespaceId(3)]);
        assert!(matches!(result, Err(Error::UnknownEntity(_))));
    }
}
