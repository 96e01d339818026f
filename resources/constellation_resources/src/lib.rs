//! The [`Constellation`] aggregate: every node, connection, lead and subplot
//! of the active mystery, plus the discovery operations that mutate it.
//!
//! Discovery is deliberately permissive - the constellation is a passive
//! state container and notifier, not an enforcement engine. Requirement
//! edges exist for the presentation walk; whether a node may be discovered
//! is decided by the gameplay code that sends the request, unless the
//! optional [`RequirementGating::Enforced`] policy is switched on.

mod settings;
mod validate;

pub use settings::{ConstellationSettings, RequirementGating};
pub use validate::ReferenceViolation;

use {
    bevy::{platform::collections::HashMap, prelude::*},
    constellation_components::{
        Connection, LeadPhase, MiniMystery, MysteryLead, MysteryNode, ScriptedEvent,
    },
    thiserror::Error,
};

/// Why a node discovery did not yield a node. All variants are soft
/// failures: the observer layer reports them on the diagnostic channel and
/// carries on, so a missed interaction can never end a play session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoverError {
    #[error("node key is not defined")]
    KeyNotSupplied,
    #[error("no node found that correlates to key `{0}`")]
    UnknownKey(String),
    #[error("node `{0}` already discovered")]
    AlreadyDiscovered(String),
    /// Only reachable under [`RequirementGating::Enforced`].
    #[error("node `{key}` requires `{missing}` to be discovered first")]
    RequirementNotMet { key: String, missing: String },
}

/// Soft failures of the lead state machine, mirroring [`DiscoverError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeadError {
    #[error("lead id is not defined")]
    IdNotSupplied,
    #[error("no lead found that correlates to id `{0}`")]
    UnknownId(String),
    #[error("lead `{0}` already discovered")]
    AlreadyDiscovered(String),
    #[error("lead `{0}` already solved")]
    AlreadySolved(String),
}

/// Aggregate root owning the whole mystery graph for the running session.
///
/// Nothing outside this resource mutates node or lead state; gameplay code
/// goes through the discovery operations so the unlock side effects can fire
/// exactly once per transition.
#[derive(Resource, Default, Debug, Reflect)]
#[reflect(Resource)]
pub struct Constellation {
    nodes: HashMap<String, MysteryNode>,
    connections: Vec<Connection>,
    leads: Vec<MysteryLead>,
    mini_mysteries: HashMap<String, MiniMystery>,
    scripted_events: HashMap<String, ScriptedEvent>,
    /// Keys of evidence nodes found so far, in discovery order.
    found_evidence: Vec<String>,
    /// Scripted events that already fired; each fires at most once.
    fired_events: Vec<String>,
}

impl Constellation {
    pub fn new(
        nodes: HashMap<String, MysteryNode>,
        connections: Vec<Connection>,
        leads: Vec<MysteryLead>,
        mini_mysteries: HashMap<String, MiniMystery>,
        scripted_events: HashMap<String, ScriptedEvent>,
    ) -> Self {
        Self {
            nodes,
            connections,
            leads,
            mini_mysteries,
            scripted_events,
            found_evidence: Vec::new(),
            fired_events: Vec::new(),
        }
    }

    /// Marks the node behind `key` as discovered.
    ///
    /// On the first discovery the node is returned so the caller can act on
    /// its content; every failure kind comes back as a [`DiscoverError`] and
    /// leaves the constellation untouched. Requirement edges are only
    /// consulted under [`RequirementGating::Enforced`].
    pub fn discover_node(
        &mut self,
        key: &str,
        gating: RequirementGating,
    ) -> Result<&MysteryNode, DiscoverError> {
        if key.is_empty() {
            return Err(DiscoverError::KeyNotSupplied);
        }
        let Some(node) = self.nodes.get(key) else {
            return Err(DiscoverError::UnknownKey(key.to_string()));
        };

        if gating == RequirementGating::Enforced
            && let Some(missing) = node.requires.iter().find(|req| !self.is_discovered(req))
        {
            return Err(DiscoverError::RequirementNotMet {
                key: key.to_string(),
                missing: missing.clone(),
            });
        }

        let Some(node) = self.nodes.get_mut(key) else {
            return Err(DiscoverError::UnknownKey(key.to_string()));
        };
        if node.discover() {
            return Err(DiscoverError::AlreadyDiscovered(key.to_string()));
        }
        let is_evidence = node.is_evidence();

        if is_evidence {
            self.found_evidence.push(key.to_string());
        }

        Ok(&self.nodes[key])
    }

    /// Moves the lead behind `id` from Unseen to Discovered.
    pub fn discover_lead(&mut self, id: &str) -> Result<&MysteryLead, LeadError> {
        if id.is_empty() {
            return Err(LeadError::IdNotSupplied);
        }
        let lead = self
            .leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or_else(|| LeadError::UnknownId(id.to_string()))?;
        if lead.discover() {
            return Err(LeadError::AlreadyDiscovered(id.to_string()));
        }
        Ok(lead)
    }

    /// Marks the lead behind `id` as solved, discovering it first if needed.
    /// Returns the phase the lead was in before, so the observer layer can
    /// still announce the discovery when solving skipped over it.
    pub fn solve_lead(&mut self, id: &str) -> Result<LeadPhase, LeadError> {
        if id.is_empty() {
            return Err(LeadError::IdNotSupplied);
        }
        let lead = self
            .leads
            .iter_mut()
            .find(|lead| lead.id == id)
            .ok_or_else(|| LeadError::UnknownId(id.to_string()))?;
        match lead.solve() {
            LeadPhase::Solved => Err(LeadError::AlreadySolved(id.to_string())),
            previous => Ok(previous),
        }
    }

    /// Scripted events set off by discovering `node_key`, each returned once
    /// across the whole session.
    pub fn take_triggered_events(&mut self, node_key: &str) -> Vec<String> {
        let mut triggered: Vec<String> = self
            .scripted_events
            .iter()
            .filter(|(id, event)| {
                !self.fired_events.contains(*id)
                    && event.triggers.iter().any(|trigger| trigger == node_key)
            })
            .map(|(id, _)| id.clone())
            .collect();
        triggered.sort();
        self.fired_events.extend(triggered.iter().cloned());
        triggered
    }

    pub fn node(&self, key: &str) -> Option<&MysteryNode> {
        self.nodes.get(key)
    }

    pub fn is_discovered(&self, key: &str) -> bool {
        self.nodes.get(key).is_some_and(|node| node.discovered)
    }

    pub fn lead(&self, id: &str) -> Option<&MysteryLead> {
        self.leads.iter().find(|lead| lead.id == id)
    }

    pub fn mini_mystery(&self, key: &str) -> Option<&MiniMystery> {
        self.mini_mysteries.get(key)
    }

    pub fn scripted_event(&self, id: &str) -> Option<&ScriptedEvent> {
        self.scripted_events.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&String, &MysteryNode)> {
        self.nodes.iter()
    }

    /// Edges for the presentation walk, prerequisite first.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn leads(&self) -> &[MysteryLead] {
        &self.leads
    }

    pub fn mini_mysteries(&self) -> impl Iterator<Item = (&String, &MiniMystery)> {
        self.mini_mysteries.iter()
    }

    pub fn found_evidence(&self) -> &[String] {
        &self.found_evidence
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// How much of the mystery has been uncovered, as discovered nodes plus
    /// discovered leads over the total of both. 0.0 for an empty mystery.
    pub fn confidence_score(&self) -> f32 {
        let total = self.nodes.len() + self.leads.len();
        if total == 0 {
            return 0.0;
        }
        let progress = self.nodes.values().filter(|node| node.discovered).count()
            + self.leads.iter().filter(|lead| lead.is_discovered()).count();
        progress as f32 / total as f32
    }
}

#[cfg(test)]
mod tests {
    use {super::*, constellation_components::NodeKind};

    fn node(kind: NodeKind, requires: &[&str]) -> MysteryNode {
        MysteryNode {
            title: "title".into(),
            description: "description".into(),
            subtype: None,
            kind,
            requires: requires.iter().map(|key| key.to_string()).collect(),
            discovered: false,
        }
    }

    fn two_node_constellation() -> Constellation {
        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), node(NodeKind::Info, &[]));
        nodes.insert(
            "b".to_string(),
            node(
                NodeKind::Evidence {
                    placement: None,
                    barrier: None,
                },
                &["a"],
            ),
        );
        Constellation::new(
            nodes,
            vec![Connection {
                from: "a".into(),
                to: "b".into(),
            }],
            Vec::new(),
            HashMap::new(),
            HashMap::new(),
        )
    }

    #[test]
    fn discovery_is_idempotent() {
        let mut constellation = two_node_constellation();

        let first = constellation.discover_node("a", RequirementGating::Permissive);
        assert!(first.is_ok());

        let second = constellation.discover_node("a", RequirementGating::Permissive);
        assert_eq!(
            second.unwrap_err(),
            DiscoverError::AlreadyDiscovered("a".into())
        );
        assert!(constellation.is_discovered("a"));
    }

    #[test]
    fn unknown_key_mutates_nothing() {
        let mut constellation = two_node_constellation();

        let result = constellation.discover_node("ghost", RequirementGating::Permissive);
        assert_eq!(result.unwrap_err(), DiscoverError::UnknownKey("ghost".into()));
        assert!(!constellation.is_discovered("a"));
        assert!(!constellation.is_discovered("b"));
    }

    #[test]
    fn empty_key_is_distinguished_from_unknown() {
        let mut constellation = two_node_constellation();
        assert_eq!(
            constellation
                .discover_node("", RequirementGating::Permissive)
                .unwrap_err(),
            DiscoverError::KeyNotSupplied
        );
    }

    #[test]
    fn requirements_are_not_enforced_by_default() {
        let mut constellation = two_node_constellation();

        // b requires a, yet discovering b first succeeds: gating is the
        // caller's job unless asked for.
        assert!(constellation
            .discover_node("b", RequirementGating::Permissive)
            .is_ok());
        assert!(constellation.is_discovered("b"));
        assert!(!constellation.is_discovered("a"));
    }

    #[test]
    fn enforced_gating_refuses_out_of_order_discovery() {
        let mut constellation = two_node_constellation();

        assert_eq!(
            constellation
                .discover_node("b", RequirementGating::Enforced)
                .unwrap_err(),
            DiscoverError::RequirementNotMet {
                key: "b".into(),
                missing: "a".into(),
            }
        );
        assert!(!constellation.is_discovered("b"));

        constellation
            .discover_node("a", RequirementGating::Enforced)
            .unwrap();
        assert!(constellation
            .discover_node("b", RequirementGating::Enforced)
            .is_ok());
    }

    #[test]
    fn evidence_discovery_fills_the_ledger() {
        let mut constellation = two_node_constellation();

        constellation
            .discover_node("a", RequirementGating::Permissive)
            .unwrap();
        assert!(constellation.found_evidence().is_empty(), "info node is not evidence");

        constellation
            .discover_node("b", RequirementGating::Permissive)
            .unwrap();
        assert_eq!(constellation.found_evidence(), ["b".to_string()]);
    }

    #[test]
    fn mini_mysteries_are_never_mutated_by_discovery() {
        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), node(NodeKind::Info, &[]));
        nodes.insert("b".to_string(), node(NodeKind::Info, &[]));
        let mut minis = HashMap::new();
        minis.insert(
            "smuggling".to_string(),
            MiniMystery {
                name: "The Smuggling Ring".into(),
                description: "Something moves through the luggage car.".into(),
                entry_points: vec!["a".into()],
                key_nodes: vec!["a".into(), "b".into()],
                revelation: "The porter was in on it.".into(),
            },
        );
        let mut constellation =
            Constellation::new(nodes, Vec::new(), Vec::new(), minis, HashMap::new());

        let before = constellation.mini_mystery("smuggling").unwrap().clone();
        constellation
            .discover_node("a", RequirementGating::Permissive)
            .unwrap();
        constellation
            .discover_node("b", RequirementGating::Permissive)
            .unwrap();
        let after = constellation.mini_mystery("smuggling").unwrap();

        assert_eq!(before.key_nodes, after.key_nodes);
        assert_eq!(before.revelation, after.revelation);
    }

    #[test]
    fn scripted_events_fire_at_most_once() {
        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), node(NodeKind::Info, &[]));
        let mut events = HashMap::new();
        events.insert(
            "conductor_moves".to_string(),
            ScriptedEvent {
                character: Some("conductor".into()),
                triggers: vec!["a".into(), "b".into()],
                description: Some("The conductor relocates to the dining car.".into()),
            },
        );
        let mut constellation =
            Constellation::new(nodes, Vec::new(), Vec::new(), HashMap::new(), events);

        assert_eq!(
            constellation.take_triggered_events("a"),
            vec!["conductor_moves".to_string()]
        );
        assert!(constellation.take_triggered_events("a").is_empty());
        assert!(
            constellation.take_triggered_events("b").is_empty(),
            "a second trigger key must not re-fire the event"
        );
    }

    #[test]
    fn lead_operations_report_soft_failures() {
        let leads = vec![MysteryLead {
            id: "lead_glove".into(),
            question: "Whose glove?".into(),
            inside: "node_glove".into(),
            answer: "node_maid".into(),
            terminal: "node_berth".into(),
            phase: Default::default(),
        }];
        let mut constellation =
            Constellation::new(HashMap::new(), Vec::new(), leads, HashMap::new(), HashMap::new());

        assert_eq!(
            constellation.discover_lead("").unwrap_err(),
            LeadError::IdNotSupplied
        );
        assert_eq!(
            constellation.discover_lead("nope").unwrap_err(),
            LeadError::UnknownId("nope".into())
        );

        assert!(constellation.discover_lead("lead_glove").is_ok());
        assert_eq!(
            constellation.discover_lead("lead_glove").unwrap_err(),
            LeadError::AlreadyDiscovered("lead_glove".into())
        );

        assert_eq!(
            constellation.solve_lead("lead_glove").unwrap(),
            LeadPhase::Discovered
        );
        assert_eq!(
            constellation.solve_lead("lead_glove").unwrap_err(),
            LeadError::AlreadySolved("lead_glove".into())
        );
    }

    #[test]
    fn solving_an_unseen_lead_reports_the_skipped_phase() {
        let leads = vec![MysteryLead {
            id: "lead_glove".into(),
            question: "Whose glove?".into(),
            inside: "node_glove".into(),
            answer: "node_maid".into(),
            terminal: "node_berth".into(),
            phase: Default::default(),
        }];
        let mut constellation =
            Constellation::new(HashMap::new(), Vec::new(), leads, HashMap::new(), HashMap::new());

        assert_eq!(
            constellation.solve_lead("lead_glove").unwrap(),
            LeadPhase::Unseen
        );
        assert!(constellation.lead("lead_glove").unwrap().is_discovered());
        assert_eq!(
            constellation.discover_lead("lead_glove").unwrap_err(),
            LeadError::AlreadyDiscovered("lead_glove".into())
        );
    }

    #[test]
    fn confidence_score_tracks_nodes_and_leads() {
        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), node(NodeKind::Info, &[]));
        let leads = vec![MysteryLead {
            id: "lead".into(),
            question: "?".into(),
            inside: "a".into(),
            answer: "a".into(),
            terminal: "a".into(),
            phase: Default::default(),
        }];
        let mut constellation =
            Constellation::new(nodes, Vec::new(), leads, HashMap::new(), HashMap::new());

        assert_eq!(constellation.confidence_score(), 0.0);
        constellation
            .discover_node("a", RequirementGating::Permissive)
            .unwrap();
        assert_eq!(constellation.confidence_score(), 0.5);
        constellation.discover_lead("lead").unwrap();
        assert_eq!(constellation.confidence_score(), 1.0);
    }

    #[test]
    fn empty_constellation_scores_zero() {
        let constellation = Constellation::default();
        assert_eq!(constellation.confidence_score(), 0.0);
    }
}
