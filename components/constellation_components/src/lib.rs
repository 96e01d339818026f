//! Shared data model for the mystery constellation.
//!
//! These are plain records built once at load time from a mystery authoring
//! document. The only post-load mutation anywhere in the model is the
//! `discovered` flag on [`MysteryNode`] and the phase on [`MysteryLead`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A vertex in the mystery constellation: one piece of narrative content.
#[derive(Debug, Clone, Reflect, Serialize, Deserialize)]
pub struct MysteryNode {
    pub title: String,
    pub description: String,
    /// Free-form authoring refinement of the kind (e.g. "physical", "testimony").
    pub subtype: Option<String>,
    pub kind: NodeKind,
    /// Keys of nodes the constellation view draws as prerequisites of this one.
    /// Discovery order is NOT enforced through these by default.
    pub requires: Vec<String>,
    pub discovered: bool,
}

impl MysteryNode {
    /// Marks the node discovered and returns the *previous* value, so the
    /// caller can tell a first discovery (`false`) from a redundant one
    /// (`true`) without a separate query.
    pub fn discover(&mut self) -> bool {
        let previous = self.discovered;
        self.discovered = true;
        previous
    }

    pub fn is_evidence(&self) -> bool {
        matches!(self.kind, NodeKind::Evidence { .. })
    }
}

/// What a node represents. Each variant carries only the attribute set that
/// is valid for it, so a loaded constellation cannot hold barrier data on an
/// info node or placement data on a lead.
#[derive(Debug, Clone, Default, Reflect, Serialize, Deserialize)]
pub enum NodeKind {
    #[default]
    Info,
    Evidence {
        /// Where the physical piece sits in the train, when subtype = "physical".
        placement: Option<CarPlacement>,
        /// Present when the piece is locked or contains other pieces.
        barrier: Option<Barrier>,
    },
    Lead,
}

/// Physical location of an evidence piece inside the train set.
#[derive(Debug, Clone, Reflect, Serialize, Deserialize)]
pub struct CarPlacement {
    pub car_id: String,
    pub car_number: Option<i32>,
    pub coords: Option<[i32; 2]>,
}

/// Lock/container attributes of an evidence piece.
#[derive(Debug, Clone, Default, Reflect, Serialize, Deserialize)]
pub struct Barrier {
    /// Combination or answer that opens the barrier (consumed by minigames).
    pub solution: Option<String>,
    /// Keys of nodes revealed by getting past the barrier.
    pub contains: Vec<String>,
    /// Key of the node that locks this one.
    pub locked_by: Option<String>,
}

/// A directed edge of the constellation view: `from` is a prerequisite of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

/// A named subplot grouping a subset of nodes. Read-only narrative
/// bookkeeping; discovery never touches these records.
#[derive(Debug, Clone, Reflect, Serialize, Deserialize)]
pub struct MiniMystery {
    pub name: String,
    pub description: String,
    /// Node keys where the subplot can first be picked up.
    pub entry_points: Vec<String>,
    /// Node keys tying the subplot back into the main mystery.
    pub key_nodes: Vec<String>,
    /// Text shown once the subplot is pieced together.
    pub revelation: String,
}

/// A scripted narrative beat, fired at most once when any of its trigger
/// nodes is first discovered.
#[derive(Debug, Clone, Reflect, Serialize, Deserialize)]
pub struct ScriptedEvent {
    /// Character the beat belongs to, if any.
    pub character: Option<String>,
    /// Node keys that set the beat off.
    pub triggers: Vec<String>,
    pub description: Option<String>,
}

/// A question/answer pairing with its own two-phase state, tracked next to
/// (not through) node discovery.
#[derive(Debug, Clone, Reflect, Serialize, Deserialize)]
pub struct MysteryLead {
    pub id: String,
    /// The question this lead poses.
    pub question: String,
    /// Key of the node that houses the lead.
    pub inside: String,
    /// Key of the node answering the question.
    pub answer: String,
    /// Key of the base node this lead terminates at.
    pub terminal: String,
    pub phase: LeadPhase,
}

impl MysteryLead {
    /// Unseen -> Discovered. Returns whether the lead was already known.
    pub fn discover(&mut self) -> bool {
        let previous = self.phase >= LeadPhase::Discovered;
        if self.phase == LeadPhase::Unseen {
            self.phase = LeadPhase::Discovered;
        }
        previous
    }

    /// Discovered -> Solved. Returns the phase the lead was in before, so
    /// the caller can tell a redundant solve from one that also discovered
    /// the lead. Solving an unseen lead discovers it as well; the machine
    /// only moves forward.
    pub fn solve(&mut self) -> LeadPhase {
        let previous = self.phase;
        self.phase = LeadPhase::Solved;
        previous
    }

    pub fn is_discovered(&self) -> bool {
        self.phase >= LeadPhase::Discovered
    }

    pub fn is_solved(&self) -> bool {
        self.phase == LeadPhase::Solved
    }
}

/// Monotonic lead state: Unseen -> Discovered -> Solved, no way back.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Reflect, Serialize, Deserialize,
)]
pub enum LeadPhase {
    #[default]
    Unseen,
    Discovered,
    Solved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_returns_previous_value() {
        let mut node = MysteryNode {
            title: "Torn Ticket".into(),
            description: "A first-class ticket, torn in half.".into(),
            subtype: Some("physical".into()),
            kind: NodeKind::Evidence {
                placement: None,
                barrier: None,
            },
            requires: Vec::new(),
            discovered: false,
        };

        assert!(!node.discover(), "first discovery reports a fresh node");
        assert!(node.discovered);
        assert!(node.discover(), "second discovery reports it was known");
        assert!(node.discovered);
    }

    #[test]
    fn lead_phase_only_moves_forward() {
        let mut lead = MysteryLead {
            id: "lead_ticket".into(),
            question: "Whose ticket is this?".into(),
            inside: "node_ticket".into(),
            answer: "node_passenger_list".into(),
            terminal: "node_victim".into(),
            phase: LeadPhase::Unseen,
        };

        assert!(!lead.discover());
        assert_eq!(lead.phase, LeadPhase::Discovered);
        assert!(lead.discover());

        assert_eq!(lead.solve(), LeadPhase::Discovered);
        assert_eq!(lead.phase, LeadPhase::Solved);
        assert_eq!(lead.solve(), LeadPhase::Solved);

        // Re-discovering a solved lead must not regress it.
        assert!(lead.discover());
        assert_eq!(lead.phase, LeadPhase::Solved);
    }

    #[test]
    fn solving_an_unseen_lead_discovers_it() {
        let mut lead = MysteryLead {
            id: "lead_cigar".into(),
            question: "Who smokes this brand?".into(),
            inside: "node_cigar".into(),
            answer: "node_colonel".into(),
            terminal: "node_lounge".into(),
            phase: LeadPhase::Unseen,
        };

        assert_eq!(lead.solve(), LeadPhase::Unseen);
        assert!(lead.is_discovered());
        assert!(lead.is_solved());
    }
}
