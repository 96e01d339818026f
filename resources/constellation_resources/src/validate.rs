//! Optional referential-integrity scan over a compiled constellation.
//!
//! The game never validated that connections, leads or mini-mysteries point
//! at existing nodes; that stays the default. This pass exists so a loader
//! (or a test) can surface dangling keys without changing load behavior.

use {crate::Constellation, constellation_components::NodeKind, std::fmt};

/// A key that references a node missing from the node mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceViolation {
    /// Where the dangling key was found, e.g. "connection" or
    /// "mini_mystery `smuggling`.entry_points".
    pub context: String,
    pub missing_key: String,
}

impl fmt::Display for ReferenceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} references unknown node `{}`", self.context, self.missing_key)
    }
}

impl Constellation {
    /// Collects every node reference that does not resolve. Purely a report;
    /// nothing is removed or rejected.
    pub fn validate_references(&self) -> Vec<ReferenceViolation> {
        let mut violations = Vec::new();
        let check = |context: String, key: &str, violations: &mut Vec<ReferenceViolation>| {
            if !key.is_empty() && self.node(key).is_none() {
                violations.push(ReferenceViolation {
                    context,
                    missing_key: key.to_string(),
                });
            }
        };

        for connection in self.connections() {
            check("connection".to_string(), &connection.from, &mut violations);
            check("connection".to_string(), &connection.to, &mut violations);
        }

        for (key, node) in self.nodes() {
            for req in &node.requires {
                check(format!("node `{key}`.requires"), req, &mut violations);
            }
            if let NodeKind::Evidence {
                barrier: Some(barrier),
                ..
            } = &node.kind
            {
                for contained in &barrier.contains {
                    check(format!("node `{key}`.contains"), contained, &mut violations);
                }
                if let Some(locked_by) = &barrier.locked_by {
                    check(format!("node `{key}`.locked_by"), locked_by, &mut violations);
                }
            }
        }

        for (key, mini) in self.mini_mysteries() {
            for entry in &mini.entry_points {
                check(format!("mini_mystery `{key}`.entry_points"), entry, &mut violations);
            }
            for node_key in &mini.key_nodes {
                check(format!("mini_mystery `{key}`.key_nodes"), node_key, &mut violations);
            }
        }

        for lead in self.leads() {
            check(format!("lead `{}`.inside", lead.id), &lead.inside, &mut violations);
            check(format!("lead `{}`.answer", lead.id), &lead.answer, &mut violations);
            check(format!("lead `{}`.terminal", lead.id), &lead.terminal, &mut violations);
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::RequirementGating,
        bevy::platform::collections::HashMap,
        constellation_components::{Connection, MysteryNode, NodeKind},
    };

    fn info_node() -> MysteryNode {
        MysteryNode {
            title: "t".into(),
            description: "d".into(),
            subtype: None,
            kind: NodeKind::Info,
            requires: Vec::new(),
            discovered: false,
        }
    }

    #[test]
    fn dangling_connection_is_reported_not_rejected() {
        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), info_node());
        let mut constellation = Constellation::new(
            nodes,
            vec![Connection {
                from: "a".into(),
                to: "phantom".into(),
            }],
            Vec::new(),
            HashMap::new(),
            HashMap::new(),
        );

        let violations = constellation.validate_references();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].missing_key, "phantom");

        // The scan never blocks discovery.
        assert!(constellation
            .discover_node("a", RequirementGating::Permissive)
            .is_ok());
    }

    #[test]
    fn clean_constellation_has_no_violations() {
        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), info_node());
        nodes.insert("b".to_string(), info_node());
        let constellation = Constellation::new(
            nodes,
            vec![Connection {
                from: "a".into(),
                to: "b".into(),
            }],
            Vec::new(),
            HashMap::new(),
            HashMap::new(),
        );

        assert!(constellation.validate_references().is_empty());
    }
}
