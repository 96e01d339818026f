//! Compiles a parsed [`MysteryDefinition`] into the typed runtime
//! [`Constellation`].
//!
//! The authoring format is stringly typed (node kinds as strings, optional
//! field bags valid only for some kinds); this step is where those become
//! [`NodeKind`] variants. Fields that appear on a node of the wrong kind are
//! dropped with a warning, so the compiled constellation always satisfies
//! the model invariants even when the document does not.

use {
    bevy::{platform::collections::HashMap, prelude::*},
    constellation_components::{
        Barrier, CarPlacement, Connection, MiniMystery, MysteryLead, MysteryNode, NodeKind,
        ScriptedEvent,
    },
    constellation_resources::Constellation,
    mystery_assets::{MysteryDefinition, NodeDefinition},
    thiserror::Error,
};

/// A structural fault in the authoring document. Unlike discovery failures
/// these are build-time faults: the document itself is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("node `{node_key}` has unknown kind `{kind}`")]
    UnknownNodeKind { node_key: String, kind: String },
}

/// Builds the runtime constellation from an authoring document.
pub fn compile_mystery(definition: &MysteryDefinition) -> Result<Constellation, CompileError> {
    let mut nodes = HashMap::new();
    for (key, node_def) in &definition.constellation.nodes {
        nodes.insert(key.clone(), compile_node(key, node_def)?);
    }

    let mut connections: Vec<Connection> = definition
        .constellation
        .connections
        .iter()
        .map(|[from, to]| Connection {
            from: from.clone(),
            to: to.clone(),
        })
        .collect();

    // Every requirement edge is also a visual connection, prerequisite
    // first. Node keys are walked in sorted order so the edge list does not
    // depend on map iteration order.
    let mut keys: Vec<&String> = definition.constellation.nodes.keys().collect();
    keys.sort();
    for key in keys {
        for req in &definition.constellation.nodes[key].requires {
            let edge = Connection {
                from: req.clone(),
                to: key.clone(),
            };
            if !connections.contains(&edge) {
                connections.push(edge);
            }
        }
    }

    let leads = definition
        .constellation
        .leads
        .iter()
        .map(|lead| MysteryLead {
            id: lead.id.clone(),
            question: lead.question.clone(),
            inside: lead.inside.clone(),
            answer: lead.answer.clone(),
            terminal: lead.terminal.clone(),
            phase: Default::default(),
        })
        .collect();

    let mini_mysteries = definition
        .constellation
        .mini_mysteries
        .iter()
        .map(|(key, mini)| {
            (
                key.clone(),
                MiniMystery {
                    name: mini.name.clone(),
                    description: mini.description.clone(),
                    entry_points: mini.entry_points.clone(),
                    key_nodes: mini.connects_to_main.clone(),
                    revelation: mini.revelation.clone(),
                },
            )
        })
        .collect();

    let scripted_events = definition
        .scripted_events
        .iter()
        .map(|(id, event)| {
            (
                id.clone(),
                ScriptedEvent {
                    character: event.character.clone(),
                    triggers: event.triggers.clone(),
                    description: event.description.clone(),
                },
            )
        })
        .collect();

    Ok(Constellation::new(
        nodes,
        connections,
        leads,
        mini_mysteries,
        scripted_events,
    ))
}

fn compile_node(key: &str, def: &NodeDefinition) -> Result<MysteryNode, CompileError> {
    let kind = match def.kind.to_ascii_uppercase().as_str() {
        "INFO" => NodeKind::Info,
        "EVIDENCE" => NodeKind::Evidence {
            placement: compile_placement(key, def),
            barrier: compile_barrier(def),
        },
        "LEAD" => NodeKind::Lead,
        other => {
            return Err(CompileError::UnknownNodeKind {
                node_key: key.to_string(),
                kind: other.to_string(),
            });
        }
    };

    if !matches!(kind, NodeKind::Evidence { .. }) && has_evidence_fields(def) {
        warn!(
            node_key = %key,
            kind = %def.kind,
            "dropping placement/barrier fields on a non-evidence node"
        );
    }

    Ok(MysteryNode {
        title: def.title.clone(),
        description: def.description.clone(),
        subtype: def.subtype.clone(),
        kind,
        requires: def.requires.clone(),
        discovered: false,
    })
}

fn compile_placement(key: &str, def: &NodeDefinition) -> Option<CarPlacement> {
    let physical = def
        .subtype
        .as_deref()
        .is_some_and(|subtype| subtype.eq_ignore_ascii_case("physical"));

    if !physical {
        if def.car_id.is_some() || def.coords.is_some() {
            warn!(
                node_key = %key,
                subtype = ?def.subtype,
                "dropping placement fields on non-physical evidence"
            );
        }
        return None;
    }

    def.car_id.as_ref().map(|car_id| CarPlacement {
        car_id: car_id.clone(),
        car_number: def.car_number,
        coords: def.coords,
    })
}

fn compile_barrier(def: &NodeDefinition) -> Option<Barrier> {
    if def.solution.is_none() && def.contains.is_none() && def.locked_by.is_none() {
        return None;
    }
    Some(Barrier {
        solution: def.solution.clone(),
        contains: def.contains.clone().unwrap_or_default(),
        locked_by: def.locked_by.clone(),
    })
}

fn has_evidence_fields(def: &NodeDefinition) -> bool {
    def.car_id.is_some()
        || def.coords.is_some()
        || def.solution.is_some()
        || def.contains.is_some()
        || def.locked_by.is_some()
}
