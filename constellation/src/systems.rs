use {
    bevy::prelude::*,
    constellation_components::LeadPhase,
    constellation_events::*,
    constellation_resources::{Constellation, ConstellationSettings, DiscoverError, LeadError},
};

/// Observer for node discovery requests, the sole mutator of discovery
/// state.
///
/// A successful first discovery fires the two unlock side effects (HUD
/// notification, visual node reveal) plus any scripted events waiting on the
/// node - each exactly once. Every failure kind is downgraded to a
/// diagnostic: a missed interaction never surfaces as an error to the
/// sender, the player simply sees nothing happen.
pub fn on_discover_node_request(
    trigger: On<DiscoverNodeRequest>,
    mut constellation: ResMut<Constellation>,
    settings: Res<ConstellationSettings>,
    mut commands: Commands,
) {
    let key = &trigger.event().node_key;

    match constellation.discover_node(key, settings.gating) {
        Ok(node) => {
            info!(node_key = %key, "node discovered");

            let title = node.title.clone();
            commands.trigger(NodeDiscovered {
                node_key: key.clone(),
            });
            // HUD unlock notification
            commands.trigger(NodeUnlockNotification {
                node_key: key.clone(),
                title,
            });
            // Unhide the visual node in the constellation view
            commands.trigger(RevealVisualNode {
                node_key: key.clone(),
            });

            for event_id in constellation.take_triggered_events(key) {
                info!(%event_id, node_key = %key, "scripted event triggered");
                commands.trigger(ScriptedEventTriggered {
                    event_id,
                    node_key: key.clone(),
                });
            }
        }
        Err(DiscoverError::KeyNotSupplied) => {
            debug!("discover request without a node key");
        }
        Err(DiscoverError::UnknownKey(key)) => {
            debug!(node_key = %key, "no node found that correlates to key");
        }
        Err(DiscoverError::AlreadyDiscovered(key)) => {
            debug!(node_key = %key, "node already discovered");
        }
        Err(DiscoverError::RequirementNotMet { key, missing }) => {
            debug!(node_key = %key, %missing, "discovery refused, requirement not met");
        }
    }
}

/// Observer moving a lead from Unseen to Discovered.
pub fn on_discover_lead_request(
    trigger: On<DiscoverLeadRequest>,
    mut constellation: ResMut<Constellation>,
    mut commands: Commands,
) {
    let id = &trigger.event().0;

    match constellation.discover_lead(id) {
        Ok(lead) => {
            info!(lead_id = %lead.id, "lead discovered");
            commands.trigger(LeadDiscovered {
                lead_id: id.clone(),
            });
        }
        Err(error) => log_lead_error(&error),
    }
}

/// Observer marking a lead's question as answered.
///
/// Solving an unseen lead discovers it in the same step, so `LeadDiscovered`
/// is emitted first and the exactly-once contract holds for both events.
pub fn on_solve_lead_request(
    trigger: On<SolveLeadRequest>,
    mut constellation: ResMut<Constellation>,
    mut commands: Commands,
) {
    let id = &trigger.event().0;

    match constellation.solve_lead(id) {
        Ok(previous) => {
            if previous == LeadPhase::Unseen {
                info!(lead_id = %id, "lead discovered");
                commands.trigger(LeadDiscovered {
                    lead_id: id.clone(),
                });
            }
            info!(lead_id = %id, "lead solved");
            commands.trigger(LeadSolved {
                lead_id: id.clone(),
            });
        }
        Err(error) => log_lead_error(&error),
    }
}

fn log_lead_error(error: &LeadError) {
    match error {
        LeadError::IdNotSupplied => debug!("lead request without an id"),
        LeadError::UnknownId(id) => debug!(lead_id = %id, "no lead found that correlates to id"),
        LeadError::AlreadyDiscovered(id) => debug!(lead_id = %id, "lead already discovered"),
        LeadError::AlreadySolved(id) => debug!(lead_id = %id, "lead already solved"),
    }
}
