use bevy::prelude::*;

/// Represents a request to reveal a constellation node.
///
/// This **Observer** event (triggered via `commands.trigger`) is the sole
/// external-facing mutator of discovery state. Minigame completion handlers,
/// interaction handlers and dialogue logic all funnel through it.
///
/// # Observers
/// - `constellation::on_discover_node_request`: looks the key up, flips the
///   node, and fires the unlock side effects exactly once. A bad key or a
///   repeat request is downgraded to a diagnostic - never a failure the
///   sender has to handle.
#[derive(Event)]
pub struct DiscoverNodeRequest {
    pub node_key: String,
}

/// Fired exactly once per node, on its transition from hidden to discovered.
#[derive(Event)]
pub struct NodeDiscovered {
    pub node_key: String,
}

/// Tells the HUD to play the unlock notification for a freshly discovered
/// node. Fire-and-forget; the constellation never reads anything back.
#[derive(Event)]
pub struct NodeUnlockNotification {
    pub node_key: String,
    /// Title of the node, for toast display.
    pub title: String,
}

/// Tells the constellation view to unhide the visual node for `node_key`.
#[derive(Event)]
pub struct RevealVisualNode {
    pub node_key: String,
}

/// Fired at most once per scripted event, when one of its trigger nodes is
/// first discovered.
#[derive(Debug, Event)]
pub struct ScriptedEventTriggered {
    pub event_id: String,
    /// The node discovery that set the event off.
    pub node_key: String,
}

/// Request to move a lead from Unseen to Discovered.
///
/// # Observers
/// - `constellation::on_discover_lead_request`
#[derive(Event)]
pub struct DiscoverLeadRequest(
    /// The unique identifier of the lead (matches `MysteryLead.id`).
    pub String,
);

/// Request to mark a lead's question as answered.
///
/// # Observers
/// - `constellation::on_solve_lead_request`
#[derive(Event)]
pub struct SolveLeadRequest(pub String);

/// Fired exactly once when a lead becomes known to the player.
#[derive(Event)]
pub struct LeadDiscovered {
    pub lead_id: String,
}

/// Fired exactly once when a lead's question is answered.
#[derive(Event)]
pub struct LeadSolved {
    pub lead_id: String,
}
