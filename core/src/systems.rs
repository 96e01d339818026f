use {bevy::prelude::*, constellation_resources::Constellation};

/// One-line session summary once the mystery is in memory.
pub fn log_mystery_ready(constellation: Res<Constellation>) {
    info!(
        nodes = constellation.node_count(),
        connections = constellation.connections().len(),
        leads = constellation.leads().len(),
        mini_mysteries = constellation.mini_mysteries().count(),
        "mystery ready"
    );
}
