pub mod compiler;
pub mod systems;


pub use {
    constellation_components::*, constellation_events::*, constellation_resources::*,
    mystery_assets::*,
};

use bevy::prelude::*;

pub struct ConstellationPlugin;

impl Plugin for ConstellationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Asset loading
            .add_plugins(MysteryAssetsPlugin)
            // Resources
            .init_resource::<Constellation>()
            .init_resource::<ConstellationSettings>()
            // Registration
            .register_type::<Constellation>()
            .register_type::<ConstellationSettings>()
            // Observers for discovery requests and their side effects
            .add_observer(systems::on_discover_node_request)
            .add_observer(systems::on_discover_lead_request)
            .add_observer(systems::on_solve_lead_request);
    }
}
