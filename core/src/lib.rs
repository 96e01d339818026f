use bevy::prelude::*;
use constellation::ConstellationPlugin;
use loading::LoadingManagerPlugin;
use states::GameState;

mod systems;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((ConstellationPlugin, LoadingManagerPlugin))
            .add_systems(OnEnter(GameState::Running), systems::log_mystery_ready);
    }
}
