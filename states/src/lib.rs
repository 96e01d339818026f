use bevy::prelude::*;

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Loading,
    Running,
}

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadingPhase {
    #[default]
    Assets,             // Load mystery JSON documents from disk
    BuildConstellation, // Compile the first parsed mystery into the Constellation resource
    Ready,              // All done
}
