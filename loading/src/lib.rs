mod resources;

use {
    crate::resources::MysteriesFolderHandle,
    bevy::{asset::LoadedFolder, prelude::*},
    constellation::compiler::compile_mystery,
    constellation_resources::{Constellation, ConstellationSettings},
    mystery_assets::MysteryDefinition,
    states::{GameState, LoadingPhase},
};

pub struct LoadingManagerPlugin;

impl Plugin for LoadingManagerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadingStatus>()
            .init_state::<LoadingPhase>()
            // Phase: Assets - load the mysteries folder
            .add_systems(Startup, load_mystery_assets)
            .add_systems(
                Update,
                check_assets_loaded
                    .run_if(in_state(GameState::Loading).and(in_state(LoadingPhase::Assets))),
            )
            // Phase: BuildConstellation - compile the first mystery found
            .add_systems(
                OnEnter(LoadingPhase::BuildConstellation),
                build_constellation,
            )
            // Phase: Ready - transition to Running
            .add_systems(OnEnter(LoadingPhase::Ready), finish_loading);
    }
}

// --- Resources ---

#[derive(Resource, Default)]
pub struct LoadingStatus {
    pub current_phase: String,
    pub detail: String,
}

// --- Phase: Assets ---

fn load_mystery_assets(mut cmd: Commands, asset_server: Res<AssetServer>) {
    info!("started loading mystery documents");
    let handle = asset_server.load_folder("mysteries");
    cmd.insert_resource(MysteriesFolderHandle(handle));
}

fn check_assets_loaded(
    mut next_phase: ResMut<NextState<LoadingPhase>>,
    mut status: ResMut<LoadingStatus>,
    asset_server: Res<AssetServer>,
    mysteries: Res<MysteriesFolderHandle>,
) {
    status.current_phase = "Loading Assets".into();
    status.detail = "Reading mystery files from disk...".into();

    if asset_server.is_loaded_with_dependencies(mysteries.0.id()) {
        info!("mystery documents loaded");
        next_phase.set(LoadingPhase::BuildConstellation);
    }
}

// --- Phase: BuildConstellation ---

fn build_constellation(
    mut commands: Commands,
    mysteries: Res<MysteriesFolderHandle>,
    folders: Res<Assets<LoadedFolder>>,
    definitions: Res<Assets<MysteryDefinition>>,
    asset_server: Res<AssetServer>,
    settings: Res<ConstellationSettings>,
    mut next_phase: ResMut<NextState<LoadingPhase>>,
    mut status: ResMut<LoadingStatus>,
) {
    status.current_phase = "Building Constellation".into();
    status.detail = "Compiling the mystery graph...".into();

    let Some(folder) = folders.get(mysteries.0.id()) else {
        error!("mysteries folder not loaded even tho asset server said it is");
        next_phase.set(LoadingPhase::Ready);
        return;
    };

    // The first mystery document wins, like the original folder scan. Paths
    // are sorted so "first" does not depend on filesystem enumeration order.
    let mut documents: Vec<(String, Handle<MysteryDefinition>)> = folder
        .handles
        .iter()
        .filter_map(|untyped| {
            let path = asset_server
                .get_path(untyped.id())
                .map(|asset_path| asset_path.path().display().to_string())?;
            let handle = untyped.clone().try_typed::<MysteryDefinition>().ok()?;
            Some((path, handle))
        })
        .collect();
    documents.sort_by(|(a, _), (b, _)| a.cmp(b));

    let Some((path, handle)) = documents.first() else {
        error!("no mystery documents found in the mysteries folder");
        next_phase.set(LoadingPhase::Ready);
        return;
    };
    info!(%path, "found mystery document");

    let Some(definition) = definitions.get(handle) else {
        error!(%path, "mystery document handle did not resolve");
        next_phase.set(LoadingPhase::Ready);
        return;
    };

    match compile_mystery(definition) {
        Ok(compiled) => {
            info!(
                nodes = compiled.node_count(),
                leads = compiled.leads().len(),
                "constellation compiled"
            );

            if settings.validate_references {
                for violation in compiled.validate_references() {
                    warn!(%violation, "dangling node reference in mystery document");
                }
            }

            commands.insert_resource(compiled);
        }
        Err(error) => {
            // A broken document still yields a playable (empty) session.
            error!(%path, %error, "failed to compile mystery document");
            commands.insert_resource(Constellation::default());
        }
    }

    next_phase.set(LoadingPhase::Ready);
}

// --- Phase: Ready ---

fn finish_loading(mut next_state: ResMut<NextState<GameState>>) {
    info!("Loading complete, transitioning to Running");
    next_state.set(GameState::Running);
}
