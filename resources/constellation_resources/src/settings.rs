use bevy::prelude::*;

/// Tuning knobs for the discovery engine. Defaults reproduce the permissive
/// behavior the game shipped with; both passes are opt-in.
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct ConstellationSettings {
    pub gating: RequirementGating,
    /// When set, the loader scans the compiled constellation for dangling
    /// node keys and reports each one as a warning. The load still succeeds.
    pub validate_references: bool,
}

/// Whether `discover_node` consults requirement edges before flipping a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum RequirementGating {
    /// Any known key can be discovered at any time; which key gets passed in
    /// is the gameplay code's decision. This is how the game behaves.
    #[default]
    Permissive,
    /// Refuse discovery while any prerequisite is still hidden.
    Enforced,
}
