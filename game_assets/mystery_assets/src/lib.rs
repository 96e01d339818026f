//! Serde mirror of the external mystery authoring format.
//!
//! A `.mystery.json` document is produced by the authoring pipeline and
//! consumed as-is; these types only promise field names and shapes. Sections
//! outside the constellation (characters, environment, train layout) are
//! left to serde's tolerant default and ignored.

use {
    bevy::prelude::*,
    bevy_common_assets::json::JsonAssetPlugin,
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

pub struct MysteryAssetsPlugin;

impl Plugin for MysteryAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<MysteryDefinition>::new(&[
            "mystery.json",
        ]));
    }
}

/// Root of a mystery authoring document.
#[derive(Asset, TypePath, Debug, Clone, Deserialize)]
pub struct MysteryDefinition {
    #[serde(default)]
    pub metadata: Option<MysteryMetadata>,
    pub constellation: ConstellationDefinition,
    /// Keyed scripted narrative beats, parsed at the document root.
    #[serde(default)]
    pub scripted_events: HashMap<String, ScriptedEventDefinition>,
}

/// Optional display metadata for menus and saves.
#[derive(Debug, Clone, Deserialize)]
pub struct MysteryMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub synopsis: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstellationDefinition {
    /// Node key -> node. Key uniqueness comes from the JSON object itself.
    pub nodes: HashMap<String, NodeDefinition>,
    /// Explicit edge pairs `[from, to]`, on top of the edges implied by each
    /// node's `requires` list.
    #[serde(default)]
    pub connections: Vec<[String; 2]>,
    #[serde(default)]
    pub leads: Vec<LeadDefinition>,
    #[serde(default)]
    pub mini_mysteries: HashMap<String, MiniMysteryDefinition>,
}

/// One authored node. The `type` string picks the node kind; the optional
/// field bags are only meaningful for the kinds that use them - the compiler
/// warns about and drops the rest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requires: Vec<String>,

    // Physical-evidence placement.
    #[serde(default)]
    pub car_id: Option<String>,
    #[serde(default)]
    pub car_number: Option<i32>,
    #[serde(default)]
    pub coords: Option<[i32; 2]>,

    // Barrier attributes for locked/container evidence.
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub contains: Option<Vec<String>>,
    #[serde(default)]
    pub locked_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeadDefinition {
    pub id: String,
    pub question: String,
    /// Key of the node that houses the lead.
    pub inside: String,
    /// Key of the node that answers the question.
    pub answer: String,
    /// Key of the base node this lead corresponds with.
    pub terminal: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MiniMysteryDefinition {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub entry_points: Vec<String>,
    /// Node keys tying the subplot back into the main constellation.
    #[serde(default)]
    pub connects_to_main: Vec<String>,
    pub revelation: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScriptedEventDefinition {
    #[serde(default)]
    pub character: Option<String>,
    /// Node keys whose discovery sets the event off.
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}
