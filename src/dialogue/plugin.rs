//! Dialogue plugin inserting the compiled-in scene catalog.
use bevy::prelude::*;

use super::store::DialogueStore;

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DialogueStore::builtin())
            .add_systems(Startup, log_dialogue_catalog);
    }
}

fn log_dialogue_catalog(store: Res<DialogueStore>) {
    let names: Vec<&str> = store.scenes().map(|scene| scene.name()).collect();
    info!(
        "DialoguePlugin initialised with {} scenes: {}",
        store.len(),
        names.join(", ")
    );
}
