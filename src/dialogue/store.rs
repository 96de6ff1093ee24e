//! Read-only scene catalog shared with the progression controller.
use std::{collections::HashMap, sync::Arc};

use bevy::prelude::Resource;

use super::{catalog, errors::DialogueError, types::Scene};

/// Named scenes, looked up by name and listed in registration order.
#[derive(Resource, Debug, Default, Clone)]
pub struct DialogueStore {
    scenes: Vec<Arc<Scene>>,
    by_name: HashMap<String, usize>,
}

impl DialogueStore {
    /// Store holding the compiled-in catalog.
    pub fn builtin() -> Self {
        let mut store = Self::default();
        for scene in catalog::builtin_scenes() {
            store.register(scene);
        }
        store
    }

    /// Adds a scene. A scene registered under an existing name replaces the
    /// earlier one and keeps its menu position.
    pub fn register(&mut self, scene: Scene) -> &mut Self {
        let scene = Arc::new(scene);
        match self.by_name.get(scene.name()) {
            Some(&slot) => self.scenes[slot] = scene,
            None => {
                self.by_name
                    .insert(scene.name().to_string(), self.scenes.len());
                self.scenes.push(scene);
            }
        }
        self
    }

    pub fn get_scene(&self, name: &str) -> Result<Arc<Scene>, DialogueError> {
        self.by_name
            .get(name)
            .map(|&slot| Arc::clone(&self.scenes[slot]))
            .ok_or_else(|| DialogueError::not_found(name))
    }

    pub fn line_count(&self, scene: &Scene) -> usize {
        scene.line_count()
    }

    pub fn line_at<'a>(&self, scene: &'a Scene, index: usize) -> Result<&'a str, DialogueError> {
        scene.line_at(index)
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Arc<Scene>> {
        self.scenes.iter()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::catalog::{DEMO, INTRODUCTION};

    #[test]
    fn builtin_store_resolves_shipped_scenes() {
        let store = DialogueStore::builtin();
        assert_eq!(store.len(), 2);

        let introduction = store.get_scene(INTRODUCTION).expect("introduction exists");
        assert_eq!(store.line_count(&introduction), 7);
        assert_eq!(
            store.line_at(&introduction, 0),
            Ok("Welcome to InkPulse!")
        );

        let demo = store.get_scene(DEMO).expect("demo exists");
        assert_eq!(store.line_count(&demo), 1);
    }

    #[test]
    fn unknown_scene_is_not_found() {
        let store = DialogueStore::builtin();
        assert_eq!(
            store.get_scene("Epilogue"),
            Err(DialogueError::not_found("Epilogue"))
        );
    }

    #[test]
    fn line_at_propagates_range_errors() {
        let store = DialogueStore::builtin();
        let demo = store.get_scene(DEMO).expect("demo exists");
        assert!(matches!(
            store.line_at(&demo, 1),
            Err(DialogueError::IndexOutOfRange { index: 1, line_count: 1, .. })
        ));
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut store = DialogueStore::default();
        store
            .register(Scene::new("A", vec!["one".into()]))
            .register(Scene::new("B", vec!["two".into()]))
            .register(Scene::new("A", vec!["uno".into(), "dos".into()]));

        let names: Vec<_> = store.scenes().map(|scene| scene.name().to_string()).collect();
        assert_eq!(names, vec!["A", "B"]);
        let a = store.get_scene("A").expect("A exists");
        assert_eq!(a.line_count(), 2);
    }

    #[test]
    fn lookups_share_the_same_scene() {
        let store = DialogueStore::builtin();
        let first = store.get_scene(DEMO).expect("demo exists");
        let second = store.get_scene(DEMO).expect("demo exists");
        assert!(Arc::ptr_eq(&first, &second));
    }
}
