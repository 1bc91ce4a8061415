//! Navigation state for a running tour: current scene, visited set, and the
//! linear history trail, plus the breadcrumb query that decides which rooms
//! are presentable at any moment.
//!
//! This is a synchronous state machine driven by discrete scene-change
//! events from the rendering collaborator; it never navigates on its own.

use crate::hotspot::Hotspot;
use crate::store::HotspotStore;
use panovia_ids::{HotspotId, SceneId};
use std::collections::HashSet;

/// Presentation state of a breadcrumb button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    /// The room the user is in (or the parent room of the current child scene).
    Active,
    /// The next room the guided tour offers.
    NextAvailable,
    /// A reachable room the user may jump to.
    Available,
}

/// One button in the navigation breadcrumb.
#[derive(Clone, Debug, PartialEq)]
pub struct NavButton {
    pub scene: SceneId,
    pub label: String,
    pub state: NavState,
}

impl NavButton {
    fn new(scene: SceneId, label: impl Into<String>, state: NavState) -> Self {
        Self {
            scene,
            label: label.into(),
            state,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NavigationTracker {
    current: SceneId,
    visited: HashSet<SceneId>,
    history: Vec<SceneId>,
}

impl Default for NavigationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationTracker {
    /// A tracker starts (and resets to) the root scene.
    pub fn new() -> Self {
        Self {
            current: SceneId::Main,
            visited: HashSet::from([SceneId::Main]),
            history: vec![SceneId::Main],
        }
    }

    /// Reset for a (re-)opened project.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn current(&self) -> SceneId {
        self.current
    }

    #[inline]
    pub fn history(&self) -> &[SceneId] {
        &self.history
    }

    #[inline]
    pub fn has_visited(&self, scene: SceneId) -> bool {
        self.visited.contains(&scene)
    }

    /// Record a scene change reported by the viewer. Consecutive duplicates
    /// collapse; revisits elsewhere in the trail are kept.
    pub fn on_scene_change(&mut self, scene: SceneId) {
        if self.history.last() != Some(&scene) {
            self.history.push(scene);
        }
        self.current = scene;
        self.visited.insert(scene);
    }

    /// The breadcrumb for the current state: which rooms are shown and how.
    ///
    /// Chain positions are taken over the connected roots. On the root scene
    /// only the first room is offered; in a room, every earlier room plus the
    /// immediate next one shows; in a child scene the parent room is marked
    /// active. Connected children of the current room are appended.
    pub fn presentable(&self, store: &HotspotStore) -> Vec<NavButton> {
        let mut buttons = Vec::new();
        buttons.push(NavButton::new(
            SceneId::Main,
            "Main Scene",
            if self.current.is_main() {
                NavState::Active
            } else {
                NavState::Available
            },
        ));

        let chain: Vec<&Hotspot> = store.roots().filter(|h| h.is_connected()).collect();

        if self.current.is_main() {
            if let Some(first) = chain.first() {
                buttons.push(NavButton::new(
                    first.scene_id(),
                    first.text.clone(),
                    NavState::NextAvailable,
                ));
            }
            return buttons;
        }

        // Chain index of the current scene; -1 when we are in a child scene.
        let idx = chain
            .iter()
            .position(|h| h.scene_id() == self.current)
            .map(|i| i as isize)
            .unwrap_or(-1);
        let parent_root = if idx < 0 {
            self.parent_root_of_current(store)
        } else {
            None
        };

        for (j, root) in chain.iter().enumerate() {
            let is_current = root.scene_id() == self.current;
            let is_parent = parent_root == Some(root.id());
            let in_window = (j as isize) <= idx + 1;
            if !(in_window || is_parent) {
                continue;
            }
            let state = if is_current || is_parent {
                NavState::Active
            } else if j as isize == idx + 1 {
                NavState::NextAvailable
            } else {
                NavState::Available
            };
            buttons.push(NavButton::new(root.scene_id(), root.text.clone(), state));
        }

        // Inside a room, its connected children are offered as side rooms.
        if idx >= 0 {
            let room = chain[idx as usize];
            for child in store.children_of(Some(room.id())) {
                if !child.is_connected() {
                    continue;
                }
                let state = if child.scene_id() == self.current {
                    NavState::Active
                } else {
                    NavState::Available
                };
                buttons.push(NavButton::new(child.scene_id(), child.text.clone(), state));
            }
        }

        buttons
    }

    fn parent_root_of_current(&self, store: &HotspotStore) -> Option<HotspotId> {
        let hotspot_id = self.current.hotspot()?;
        let parent_id = store.get(hotspot_id)?.parent()?;
        store.get(parent_id).map(|parent| parent.id())
    }
}
