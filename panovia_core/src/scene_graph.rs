//! Derives the directed graph of viewable scenes from the hotspot forest.
//!
//! The graph enforces a guided, sequential tour: the root scene exposes a
//! single entry link to the first root hotspot, every root scene links back
//! to its predecessor in the chain and forward to its successor only when
//! that successor is connected, and child scenes are leaves that return to
//! their parent. The builder is a pure function over a store snapshot; it
//! degrades to fewer links on partially connected forests and never fails.

use crate::hotspot::{Hotspot, HotspotKind, ImageRef};
use crate::store::HotspotStore;
use indexmap::IndexMap;
use panovia_ids::SceneId;
use serde::Serialize;
use smallvec::SmallVec;

/// Position of the synthetic back marker in every derived scene.
pub const BACK_PITCH: f32 = -10.0;
pub const BACK_YAW: f32 = 180.0;

/// Marker style of a rendered link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    Back,
    Normal,
    Door,
}

impl From<HotspotKind> for LinkStyle {
    fn from(kind: HotspotKind) -> Self {
        match kind {
            HotspotKind::Normal => LinkStyle::Normal,
            HotspotKind::Door => LinkStyle::Door,
        }
    }
}

/// An outgoing link rendered into a scene.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneLink {
    pub target: SceneId,
    pub pitch: f32,
    pub yaw: f32,
    pub label: String,
    pub style: LinkStyle,
}

impl SceneLink {
    /// Synthetic back link at the fixed marker position.
    pub fn back(target: SceneId) -> Self {
        Self {
            target,
            pitch: BACK_PITCH,
            yaw: BACK_YAW,
            label: "Back".to_string(),
            style: LinkStyle::Back,
        }
    }

    /// A hotspot rendered into a scene, leading to the hotspot's own scene.
    pub fn to_hotspot(hotspot: &Hotspot) -> Self {
        Self {
            target: hotspot.scene_id(),
            pitch: hotspot.pitch(),
            yaw: hotspot.yaw(),
            label: hotspot.text.clone(),
            style: hotspot.kind.into(),
        }
    }
}

/// One renderable scene: a panorama plus its outgoing links.
#[derive(Clone, Debug, Serialize)]
pub struct SceneDescriptor {
    pub id: SceneId,
    pub panorama: ImageRef,
    pub links: SmallVec<[SceneLink; 4]>,
}

impl SceneDescriptor {
    fn new(id: SceneId, panorama: ImageRef) -> Self {
        Self {
            id,
            panorama,
            links: SmallVec::new(),
        }
    }
}

/// Scene-id to descriptor mapping; `main` is always present and first.
pub type SceneGraph = IndexMap<SceneId, SceneDescriptor>;

/// Build the scene graph for a store snapshot. Pure and idempotent: the same
/// snapshot always yields the same graph.
pub fn build_scene_graph(root_panorama: &ImageRef, store: &HotspotStore) -> SceneGraph {
    let mut graph = SceneGraph::new();
    let roots: Vec<&Hotspot> = store.roots().collect();

    let mut main = SceneDescriptor::new(SceneId::Main, root_panorama.clone());
    // The root scene exposes exactly one forward link: the first root
    // hotspot, and only once it is connected.
    if let Some(first) = roots.first().filter(|h| h.is_connected()) {
        main.links.push(SceneLink::to_hotspot(first));
    }
    graph.insert(SceneId::Main, main);

    for (i, root) in roots.iter().enumerate() {
        let Some(panorama) = root.target_image.clone() else {
            // Unconnected roots consume a chain slot but emit nothing.
            continue;
        };
        let scene_id = root.scene_id();
        let mut scene = SceneDescriptor::new(scene_id, panorama);

        // Back link: the previous chain slot, main at the head of the chain.
        let back_target = if i == 0 {
            SceneId::Main
        } else {
            roots[i - 1].scene_id()
        };
        scene.links.push(SceneLink::back(back_target));

        // Hotspots placed inside this scene, each a leaf scene of its own.
        for child in store.children_of(Some(root.id())) {
            let Some(child_panorama) = child.target_image.clone() else {
                continue;
            };
            scene.links.push(SceneLink::to_hotspot(child));

            let mut child_scene = SceneDescriptor::new(child.scene_id(), child_panorama);
            child_scene.links.push(SceneLink::back(scene_id));
            graph.insert(child.scene_id(), child_scene);
        }

        // Forward link only when the next chain slot is connected; the chain
        // never skips over a gap.
        if let Some(next) = roots.get(i + 1).filter(|h| h.is_connected()) {
            scene.links.push(SceneLink::to_hotspot(next));
        }

        graph.insert(scene_id, scene);
    }

    graph
}
