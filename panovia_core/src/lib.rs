pub mod editor;
pub mod hotspot;
pub mod navigation;
pub mod scene_graph;
pub mod store;

pub use editor::{EditorError, EditorSession, Marker, MarkerSink};
pub use hotspot::{Hotspot, HotspotKind, ImageRef, clamp_pitch, wrap_yaw};
pub use navigation::{NavButton, NavState, NavigationTracker};
pub use scene_graph::{
    BACK_PITCH, BACK_YAW, LinkStyle, SceneDescriptor, SceneGraph, SceneLink, build_scene_graph,
};
pub use store::HotspotStore;
