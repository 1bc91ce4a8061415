//! The rendering-collaborator contract. The engine only needs a minimal
//! capability set — show a scene, mirror markers, report events — so any
//! panorama renderer can sit behind these traits.

use panovia_core::{MarkerSink, SceneGraph};
use panovia_ids::SceneId;
use std::sync::mpsc::{Receiver, Sender, channel};
use thiserror::Error;

/// Options handed to the backend when a viewer is created.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub first_scene: SceneId,
    pub auto_load: bool,
    /// Degrees per second; negative rotates left.
    pub auto_rotate: f32,
    pub compass: bool,
    pub show_zoom_ctrl: bool,
    pub show_fullscreen_ctrl: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            first_scene: SceneId::Main,
            auto_load: true,
            auto_rotate: -2.0,
            compass: true,
            show_zoom_ctrl: true,
            show_fullscreen_ctrl: true,
        }
    }
}

/// Events the rendering collaborator reports back, in arrival order.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewerEvent {
    SceneChanged(SceneId),
    Loaded,
    Clicked { pitch: f32, yaw: f32 },
}

pub fn create_event_channel() -> (Sender<ViewerEvent>, Receiver<ViewerEvent>) {
    channel()
}

/// The rendering collaborator failed to come up; the viewer stays closed.
#[derive(Error, Debug)]
#[error("viewer failed to initialize: {0}")]
pub struct RenderInitError(pub String);

/// A live viewer. Marker mirroring comes from [`MarkerSink`]; scene loading
/// and teardown are added here.
pub trait ViewerHandle: MarkerSink {
    fn load_scene(&mut self, scene: SceneId);
    fn destroy(&mut self);
}

/// Creates viewers for a scene graph.
pub trait ViewerBackend {
    type Handle: ViewerHandle;

    fn create(
        &mut self,
        config: &ViewerConfig,
        graph: &SceneGraph,
    ) -> Result<Self::Handle, RenderInitError>;
}
