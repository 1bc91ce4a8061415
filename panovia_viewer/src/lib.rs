pub mod session;
pub mod viewer;

pub use session::ViewerSession;
pub use viewer::{
    RenderInitError, ViewerBackend, ViewerConfig, ViewerEvent, ViewerHandle, create_event_channel,
};
