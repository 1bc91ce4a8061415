//! A running tour session: the scene graph, the navigation tracker, and the
//! live viewer handle, wired together. Navigation state lives and dies with
//! the session — opening a project always starts a fresh trail.

use crate::viewer::{RenderInitError, ViewerBackend, ViewerConfig, ViewerEvent, ViewerHandle};
use log::{debug, info, warn};
use panovia_core::{HotspotStore, ImageRef, NavButton, NavigationTracker, SceneGraph, build_scene_graph};
use panovia_ids::SceneId;
use std::sync::mpsc::Receiver;

pub struct ViewerSession<H: ViewerHandle> {
    title: String,
    store: HotspotStore,
    graph: SceneGraph,
    tracker: NavigationTracker,
    handle: H,
}

impl<H: ViewerHandle> ViewerSession<H> {
    /// Open a project for viewing: build its scene graph, bring up the
    /// renderer, and reset navigation. If the renderer fails to initialize
    /// the error is surfaced and no session exists.
    pub fn open<B: ViewerBackend<Handle = H>>(
        title: impl Into<String>,
        panorama: ImageRef,
        store: HotspotStore,
        backend: &mut B,
        config: &ViewerConfig,
    ) -> Result<Self, RenderInitError> {
        let title = title.into();
        let graph = build_scene_graph(&panorama, &store);
        let handle = backend.create(config, &graph)?;
        info!("opened tour {title:?} with {} scenes", graph.len());
        Ok(Self {
            title,
            store,
            graph,
            tracker: NavigationTracker::new(),
            handle,
        })
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    #[inline]
    pub fn current_scene(&self) -> SceneId {
        self.tracker.current()
    }

    #[inline]
    pub fn history(&self) -> &[SceneId] {
        self.tracker.history()
    }

    /// Apply one viewer event. Events must be fed in arrival order; there is
    /// no batching or reordering.
    pub fn handle_event(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::SceneChanged(scene) => {
                self.tracker.on_scene_change(scene);
                debug!("scene changed to {scene}");
            }
            ViewerEvent::Loaded => {
                debug!("panorama loaded for {}", self.tracker.current());
            }
            ViewerEvent::Clicked { .. } => {
                // Clicks matter to the authoring flow, not to playback.
            }
        }
    }

    /// Drain and apply every pending viewer event.
    pub fn pump(&mut self, events: &Receiver<ViewerEvent>) {
        for event in events.try_iter() {
            self.handle_event(event);
        }
    }

    /// Ask the viewer to move to another scene. Navigating to the scene the
    /// user is already in, or to a scene the graph does not contain, is a
    /// no-op. The tracker itself only advances once the viewer reports the
    /// change back.
    pub fn navigate_to(&mut self, scene: SceneId) {
        if scene == self.tracker.current() {
            return;
        }
        if !self.graph.contains_key(&scene) {
            warn!("ignoring navigation to unknown scene {scene}");
            return;
        }
        self.handle.load_scene(scene);
    }

    /// The breadcrumb buttons for the current navigation state.
    pub fn breadcrumb(&self) -> Vec<NavButton> {
        self.tracker.presentable(&self.store)
    }

    /// Tear the session down; navigation state is discarded with it.
    pub fn close(mut self) {
        self.handle.destroy();
        info!("closed tour {:?}", self.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::create_event_channel;
    use panovia_core::{Hotspot, Marker, MarkerSink};
    use panovia_ids::HotspotId;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Test double standing in for a real renderer.
    #[derive(Default)]
    struct MockViewer {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl MarkerSink for MockViewer {
        fn add_marker(&mut self, marker: &Marker) {
            self.log.borrow_mut().push(format!("add {}", marker.id));
        }
        fn remove_marker(&mut self, id: HotspotId) {
            self.log.borrow_mut().push(format!("remove {id}"));
        }
        fn set_panorama(&mut self, image: &ImageRef) {
            self.log.borrow_mut().push(format!("pano {image}"));
        }
    }

    impl ViewerHandle for MockViewer {
        fn load_scene(&mut self, scene: SceneId) {
            self.log.borrow_mut().push(format!("load {scene}"));
        }
        fn destroy(&mut self) {
            self.log.borrow_mut().push("destroy".to_string());
        }
    }

    struct MockBackend {
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                log: Rc::new(RefCell::new(Vec::new())),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                log: Rc::new(RefCell::new(Vec::new())),
                fail: true,
            }
        }
    }

    impl ViewerBackend for MockBackend {
        type Handle = MockViewer;

        fn create(
            &mut self,
            _config: &ViewerConfig,
            graph: &SceneGraph,
        ) -> Result<MockViewer, RenderInitError> {
            if self.fail {
                return Err(RenderInitError("no WebGL context".to_string()));
            }
            self.log
                .borrow_mut()
                .push(format!("create {} scenes", graph.len()));
            Ok(MockViewer {
                log: Rc::clone(&self.log),
            })
        }
    }

    fn store_with_rooms() -> (HotspotStore, HotspotId, HotspotId) {
        let mut store = HotspotStore::new();
        let a = store.insert(
            Hotspot::new(0.0, 0.0, "A").with_target(ImageRef::from("a.jpg")),
            None,
        );
        let b = store.insert(
            Hotspot::new(0.0, 0.0, "B").with_target(ImageRef::from("b.jpg")),
            None,
        );
        (store, a, b)
    }

    #[test]
    fn open_surfaces_render_init_failure() {
        let (store, _, _) = store_with_rooms();
        let mut backend = MockBackend::failing();
        let result = ViewerSession::open(
            "Demo",
            ImageRef::from("root.jpg"),
            store,
            &mut backend,
            &ViewerConfig::default(),
        );
        assert!(result.is_err());
        assert!(backend.log.borrow().is_empty());
    }

    #[test]
    fn open_starts_at_main_with_fresh_trail() {
        let (store, _, _) = store_with_rooms();
        let mut backend = MockBackend::new();
        let session = ViewerSession::open(
            "Demo",
            ImageRef::from("root.jpg"),
            store,
            &mut backend,
            &ViewerConfig::default(),
        )
        .unwrap();
        assert_eq!(session.current_scene(), SceneId::Main);
        assert_eq!(session.history(), [SceneId::Main]);
        assert_eq!(session.graph().len(), 3);
    }

    #[test]
    fn events_apply_in_arrival_order() {
        let (store, a, _) = store_with_rooms();
        let mut backend = MockBackend::new();
        let mut session = ViewerSession::open(
            "Demo",
            ImageRef::from("root.jpg"),
            store,
            &mut backend,
            &ViewerConfig::default(),
        )
        .unwrap();

        let (tx, rx) = create_event_channel();
        let scene_a = SceneId::Hotspot(a);
        tx.send(ViewerEvent::SceneChanged(scene_a)).unwrap();
        tx.send(ViewerEvent::Loaded).unwrap();
        tx.send(ViewerEvent::SceneChanged(SceneId::Main)).unwrap();
        tx.send(ViewerEvent::SceneChanged(scene_a)).unwrap();
        session.pump(&rx);

        assert_eq!(session.current_scene(), scene_a);
        assert_eq!(
            session.history(),
            [SceneId::Main, scene_a, SceneId::Main, scene_a]
        );
    }

    #[test]
    fn navigate_to_current_scene_is_a_no_op() {
        let (store, a, _) = store_with_rooms();
        let mut backend = MockBackend::new();
        let log = Rc::clone(&backend.log);
        let mut session = ViewerSession::open(
            "Demo",
            ImageRef::from("root.jpg"),
            store,
            &mut backend,
            &ViewerConfig::default(),
        )
        .unwrap();

        session.navigate_to(SceneId::Main);
        assert!(!log.borrow().iter().any(|l| l.starts_with("load")));

        session.navigate_to(SceneId::Hotspot(a));
        assert!(log.borrow().iter().any(|l| l.starts_with("load")));
        // The tracker waits for the viewer's own scene-change report.
        assert_eq!(session.current_scene(), SceneId::Main);
    }

    #[test]
    fn navigate_to_unknown_scene_is_ignored() {
        let (store, _, _) = store_with_rooms();
        let mut backend = MockBackend::new();
        let log = Rc::clone(&backend.log);
        let mut session = ViewerSession::open(
            "Demo",
            ImageRef::from("root.jpg"),
            store,
            &mut backend,
            &ViewerConfig::default(),
        )
        .unwrap();

        session.navigate_to(SceneId::Hotspot(HotspotId::from_u32(999)));
        assert!(!log.borrow().iter().any(|l| l.starts_with("load")));
    }

    #[test]
    fn breadcrumb_reflects_navigation_state() {
        let (store, a, b) = store_with_rooms();
        let mut backend = MockBackend::new();
        let mut session = ViewerSession::open(
            "Demo",
            ImageRef::from("root.jpg"),
            store,
            &mut backend,
            &ViewerConfig::default(),
        )
        .unwrap();

        let at_main = session.breadcrumb();
        assert_eq!(at_main.len(), 2);
        assert_eq!(at_main[1].scene, SceneId::Hotspot(a));

        session.handle_event(ViewerEvent::SceneChanged(SceneId::Hotspot(b)));
        let at_b = session.breadcrumb();
        let b_button = at_b.iter().find(|btn| btn.scene == SceneId::Hotspot(b)).unwrap();
        assert_eq!(b_button.state, panovia_core::NavState::Active);
    }

    #[test]
    fn close_destroys_the_viewer() {
        let (store, _, _) = store_with_rooms();
        let mut backend = MockBackend::new();
        let log = Rc::clone(&backend.log);
        let session = ViewerSession::open(
            "Demo",
            ImageRef::from("root.jpg"),
            store,
            &mut backend,
            &ViewerConfig::default(),
        )
        .unwrap();
        session.close();
        assert_eq!(log.borrow().last().unwrap(), "destroy");
    }
}
