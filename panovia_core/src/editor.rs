//! Authoring session: a cursor over the hotspot forest used while building a
//! tour, with live-preview side effects routed through [`MarkerSink`].
//!
//! The session owns the store for the duration of editing. Placement only
//! happens in placing mode and under the current scene context, so parents
//! always point at hotspots that were connected before they were entered —
//! the forest stays acyclic by construction.

use crate::hotspot::{Hotspot, HotspotKind, ImageRef};
use crate::scene_graph::LinkStyle;
use crate::store::HotspotStore;
use log::debug;
use panovia_ids::HotspotId;
use std::fmt::{Display, Formatter};

/// A visual marker mirrored into the live preview.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: HotspotId,
    pub pitch: f32,
    pub yaw: f32,
    pub label: String,
    pub style: LinkStyle,
}

impl Marker {
    pub fn of(hotspot: &Hotspot) -> Self {
        Self {
            id: hotspot.id(),
            pitch: hotspot.pitch(),
            yaw: hotspot.yaw(),
            label: hotspot.text.clone(),
            style: hotspot.kind.into(),
        }
    }
}

/// Receiver of live-preview side effects. Implemented by viewer handles and
/// by test doubles.
pub trait MarkerSink {
    fn add_marker(&mut self, marker: &Marker);
    fn remove_marker(&mut self, id: HotspotId);
    fn set_panorama(&mut self, image: &ImageRef);
}

#[derive(Debug)]
pub enum EditorError {
    /// `place_hotspot` called while placing mode is off.
    NotPlacing,
    /// `enter` on a hotspot that has no target panorama yet.
    Unconnected(HotspotId),
    /// `exit` while already at the root scene.
    AtRoot,
    /// Operation on an id the store does not hold.
    UnknownHotspot(HotspotId),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPlacing => write!(f, "not in placing mode"),
            Self::Unconnected(id) => {
                write!(f, "hotspot {id} has no target panorama to enter")
            }
            Self::AtRoot => write!(f, "already at the root scene"),
            Self::UnknownHotspot(id) => write!(f, "no hotspot with id {id}"),
        }
    }
}

impl std::error::Error for EditorError {}

pub struct EditorSession {
    store: HotspotStore,
    root_image: ImageRef,
    current_parent: Option<HotspotId>,
    placing: bool,
}

impl EditorSession {
    /// Fresh session for a new project.
    pub fn new(root_image: ImageRef) -> Self {
        Self::with_store(root_image, HotspotStore::new())
    }

    /// Session over an existing project's hotspots (edit flow).
    pub fn with_store(root_image: ImageRef, store: HotspotStore) -> Self {
        Self {
            store,
            root_image,
            current_parent: None,
            placing: false,
        }
    }

    #[inline]
    pub fn store(&self) -> &HotspotStore {
        &self.store
    }

    /// Hand the edited store back (to persist into a project record).
    pub fn into_store(self) -> HotspotStore {
        self.store
    }

    #[inline]
    pub fn current_parent(&self) -> Option<HotspotId> {
        self.current_parent
    }

    #[inline]
    pub fn is_placing(&self) -> bool {
        self.placing
    }

    /// Toggle placing mode. Turning it off simply disarms the next placement.
    pub fn set_placing(&mut self, on: bool) {
        self.placing = on;
    }

    /// The panorama of the scene currently being edited.
    pub fn current_image(&self) -> &ImageRef {
        self.current_parent
            .and_then(|id| self.store.get(id))
            .and_then(|h| h.target_image.as_ref())
            .unwrap_or(&self.root_image)
    }

    /// Hotspots placed in the scene currently being edited, in order.
    pub fn visible_hotspots(&self) -> impl Iterator<Item = &Hotspot> {
        self.store.children_of(self.current_parent)
    }

    /// Place a new hotspot at a clicked position. Requires placing mode;
    /// placement disarms it again.
    pub fn place_hotspot(
        &mut self,
        pitch: f32,
        yaw: f32,
        sink: &mut impl MarkerSink,
    ) -> Result<HotspotId, EditorError> {
        if !self.placing {
            return Err(EditorError::NotPlacing);
        }
        let label = format!("Point {}", self.store.len() + 1);
        let draft = Hotspot::new(pitch, yaw, label);
        let id = self.store.insert(draft, self.current_parent);
        let hotspot = self.store.get(id).expect("just inserted");
        sink.add_marker(&Marker::of(hotspot));
        self.placing = false;
        debug!("placed hotspot {id} under {:?}", self.current_parent);
        Ok(id)
    }

    /// Connect a hotspot to its target panorama. Does not change the scene
    /// context.
    pub fn connect_image(&mut self, id: HotspotId, image: ImageRef) -> Result<(), EditorError> {
        let hotspot = self
            .store
            .get_mut(id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        hotspot.target_image = Some(image);
        debug!("connected hotspot {id}");
        Ok(())
    }

    /// Step into a hotspot's scene to author inside it. Only connected
    /// hotspots can be entered.
    pub fn enter(&mut self, id: HotspotId, sink: &mut impl MarkerSink) -> Result<(), EditorError> {
        let hotspot = self.store.get(id).ok_or(EditorError::UnknownHotspot(id))?;
        let image = hotspot
            .target_image
            .clone()
            .ok_or(EditorError::Unconnected(id))?;
        self.current_parent = Some(id);
        sink.set_panorama(&image);
        debug!("entered hotspot {id}");
        Ok(())
    }

    /// Step back out to the parent scene context.
    pub fn exit(&mut self, sink: &mut impl MarkerSink) -> Result<(), EditorError> {
        let here = self.current_parent.ok_or(EditorError::AtRoot)?;
        self.current_parent = self.store.get(here).and_then(|h| h.parent());
        let image = self.current_image().clone();
        sink.set_panorama(&image);
        debug!("exited to {:?}", self.current_parent);
        Ok(())
    }

    /// Move a hotspot by a delta; yaw wraps, pitch clamps.
    pub fn nudge(
        &mut self,
        id: HotspotId,
        delta_yaw: f32,
        delta_pitch: f32,
        sink: &mut impl MarkerSink,
    ) -> Result<(), EditorError> {
        let hotspot = self
            .store
            .get_mut(id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        hotspot.nudge(delta_yaw, delta_pitch);
        let marker = Marker::of(hotspot);
        sink.remove_marker(id);
        sink.add_marker(&marker);
        Ok(())
    }

    /// Drop a hotspot onto an absolute position (e.g. the preview's current
    /// view center).
    pub fn reposition(
        &mut self,
        id: HotspotId,
        pitch: f32,
        yaw: f32,
        sink: &mut impl MarkerSink,
    ) -> Result<(), EditorError> {
        let hotspot = self
            .store
            .get_mut(id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        hotspot.place_at(pitch, yaw);
        let marker = Marker::of(hotspot);
        sink.remove_marker(id);
        sink.add_marker(&marker);
        Ok(())
    }

    pub fn rename(
        &mut self,
        id: HotspotId,
        text: impl Into<String>,
        sink: &mut impl MarkerSink,
    ) -> Result<(), EditorError> {
        let hotspot = self
            .store
            .get_mut(id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        hotspot.text = text.into();
        let marker = Marker::of(hotspot);
        sink.remove_marker(id);
        sink.add_marker(&marker);
        Ok(())
    }

    /// Change the marker style. No structural effect.
    pub fn retype(
        &mut self,
        id: HotspotId,
        kind: HotspotKind,
        sink: &mut impl MarkerSink,
    ) -> Result<(), EditorError> {
        let hotspot = self
            .store
            .get_mut(id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        hotspot.kind = kind;
        let marker = Marker::of(hotspot);
        sink.remove_marker(id);
        sink.add_marker(&marker);
        Ok(())
    }

    /// Remove a hotspot. Descendants stay behind as unreachable orphans.
    pub fn remove(&mut self, id: HotspotId, sink: &mut impl MarkerSink) -> Result<(), EditorError> {
        self.store
            .remove(id)
            .ok_or(EditorError::UnknownHotspot(id))?;
        sink.remove_marker(id);
        Ok(())
    }

    /// Where a preview should aim to show this hotspot.
    pub fn look_target(&self, id: HotspotId) -> Option<(f32, f32)> {
        let h = self.store.get(id)?;
        Some((h.pitch(), h.yaw()))
    }
}
