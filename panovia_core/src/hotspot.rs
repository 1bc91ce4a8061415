//! Hotspot records: authored points of interest on a panorama, optionally
//! connected to another panorama. Geometry is always coerced into range,
//! never rejected.

use panovia_ids::{HotspotId, SceneId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Reference to a panorama image (URL or data URL). Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(Arc<str>);

impl ImageRef {
    pub fn new(reference: impl Into<Arc<str>>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Data URLs run to megabytes; show a prefix only.
        match self.0.get(..48) {
            Some(prefix) if self.0.len() > 48 => write!(f, "ImageRef({prefix:?}…)"),
            _ => write!(f, "ImageRef({:?})", &*self.0),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Presentational marker style. Affects only how the rendered marker looks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotKind {
    #[default]
    Normal,
    Door,
}

/// Wrap a yaw angle into `[0, 360)` degrees.
#[inline]
pub fn wrap_yaw(yaw: f32) -> f32 {
    ((yaw % 360.0) + 360.0) % 360.0
}

/// Clamp a pitch angle into `[-90, 90]` degrees.
#[inline]
pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-90.0, 90.0)
}

/// An authored point of interest. `id` and `parent` are fixed by the store at
/// insertion time; position only moves through the coercing mutators.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    #[serde(default)]
    id: HotspotId,
    pitch: f32,
    yaw: f32,
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: HotspotKind,
    #[serde(default)]
    pub target_image: Option<ImageRef>,
    #[serde(rename = "parentId", default)]
    parent: Option<HotspotId>,
}

impl Hotspot {
    /// New unattached hotspot draft. The store assigns id and parent on
    /// insertion.
    pub fn new(pitch: f32, yaw: f32, text: impl Into<String>) -> Self {
        Self {
            id: HotspotId::nil(),
            pitch: clamp_pitch(pitch),
            yaw: wrap_yaw(yaw),
            text: text.into(),
            kind: HotspotKind::default(),
            target_image: None,
            parent: None,
        }
    }

    pub fn with_kind(mut self, kind: HotspotKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_target(mut self, image: ImageRef) -> Self {
        self.target_image = Some(image);
        self
    }

    #[inline]
    pub fn id(&self) -> HotspotId {
        self.id
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn parent(&self) -> Option<HotspotId> {
        self.parent
    }

    /// A hotspot is connected once a target panorama has been attached.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.target_image.is_some()
    }

    /// The scene this hotspot leads into.
    #[inline]
    pub fn scene_id(&self) -> SceneId {
        SceneId::Hotspot(self.id)
    }

    /// Move by a delta; yaw wraps, pitch clamps.
    pub fn nudge(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = wrap_yaw(self.yaw + delta_yaw);
        self.pitch = clamp_pitch(self.pitch + delta_pitch);
    }

    /// Place at an absolute position; same coercion as `nudge`.
    pub fn place_at(&mut self, pitch: f32, yaw: f32) {
        self.pitch = clamp_pitch(pitch);
        self.yaw = wrap_yaw(yaw);
    }

    pub(crate) fn attach(&mut self, id: HotspotId, parent: Option<HotspotId>) {
        self.id = id;
        self.parent = parent;
    }
}
