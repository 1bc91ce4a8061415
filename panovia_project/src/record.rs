//! The persisted shape of a project: credentials, panoramas, and the
//! authored hotspots. Serialized field names stay camelCase so existing
//! JSON payloads keep loading.

use chrono::{DateTime, Utc};
use panovia_core::{Hotspot, HotspotStore, ImageRef};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub password: String,
    pub image: ImageRef,
    pub title: String,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
    #[serde(default)]
    pub logo: Option<ImageRef>,
    pub created_at: DateTime<Utc>,
}

impl ProjectRecord {
    /// Rebuild the hotspot store for viewing or editing this project.
    pub fn hotspot_store(&self) -> HotspotStore {
        HotspotStore::from_hotspots(self.hotspots.iter().cloned())
    }
}

/// Input for creating a project. `name` is the raw display name; the
/// registry derives the slug.
#[derive(Clone, Debug)]
pub struct NewProject {
    pub name: String,
    pub password: String,
    pub title: String,
    pub image: Option<ImageRef>,
    pub logo: Option<ImageRef>,
}

/// Partial update applied to an existing project. `None` keeps the current
/// value; `logo: Some(None)` removes the logo.
#[derive(Clone, Debug, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
    pub title: Option<String>,
    pub image: Option<ImageRef>,
    pub logo: Option<Option<ImageRef>>,
    pub hotspots: Option<Vec<Hotspot>>,
}
