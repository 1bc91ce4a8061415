//! The project registry: an ordered map of records keyed by slug, with the
//! create/update lifecycle and its validation rules.

use crate::record::{NewProject, ProjectRecord, ProjectUpdate};
use crate::slug::slugify;
use crate::storage::ProjectStore;
use chrono::Utc;
use indexmap::IndexMap;
use log::warn;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ProjectError {
    /// A required field was missing or empty; nothing was mutated.
    Validation(&'static str),
    /// A project with this slug already exists (creation only).
    Duplicate(String),
    /// No project under this slug.
    Unknown(String),
}

impl Display for ProjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(field) => write!(f, "missing required field `{field}`"),
            Self::Duplicate(slug) => write!(f, "project already exists: {slug}"),
            Self::Unknown(slug) => write!(f, "no project named {slug}"),
        }
    }
}

impl std::error::Error for ProjectError {}

#[derive(Default)]
pub struct ProjectRegistry {
    projects: IndexMap<String, ProjectRecord>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the persistence collaborator. Storage failure is non-fatal:
    /// the registry starts empty and memory stays authoritative.
    pub fn load(store: &impl ProjectStore) -> Self {
        match store.load_all() {
            Ok(projects) => Self { projects },
            Err(err) => {
                warn!("could not load projects, starting empty: {err}");
                Self::new()
            }
        }
    }

    /// Write the current map out. A failure is logged and swallowed; the
    /// in-memory state remains the source of truth for this session.
    pub fn persist(&self, store: &impl ProjectStore) {
        if let Err(err) = store.save_all(&self.projects) {
            warn!("could not save projects, keeping in-memory state: {err}");
        }
    }

    /// Create a project. Validation happens before any mutation; duplicate
    /// slugs are rejected on creation only.
    pub fn create(&mut self, new: NewProject) -> Result<String, ProjectError> {
        let slug = slugify(&new.name);
        if slug.is_empty() {
            return Err(ProjectError::Validation("name"));
        }
        if new.title.trim().is_empty() {
            return Err(ProjectError::Validation("title"));
        }
        let Some(image) = new.image else {
            return Err(ProjectError::Validation("image"));
        };
        if self.projects.contains_key(&slug) {
            return Err(ProjectError::Duplicate(slug));
        }

        self.projects.insert(
            slug.clone(),
            ProjectRecord {
                password: new.password,
                image,
                title: new.title,
                hotspots: Vec::new(),
                logo: new.logo,
                created_at: Utc::now(),
            },
        );
        Ok(slug)
    }

    /// Apply a partial update. Renaming moves the record to the new slug;
    /// `created_at` and any field left as `None` carry over. Returns the
    /// (possibly new) slug.
    pub fn update(&mut self, slug: &str, changes: ProjectUpdate) -> Result<String, ProjectError> {
        if !self.projects.contains_key(slug) {
            return Err(ProjectError::Unknown(slug.to_string()));
        }

        // Validate before touching the record.
        let new_slug = match &changes.name {
            Some(name) => {
                let s = slugify(name);
                if s.is_empty() {
                    return Err(ProjectError::Validation("name"));
                }
                s
            }
            None => slug.to_string(),
        };
        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(ProjectError::Validation("title"));
            }
        }

        // A rename moves the record to its new slug at the end of the map;
        // otherwise the record keeps its position.
        if new_slug != slug {
            if let Some(record) = self.projects.shift_remove(slug) {
                self.projects.insert(new_slug.clone(), record);
            }
        }
        let record = match self.projects.get_mut(&new_slug) {
            Some(record) => record,
            None => return Err(ProjectError::Unknown(slug.to_string())),
        };

        if let Some(password) = changes.password {
            record.password = password;
        }
        if let Some(title) = changes.title {
            record.title = title;
        }
        if let Some(image) = changes.image {
            record.image = image;
        }
        if let Some(logo) = changes.logo {
            record.logo = logo;
        }
        if let Some(hotspots) = changes.hotspots {
            record.hotspots = hotspots;
        }

        Ok(new_slug)
    }

    pub fn remove(&mut self, slug: &str) -> Option<ProjectRecord> {
        self.projects.shift_remove(slug)
    }

    pub fn get(&self, slug: &str) -> Option<&ProjectRecord> {
        self.projects.get(slug)
    }

    /// Plain credential comparison against the stored record. Hardening is a
    /// collaborator concern, not this registry's.
    pub fn verify_password(&self, slug: &str, password: &str) -> bool {
        self.projects
            .get(slug)
            .is_some_and(|record| record.password == password)
    }

    /// Projects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProjectRecord)> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
