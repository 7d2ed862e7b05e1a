//! Catalog view computation: role filter, free-text search, timeline sort.
//!
//! Everything here is pure and synchronous. Callers pass an immutable
//! snapshot of the repository contents and get back a new, display-ordered
//! vector, so concurrent views over one shared snapshot need no locking.
//!
//! Filtering happens in memory over a full listing. That is fine for the
//! catalog sizes this service targets; a large catalog would want the
//! repository to pre-filter with the same semantics.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::user_type::UserType;

/// Filter / search / sort choices for one catalog render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParameters {
    /// Keep only profiles of this type. `None` keeps everything.
    #[serde(default)]
    pub role_filter: Option<UserType>,
    /// Case-insensitive substring matched against name, location and
    /// catalog. Blank after trimming means no search.
    #[serde(default)]
    pub search_term: String,
    /// Sort ascending by `timeline` instead of repository order.
    #[serde(default)]
    pub sort_by_timeline: bool,
}

impl ViewParameters {
    pub fn with_role(mut self, role: UserType) -> Self {
        self.role_filter = Some(role);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn sorted_by_timeline(mut self) -> Self {
        self.sort_by_timeline = true;
        self
    }
}

/// Trim and lowercase a search term. Returns `None` when nothing is left.
pub fn normalize_search_term(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Does `profile` pass the role filter?
pub fn matches_role(profile: &Profile, role_filter: Option<UserType>) -> bool {
    role_filter.map_or(true, |role| profile.user_type == role)
}

/// Does `profile` contain the already-normalised `needle` in one of its
/// searchable fields?
pub fn matches_search(profile: &Profile, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    [&profile.name, &profile.location, &profile.catalog]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Produce the ordered list of profiles to display.
///
/// Filter keeps repository order; the optional timeline sort is stable, so
/// profiles with equal timelines keep their relative repository order too.
pub fn compute_view(profiles: &[Profile], params: &ViewParameters) -> Vec<Profile> {
    let needle = normalize_search_term(&params.search_term);

    let mut view: Vec<Profile> = profiles
        .iter()
        .filter(|p| matches_role(p, params.role_filter))
        .filter(|p| matches_search(p, needle.as_deref()))
        .cloned()
        .collect();

    if params.sort_by_timeline {
        view.sort_by(|a, b| a.timeline.cmp(&b.timeline));
    }

    view
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
