//! Profile records and rating aggregation.
//!
//! A [`Profile`] is the listing a customer, designer or carpenter publishes.
//! Its `rating` is always the mean of `reviews` rounded to one decimal, and
//! the only way to change either is [`submit_rating`], whose result is
//! persisted through a [`ProfilePatch`] carrying a [`RatingUpdate`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::user_type::UserType;

/// Lowest accepted review score.
pub const MIN_SCORE: i64 = 1;

/// Highest accepted review score.
pub const MAX_SCORE: i64 = 5;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A persisted profile.
///
/// Free-text fields default to an empty string when absent from the stored
/// document, so search and sort never have to deal with missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: DbId,
    /// Account that created the profile. `None` for rows imported without one.
    #[serde(default)]
    pub owner_id: Option<DbId>,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    /// Free-form availability text. Also the catalog sort key.
    #[serde(default)]
    pub timeline: String,
    /// Category label, e.g. `"Kitchen"`.
    #[serde(default)]
    pub catalog: String,
    pub user_type: UserType,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: Vec<u8>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Everything needed to insert a profile. The repository assigns `id` and
/// timestamps; `rating` starts at 0 and `reviews` empty.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub owner_id: Option<DbId>,
    pub name: String,
    pub location: String,
    pub description: String,
    pub timeline: String,
    pub catalog: String,
    pub user_type: UserType,
    pub photo_urls: Vec<String>,
    pub video_url: Option<String>,
    pub profile_pic_url: Option<String>,
}

/// A rating/reviews pair that satisfies the averaging invariant.
///
/// Cannot be built directly outside this crate: use
/// [`ProfilePatch::rating_of`] on a profile returned by [`submit_rating`].
#[derive(Debug, Clone, PartialEq)]
pub struct RatingUpdate {
    reviews: Vec<u8>,
    rating: f64,
}

impl RatingUpdate {
    pub fn reviews(&self) -> &[u8] {
        &self.reviews
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }
}

/// Partial update for an existing profile. Only `Some` fields are applied.
///
/// Deserialised from `PATCH` bodies; `rating` is never read from input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub timeline: Option<String>,
    pub catalog: Option<String>,
    #[serde(skip)]
    pub rating: Option<RatingUpdate>,
}

impl ProfilePatch {
    /// Patch that persists the rating state of `profile`.
    ///
    /// The stored average is recomputed from `reviews`, so the pair written
    /// is consistent whatever `profile.rating` holds.
    pub fn rating_of(profile: &Profile) -> Self {
        Self {
            rating: Some(RatingUpdate {
                rating: average_rating(&profile.reviews),
                reviews: profile.reviews.clone(),
            }),
            ..Self::default()
        }
    }

    /// `true` when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.timeline.is_none()
            && self.catalog.is_none()
            && self.rating.is_none()
    }

    /// Reject a patch that would blank the profile name.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        Ok(())
    }

    /// Apply the patch in place. Used by repositories that hold profiles in
    /// memory; SQL repositories translate the patch into `COALESCE` updates.
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(v) = &self.name {
            profile.name = v.trim().to_string();
        }
        if let Some(v) = &self.location {
            profile.location = v.clone();
        }
        if let Some(v) = &self.description {
            profile.description = v.clone();
        }
        if let Some(v) = &self.timeline {
            profile.timeline = v.clone();
        }
        if let Some(v) = &self.catalog {
            profile.catalog = v.clone();
        }
        if let Some(update) = &self.rating {
            profile.reviews = update.reviews.clone();
            profile.rating = update.rating;
        }
    }
}

/// Profile names must contain something other than whitespace.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Profile name must not be empty".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Rating aggregation
// ---------------------------------------------------------------------------

/// Mean of `reviews` rounded half-up to one decimal place, or 0 when empty.
///
/// Computed in integer tenths so the result is exact for any history length.
pub fn average_rating(reviews: &[u8]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u64 = reviews.iter().map(|&s| u64::from(s)).sum();
    let count = reviews.len() as u64;
    // round(sum * 10 / count) with halves rounded up.
    let tenths = (sum * 20 + count) / (2 * count);
    tenths as f64 / 10.0
}

/// Check that `score` is an integer in `[MIN_SCORE, MAX_SCORE]`.
pub fn validate_score(score: i64) -> Result<u8, CoreError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(CoreError::InvalidRating(format!(
            "Score {score} is out of range. Must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    Ok(score as u8)
}

/// Extract an integral score from a JSON value.
///
/// `4` and `4.0` are accepted; `4.5`, strings and `null` are rejected with
/// [`CoreError::InvalidRating`]. Range checking is left to [`validate_score`].
pub fn parse_score(value: &serde_json::Value) -> Result<i64, CoreError> {
    let invalid = || CoreError::InvalidRating(format!("Score must be an integer, got {value}"));
    let serde_json::Value::Number(number) = value else {
        return Err(invalid());
    };
    if let Some(i) = number.as_i64() {
        return Ok(i);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid()),
    }
}

/// Append `score` to the profile's reviews and recompute its rating.
///
/// Returns the updated profile; the input is left untouched, so a rejected
/// score never mutates anything.
pub fn submit_rating(profile: &Profile, score: i64) -> Result<Profile, CoreError> {
    let score = validate_score(score)?;
    let mut updated = profile.clone();
    updated.reviews.push(score);
    updated.rating = average_rating(&updated.reviews);
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
