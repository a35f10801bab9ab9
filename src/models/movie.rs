use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Stored movie entity. Ids are assigned by the store and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub year: i32,
    pub rating: f32,
    pub category: String,
}

fn default_rating() -> f32 {
    5.0
}

fn default_category() -> String {
    "No category".to_string()
}

/// Creation payload. Field constraints are stricter than the stored
/// entity; the store assigns the id.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = title_differs_from_overview))]
pub struct MovieCreate {
    #[validate(length(min = 2, max = 60, message = "title must be between 2 and 60 characters"))]
    pub title: String,

    #[validate(length(min = 15, message = "overview must be at least 15 characters"))]
    pub overview: String,

    #[validate(range(min = 1901, max = 2100, message = "year must be after 1900 and at most 2100"))]
    pub year: i32,

    #[serde(default = "default_rating")]
    #[validate(range(
        exclusive_min = 0.0,
        max = 10.0,
        message = "rating must be greater than 0 and at most 10"
    ))]
    pub rating: f32,

    #[serde(default = "default_category")]
    #[validate(length(min = 5, max = 40, message = "category must be between 5 and 40 characters"))]
    pub category: String,
}

// Runs only once every per-field constraint has passed.
fn title_differs_from_overview(payload: &MovieCreate) -> Result<(), ValidationError> {
    if payload.title == payload.overview {
        let mut err = ValidationError::new("title_equals_overview");
        err.message = Some("title must not be identical to overview".into());
        return Err(err);
    }
    Ok(())
}

/// Partial update payload. A field left out of the request keeps its
/// stored value; fields that are supplied must satisfy the creation
/// constraints. Unknown fields are rejected outright.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MovieUpdate {
    #[validate(length(min = 2, max = 60, message = "title must be between 2 and 60 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 15, message = "overview must be at least 15 characters"))]
    pub overview: Option<String>,

    #[validate(range(min = 1901, max = 2100, message = "year must be after 1900 and at most 2100"))]
    pub year: Option<i32>,

    #[validate(range(
        exclusive_min = 0.0,
        max = 10.0,
        message = "rating must be greater than 0 and at most 10"
    ))]
    pub rating: Option<f32>,

    #[validate(length(min = 5, max = 40, message = "category must be between 5 and 40 characters"))]
    pub category: Option<String>,
}

impl MovieUpdate {
    /// Merge the supplied fields into an existing entity. The field set is
    /// fixed here; anything else was already rejected at deserialization.
    pub fn apply_to(&self, movie: &mut Movie) {
        if let Some(title) = &self.title {
            movie.title = title.clone();
        }
        if let Some(overview) = &self.overview {
            movie.overview = overview.clone();
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
        if let Some(category) = &self.category {
            movie.category = category.clone();
        }
    }
}
