use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 5;
pub const MAX_REVIEW_CHARS: usize = 2000;
pub const MAX_PHOTOS_PER_REVIEW: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PizzeriaRating {
    pub id: Uuid,
    pub pizzeria_id: Uuid,
    pub user_id: Uuid,
    pub overall: i16,
    pub crust: i16,
    pub review: Option<String>,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingSubmission {
    pub overall: i16,
    pub crust: i16,
    pub review: Option<String>,
    pub photos: Vec<String>,
}

impl RatingSubmission {
    /// Returns the first rule the submission breaks, if any.
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.overall) {
            return Err(format!("Overall rating must be between {MIN_SCORE} and {MAX_SCORE}"));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.crust) {
            return Err(format!("Crust rating must be between {MIN_SCORE} and {MAX_SCORE}"));
        }
        if let Some(review) = &self.review {
            if review.chars().count() > MAX_REVIEW_CHARS {
                return Err(format!("Review must be at most {MAX_REVIEW_CHARS} characters"));
            }
        }
        if self.photos.len() > MAX_PHOTOS_PER_REVIEW {
            return Err(format!("At most {MAX_PHOTOS_PER_REVIEW} photos per review"));
        }
        Ok(())
    }
}

impl PizzeriaRating {
    pub fn new(pizzeria_id: Uuid, user_id: Uuid, submission: RatingSubmission) -> Self {
        let now = Utc::now();
        let review = submission
            .review
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Self {
            id: Uuid::new_v4(),
            pizzeria_id,
            user_id,
            overall: submission.overall,
            crust: submission.crust,
            review,
            photos: submission.photos,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingInfo {
    pub average_overall: f64,
    pub average_crust: f64,
    pub count: i64,
    pub user_rating: Option<PizzeriaRating>,
}
