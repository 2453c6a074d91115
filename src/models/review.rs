use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ReviewStatus;

/// The listing a review belongs to.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ReviewSubject {
    Land(String),
    House(String),
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum InvalidReview {
    #[error("review {0} references both a land and a house")]
    BothSubjects(String),

    #[error("review {0} references neither a land nor a house")]
    NoSubject(String),

    #[error("review {id} has rating {rating}, expected 1-5")]
    Rating { id: String, rating: u8 },
}

impl ReviewSubject {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Land(_) => "land",
            Self::House(_) => "house",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Land(id) | Self::House(id) => id,
        }
    }

    fn into_columns(self) -> (Option<String>, Option<String>) {
        match self {
            Self::Land(id) => (Some(id), None),
            Self::House(id) => (None, Some(id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReviewRecord", into = "ReviewRecord")]
pub struct Review {
    pub id: String,
    pub rating: u8,
    pub comment: String,
    pub reviewer_name: Option<String>,
    pub reviewer_email: Option<String>,
    pub status: ReviewStatus,
    pub verified: bool,
    pub subject: ReviewSubject,
    pub created_at: Option<DateTime<Utc>>,
}

/// Wire shape: the backend links a review through two nullable foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewRecord {
    id: String,
    rating: u8,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    reviewer_name: Option<String>,
    #[serde(default)]
    reviewer_email: Option<String>,
    #[serde(default)]
    status: ReviewStatus,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    land_id: Option<String>,
    #[serde(default)]
    house_id: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReviewRecord> for Review {
    type Error = InvalidReview;

    fn try_from(record: ReviewRecord) -> Result<Self, Self::Error> {
        if !(1..=5).contains(&record.rating) {
            return Err(InvalidReview::Rating {
                id: record.id,
                rating: record.rating,
            });
        }

        let subject = match (record.land_id, record.house_id) {
            (Some(land), None) => ReviewSubject::Land(land),
            (None, Some(house)) => ReviewSubject::House(house),
            (Some(_), Some(_)) => return Err(InvalidReview::BothSubjects(record.id)),
            (None, None) => return Err(InvalidReview::NoSubject(record.id)),
        };

        Ok(Review {
            id: record.id,
            rating: record.rating,
            comment: record.comment,
            reviewer_name: record.reviewer_name,
            reviewer_email: record.reviewer_email,
            status: record.status,
            verified: record.verified,
            subject,
            created_at: record.created_at,
        })
    }
}

impl From<Review> for ReviewRecord {
    fn from(review: Review) -> Self {
        let (land_id, house_id) = review.subject.into_columns();
        ReviewRecord {
            id: review.id,
            rating: review.rating,
            comment: review.comment,
            reviewer_name: review.reviewer_name,
            reviewer_email: review.reviewer_email,
            status: review.status,
            verified: review.verified,
            land_id,
            house_id,
            created_at: review.created_at,
        }
    }
}

/// A visitor-submitted review, before moderation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub rating: u8,
    pub comment: String,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub subject: ReviewSubject,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewReviewBody<'a> {
    rating: u8,
    comment: &'a str,
    reviewer_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviewer_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    land_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    house_id: Option<&'a str>,
}

impl NewReview {
    pub fn to_json(&self) -> serde_json::Value {
        let (land_id, house_id) = match &self.subject {
            ReviewSubject::Land(id) => (Some(id.as_str()), None),
            ReviewSubject::House(id) => (None, Some(id.as_str())),
        };

        let body = NewReviewBody {
            rating: self.rating,
            comment: self.comment.trim(),
            reviewer_name: self.reviewer_name.trim(),
            reviewer_email: self.reviewer_email.as_deref().map(str::trim),
            land_id,
            house_id,
        };

        serde_json::to_value(body).unwrap_or(serde_json::Value::Null)
    }
}
