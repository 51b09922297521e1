//! Product reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Email, EmailError, ProductId, ReviewId};

/// A published review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub helpful_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Errors rejecting a review before it is sent to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("rating must be between 1 and 5 (got {0})")]
    RatingOutOfRange(u8),
    #[error("{0} cannot be empty")]
    MissingField(&'static str),
    #[error("comment must be at most {max} characters")]
    CommentTooLong { max: usize },
    #[error("invalid email: {0}")]
    InvalidEmail(String),
}

impl From<EmailError> for ReviewError {
    fn from(err: EmailError) -> Self {
        Self::InvalidEmail(err.to_string())
    }
}

/// A review as submitted by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub rating: u8,
    pub title: String,
    pub comment: String,
    pub name: String,
    pub email: String,
}

impl ReviewSubmission {
    /// Longest accepted comment.
    pub const MAX_COMMENT_LENGTH: usize = 5000;

    /// Validate and normalize the submission.
    ///
    /// Text fields are trimmed and the email is lowercased.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError` if the rating is not 1-5, a text field is blank,
    /// the comment is too long, or the email is malformed.
    pub fn validate(self) -> Result<Self, ReviewError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange(self.rating));
        }

        let title = required(self.title, "title")?;
        let comment = required(self.comment, "comment")?;
        let name = required(self.name, "name")?;

        if comment.chars().count() > Self::MAX_COMMENT_LENGTH {
            return Err(ReviewError::CommentTooLong {
                max: Self::MAX_COMMENT_LENGTH,
            });
        }

        let email = Email::parse(&self.email)?;

        Ok(Self {
            rating: self.rating,
            title,
            comment,
            name,
            email: email.into_inner(),
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String, ReviewError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ReviewError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submission() -> ReviewSubmission {
        ReviewSubmission {
            rating: 4,
            title: "  Solid  ".to_string(),
            comment: "Does what it says.".to_string(),
            name: "Customer 1".to_string(),
            email: "Customer1@Example.com".to_string(),
        }
    }

    #[test]
    fn test_valid_submission_is_normalized() {
        let review = submission().validate().unwrap();
        assert_eq!(review.title, "Solid");
        assert_eq!(review.email, "customer1@example.com");
    }

    #[test]
    fn test_rating_bounds() {
        for rating in [0, 6] {
            let err = ReviewSubmission {
                rating,
                ..submission()
            }
            .validate()
            .unwrap_err();
            assert_eq!(err, ReviewError::RatingOutOfRange(rating));
        }
    }

    #[test]
    fn test_blank_comment_rejected() {
        let err = ReviewSubmission {
            comment: "   ".to_string(),
            ..submission()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ReviewError::MissingField("comment"));
    }

    #[test]
    fn test_bad_email_rejected() {
        let err = ReviewSubmission {
            email: "nobody".to_string(),
            ..submission()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ReviewError::InvalidEmail(_)));
    }
}
