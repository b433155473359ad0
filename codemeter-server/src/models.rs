//! Database models for CodeMeter server.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::{code_analyses, user_progress, users};

#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Selectable)]
#[diesel(table_name = users)]
/// User account that owns analyses.
pub struct User {
    /// User identifier.
    pub id: String,
    /// Contact email.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
    /// Last update timestamp.
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Associations, Selectable)]
#[diesel(table_name = code_analyses)]
#[diesel(belongs_to(User, foreign_key = user_id))]
/// Stored analysis of one submission.
pub struct CodeAnalysis {
    /// Analysis identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Submission title.
    pub title: String,
    /// Submitted source text.
    pub code: String,
    /// Declared language tag.
    pub language: String,
    /// Target company.
    pub target_company: String,
    /// Score, 0-100.
    pub overall_score: i32,
    /// Time complexity label.
    pub time_complexity: String,
    /// Space complexity label.
    pub space_complexity: String,
    /// Full report serialized as JSON.
    pub analysis_result: String,
    /// Uploaded file location, if any.
    pub file_url: Option<String>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Associations, Selectable)]
#[diesel(table_name = user_progress)]
#[diesel(belongs_to(User, foreign_key = user_id))]
/// Aggregate statistics for a user.
pub struct UserProgress {
    /// Progress row identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Number of analyses submitted.
    pub total_analyses: i32,
    /// Mean score, rounded to two decimals.
    pub average_score: f64,
    /// Highest score seen.
    pub best_score: i32,
    /// Language of the latest submission.
    pub favorite_language: Option<String>,
    /// Companies targeted by the latest submission.
    pub target_companies: Vec<String>,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
    /// Last update timestamp.
    pub updated_at: NaiveDateTime,
}
