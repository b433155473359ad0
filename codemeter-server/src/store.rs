//! Persistence for analyses, placeholder users and progress statistics.

use std::fmt;

use chrono::{NaiveDateTime, Utc};
use codemeter_core::AnalysisReport;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel::upsert::excluded;
use uuid::Uuid;

use crate::models::{CodeAnalysis, User, UserProgress};
use crate::schema::{code_analyses, user_progress, users};

const PLACEHOLDER_NAME: &str = "User";

/// Error type for persistence operations.
#[derive(Debug)]
pub enum StoreError {
    /// A database query failed.
    Database(diesel::result::Error),
    /// A report could not be encoded for storage.
    Encode(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(err) => write!(f, "database error: {err}"),
            Self::Encode(err) => write!(f, "encode error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<diesel::result::Error> for StoreError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Database(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A scored submission ready to be stored.
#[derive(Debug, Clone)]
pub struct NewAnalysis<'a> {
    /// Submitting user.
    pub user_id: &'a str,
    /// Submission title.
    pub title: &'a str,
    /// Source text.
    pub code: &'a str,
    /// Declared language tag.
    pub language: &'a str,
    /// Target company.
    pub target_company: &'a str,
    /// The report to store.
    pub report: &'a AnalysisReport,
}

/// Progress values after one more analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTotals {
    /// Number of analyses.
    pub total_analyses: i32,
    /// Mean score rounded to two decimals.
    pub average_score: f64,
    /// Best score.
    pub best_score: i32,
    /// Latest language.
    pub favorite_language: Option<String>,
    /// Latest target company.
    pub target_companies: Vec<String>,
}

/// Fold one new score into a user's running statistics.
pub fn next_progress(
    previous: Option<&UserProgress>,
    score: i32,
    language: &str,
    target_company: &str,
) -> ProgressTotals {
    let (total, average, best) = previous
        .map(|progress| {
            (
                progress.total_analyses,
                progress.average_score,
                progress.best_score,
            )
        })
        .unwrap_or((0, 0.0, 0));
    let total_analyses = total + 1;
    let sum = average * f64::from(total) + f64::from(score);

    ProgressTotals {
        total_analyses,
        average_score: round2(sum / f64::from(total_analyses)),
        best_score: best.max(score),
        favorite_language: Some(language.to_string()),
        target_companies: vec![target_company.to_string()],
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Create a placeholder user row for an id seen for the first time.
pub fn ensure_user(conn: &mut PgConnection, user_id: &str) -> StoreResult<()> {
    let now = Utc::now().naive_utc();
    let placeholder = User {
        id: user_id.to_string(),
        email: placeholder_email(user_id),
        name: Some(PLACEHOLDER_NAME.to_string()),
        created_at: now,
        updated_at: now,
    };
    let inserted = diesel::insert_into(users::table)
        .values(&placeholder)
        .on_conflict(users::id)
        .do_nothing()
        .execute(conn)?;
    if inserted > 0 {
        log::info!("created placeholder user {user_id}");
    }
    Ok(())
}

fn placeholder_email(user_id: &str) -> String {
    format!("{user_id}@users.codemeter.invalid")
}

/// Store an analysis, creating its user first when needed.
pub fn create_analysis(conn: &mut PgConnection, new: &NewAnalysis<'_>) -> StoreResult<CodeAnalysis> {
    let record = CodeAnalysis {
        id: Uuid::new_v4().to_string(),
        user_id: new.user_id.to_string(),
        title: new.title.to_string(),
        code: new.code.to_string(),
        language: new.language.to_string(),
        target_company: new.target_company.to_string(),
        overall_score: i32::from(new.report.overall_score),
        time_complexity: new.report.time_complexity.clone(),
        space_complexity: new.report.space_complexity.clone(),
        analysis_result: serde_json::to_string(new.report)?,
        file_url: None,
        created_at: Utc::now().naive_utc(),
    };

    conn.transaction::<_, StoreError, _>(|conn| {
        ensure_user(conn, new.user_id)?;
        diesel::insert_into(code_analyses::table)
            .values(&record)
            .execute(conn)?;
        Ok(())
    })?;
    Ok(record)
}

/// Look up one analysis by id.
pub fn get_analysis(conn: &mut PgConnection, id: &str) -> StoreResult<Option<CodeAnalysis>> {
    Ok(code_analyses::table
        .filter(code_analyses::id.eq(id))
        .select(CodeAnalysis::as_select())
        .first(conn)
        .optional()?)
}

/// A user's analyses, newest first.
pub fn user_analyses(
    conn: &mut PgConnection,
    user_id: &str,
    limit: i64,
) -> StoreResult<Vec<CodeAnalysis>> {
    Ok(code_analyses::table
        .filter(code_analyses::user_id.eq(user_id))
        .order(code_analyses::created_at.desc())
        .limit(limit)
        .select(CodeAnalysis::as_select())
        .load(conn)?)
}

/// Highest scoring analyses with their author's name; ties go to the newest.
pub fn top_analyses(
    conn: &mut PgConnection,
    limit: i64,
) -> StoreResult<Vec<(CodeAnalysis, Option<String>)>> {
    Ok(code_analyses::table
        .inner_join(users::table)
        .order((
            code_analyses::overall_score.desc(),
            code_analyses::created_at.desc(),
        ))
        .limit(limit)
        .select((CodeAnalysis::as_select(), users::name))
        .load(conn)?)
}

/// Current progress row for a user.
pub fn get_progress(conn: &mut PgConnection, user_id: &str) -> StoreResult<Option<UserProgress>> {
    Ok(user_progress::table
        .filter(user_progress::user_id.eq(user_id))
        .select(UserProgress::as_select())
        .first(conn)
        .optional()?)
}

/// Fold a new analysis into the user's progress row, creating it on first use.
pub fn record_progress(conn: &mut PgConnection, analysis: &CodeAnalysis) -> StoreResult<UserProgress> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let previous = get_progress(conn, &analysis.user_id)?;
        let totals = next_progress(
            previous.as_ref(),
            analysis.overall_score,
            &analysis.language,
            &analysis.target_company,
        );
        let now = Utc::now().naive_utc();
        let row = progress_row(&analysis.user_id, totals, now);

        let stored = diesel::insert_into(user_progress::table)
            .values(&row)
            .on_conflict(user_progress::user_id)
            .do_update()
            .set((
                user_progress::total_analyses.eq(excluded(user_progress::total_analyses)),
                user_progress::average_score.eq(excluded(user_progress::average_score)),
                user_progress::best_score.eq(excluded(user_progress::best_score)),
                user_progress::favorite_language.eq(excluded(user_progress::favorite_language)),
                user_progress::target_companies.eq(excluded(user_progress::target_companies)),
                user_progress::updated_at.eq(now),
            ))
            .returning(UserProgress::as_returning())
            .get_result(conn)?;
        Ok(stored)
    })
}

fn progress_row(user_id: &str, totals: ProgressTotals, now: NaiveDateTime) -> UserProgress {
    UserProgress {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        total_analyses: totals.total_analyses,
        average_score: totals.average_score,
        best_score: totals.best_score,
        favorite_language: totals.favorite_language,
        target_companies: totals.target_companies,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TestDatabase;
    use codemeter_core::{Language, analyze};

    fn progress(total: i32, average: f64, best: i32) -> UserProgress {
        let now = Utc::now().naive_utc();
        UserProgress {
            id: "p-1".to_string(),
            user_id: "u-1".to_string(),
            total_analyses: total,
            average_score: average,
            best_score: best,
            favorite_language: Some("java".to_string()),
            target_companies: vec!["amazon".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn first_analysis_starts_progress() {
        let totals = next_progress(None, 72, "python", "google");
        assert_eq!(totals.total_analyses, 1);
        assert_eq!(totals.average_score, 72.0);
        assert_eq!(totals.best_score, 72);
        assert_eq!(totals.favorite_language.as_deref(), Some("python"));
        assert_eq!(totals.target_companies, vec!["google".to_string()]);
    }

    #[test]
    fn running_average_is_rounded_to_cents() {
        let previous = progress(2, 70.0, 80);
        let totals = next_progress(Some(&previous), 61, "go", "meta");
        assert_eq!(totals.total_analyses, 3);
        // (140 + 61) / 3 = 67.0
        assert_eq!(totals.average_score, 67.0);
        assert_eq!(totals.best_score, 80);

        let previous = progress(2, 70.5, 80);
        let totals = next_progress(Some(&previous), 90, "go", "meta");
        // (141 + 90) / 3 = 77.0
        assert_eq!(totals.average_score, 77.0);
        assert_eq!(totals.best_score, 90);

        let previous = progress(2, 50.0, 50);
        let totals = next_progress(Some(&previous), 51, "go", "meta");
        // 151 / 3 = 50.333...
        assert_eq!(totals.average_score, 50.33);
    }

    #[test]
    fn latest_language_and_company_win() {
        let previous = progress(5, 60.0, 75);
        let totals = next_progress(Some(&previous), 40, "rust", "netflix");
        assert_eq!(totals.favorite_language.as_deref(), Some("rust"));
        assert_eq!(totals.target_companies, vec!["netflix".to_string()]);
    }

    #[test]
    #[ignore = "requires PostgreSQL via TEST_DATABASE_URL or DATABASE_URL"]
    fn stores_analyses_and_progress() {
        let mut test_db = TestDatabase::new();
        let pool = test_db.pool();
        let mut conn = pool.get().expect("conn");

        let report = analyze("x = 1", &Language::Python, "google");
        let first = create_analysis(
            &mut conn,
            &NewAnalysis {
                user_id: "u-1",
                title: "python Analysis",
                code: "x = 1",
                language: "python",
                target_company: "google",
                report: &report,
            },
        )
        .expect("create");
        assert_eq!(first.overall_score, i32::from(report.overall_score));

        let stored = get_analysis(&mut conn, &first.id).expect("get").expect("row");
        let decoded: AnalysisReport =
            serde_json::from_str(&stored.analysis_result).expect("decode");
        assert_eq!(decoded, report);
        assert!(get_analysis(&mut conn, "missing").expect("get").is_none());

        let progress = record_progress(&mut conn, &first).expect("progress");
        assert_eq!(progress.total_analyses, 1);
        let progress = record_progress(&mut conn, &first).expect("progress");
        assert_eq!(progress.total_analyses, 2);
        assert_eq!(progress.best_score, first.overall_score);

        let listed = user_analyses(&mut conn, "u-1", 10).expect("list");
        assert_eq!(listed.len(), 1);
        let top = top_analyses(&mut conn, 5).expect("top");
        assert_eq!(top[0].1.as_deref(), Some(PLACEHOLDER_NAME));
    }
}
