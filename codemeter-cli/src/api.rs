//! HTTP client for a running CodeMeter server.

use crate::CliResult;
use clap::Args;
use codemeter_core::{AnalysisReport, AnalysisSource};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// CLI arguments selecting the server.
#[derive(Args, Clone, Debug)]
pub struct ServerArgs {
    /// Base URL of the CodeMeter server.
    #[arg(long, env = "CODEMETER_API_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,
}

/// Payload for `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// Source text.
    pub code: String,
    /// Language tag.
    pub language: String,
    /// Target company.
    pub target_company: String,
    /// Submitting user.
    pub user_id: String,
    /// Optional title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Stored analysis as served by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    /// Analysis identifier.
    pub id: String,
    /// Submission title.
    pub title: String,
    /// Language tag.
    pub language: String,
    /// Target company.
    pub target_company: String,
    /// Score, 0-100.
    pub overall_score: i32,
    /// Full report.
    pub analysis_result: AnalysisReport,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Stored analysis.
    pub analysis: StoredAnalysis,
    /// Engine that produced the report.
    pub source: AnalysisSource,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Stored analysis.
    pub analysis: StoredAnalysis,
    /// Author name.
    pub user_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeaderboardResponse {
    leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Normalize the server URL for consistent API requests.
pub fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Build the HTTP client used for server calls.
pub fn build_client() -> CliResult<Client> {
    Ok(Client::builder().user_agent("codemeter-cli").build()?)
}

/// Submit code for analysis and storage.
pub async fn submit_analysis(
    client: &Client,
    server_url: &str,
    request: &SubmitRequest,
) -> CliResult<SubmitResponse> {
    log::info!("submitting {} code to {server_url}", request.language);
    let response = client
        .post(format!("{server_url}/api/analyze"))
        .json(request)
        .send()
        .await?;
    let response = check_status(response).await?;
    Ok(response.json::<SubmitResponse>().await?)
}

/// Fetch the top analyses.
pub async fn fetch_leaderboard(
    client: &Client,
    server_url: &str,
    limit: u32,
) -> CliResult<Vec<LeaderboardEntry>> {
    let response = client
        .get(format!("{server_url}/api/leaderboard"))
        .query(&[("limit", limit.to_string())])
        .send()
        .await?;
    let response = check_status(response).await?;
    Ok(response.json::<LeaderboardResponse>().await?.leaderboard)
}

async fn check_status(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|error| error.error)
        .unwrap_or(body);
    Err(format!("server returned {status}: {message}").into())
}
