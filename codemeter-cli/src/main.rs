#![deny(missing_docs)]
//! CodeMeter command-line interface.
//!
//! Scores local source files offline, or submits them to a CodeMeter server.

mod api;

use api::{LeaderboardEntry, ServerArgs, SubmitRequest};
use clap::{Args, Parser, Subcommand, ValueEnum};
use codemeter_core::{
    AnalysisSource, Language, SubmissionReport, analyze, render_json, render_markdown, render_text,
};
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_COMPANY: &str = "google";

#[derive(Parser)]
#[command(name = "codemeter", version, about = "CodeMeter CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
struct SubmissionArgs {
    /// Source file to score.
    file: PathBuf,
    /// Language tag; inferred from the file extension when omitted.
    #[arg(short, long)]
    language: Option<String>,
    /// Company whose interview bar is applied.
    #[arg(short, long, default_value = DEFAULT_COMPANY)]
    company: String,
}

#[derive(Args, Clone, Debug)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a local file with the built-in heuristic engine.
    Analyze {
        #[command(flatten)]
        submission: SubmissionArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Send a file to a CodeMeter server for analysis and storage.
    Submit {
        #[command(flatten)]
        submission: SubmissionArgs,
        /// User that owns the analysis.
        #[arg(long, env = "CODEMETER_USER_ID")]
        user_id: String,
        /// Title stored with the analysis.
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        server: ServerArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Show the highest scoring analyses on a CodeMeter server.
    Leaderboard {
        /// Number of entries to show.
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[command(flatten)]
        server: ServerArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { submission, report } => run_analyze(submission, report).await?,
        Commands::Submit {
            submission,
            user_id,
            title,
            server,
            report,
        } => run_submit(submission, user_id, title, server, report).await?,
        Commands::Leaderboard {
            limit,
            server,
            report,
        } => run_leaderboard(limit, server, report).await?,
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

async fn run_analyze(submission: SubmissionArgs, report: OutputArgs) -> CliResult<()> {
    let code = tokio::fs::read_to_string(&submission.file).await?;
    let language = resolve_language(submission.language.as_deref(), &submission.file)?;
    log::info!(
        "analyzing {} as {language} for {}",
        submission.file.display(),
        submission.company
    );

    let analysis = analyze(&code, &language, &submission.company);
    let subject = subject_name(&submission.file);
    let submission = SubmissionReport::new(
        subject,
        language,
        submission.company,
        AnalysisSource::Heuristic,
        analysis,
    );
    emit_submission(&submission, &report).await
}

async fn run_submit(
    submission: SubmissionArgs,
    user_id: String,
    title: Option<String>,
    server: ServerArgs,
    report: OutputArgs,
) -> CliResult<()> {
    let server_url = api::normalize_server_url(&server.server_url)?;
    let user_id = user_id.trim().to_string();
    if user_id.is_empty() {
        return Err("user id is required".into());
    }
    let code = tokio::fs::read_to_string(&submission.file).await?;
    let language = resolve_language(submission.language.as_deref(), &submission.file)?;

    let request = SubmitRequest {
        code,
        language: language.to_string(),
        target_company: submission.company.clone(),
        user_id,
        title,
    };
    let client = api::build_client()?;
    let response = api::submit_analysis(&client, &server_url, &request).await?;
    log::info!("stored analysis {}", response.analysis.id);

    let stored = response.analysis;
    let submission = SubmissionReport::new(
        stored.title,
        Language::parse(&stored.language),
        stored.target_company,
        response.source,
        stored.analysis_result,
    );
    emit_submission(&submission, &report).await
}

async fn run_leaderboard(limit: u32, server: ServerArgs, report: OutputArgs) -> CliResult<()> {
    let server_url = api::normalize_server_url(&server.server_url)?;
    let client = api::build_client()?;
    let entries = api::fetch_leaderboard(&client, &server_url, limit).await?;
    let contents = match report.format {
        OutputFormat::Text => render_leaderboard_text(&entries),
        OutputFormat::Markdown => render_leaderboard_markdown(&entries),
        OutputFormat::Json => render_json(&entries)?,
    };
    emit_output(&report, contents).await
}

/// Map a file extension to a language tag.
fn infer_language(path: &Path) -> Option<Language> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match extension.as_str() {
        "py" => Language::Python,
        "js" | "jsx" | "ts" | "tsx" | "mjs" => Language::Javascript,
        "java" => Language::Java,
        "cpp" | "cc" | "cxx" | "hpp" => Language::Cpp,
        "c" | "h" => Language::C,
        "go" => Language::Go,
        "rs" => Language::Rust,
        _ => return None,
    };
    Some(language)
}

fn resolve_language(explicit: Option<&str>, path: &Path) -> CliResult<Language> {
    match explicit.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Ok(Language::parse(value)),
        None => infer_language(path).ok_or_else(|| {
            format!(
                "cannot infer a language for {}; pass --language",
                path.display()
            )
            .into()
        }),
    }
}

fn subject_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn emit_submission(submission: &SubmissionReport, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_text(submission),
        OutputFormat::Markdown => render_markdown(submission),
        OutputFormat::Json => render_json(submission)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_leaderboard_text(entries: &[LeaderboardEntry]) -> String {
    if entries.is_empty() {
        return "No analyses yet.\n".to_string();
    }
    let mut output = String::new();
    for (rank, entry) in entries.iter().enumerate() {
        let analysis = &entry.analysis;
        let _ = writeln!(
            output,
            "{:>3}. {:>3}  {} by {} ({}, {})",
            rank + 1,
            analysis.overall_score,
            analysis.title,
            entry.user_name.as_deref().unwrap_or("anonymous"),
            analysis.language,
            analysis.target_company
        );
    }
    output
}

fn render_leaderboard_markdown(entries: &[LeaderboardEntry]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# CodeMeter Leaderboard");
    let _ = writeln!(output);
    if entries.is_empty() {
        let _ = writeln!(output, "No analyses yet.");
        return output;
    }
    let _ = writeln!(output, "| Rank | Score | Title | User | Language | Company |");
    let _ = writeln!(output, "| --- | --- | --- | --- | --- | --- |");
    for (rank, entry) in entries.iter().enumerate() {
        let analysis = &entry.analysis;
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} |",
            rank + 1,
            analysis.overall_score,
            analysis.title,
            entry.user_name.as_deref().unwrap_or("anonymous"),
            analysis.language,
            analysis.target_company
        );
    }
    output
}
