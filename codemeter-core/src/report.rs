//! Report formatting utilities for CodeMeter outputs.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisReport, AnalysisSource, Language};

/// An analysis report together with what was analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    /// What was analyzed, usually a file name.
    pub subject: String,
    /// Declared language.
    pub language: Language,
    /// Target company.
    pub target_company: String,
    /// Engine that produced the report.
    pub source: AnalysisSource,
    /// The report itself.
    pub analysis: AnalysisReport,
}

impl SubmissionReport {
    /// Wrap a report with its submission details.
    pub fn new(
        subject: impl Into<String>,
        language: Language,
        target_company: impl Into<String>,
        source: AnalysisSource,
        analysis: AnalysisReport,
    ) -> Self {
        Self {
            subject: subject.into(),
            language,
            target_company: target_company.into(),
            source,
            analysis,
        }
    }
}

/// Render a submission report as plain text for terminals.
pub fn render_text(submission: &SubmissionReport) -> String {
    let report = &submission.analysis;
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} ({}, {}) - {} analysis",
        submission.subject,
        submission.language,
        submission.target_company,
        submission.source.as_str()
    );
    let _ = writeln!(output, "Score: {}/100", report.overall_score);
    let _ = writeln!(output, "Benchmark: {}", report.company_benchmark.as_str());
    let _ = writeln!(
        output,
        "Complexity: time {}, space {}",
        report.time_complexity, report.space_complexity
    );
    let _ = writeln!(
        output,
        "Language performance: {} | Data structures: {} | Modularity: {} | Redundant logic: {}",
        report.language_performance.as_str(),
        report.data_structures.as_str(),
        report.code_modularity.as_str(),
        report.redundant_logic
    );
    let _ = writeln!(output, "\n{}", report.explanation);
    for (title, items) in [
        ("Strengths", &report.strengths),
        ("Weaknesses", &report.weaknesses),
        ("Suggestions", &report.suggestions),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(output, "\n{title}:");
        for item in items {
            let _ = writeln!(output, "  * {item}");
        }
    }
    output
}

/// Render a submission report as Markdown.
pub fn render_markdown(submission: &SubmissionReport) -> String {
    let report = &submission.analysis;
    let mut output = String::new();
    let _ = writeln!(output, "# CodeMeter Analysis: {}\n", submission.subject);
    let _ = writeln!(output, "- Language: {}", submission.language);
    let _ = writeln!(output, "- Target company: {}", submission.target_company);
    let _ = writeln!(output, "- Source: {}", submission.source.as_str());
    let _ = writeln!(output, "- Score: **{}/100**", report.overall_score);
    let _ = writeln!(output, "- Benchmark: {}\n", report.company_benchmark.as_str());

    let _ = writeln!(output, "## Metrics\n");
    let _ = writeln!(output, "| Metric | Value |\n| --- | --- |");
    for (metric, value) in [
        ("Time complexity", report.time_complexity.clone()),
        ("Space complexity", report.space_complexity.clone()),
        (
            "Language performance",
            report.language_performance.as_str().to_string(),
        ),
        ("Data structures", report.data_structures.as_str().to_string()),
        ("Code modularity", report.code_modularity.as_str().to_string()),
        ("Redundant logic", report.redundant_logic.to_string()),
    ] {
        let _ = writeln!(output, "| {metric} | {value} |");
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Summary\n\n{}\n", report.explanation);
    append_list(&mut output, "Strengths", &report.strengths, "None noted.");
    append_list(&mut output, "Weaknesses", &report.weaknesses, "None noted.");
    append_list(
        &mut output,
        "Suggestions",
        &report.suggestions,
        "No suggestions.",
    );

    let feedback = &report.detailed_feedback;
    let _ = writeln!(output, "## Detailed feedback\n");
    for (area, text) in [
        ("Algorithm efficiency", &feedback.algorithm_efficiency),
        ("Code readability", &feedback.code_readability),
        ("Best practices", &feedback.best_practices),
        ("Performance optimization", &feedback.performance_optimization),
    ] {
        let _ = writeln!(output, "### {area}\n{text}\n");
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn append_list(output: &mut String, title: &str, items: &[String], empty_message: &str) {
    if items.is_empty() {
        let _ = writeln!(output, "## {title}\n\n{empty_message}\n");
        return;
    }
    let _ = writeln!(output, "## {title}\n");
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
    let _ = writeln!(output);
}
