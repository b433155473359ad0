//! Domain entities for CodeMeter.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of suggestions carried by a report.
pub const MAX_SUGGESTIONS: usize = 6;
/// Maximum number of strengths carried by a report.
pub const MAX_STRENGTHS: usize = 5;
/// Maximum number of weaknesses carried by a report.
pub const MAX_WEAKNESSES: usize = 5;

/// Declared language of a code submission.
///
/// Unknown names are kept verbatim so analysis never rejects a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    /// Python.
    Python,
    /// JavaScript.
    Javascript,
    /// Java.
    Java,
    /// C++.
    Cpp,
    /// C.
    C,
    /// Go.
    Go,
    /// Rust.
    Rust,
    /// Any other language name, lowercased.
    Other(String),
}

impl Language {
    /// Parse a language tag, case-insensitively.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "python" => Self::Python,
            "javascript" => Self::Javascript,
            "java" => Self::Java,
            "cpp" => Self::Cpp,
            "c" => Self::C,
            "go" => Self::Go,
            "rust" => Self::Rust,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical lowercase tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Other(name) => name,
        }
    }

    /// Whether the language runs on an interpreter or JIT rather than native code.
    pub fn is_interpreted(&self) -> bool {
        matches!(self, Self::Python | Self::Javascript)
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A code submission to be scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Raw source text.
    pub code: String,
    /// Declared language.
    #[schema(value_type = String, example = "python")]
    pub language: Language,
    /// Target company whose interview bar is used for scoring.
    pub target_company: String,
}

impl AnalysisRequest {
    /// Build a request from its parts.
    pub fn new(
        code: impl Into<String>,
        language: Language,
        target_company: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            language,
            target_company: target_company.into(),
        }
    }
}

/// Expected runtime performance of the language itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LanguagePerformance {
    /// Compiled or otherwise fast runtime.
    High,
    /// Interpreted or JIT runtime.
    Medium,
    /// Slow runtime.
    Low,
}

impl LanguagePerformance {
    /// Parse a rating label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Rating of the data structures chosen by the submission.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DataStructures {
    /// Lookup-optimised structures in use.
    Optimal,
    /// Some collection usage.
    Good,
    /// No meaningful collection usage.
    Suboptimal,
}

impl DataStructures {
    /// Parse a rating label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "optimal" => Some(Self::Optimal),
            "good" => Some(Self::Good),
            "suboptimal" => Some(Self::Suboptimal),
            _ => None,
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Good => "Good",
            Self::Suboptimal => "Suboptimal",
        }
    }
}

/// Rating of how well the submission is decomposed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CodeModularity {
    /// Functions and documentation.
    Excellent,
    /// Functions without documentation.
    Good,
    /// Short code without functions.
    Fair,
    /// Long code without functions.
    Poor,
}

impl CodeModularity {
    /// Parse a rating label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "poor" => Some(Self::Poor),
            _ => None,
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

/// How the submission compares with the target company's bar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CompanyBenchmark {
    /// Score above 85.
    #[serde(rename = "Exceeds Expectations")]
    ExceedsExpectations,
    /// Score above 70.
    #[serde(rename = "Meets Requirements")]
    MeetsRequirements,
    /// Anything lower.
    #[serde(rename = "Below Expectations")]
    BelowExpectations,
}

impl CompanyBenchmark {
    /// Derive the benchmark band from a final score.
    pub fn from_score(score: u8) -> Self {
        if score > 85 {
            Self::ExceedsExpectations
        } else if score > 70 {
            Self::MeetsRequirements
        } else {
            Self::BelowExpectations
        }
    }

    /// Parse a benchmark label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "exceeds expectations" => Some(Self::ExceedsExpectations),
            "meets requirements" => Some(Self::MeetsRequirements),
            "below expectations" => Some(Self::BelowExpectations),
            _ => None,
        }
    }

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExceedsExpectations => "Exceeds Expectations",
            Self::MeetsRequirements => "Meets Requirements",
            Self::BelowExpectations => "Below Expectations",
        }
    }
}

/// Narrative feedback per review area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedFeedback {
    /// Notes on algorithmic efficiency.
    pub algorithm_efficiency: String,
    /// Notes on readability.
    pub code_readability: String,
    /// Notes on best practices.
    pub best_practices: String,
    /// Notes on performance tuning.
    pub performance_optimization: String,
}

/// Structured efficiency and quality assessment of a code submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Aggregate score, 0-100.
    pub overall_score: u8,
    /// Big-O time complexity label.
    pub time_complexity: String,
    /// Big-O space complexity label.
    pub space_complexity: String,
    /// Runtime performance of the language.
    pub language_performance: LanguagePerformance,
    /// Data structure rating.
    pub data_structures: DataStructures,
    /// Count of redundant logic patterns.
    pub redundant_logic: u32,
    /// Modularity rating.
    pub code_modularity: CodeModularity,
    /// Benchmark band for the target company.
    pub company_benchmark: CompanyBenchmark,
    /// Improvement suggestions, at most six.
    pub suggestions: Vec<String>,
    /// Observed strengths, at most five.
    pub strengths: Vec<String>,
    /// Observed weaknesses, at most five.
    pub weaknesses: Vec<String>,
    /// Narrative summary.
    pub explanation: String,
    /// Per-area narrative feedback.
    pub detailed_feedback: DetailedFeedback,
}

/// Which engine produced a report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// The remote AI service.
    Ai,
    /// The local rule-based engine.
    Heuristic,
}

impl AnalysisSource {
    /// Stable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Heuristic => "heuristic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_case_insensitively() {
        assert_eq!(Language::parse("Python"), Language::Python);
        assert_eq!(Language::parse(" RUST "), Language::Rust);
        assert_eq!(Language::parse("cpp"), Language::Cpp);
        assert_eq!(
            Language::parse("Kotlin"),
            Language::Other("kotlin".to_string())
        );
    }

    #[test]
    fn language_round_trips_through_json_as_string() {
        let request = AnalysisRequest::new("x = 1", Language::Go, "google");
        let json = serde_json::to_value(&request).expect("json");
        assert_eq!(json["language"], "go");
        assert_eq!(json["targetCompany"], "google");

        let parsed: AnalysisRequest =
            serde_json::from_str(r#"{"code":"","language":"JavaScript","targetCompany":"meta"}"#)
                .expect("parse");
        assert_eq!(parsed.language, Language::Javascript);
    }

    #[test]
    fn benchmark_bands_follow_score_thresholds() {
        assert_eq!(
            CompanyBenchmark::from_score(86),
            CompanyBenchmark::ExceedsExpectations
        );
        assert_eq!(
            CompanyBenchmark::from_score(85),
            CompanyBenchmark::MeetsRequirements
        );
        assert_eq!(
            CompanyBenchmark::from_score(71),
            CompanyBenchmark::MeetsRequirements
        );
        assert_eq!(
            CompanyBenchmark::from_score(70),
            CompanyBenchmark::BelowExpectations
        );
    }

    #[test]
    fn benchmark_serializes_with_spaces() {
        let value = serde_json::to_value(CompanyBenchmark::MeetsRequirements).expect("json");
        assert_eq!(value, "Meets Requirements");
    }

    #[test]
    fn rating_labels_parse_back() {
        for rating in [
            CodeModularity::Excellent,
            CodeModularity::Good,
            CodeModularity::Fair,
            CodeModularity::Poor,
        ] {
            assert_eq!(CodeModularity::parse(rating.as_str()), Some(rating));
        }
        assert_eq!(DataStructures::parse("optimal"), Some(DataStructures::Optimal));
        assert_eq!(LanguagePerformance::parse("LOW"), Some(LanguagePerformance::Low));
        assert_eq!(LanguagePerformance::parse("blazing"), None);
    }
}
