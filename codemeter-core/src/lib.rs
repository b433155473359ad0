#![deny(missing_docs)]
//! CodeMeter core library.
//!
//! This crate contains the domain types, the heuristic code analyzer and the
//! AI delegation wrapper that power the broader CodeMeter platform.

pub mod analyzer;
pub mod complexity;
pub mod delegation;
pub mod domain;
pub mod error;
pub mod narrative;
pub mod report;
/// Score arithmetic and categorical ratings.
pub mod scoring;
pub mod signals;

pub use analyzer::{analyze, analyze_request};
pub use complexity::{Complexity, ComplexityEstimate, classify};
pub use delegation::{ChatMessage, CompletionClient, Delegator, build_messages, parse_report};
pub use domain::{
    AnalysisReport, AnalysisRequest, AnalysisSource, CodeModularity, CompanyBenchmark,
    DataStructures, DetailedFeedback, Language, LanguagePerformance,
};
pub use error::{CodeMeterError, Result};
pub use report::{SubmissionReport, render_json, render_markdown, render_text};
pub use scoring::{ScoreCard, company_multiplier, score};
pub use signals::{Signals, extract_signals};
