//! Score arithmetic and categorical ratings for the heuristic engine.

use crate::complexity::{Complexity, ComplexityEstimate};
use crate::domain::{CodeModularity, CompanyBenchmark, DataStructures, Language, LanguagePerformance};
use crate::signals::Signals;

/// Starting point before adjustments.
pub const BASE_SCORE: i32 = 50;
/// Lowest score the heuristic engine reports.
pub const MIN_HEURISTIC_SCORE: u8 = 15;
/// Highest score the heuristic engine reports.
pub const MAX_HEURISTIC_SCORE: u8 = 98;

const COMPANY_MULTIPLIERS: &[(&str, f64)] = &[
    ("google", 1.10),
    ("amazon", 1.05),
    ("microsoft", 1.08),
    ("meta", 1.12),
    ("apple", 1.03),
    ("netflix", 1.02),
    ("infosys", 1.00),
    ("tcs", 0.98),
];

/// Score and ratings derived from one submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCard {
    /// Final clamped score.
    pub overall_score: u8,
    /// Language runtime rating.
    pub language_performance: LanguagePerformance,
    /// Data structure rating.
    pub data_structures: DataStructures,
    /// Redundant logic count.
    pub redundant_logic: u32,
    /// Modularity rating.
    pub code_modularity: CodeModularity,
    /// Benchmark band for the final score.
    pub company_benchmark: CompanyBenchmark,
}

/// Score a submission and derive every categorical rating.
pub fn score(
    signals: &Signals,
    estimate: &ComplexityEstimate,
    language: &Language,
    target_company: &str,
) -> ScoreCard {
    let overall_score = apply_multiplier(
        raw_score(signals, estimate),
        company_multiplier(target_company),
    );

    ScoreCard {
        overall_score,
        language_performance: language_performance(language),
        data_structures: data_structures(signals),
        redundant_logic: redundant_logic(signals),
        code_modularity: code_modularity(signals),
        company_benchmark: CompanyBenchmark::from_score(overall_score),
    }
}

/// Base score plus every bonus and penalty; the adjustments are independent.
pub fn raw_score(signals: &Signals, estimate: &ComplexityEstimate) -> i32 {
    BASE_SCORE + efficiency_bonus(signals, estimate) + quality_bonus(signals)
        + structure_bonus(signals)
        - penalties(signals, estimate)
}

/// Multiplier for a target company, matched case-insensitively. Unknown companies get 1.0.
pub fn company_multiplier(company: &str) -> f64 {
    let company = company.to_lowercase();
    COMPANY_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == company)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Scale, round and clamp a raw score into the heuristic range.
pub fn apply_multiplier(raw_score: i32, multiplier: f64) -> u8 {
    let scaled = (f64::from(raw_score) * multiplier).round();
    scaled.clamp(
        f64::from(MIN_HEURISTIC_SCORE),
        f64::from(MAX_HEURISTIC_SCORE),
    ) as u8
}

fn efficiency_bonus(signals: &Signals, estimate: &ComplexityEstimate) -> i32 {
    let mut bonus = 0;
    if signals.optimized_search {
        bonus += 20;
    }
    if estimate.time == Complexity::Linear && !signals.nested_loops {
        bonus += 15;
    }
    if estimate.time == Complexity::Logarithmic {
        bonus += 25;
    }
    if signals.has_early_return {
        bonus += 5;
    }
    if signals.has_break_continue {
        bonus += 3;
    }
    bonus
}

fn quality_bonus(signals: &Signals) -> i32 {
    let mut bonus = 0;
    if signals.has_functions {
        bonus += 10;
    }
    if signals.is_documented() {
        bonus += 8;
    }
    if signals.has_error_handling {
        bonus += 7;
    }
    if signals.has_validation {
        bonus += 6;
    }
    if signals.has_constants {
        bonus += 4;
    }
    bonus
}

fn structure_bonus(signals: &Signals) -> i32 {
    let mut bonus = 0;
    if signals.line_count > 5 && signals.line_count < 50 {
        bonus += 5;
    }
    if signals.char_length > 50 && signals.char_length < 500 {
        bonus += 3;
    }
    bonus
}

fn penalties(signals: &Signals, estimate: &ComplexityEstimate) -> i32 {
    let mut penalty = 0;
    if signals.nested_loops && !signals.optimized_search {
        penalty += 15;
    }
    if estimate.time == Complexity::Exponential {
        penalty += 20;
    }
    if !signals.has_functions && signals.line_count > 20 {
        penalty += 10;
    }
    if !signals.has_comments && signals.line_count > 15 {
        penalty += 8;
    }
    if signals.line_count > 100 {
        penalty += 5;
    }
    penalty
}

fn language_performance(language: &Language) -> LanguagePerformance {
    if language.is_interpreted() {
        LanguagePerformance::Medium
    } else {
        LanguagePerformance::High
    }
}

fn data_structures(signals: &Signals) -> DataStructures {
    if signals.optimized_search {
        DataStructures::Optimal
    } else if signals.hash_map || signals.array {
        DataStructures::Good
    } else {
        DataStructures::Suboptimal
    }
}

fn redundant_logic(signals: &Signals) -> u32 {
    let nested = if signals.nested_loops { 2 } else { 0 };
    let repeated_scans = if !signals.optimized_search && signals.for_count > 1 {
        1
    } else {
        0
    };
    nested + repeated_scans
}

fn code_modularity(signals: &Signals) -> CodeModularity {
    if signals.has_functions && signals.has_comments {
        CodeModularity::Excellent
    } else if signals.has_functions {
        CodeModularity::Good
    } else if signals.line_count > 30 {
        CodeModularity::Poor
    } else {
        CodeModularity::Fair
    }
}
