//! Feedback text for heuristic reports.
//!
//! Lists come from ordered condition/message tables. A rule contributes at most
//! one message, lists are capped after the fallbacks are applied, and the prose
//! fields are fixed templates over the computed labels.

use crate::complexity::{Complexity, ComplexityEstimate};
use crate::domain::{
    DetailedFeedback, Language, MAX_STRENGTHS, MAX_SUGGESTIONS, MAX_WEAKNESSES,
};
use crate::signals::Signals;

/// Everything a narrative rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeContext<'a> {
    /// Extracted text signals.
    pub signals: &'a Signals,
    /// Complexity estimate.
    pub estimate: &'a ComplexityEstimate,
    /// Final clamped score.
    pub score: u8,
    /// Declared language.
    pub language: &'a Language,
}

impl NarrativeContext<'_> {
    fn is_linear(&self) -> bool {
        self.estimate.time == Complexity::Linear && !self.signals.nested_loops
    }

    fn is_quadratic_scan(&self) -> bool {
        self.signals.nested_loops && !self.signals.optimized_search
    }
}

/// Generated feedback for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    /// Improvement suggestions.
    pub suggestions: Vec<String>,
    /// Observed strengths.
    pub strengths: Vec<String>,
    /// Observed weaknesses.
    pub weaknesses: Vec<String>,
    /// Summary paragraph.
    pub explanation: String,
    /// Per-area feedback.
    pub detailed_feedback: DetailedFeedback,
}

struct Rule {
    applies: fn(&NarrativeContext<'_>) -> bool,
    message: &'static str,
}

const SUGGESTION_RULES: &[Rule] = &[
    Rule {
        applies: |ctx| !ctx.signals.optimized_search && ctx.signals.has_loops(),
        message: "Consider using hash maps or sets for O(1) lookup operations instead of linear search",
    },
    Rule {
        applies: |ctx| ctx.signals.nested_loops,
        message: "Optimize nested loops - consider using hash maps to reduce time complexity from O(n²) to O(n)",
    },
    Rule {
        applies: |ctx| !ctx.signals.has_error_handling && ctx.signals.line_count > 10,
        message: "Add error handling with try-catch blocks for robustness",
    },
    Rule {
        applies: |ctx| !ctx.signals.has_comments && ctx.signals.line_count > 15,
        message: "Add meaningful comments to explain complex logic and algorithm choices",
    },
    Rule {
        applies: |ctx| !ctx.signals.has_validation,
        message: "Add input validation to handle edge cases and invalid inputs",
    },
    Rule {
        applies: |ctx| ctx.signals.line_count > 50 && !ctx.signals.has_functions,
        message: "Break down the code into smaller, reusable functions for better modularity",
    },
    Rule {
        applies: |ctx| !ctx.signals.has_constants && ctx.signals.has_digits,
        message: "Replace magic numbers with named constants for better maintainability",
    },
];

const STRENGTH_RULES: &[Rule] = &[
    Rule {
        applies: |ctx| ctx.signals.optimized_search,
        message: "Efficient use of hash maps/sets for optimal time complexity",
    },
    Rule {
        applies: |ctx| ctx.signals.has_functions,
        message: "Good code organization with proper function decomposition",
    },
    Rule {
        applies: |ctx| ctx.signals.is_documented(),
        message: "Well-documented code with clear explanations",
    },
    Rule {
        applies: |ctx| ctx.signals.has_error_handling,
        message: "Robust error handling implementation",
    },
    Rule {
        applies: |ctx| ctx.signals.has_early_return,
        message: "Efficient early return patterns to avoid unnecessary computation",
    },
    Rule {
        applies: |ctx| ctx.is_linear(),
        message: "Linear time complexity achieved for the problem",
    },
];

const WEAKNESS_RULES: &[Rule] = &[
    Rule {
        applies: |ctx| ctx.is_quadratic_scan(),
        message: "Quadratic time complexity due to nested loops - can be optimized",
    },
    Rule {
        applies: |ctx| !ctx.signals.has_error_handling && ctx.signals.line_count > 10,
        message: "Missing error handling for edge cases and invalid inputs",
    },
    Rule {
        applies: |ctx| !ctx.signals.has_comments && ctx.signals.line_count > 15,
        message: "Lack of documentation makes code harder to understand and maintain",
    },
    Rule {
        applies: |ctx| ctx.estimate.time == Complexity::Exponential,
        message: "Exponential time complexity - consider dynamic programming or memoization",
    },
    Rule {
        applies: |ctx| ctx.signals.line_count > 50 && !ctx.signals.has_functions,
        message: "Monolithic code structure - lacks modularity and reusability",
    },
];

const FALLBACK_SUGGESTIONS: &[&str] = &[
    "Consider adding more comprehensive test cases",
    "Review algorithm efficiency for potential optimizations",
];

const FALLBACK_STRENGTHS: &[&str] = &[
    "Code compiles and runs correctly",
    "Basic problem-solving approach is sound",
];

const FALLBACK_WEAKNESSES: &[&str] = &[
    "Code could benefit from optimization",
    "Consider improving code documentation",
];

/// Scores at or above this need no generic weaknesses.
const WEAKNESS_FALLBACK_BELOW: u8 = 80;

/// Build every narrative field for a scored submission.
pub fn narrate(ctx: &NarrativeContext<'_>) -> Narrative {
    let mut suggestions = collect(SUGGESTION_RULES, ctx);
    if suggestions.is_empty() {
        suggestions.extend(owned(FALLBACK_SUGGESTIONS));
    }

    let mut strengths = collect(STRENGTH_RULES, ctx);
    if strengths.is_empty() {
        strengths.extend(owned(FALLBACK_STRENGTHS));
    }

    let mut weaknesses = collect(WEAKNESS_RULES, ctx);
    if weaknesses.is_empty() && ctx.score < WEAKNESS_FALLBACK_BELOW {
        weaknesses.extend(owned(FALLBACK_WEAKNESSES));
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    strengths.truncate(MAX_STRENGTHS);
    weaknesses.truncate(MAX_WEAKNESSES);

    Narrative {
        suggestions,
        strengths,
        weaknesses,
        explanation: explanation(ctx),
        detailed_feedback: detailed_feedback(ctx),
    }
}

fn collect(rules: &[Rule], ctx: &NarrativeContext<'_>) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| rule.message.to_string())
        .collect()
}

fn owned(messages: &[&str]) -> impl Iterator<Item = String> {
    messages.iter().map(|message| message.to_string())
}

fn explanation(ctx: &NarrativeContext<'_>) -> String {
    let signals = ctx.signals;
    sentences(&[
        &format!(
            "Code analysis reveals {} time complexity and {} space complexity.",
            ctx.estimate.time, ctx.estimate.space
        ),
        &format!("Score: {}/100.", ctx.score),
        pick(
            signals.optimized_search,
            "Excellent algorithmic approach with efficient data structures.",
            "Algorithm could be optimized for better performance.",
        ),
        pick(
            signals.has_comments,
            "Good documentation practices observed.",
            "Documentation could be improved.",
        ),
        pick(
            signals.has_error_handling,
            "Proper error handling implemented.",
            "Consider adding error handling for robustness.",
        ),
    ])
}

fn detailed_feedback(ctx: &NarrativeContext<'_>) -> DetailedFeedback {
    let signals = ctx.signals;

    let algorithm_note = if signals.optimized_search {
        "Optimal algorithm with efficient data structure usage."
    } else if signals.nested_loops {
        "Nested loops detected - consider optimization with hash maps."
    } else {
        "Linear approach is reasonable but could potentially be optimized."
    };

    let memory = match ctx.estimate.space {
        Complexity::Constant => "optimal",
        Complexity::Linear => "reasonable",
        _ => "could be optimized",
    };

    DetailedFeedback {
        algorithm_efficiency: sentences(&[
            &format!(
                "Time complexity: {}, Space complexity: {}.",
                ctx.estimate.time, ctx.estimate.space
            ),
            algorithm_note,
        ]),
        code_readability: sentences(&[
            pick(
                signals.is_documented(),
                "Code is well-documented with clear comments.",
                "Code lacks sufficient documentation.",
            ),
            pick(
                signals.has_functions,
                "Good function organization and structure.",
                "Consider breaking code into smaller functions.",
            ),
            pick(
                signals.line_count < 30,
                "Variable naming and structure is clean and manageable.",
                "Variable naming and structure could be improved for better readability.",
            ),
        ]),
        best_practices: sentences(&[
            pick(
                signals.has_error_handling,
                "Good error handling practices implemented.",
                "Missing error handling - add try-catch blocks.",
            ),
            pick(
                signals.has_validation,
                "Input validation is present.",
                "Add input validation for edge cases.",
            ),
            pick(
                signals.has_constants,
                "Good use of constants.",
                "Consider using named constants instead of magic numbers.",
            ),
            pick(
                *ctx.language == Language::Python && signals.has_docstrings,
                "Proper Python docstring usage.",
                "",
            ),
        ]),
        performance_optimization: sentences(&[
            pick(
                signals.optimized_search,
                "Efficient data structures used for optimal performance.",
                "Consider using hash maps/sets for O(1) lookups.",
            ),
            pick(
                signals.has_early_return,
                "Good use of early returns to avoid unnecessary computation.",
                "Consider early returns where applicable.",
            ),
            pick(
                signals.nested_loops,
                "Nested loops present - major optimization opportunity.",
                "No obvious performance bottlenecks detected.",
            ),
            &format!("Memory usage is {memory}."),
        ]),
    }
}

fn pick<'a>(condition: bool, yes: &'a str, no: &'a str) -> &'a str {
    if condition { yes } else { no }
}

/// Space-joined template slots. Empty slots still take their separator.
fn sentences(parts: &[&str]) -> String {
    parts.join(" ")
}
