//! Rule-based analyzer that turns raw source text into an [`AnalysisReport`].

use crate::complexity::classify;
use crate::domain::{AnalysisReport, AnalysisRequest, Language};
use crate::narrative::{NarrativeContext, narrate};
use crate::scoring::score;
use crate::signals::extract_signals;

/// Analyze a submission with the heuristic engine.
///
/// Total and deterministic: the same inputs always produce the same report.
pub fn analyze(code: &str, language: &Language, target_company: &str) -> AnalysisReport {
    let signals = extract_signals(code);
    let estimate = classify(&signals);
    let card = score(&signals, &estimate, language, target_company);
    let narrative = narrate(&NarrativeContext {
        signals: &signals,
        estimate: &estimate,
        score: card.overall_score,
        language,
    });

    AnalysisReport {
        overall_score: card.overall_score,
        time_complexity: estimate.time.to_string(),
        space_complexity: estimate.space.to_string(),
        language_performance: card.language_performance,
        data_structures: card.data_structures,
        redundant_logic: card.redundant_logic,
        code_modularity: card.code_modularity,
        company_benchmark: card.company_benchmark,
        suggestions: narrative.suggestions,
        strengths: narrative.strengths,
        weaknesses: narrative.weaknesses,
        explanation: narrative.explanation,
        detailed_feedback: narrative.detailed_feedback,
    }
}

/// Analyze a request with the heuristic engine.
pub fn analyze_request(request: &AnalysisRequest) -> AnalysisReport {
    analyze(&request.code, &request.language, &request.target_company)
}
