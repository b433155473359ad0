//! Remote AI analysis with an unconditional heuristic fallback.
//!
//! [`Delegator`] asks an injected [`CompletionClient`] for a JSON report,
//! sanitizes whatever comes back, and answers with the heuristic engine on any
//! failure. Callers always receive a report.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analyzer::analyze_request;
use crate::domain::{
    AnalysisReport, AnalysisRequest, AnalysisSource, CodeModularity, CompanyBenchmark,
    DataStructures, DetailedFeedback, LanguagePerformance, MAX_STRENGTHS, MAX_SUGGESTIONS,
    MAX_WEAKNESSES,
};
use crate::error::{CodeMeterError, Result};

/// One chat message sent to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system` or `user`.
    pub role: String,
    /// Message body.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion capability used for AI analysis.
#[cfg_attr(test, mockall::automock)]
pub trait CompletionClient {
    /// Send the conversation and return the assistant's text.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Analysis entry point that prefers the remote provider and falls back locally.
#[derive(Debug, Clone)]
pub struct Delegator<C> {
    client: Option<C>,
}

impl<C: CompletionClient> Delegator<C> {
    /// Delegate to `client` first.
    pub fn new(client: C) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Never contact a provider; every report comes from the heuristic engine.
    pub fn heuristic_only() -> Self {
        Self { client: None }
    }

    /// Whether a provider is configured.
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Produce a report and say which engine produced it.
    pub fn analyze(&self, request: &AnalysisRequest) -> (AnalysisReport, AnalysisSource) {
        let Some(client) = &self.client else {
            log::debug!("no completion provider configured; using heuristic analysis");
            return (analyze_request(request), AnalysisSource::Heuristic);
        };

        match remote_report(client, request) {
            Ok(report) => {
                log::info!("AI analysis completed with score {}", report.overall_score);
                (report, AnalysisSource::Ai)
            }
            Err(err) => {
                log::warn!("AI analysis failed, falling back to heuristic analysis: {err}");
                (analyze_request(request), AnalysisSource::Heuristic)
            }
        }
    }
}

fn remote_report<C: CompletionClient>(
    client: &C,
    request: &AnalysisRequest,
) -> Result<AnalysisReport> {
    let reply = client.complete(&build_messages(request))?;
    if reply.trim().is_empty() {
        return Err(CodeMeterError::Provider(
            "empty completion from provider".to_string(),
        ));
    }
    parse_report(&reply)
}

/// Build the system and user messages for a submission.
pub fn build_messages(request: &AnalysisRequest) -> Vec<ChatMessage> {
    let company = &request.target_company;
    let language = request.language.as_str();

    let system = format!(
        "You are a senior software engineer and code reviewer specializing in {company} technical \
         interviews. You must analyze the ACTUAL code provided and give specific, detailed feedback. \
         Always respond with valid JSON only. Be thorough, specific, and critical but constructive."
    );

    let user = format!(
        "You are an expert code reviewer for {company}. Analyze this {language} code thoroughly and \
provide a comprehensive, specific assessment.

Code to analyze:
```{language}
{code}
```

Requirements:
1. Calculate the ACTUAL time and space complexity from the loops, recursion and data structures used
2. Provide SPECIFIC suggestions based on the actual code issues you see
3. Identify REAL strengths and weaknesses in this particular code
4. Give a realistic score based on {company} standards

Respond with ONLY valid JSON in this exact format:
{{
  \"overallScore\": number (0-100),
  \"timeComplexity\": \"O(...)\",
  \"spaceComplexity\": \"O(...)\",
  \"languagePerformance\": \"High|Medium|Low\",
  \"dataStructures\": \"Optimal|Good|Suboptimal\",
  \"redundantLogic\": number,
  \"codeModularity\": \"Excellent|Good|Fair|Poor\",
  \"companyBenchmark\": \"Exceeds Expectations|Meets Requirements|Below Expectations\",
  \"suggestions\": [\"up to {MAX_SUGGESTIONS} specific suggestions\"],
  \"strengths\": [\"up to {MAX_STRENGTHS} specific strengths\"],
  \"weaknesses\": [\"up to {MAX_WEAKNESSES} specific weaknesses\"],
  \"explanation\": \"why this code got this score\",
  \"detailedFeedback\": {{
    \"algorithmEfficiency\": \"...\",
    \"codeReadability\": \"...\",
    \"bestPractices\": \"...\",
    \"performanceOptimization\": \"...\"
  }}
}}",
        code = request.code,
    );

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

/// Trim a reply and drop a surrounding ```` ```json ```` or ```` ``` ```` fence.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(body) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    let body = body.trim_start();
    body.strip_suffix("```").unwrap_or(body).trim_end()
}

/// Decode and sanitize a provider reply.
pub fn parse_report(reply: &str) -> Result<AnalysisReport> {
    let value: Value = serde_json::from_str(strip_code_fence(reply))?;
    match value {
        Value::Object(fields) => Ok(sanitize(&fields)),
        other => Err(CodeMeterError::Parse(format!(
            "expected a JSON object, got {}",
            type_name(&other)
        ))),
    }
}

/// Fill defaults, clamp numbers and cap lists on a decoded reply.
pub fn sanitize(fields: &Map<String, Value>) -> AnalysisReport {
    let feedback = fields.get("detailedFeedback").and_then(Value::as_object);
    let feedback_text = |key: &str, default: &str| {
        feedback
            .and_then(|map| text(map, key))
            .unwrap_or_else(|| default.to_string())
    };

    AnalysisReport {
        overall_score: number(fields, "overallScore").clamp(0.0, 100.0) as u8,
        time_complexity: text(fields, "timeComplexity").unwrap_or_else(|| "O(n)".to_string()),
        space_complexity: text(fields, "spaceComplexity").unwrap_or_else(|| "O(1)".to_string()),
        language_performance: label(fields, "languagePerformance")
            .and_then(LanguagePerformance::parse)
            .unwrap_or(LanguagePerformance::Medium),
        data_structures: label(fields, "dataStructures")
            .and_then(DataStructures::parse)
            .unwrap_or(DataStructures::Good),
        redundant_logic: number(fields, "redundantLogic").clamp(0.0, f64::from(u32::MAX)) as u32,
        code_modularity: label(fields, "codeModularity")
            .and_then(CodeModularity::parse)
            .unwrap_or(CodeModularity::Good),
        company_benchmark: label(fields, "companyBenchmark")
            .and_then(CompanyBenchmark::parse)
            .unwrap_or(CompanyBenchmark::MeetsRequirements),
        suggestions: list(fields, "suggestions", MAX_SUGGESTIONS),
        strengths: list(fields, "strengths", MAX_STRENGTHS),
        weaknesses: list(fields, "weaknesses", MAX_WEAKNESSES),
        explanation: text(fields, "explanation")
            .unwrap_or_else(|| "Analysis completed successfully.".to_string()),
        detailed_feedback: DetailedFeedback {
            algorithm_efficiency: feedback_text(
                "algorithmEfficiency",
                "Algorithm efficiency analysis completed.",
            ),
            code_readability: feedback_text(
                "codeReadability",
                "Code readability analysis completed.",
            ),
            best_practices: feedback_text("bestPractices", "Best practices analysis completed."),
            performance_optimization: feedback_text(
                "performanceOptimization",
                "Performance optimization analysis completed.",
            ),
        },
    }
}

fn label<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    label(fields, key)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

// Non-numeric and NaN values count as zero; fractions round half away from zero.
fn number(fields: &Map<String, Value>, key: &str) -> f64 {
    let value = match fields.get(key) {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(raw)) => raw.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if value.is_nan() { 0.0 } else { value.round() }
}

fn list(fields: &Map<String, Value>, key: &str, cap: usize) -> Vec<String> {
    fields
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .take(cap)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;

    const FULL_REPLY: &str = r#"{
        "overallScore": 87,
        "timeComplexity": "O(n log n)",
        "spaceComplexity": "O(n)",
        "languagePerformance": "High",
        "dataStructures": "Optimal",
        "redundantLogic": 1,
        "codeModularity": "Excellent",
        "companyBenchmark": "Exceeds Expectations",
        "suggestions": ["a", "b"],
        "strengths": ["c"],
        "weaknesses": [],
        "explanation": "Solid.",
        "detailedFeedback": {
            "algorithmEfficiency": "ae",
            "codeReadability": "cr",
            "bestPractices": "bp",
            "performanceOptimization": "po"
        }
    }"#;

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("for i in range(n):\n  print(i)", Language::Python, "google")
    }

    #[test]
    fn strips_json_and_plain_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  ```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fence("{}"), "{}");
        assert_eq!(strip_code_fence("```json {} "), "{}");
    }

    #[test]
    fn parses_a_complete_reply_verbatim() {
        let report = parse_report(FULL_REPLY).expect("parse");
        assert_eq!(report.overall_score, 87);
        assert_eq!(report.time_complexity, "O(n log n)");
        assert_eq!(report.data_structures, DataStructures::Optimal);
        assert_eq!(report.company_benchmark, CompanyBenchmark::ExceedsExpectations);
        assert_eq!(report.suggestions, vec!["a".to_string(), "b".to_string()]);
        assert!(report.weaknesses.is_empty());
        assert_eq!(report.detailed_feedback.performance_optimization, "po");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let report = parse_report("```json\n{}\n```").expect("parse");
        assert_eq!(report.overall_score, 0);
        assert_eq!(report.time_complexity, "O(n)");
        assert_eq!(report.space_complexity, "O(1)");
        assert_eq!(report.language_performance, LanguagePerformance::Medium);
        assert_eq!(report.data_structures, DataStructures::Good);
        assert_eq!(report.code_modularity, CodeModularity::Good);
        assert_eq!(report.company_benchmark, CompanyBenchmark::MeetsRequirements);
        assert_eq!(report.explanation, "Analysis completed successfully.");
        assert_eq!(
            report.detailed_feedback.code_readability,
            "Code readability analysis completed."
        );
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let high = parse_report(r#"{"overallScore": 140, "redundantLogic": -3}"#).expect("parse");
        assert_eq!(high.overall_score, 100);
        assert_eq!(high.redundant_logic, 0);

        let low = parse_report(r#"{"overallScore": -5}"#).expect("parse");
        assert_eq!(low.overall_score, 0);

        let fractional = parse_report(r#"{"overallScore": 72.6}"#).expect("parse");
        assert_eq!(fractional.overall_score, 73);
    }

    #[test]
    fn unknown_labels_and_wrong_types_fall_back() {
        let report = parse_report(
            r#"{"dataStructures": "Amazing", "codeModularity": 3, "suggestions": "one", "strengths": ["x", 1, "y"]}"#,
        )
        .expect("parse");
        assert_eq!(report.data_structures, DataStructures::Good);
        assert_eq!(report.code_modularity, CodeModularity::Good);
        assert!(report.suggestions.is_empty());
        assert_eq!(report.strengths, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn lists_are_capped() {
        let items: Vec<String> = (0..10).map(|i| format!("item {i}")).collect();
        let reply = serde_json::json!({
            "suggestions": items,
            "strengths": items,
            "weaknesses": items,
        })
        .to_string();
        let report = parse_report(&reply).expect("parse");
        assert_eq!(report.suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(report.strengths.len(), MAX_STRENGTHS);
        assert_eq!(report.weaknesses.len(), MAX_WEAKNESSES);
        assert_eq!(report.suggestions[0], "item 0");
    }

    #[test]
    fn non_object_replies_are_parse_errors() {
        assert!(matches!(
            parse_report("[1, 2]"),
            Err(CodeMeterError::Parse(_))
        ));
        assert!(matches!(
            parse_report("Sure! Here is your analysis"),
            Err(CodeMeterError::Parse(_))
        ));
    }

    #[test]
    fn prompt_embeds_code_language_and_company() {
        let messages = build_messages(&request());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("google technical interviews"));
        assert_eq!(messages[1].role, "user");
        assert!(
            messages[1]
                .content
                .contains("```python\nfor i in range(n):\n  print(i)\n```")
        );
        assert!(messages[1].content.contains("\"overallScore\""));
    }

    #[test]
    fn successful_reply_is_reported_as_ai() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .times(1)
            .returning(|_| Ok(format!("```json\n{FULL_REPLY}\n```")));

        let (report, source) = Delegator::new(client).analyze(&request());
        assert_eq!(source, AnalysisSource::Ai);
        assert_eq!(report.overall_score, 87);
    }

    #[test]
    fn every_failure_falls_back_to_heuristic() {
        let failures: Vec<Result<String>> = vec![
            Err(CodeMeterError::Provider("connection refused".to_string())),
            Err(CodeMeterError::Provider("status 500".to_string())),
            Ok("   ".to_string()),
            Ok("not json".to_string()),
        ];
        let expected = analyze_request(&request());

        for failure in failures {
            let mut client = MockCompletionClient::new();
            let mut reply = Some(failure);
            client.expect_complete().times(1).returning(move |_| {
                reply
                    .take()
                    .unwrap_or_else(|| Err(CodeMeterError::Provider("called twice".to_string())))
            });

            let (report, source) = Delegator::new(client).analyze(&request());
            assert_eq!(source, AnalysisSource::Heuristic);
            assert_eq!(report, expected);
        }
    }

    #[test]
    fn heuristic_only_never_calls_a_provider() {
        let delegator = Delegator::<MockCompletionClient>::heuristic_only();
        assert!(!delegator.has_client());
        let (report, source) = delegator.analyze(&request());
        assert_eq!(source, AnalysisSource::Heuristic);
        assert_eq!(report, analyze_request(&request()));
    }
}
