//! OpenAPI specification for CodeMeter server.

use utoipa::OpenApi;

use codemeter_core::{
    AnalysisReport, AnalysisSource, CodeModularity, CompanyBenchmark, DataStructures,
    DetailedFeedback, LanguagePerformance,
};

use crate::routes::{
    AnalysisLookupResponse, AnalysisRecord, AnalyzeRequest, AnalyzeResponse, ErrorResponse,
    FeatureFlags, LeaderboardEntry, LeaderboardResponse, ProbeResponse, UserAnalysesResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::analyze_probe,
        crate::routes::analyze,
        crate::routes::analysis_by_id,
        crate::routes::user_analyses,
        crate::routes::leaderboard,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            AnalyzeRequest,
            AnalyzeResponse,
            AnalysisRecord,
            AnalysisLookupResponse,
            UserAnalysesResponse,
            LeaderboardEntry,
            LeaderboardResponse,
            ProbeResponse,
            FeatureFlags,
            ErrorResponse,
            AnalysisReport,
            AnalysisSource,
            DetailedFeedback,
            LanguagePerformance,
            DataStructures,
            CodeModularity,
            CompanyBenchmark
        )
    ),
    tags(
        (name = "analysis", description = "Code analysis"),
        (name = "leaderboard", description = "Top scores"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the CodeMeter server.
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn openapi_includes_expected_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;

        assert!(paths.contains_key("/analyze"));
        assert!(paths.contains_key("/analysis/{id}"));
        assert!(paths.contains_key("/user/analyses"));
        assert!(paths.contains_key("/leaderboard"));
        assert!(paths.contains_key("/openapi.json"));
    }

    #[test]
    fn report_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key("AnalysisReport"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}
