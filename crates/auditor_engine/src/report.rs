//! Tolerant summarization of the backend-owned result payload.
//!
//! The payload is pass-through data whose shape belongs to the backend;
//! extraction never fails, it just leaves fields empty.

use serde_json::Value;

/// Outcome of a competitor comparison, when the backend ran one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Target,
    Competitor,
    Draw,
}

/// The renderable facts pulled out of an audit result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportSummary {
    pub url: Option<String>,
    pub global_score: Option<u8>,
    pub performance: Option<u8>,
    pub seo: Option<u8>,
    pub accessibility: Option<u8>,
    pub best_practices: Option<u8>,
    pub security: Option<u8>,
    pub gdpr: Option<u8>,
    pub social: Option<u8>,
    pub green: Option<u8>,
    pub green_grade: Option<String>,
    pub dns: Option<u8>,
    pub technologies: Option<usize>,
    pub broken_links: Option<usize>,
    pub links_checked: Option<usize>,
    pub scan_duration_seconds: Option<f64>,
    pub competitor_score: Option<u8>,
    pub winner: Option<Winner>,
    pub analyzer_errors: Vec<String>,
}

/// Extract a [`ReportSummary`] from the raw result payload.
pub fn summarize(data: &Value) -> ReportSummary {
    ReportSummary {
        url: string_at(data, "/url"),
        global_score: score_at(data, "/global_score"),
        performance: score_at(data, "/seo/scores/performance"),
        seo: score_at(data, "/seo/scores/seo"),
        accessibility: score_at(data, "/seo/scores/accessibility"),
        best_practices: score_at(data, "/seo/scores/best_practices"),
        security: score_at(data, "/security/score"),
        gdpr: score_at(data, "/gdpr/score"),
        social: score_at(data, "/smo/score"),
        green: score_at(data, "/green_it/score"),
        green_grade: string_at(data, "/green_it/grade"),
        dns: score_at(data, "/dns_health/score"),
        technologies: data
            .pointer("/tech_stack/technologies")
            .and_then(Value::as_array)
            .map(Vec::len),
        broken_links: count_at(data, "/broken_links/broken_count"),
        links_checked: count_at(data, "/broken_links/total_links_checked"),
        scan_duration_seconds: data
            .pointer("/scan_duration_seconds")
            .and_then(Value::as_f64),
        competitor_score: score_at(data, "/competitor/global_score"),
        winner: winner_at(data),
        analyzer_errors: data
            .pointer("/errors")
            .and_then(Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn string_at(data: &Value, pointer: &str) -> Option<String> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn score_at(data: &Value, pointer: &str) -> Option<u8> {
    data.pointer(pointer)
        .and_then(Value::as_u64)
        .map(|score| score.min(100) as u8)
}

fn count_at(data: &Value, pointer: &str) -> Option<usize> {
    data.pointer(pointer)
        .and_then(Value::as_u64)
        .map(|count| count as usize)
}

fn winner_at(data: &Value) -> Option<Winner> {
    match data.pointer("/winner").and_then(Value::as_str) {
        Some("target") => Some(Winner::Target),
        Some("competitor") => Some(Winner::Competitor),
        Some("draw") => Some(Winner::Draw),
        _ => None,
    }
}
