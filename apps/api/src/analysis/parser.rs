//! Response parser — maps one backend's free-text evaluation into a
//! [`ParsedEvaluation`].
//!
//! Parsing is a total function. Backends are told to answer with four labeled
//! sections (SCORE, GAPS, MISSING_KEYWORDS, RECOMMENDATIONS) but routinely
//! wrap them in extra prose, change label casing, or drop sections entirely.
//! Every missing or empty field takes a documented fallback value; no input,
//! however malformed, fails the pipeline.

use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::models::ParsedEvaluation;
use crate::gateway::BackendId;

pub const FALLBACK_SCORE: u32 = 50;
pub const FALLBACK_GAPS: &str = "No specific gaps identified";
pub const FALLBACK_KEYWORDS: &str = "No missing keywords identified";
pub const FALLBACK_RECOMMENDATIONS: &str = "No recommendations available";

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)SCORE:\s*(\d+)").expect("valid score regex"));

static GAPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)GAPS:\s*(.*?)(?:MISSING_KEYWORDS|$)").expect("valid gaps regex")
});

static KEYWORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)MISSING_KEYWORDS:\s*(.*?)(?:RECOMMENDATIONS|$)")
        .expect("valid keywords regex")
});

static RECOMMENDATIONS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)RECOMMENDATIONS:\s*(.*)$").expect("valid recs regex"));

/// Parses one raw evaluation response. Never fails: absent or unparseable
/// fields take their fallback values.
pub fn parse_evaluation(backend: BackendId, raw: &str) -> ParsedEvaluation {
    let score = SCORE_RE
        .captures(raw)
        .and_then(|c| c[1].parse::<u32>().ok())
        .map(|s| s.min(100))
        .unwrap_or(FALLBACK_SCORE);

    ParsedEvaluation {
        backend,
        score,
        gaps: section_or(&GAPS_RE, raw, FALLBACK_GAPS),
        missing_keywords: section_or(&KEYWORDS_RE, raw, FALLBACK_KEYWORDS),
        recommendations: section_or(&RECOMMENDATIONS_RE, raw, FALLBACK_RECOMMENDATIONS),
    }
}

/// Extracts a trimmed section body, falling back when the label is absent or
/// the section is empty.
fn section_or(re: &Regex, raw: &str, fallback: &str) -> String {
    re.captures(raw)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND: BackendId = BackendId::new("test-backend");

    #[test]
    fn test_well_formed_response_round_trip() {
        let parsed = parse_evaluation(
            BACKEND,
            "SCORE: 82\nGAPS: a,b\nMISSING_KEYWORDS: x\nRECOMMENDATIONS: y",
        );
        assert_eq!(parsed.score, 82);
        assert_eq!(parsed.gaps, "a,b");
        assert_eq!(parsed.missing_keywords, "x");
        assert_eq!(parsed.recommendations, "y");
    }

    #[test]
    fn test_empty_input_yields_all_fallbacks() {
        let parsed = parse_evaluation(BACKEND, "");
        assert_eq!(parsed.score, FALLBACK_SCORE);
        assert_eq!(parsed.gaps, FALLBACK_GAPS);
        assert_eq!(parsed.missing_keywords, FALLBACK_KEYWORDS);
        assert_eq!(parsed.recommendations, FALLBACK_RECOMMENDATIONS);
    }

    #[test]
    fn test_no_recognizable_labels_yields_all_fallbacks() {
        let parsed = parse_evaluation(
            BACKEND,
            "I'm sorry, I can't evaluate this resume right now.",
        );
        assert_eq!(parsed.score, FALLBACK_SCORE);
        assert_eq!(parsed.gaps, FALLBACK_GAPS);
        assert_eq!(parsed.missing_keywords, FALLBACK_KEYWORDS);
        assert_eq!(parsed.recommendations, FALLBACK_RECOMMENDATIONS);
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let parsed = parse_evaluation(
            BACKEND,
            "score: 71\ngaps: missing cloud experience\nmissing_keywords: kubernetes\nrecommendations: add metrics",
        );
        assert_eq!(parsed.score, 71);
        assert_eq!(parsed.gaps, "missing cloud experience");
        assert_eq!(parsed.missing_keywords, "kubernetes");
        assert_eq!(parsed.recommendations, "add metrics");
    }

    #[test]
    fn test_surrounding_prose_is_tolerated() {
        let raw = "Sure! Here is my evaluation of the resume.\n\n\
                   SCORE: 64\n\n\
                   GAPS:\n- No leadership experience\n- Short tenures\n\n\
                   MISSING_KEYWORDS: terraform, grafana\n\n\
                   RECOMMENDATIONS: Quantify achievements.\n\n\
                   Good luck with your application!";
        let parsed = parse_evaluation(BACKEND, raw);
        assert_eq!(parsed.score, 64);
        assert!(parsed.gaps.contains("No leadership experience"));
        assert!(parsed.gaps.contains("Short tenures"));
        assert_eq!(parsed.missing_keywords, "terraform, grafana");
        assert!(parsed.recommendations.starts_with("Quantify achievements."));
    }

    #[test]
    fn test_multiline_sections_stop_at_next_label() {
        let raw = "SCORE: 55\nGAPS: first gap\nsecond gap\nMISSING_KEYWORDS: kw1\nkw2\nRECOMMENDATIONS: do things";
        let parsed = parse_evaluation(BACKEND, raw);
        assert_eq!(parsed.gaps, "first gap\nsecond gap");
        assert_eq!(parsed.missing_keywords, "kw1\nkw2");
        assert!(!parsed.gaps.contains("kw1"));
    }

    #[test]
    fn test_unparseable_score_falls_back_to_50() {
        let parsed = parse_evaluation(BACKEND, "SCORE: excellent\nGAPS: none");
        assert_eq!(parsed.score, FALLBACK_SCORE);
        assert_eq!(parsed.gaps, "none");
    }

    #[test]
    fn test_out_of_range_score_is_clamped() {
        let parsed = parse_evaluation(BACKEND, "SCORE: 250");
        assert_eq!(parsed.score, 100);
    }

    #[test]
    fn test_present_but_empty_section_falls_back() {
        let parsed = parse_evaluation(
            BACKEND,
            "SCORE: 40\nGAPS:\nMISSING_KEYWORDS: docker\nRECOMMENDATIONS:",
        );
        assert_eq!(parsed.gaps, FALLBACK_GAPS);
        assert_eq!(parsed.missing_keywords, "docker");
        assert_eq!(parsed.recommendations, FALLBACK_RECOMMENDATIONS);
    }

    #[test]
    fn test_partial_labels_mix_fallback_and_parsed() {
        let parsed = parse_evaluation(BACKEND, "SCORE: 90");
        assert_eq!(parsed.score, 90);
        assert_eq!(parsed.gaps, FALLBACK_GAPS);
        assert_eq!(parsed.missing_keywords, FALLBACK_KEYWORDS);
        assert_eq!(parsed.recommendations, FALLBACK_RECOMMENDATIONS);
    }
}
