//! Aggregator — combines per-model scores into one final result.
//!
//! Plain arithmetic mean, clamped to [0, 100]. An empty score set (every
//! backend failed) yields a neutral 50, not an error. Evaluations keep
//! backend invocation order.

use crate::analysis::models::{AggregateResult, ParsedEvaluation};

/// Final score when no backend produced a usable evaluation.
pub const NEUTRAL_SCORE: f64 = 50.0;

pub fn aggregate(ideal_resume: String, evaluations: Vec<ParsedEvaluation>) -> AggregateResult {
    let final_score = if evaluations.is_empty() {
        NEUTRAL_SCORE
    } else {
        let sum: f64 = evaluations.iter().map(|e| f64::from(e.score)).sum();
        (sum / evaluations.len() as f64).clamp(0.0, 100.0)
    };

    AggregateResult {
        final_score,
        display_score: display_score(final_score),
        ideal_resume,
        evaluations,
    }
}

/// Maps a 0–100 final score onto the 0–10 display scale, one decimal place.
pub fn display_score(final_score: f64) -> f64 {
    (final_score / 10.0 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::BackendId;

    fn eval(backend: &'static str, score: u32) -> ParsedEvaluation {
        ParsedEvaluation {
            backend: BackendId::new(backend),
            score,
            gaps: "g".to_string(),
            missing_keywords: "k".to_string(),
            recommendations: "r".to_string(),
        }
    }

    #[test]
    fn test_empty_set_yields_neutral_50() {
        let result = aggregate("ideal".to_string(), vec![]);
        assert_eq!(result.final_score, NEUTRAL_SCORE);
        assert_eq!(result.display_score, 5.0);
        assert!(result.evaluations.is_empty());
    }

    #[test]
    fn test_single_evaluation_is_its_own_mean() {
        let result = aggregate("ideal".to_string(), vec![eval("a", 90)]);
        assert_eq!(result.final_score, 90.0);
        assert_eq!(result.display_score, 9.0);
    }

    #[test]
    fn test_mean_of_three_scores() {
        let result = aggregate(
            "ideal".to_string(),
            vec![eval("a", 80), eval("b", 90), eval("c", 70)],
        );
        assert_eq!(result.final_score, 80.0);
        assert_eq!(result.display_score, 8.0);
    }

    #[test]
    fn test_final_score_always_in_bounds() {
        for scores in [vec![0, 0, 0], vec![100, 100], vec![13, 87, 55, 99]] {
            let evals = scores.iter().map(|&s| eval("a", s)).collect();
            let result = aggregate(String::new(), evals);
            assert!((0.0..=100.0).contains(&result.final_score));
        }
    }

    #[test]
    fn test_display_score_rounds_to_one_decimal() {
        assert_eq!(display_score(73.0), 7.3);
        assert_eq!(display_score(100.0), 10.0);
        assert_eq!(display_score(0.0), 0.0);
        // 86.666... → 8.7
        assert_eq!(display_score(260.0 / 3.0), 8.7);
    }

    #[test]
    fn test_evaluations_keep_invocation_order() {
        let result = aggregate(
            "ideal".to_string(),
            vec![eval("gemini", 10), eval("openai", 95), eval("mistral", 40)],
        );
        let order: Vec<&str> = result
            .evaluations
            .iter()
            .map(|e| e.backend.as_str())
            .collect();
        assert_eq!(order, vec!["gemini", "openai", "mistral"]);
    }

    #[test]
    fn test_ideal_resume_carried_through() {
        let result = aggregate("the benchmark".to_string(), vec![eval("a", 60)]);
        assert_eq!(result.ideal_resume, "the benchmark");
    }
}
