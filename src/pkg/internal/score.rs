use lazy_static::lazy_static;
use regex::Regex;

/// Sentinel stored when no usable score can be found in the model output.
pub const SCORE_UNAVAILABLE: &str = "N/A";

lazy_static! {
    /// Fallback patterns tried in priority order. The model's wording is not
    /// contractually fixed, so several phrasings are tolerated.
    static ref SCORE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)Total Score[:\s]*(\d+)").unwrap(),
        Regex::new(r"(?i)Score[:\s]*(\d+)\s*/\s*100").unwrap(),
        Regex::new(r"(?i)Score[:\s]*(\d+)").unwrap(),
        Regex::new(r"(\d+)\s*/\s*100").unwrap(),
    ];
}

/// Scans the tailored output for a numeral adjacent to "Score"/"Total
/// Score". The first pattern whose captured value parses into [0, 100]
/// wins; an out-of-range hit falls through to the next pattern. Never
/// fails, the sentinel covers the no-match case.
pub fn extract_score(text: &str) -> String {
    for pattern in SCORE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                if value <= 100 {
                    tracing::debug!("score {} extracted with pattern {}", value, pattern.as_str());
                    return value.to_string();
                }
            }
        }
    }
    tracing::warn!("could not extract score from model output");
    SCORE_UNAVAILABLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_a_labelled_total_score() {
        let text = "The resume shows strong alignment.\n\nTotal Score: 87";
        assert_eq!(extract_score(text), "87");
    }

    #[test]
    fn extracts_a_score_over_100_notation() {
        let text = "Overall assessment complete. Score: 45/100";
        assert_eq!(extract_score(text), "45");
    }

    #[test]
    fn returns_the_sentinel_when_nothing_matches() {
        let text = "A thorough rewrite with no numeric summary at all.";
        assert_eq!(extract_score(text), SCORE_UNAVAILABLE);
    }

    #[test]
    fn first_pattern_in_priority_order_wins() {
        let text = "Keyword section Score: 45/100.\nTotal Score: 87";
        assert_eq!(extract_score(text), "87");
    }

    #[test]
    fn out_of_range_values_fall_through_to_later_patterns() {
        let text = "Total Score: 150 overall, final mark 88/100";
        assert_eq!(extract_score(text), "88");
    }

    #[test]
    fn out_of_range_values_alone_yield_the_sentinel() {
        assert_eq!(extract_score("Score: 999"), SCORE_UNAVAILABLE);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(extract_score("total score: 63"), "63");
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(extract_score("Total Score: 0"), "0");
        assert_eq!(extract_score("Total Score: 100"), "100");
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "Evaluation narrative.\nScore: 72";
        assert_eq!(extract_score(text), extract_score(text));
    }
}
