//! Heuristic detector for Rick Astley bait links.

use crate::domain::{ClassificationResult, Classifier};

/// Known bait signatures, in priority order.
///
/// The first signature contained in the lower-cased URL wins, so the bare
/// video id shadows the longer domain forms that follow it.
pub const SIGNATURES: &[&str] = &[
    "dQw4w9WgXcQ",
    "rickroll",
    "rick-roll",
    "never-gonna-give-you-up",
    "rick_astley",
    "youtu.be/dQw4w9WgXcQ",
    "youtube.com/watch?v=dQw4w9WgXcQ",
    "youtube.com/embed/dQw4w9WgXcQ",
    "tiktok.com/@rickastley",
];

/// Loose keyword fragments checked when no signature matched.
pub const KEYWORDS: &[&str] = &["rick", "astley", "never gonna"];

/// Pattern name reported for keyword hits.
pub const HEURISTIC_PATTERN: &str = "heuristic-keywords";

/// Stateless detector backed by [`SIGNATURES`] and [`KEYWORDS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BaitDetector;

impl BaitDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for BaitDetector {
    fn analyze(&self, url: &str) -> ClassificationResult {
        let lower_url = url.to_lowercase();

        if let Some(signature) = SIGNATURES
            .iter()
            .find(|signature| lower_url.contains(&signature.to_lowercase()))
        {
            return ClassificationResult::exact(
                signature,
                format!("Matched known Rickroll pattern: {signature}"),
            );
        }

        if KEYWORDS.iter().any(|keyword| lower_url.contains(keyword)) {
            return ClassificationResult::heuristic(
                HEURISTIC_PATTERN,
                "Matched heuristic keywords associated with Rick Astley",
            );
        }

        ClassificationResult::no_match("No Rickroll indicators detected")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::{
        EXACT_CONFIDENCE, HEURISTIC_CONFIDENCE, NO_MATCH_CONFIDENCE,
    };

    #[test]
    fn test_video_id_matches_first_signature() {
        let result = BaitDetector::new().analyze("https://youtu.be/dQw4w9WgXcQ");

        assert!(result.is_match);
        assert_eq!(result.confidence, EXACT_CONFIDENCE);
        assert_eq!(result.matched_pattern.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(result.reason, "Matched known Rickroll pattern: dQw4w9WgXcQ");
    }

    #[test]
    fn test_signature_match_is_case_insensitive() {
        let result = BaitDetector::new().analyze("https://www.youtube.com/watch?v=DQW4W9WGXCQ");

        assert!(result.is_match);
        assert_eq!(result.matched_pattern.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_each_signature_reports_itself_when_alone() {
        let detector = BaitDetector::new();
        let standalone = [
            "rickroll",
            "rick-roll",
            "never-gonna-give-you-up",
            "rick_astley",
            "tiktok.com/@rickastley",
        ];

        for signature in standalone {
            let result = detector.analyze(&format!("https://{signature}/x"));
            assert!(result.is_match, "{signature} should match");
            assert_eq!(result.confidence, EXACT_CONFIDENCE);
            assert_eq!(result.matched_pattern.as_deref(), Some(signature));
        }
    }

    #[test]
    fn test_declared_order_breaks_ties() {
        // Both "rickroll" and "rick-roll" appear; "rickroll" is declared first.
        let result = BaitDetector::new().analyze("https://rick-roll.example/rickroll");

        assert_eq!(result.matched_pattern.as_deref(), Some("rickroll"));
    }

    #[test]
    fn test_heuristic_keywords() {
        let detector = BaitDetector::new();

        for url in [
            "https://example.com/rick-and-morty",
            "https://music.example/astley",
            "https://lyrics.example/never gonna",
        ] {
            let result = detector.analyze(url);
            assert!(result.is_match, "{url} should match");
            assert_eq!(result.confidence, HEURISTIC_CONFIDENCE);
            assert_eq!(result.matched_pattern.as_deref(), Some(HEURISTIC_PATTERN));
        }
    }

    #[test]
    fn test_clean_url_is_not_matched() {
        let result = BaitDetector::new().analyze("https://example.com/docs");

        assert!(!result.is_match);
        assert_eq!(result.confidence, NO_MATCH_CONFIDENCE);
        assert!(result.matched_pattern.is_none());
        assert_eq!(result.reason, "No Rickroll indicators detected");
    }
}
