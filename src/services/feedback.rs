use crate::models::interview::{Assessment, ScoringMethod};
use crate::utils::similarity::to_percentage;

pub const COULD_NOT_EVALUATE: &str = "Could not evaluate answer.";
/// Reference answer value that marks a question as not gradable.
pub const NOT_APPLICABLE: &str = "N/A";

/// Feedback tiers for embedding similarity, keyed on the displayed percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityBand {
    Excellent,
    Good,
    OnTrack,
    MissingMainPoints,
}

impl SimilarityBand {
    pub fn from_score(score: u8) -> Self {
        if score > 80 {
            SimilarityBand::Excellent
        } else if score > 60 {
            SimilarityBand::Good
        } else if score > 40 {
            SimilarityBand::OnTrack
        } else {
            SimilarityBand::MissingMainPoints
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SimilarityBand::Excellent => {
                "Excellent answer! Your response is comprehensive and covers the key concepts of the ideal answer."
            }
            SimilarityBand::Good => {
                "Good answer. You covered most of the important points, with a few minor gaps."
            }
            SimilarityBand::OnTrack => {
                "You're on the right track, but your answer differs from the ideal answer in important ways."
            }
            SimilarityBand::MissingMainPoints => {
                "Your answer is missing the main points. Review the ideal answer to see what was expected."
            }
        }
    }
}

/// Feedback tiers for the keyword-overlap estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordBand {
    Strong,
    Partial,
    NeedsDetail,
}

impl KeywordBand {
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            KeywordBand::Strong
        } else if score > 40 {
            KeywordBand::Partial
        } else {
            KeywordBand::NeedsDetail
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            KeywordBand::Strong => "Great job! Your answer covers most of the key terms from the ideal answer.",
            KeywordBand::Partial => {
                "Partial credit. Your answer touches on some key terms but misses others."
            }
            KeywordBand::NeedsDetail => {
                "Your answer needs more detail. Compare it with the ideal answer to find the missing concepts."
            }
        }
    }
}

pub fn semantic_feedback(score: u8) -> String {
    format!(
        "**Similarity Score: {}%**\n\n{}",
        score,
        SimilarityBand::from_score(score).message()
    )
}

/// Builds the embedding-based assessment for a cosine similarity.
pub fn semantic_assessment(similarity: f32) -> Assessment {
    let score = to_percentage(similarity);
    Assessment {
        feedback: semantic_feedback(score),
        score,
        method: ScoringMethod::Semantic,
    }
}

pub fn keyword_feedback(score: u8) -> String {
    format!(
        "**Estimated Score: {}%** _(keyword match; semantic scoring unavailable)_\n\n{}",
        score,
        KeywordBand::from_score(score).message()
    )
}

pub fn rejected() -> Assessment {
    Assessment {
        feedback: COULD_NOT_EVALUATE.to_string(),
        score: 0,
        method: ScoringMethod::Rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_band_edges() {
        assert_eq!(SimilarityBand::from_score(100), SimilarityBand::Excellent);
        assert_eq!(SimilarityBand::from_score(81), SimilarityBand::Excellent);
        assert_eq!(SimilarityBand::from_score(80), SimilarityBand::Good);
        assert_eq!(SimilarityBand::from_score(61), SimilarityBand::Good);
        assert_eq!(SimilarityBand::from_score(60), SimilarityBand::OnTrack);
        assert_eq!(SimilarityBand::from_score(41), SimilarityBand::OnTrack);
        assert_eq!(SimilarityBand::from_score(40), SimilarityBand::MissingMainPoints);
        assert_eq!(SimilarityBand::from_score(0), SimilarityBand::MissingMainPoints);
    }

    #[test]
    fn keyword_band_edges() {
        assert_eq!(KeywordBand::from_score(71), KeywordBand::Strong);
        assert_eq!(KeywordBand::from_score(70), KeywordBand::Partial);
        assert_eq!(KeywordBand::from_score(41), KeywordBand::Partial);
        assert_eq!(KeywordBand::from_score(40), KeywordBand::NeedsDetail);
        assert_eq!(KeywordBand::from_score(0), KeywordBand::NeedsDetail);
    }

    const SIMILARITY_TIERS: [SimilarityBand; 4] = [
        SimilarityBand::Excellent,
        SimilarityBand::Good,
        SimilarityBand::OnTrack,
        SimilarityBand::MissingMainPoints,
    ];
    const KEYWORD_TIERS: [KeywordBand; 3] =
        [KeywordBand::Strong, KeywordBand::Partial, KeywordBand::NeedsDetail];

    fn similarity_tiers_in(text: &str) -> Vec<SimilarityBand> {
        SIMILARITY_TIERS
            .into_iter()
            .filter(|b| text.contains(b.message()))
            .collect()
    }

    #[test]
    fn every_percentage_lands_in_exactly_one_tier() {
        for score in 0u8..=100 {
            let text = semantic_feedback(score);
            assert_eq!(
                similarity_tiers_in(&text),
                vec![SimilarityBand::from_score(score)],
                "score {score}"
            );

            let text = keyword_feedback(score);
            let tiers: Vec<_> = KEYWORD_TIERS
                .into_iter()
                .filter(|b| text.contains(b.message()))
                .collect();
            assert_eq!(tiers, vec![KeywordBand::from_score(score)], "score {score}");
        }
    }

    #[test]
    fn tier_follows_the_rounded_score_across_rounding_edges() {
        for score in 0u8..=100 {
            let target = score as f32 / 100.0;
            let expected = SimilarityBand::from_score(score);
            for similarity in [target - 0.0049, target - 0.0004, target, target + 0.0004, target + 0.0049] {
                if !(0.0f32..=1.0).contains(&similarity) {
                    continue;
                }
                let assessment = semantic_assessment(similarity);
                assert_eq!(assessment.score, score, "similarity {similarity}");
                assert_eq!(
                    similarity_tiers_in(&assessment.feedback),
                    vec![expected],
                    "similarity {similarity}"
                );
            }
        }

        let low = semantic_assessment(0.7996);
        let high = semantic_assessment(0.8049);
        assert_eq!(low.score, 80);
        assert_eq!(high.score, 80);
        assert_eq!(low.feedback, high.feedback);
        assert!(low.feedback.contains(SimilarityBand::Good.message()));
    }

    #[test]
    fn feedback_is_prefixed_with_the_percentage() {
        let text = semantic_feedback(85);
        assert!(text.starts_with("**Similarity Score: 85%**"));
        assert!(text.contains(SimilarityBand::Excellent.message()));

        let text = keyword_feedback(44);
        assert!(text.starts_with("**Estimated Score: 44%**"));
        assert!(text.contains(KeywordBand::Partial.message()));
    }
}
