use std::sync::Arc;
use tickerpulse::domain::lexicon::LexiconStore;
use tickerpulse::domain::scoring::{HybridScorer, NEUTRAL_LEXICON_SCORE, lexicon_score};
use tickerpulse::domain::sentiment::{SentimentLabel, compound_to_score};
use tickerpulse::infrastructure::sentiment::{VaderPolarity, vader};

const SAMPLES: &[&str] = &[
    "",
    "   ",
    "TSLA to the moon!!! 🚀🚀",
    "Earnings crushed it, huge profit and strong guidance",
    "Bankruptcy incoming, sell everything before the crash",
    "Holding through the range, chart looks flat",
    "Check https://example.com/dd and [this thread](https://reddit.com/r/x) for the DD",
    "I HATE this stock. Worst. Decision. Ever.",
    "12345 !!! ??? ...",
    "Not bad, not great, just mixed signals",
];

fn full_scorer() -> HybridScorer {
    let lexicon = LexiconStore::with_general(vader::general_lexicon()).unwrap();
    HybridScorer::new(Arc::new(lexicon), Arc::new(VaderPolarity::new()))
}

#[test]
fn test_scores_stay_in_range() {
    let scorer = full_scorer();
    for text in SAMPLES {
        let s = scorer.score(text);
        assert!((0.0..=100.0).contains(&s.lexicon_score), "{:?}: {:?}", text, s);
        assert!((-1.0..=1.0).contains(&s.polarity_compound), "{:?}: {:?}", text, s);
        assert!((-1.0..=1.0).contains(&s.blended_compound), "{:?}: {:?}", text, s);
        assert!((0.0..=100.0).contains(&compound_to_score(s.blended_compound)));
    }
}

#[test]
fn test_label_follows_thresholds() {
    let scorer = full_scorer();
    for text in SAMPLES {
        let s = scorer.score(text);
        let expected = if s.blended_compound >= 0.05 {
            SentimentLabel::Positive
        } else if s.blended_compound <= -0.05 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        assert_eq!(s.label, expected, "{:?}", text);
    }
}

#[test]
fn test_scoring_is_deterministic() {
    let scorer = full_scorer();
    for text in SAMPLES {
        assert_eq!(scorer.score(text), scorer.score(text));
    }
}

#[test]
fn test_text_without_lexicon_terms_is_neutral_lexically() {
    let lexicon = LexiconStore::with_general(vader::general_lexicon()).unwrap();
    assert_eq!(lexicon_score(&lexicon, ""), NEUTRAL_LEXICON_SCORE);
    assert_eq!(lexicon_score(&lexicon, "zzqx qqvv 12345"), NEUTRAL_LEXICON_SCORE);
}

#[test]
fn test_empty_text_scores_neutral() {
    let s = full_scorer().score("");
    assert_eq!(s.lexicon_score, NEUTRAL_LEXICON_SCORE);
    assert_eq!(s.polarity_compound, 0.0);
    assert_eq!(s.blended_compound, 0.0);
    assert_eq!(s.label, SentimentLabel::Neutral);
}

#[test]
fn test_financial_terms_drive_direction() {
    let scorer = full_scorer();
    assert_eq!(
        scorer.score("bullish growth and profit").label,
        SentimentLabel::Positive
    );
    assert_eq!(
        scorer.score("bearish crash and bankruptcy").label,
        SentimentLabel::Negative
    );
}
