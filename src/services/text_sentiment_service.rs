//! Keyword-vote polarity for news text.
//!
//! Matching is plain substring containment on the lowercased text, not whole
//! words. Short keywords therefore also hit inside longer words ("up" in
//! "supply", "low" in "slowdown"). Callers get the same labels as before, so
//! this stays as is.

use crate::models::{Sentiment, TextSentiment};

pub const POSITIVE_KEYWORDS: [&str; 14] = [
    "surge", "rise", "jump", "gain", "profit", "growth", "record", "bull", "up", "high", "beat",
    "climb", "rally", "soar",
];

pub const NEGATIVE_KEYWORDS: [&str; 14] = [
    "crash", "fall", "drop", "loss", "down", "bear", "inflation", "crisis", "risk", "warn", "weak",
    "low", "plunge", "slump",
];

/// Score `text` and keep the keywords that voted.
///
/// Each keyword votes at most once however often it appears.
pub fn score_text(text: &str) -> TextSentiment {
    let lowered = text.to_lowercase();

    let matches = |keywords: &[&str]| -> Vec<String> {
        keywords
            .iter()
            .filter(|keyword| lowered.contains(*keyword))
            .map(|keyword| keyword.to_string())
            .collect()
    };

    let positive_matches = matches(&POSITIVE_KEYWORDS[..]);
    let negative_matches = matches(&NEGATIVE_KEYWORDS[..]);
    let score = positive_matches.len() as i32 - negative_matches.len() as i32;

    TextSentiment {
        sentiment: label_for(score),
        score,
        positive_matches,
        negative_matches,
    }
}

pub fn classify_text(text: &str) -> Sentiment {
    score_text(text).sentiment
}

fn label_for(score: i32) -> Sentiment {
    match score {
        s if s > 0 => Sentiment::Positive,
        s if s < 0 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}
