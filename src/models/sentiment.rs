use serde::{Deserialize, Serialize};

/// Coarse polarity of a piece of text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// Keyword-vote breakdown for one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSentiment {
    pub sentiment: Sentiment,
    pub score: i32,
    pub positive_matches: Vec<String>,
    pub negative_matches: Vec<String>,
}

/// Request body for classifying a single text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

/// Request body for classifying several news items at once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyBatchRequest {
    pub texts: Vec<String>,
}
