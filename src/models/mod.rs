mod mood;
mod quote;
mod sentiment;

pub use mood::{MoodResult, MoodStatus};
pub use quote::{parse_change_percent, validate_symbol, Quote, MAX_SYMBOL_LEN};
pub use sentiment::{ClassifyBatchRequest, ClassifyRequest, Sentiment, TextSentiment};
