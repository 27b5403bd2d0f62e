use tracing::info;

use crate::models::{MoodResult, MoodStatus, Quote};
use crate::services::quote_service::QuoteFetcher;

/// One band of the mood heuristic. Thresholds are daily change in percent.
struct MoodBand {
    status: MoodStatus,
    applies: fn(f64) -> bool,
    score: fn(f64) -> f64,
}

/// Band edges in percent. A change landing exactly on one is a tie and
/// scores Neutral.
const THRESHOLDS: [f64; 4] = [1.0, 0.2, -0.2, -1.0];

/// Evaluated top to bottom, first match wins. Extremes come before the wider
/// bands so the wider band never shadows them.
const MOOD_BANDS: [MoodBand; 5] = [
    MoodBand {
        status: MoodStatus::Neutral,
        applies: |change| THRESHOLDS.contains(&change),
        score: |_| NEUTRAL_SCORE,
    },
    MoodBand {
        status: MoodStatus::ExtremeGreed,
        applies: |change| change > 1.0,
        score: |change| 85.0 + (change - 1.0) * 10.0,
    },
    MoodBand {
        status: MoodStatus::Greed,
        applies: |change| change > 0.2,
        score: |change| 60.0 + (change - 0.2) * 20.0,
    },
    MoodBand {
        status: MoodStatus::ExtremeFear,
        applies: |change| change < -1.0,
        score: |change| 15.0 + (change + 1.0) * 10.0,
    },
    MoodBand {
        status: MoodStatus::Fear,
        applies: |change| change < -0.2,
        score: |change| 40.0 + (change + 0.2) * 20.0,
    },
];

const NEUTRAL_SCORE: f64 = 50.0;

/// Current market mood from the reference symbol (or `symbol`).
///
/// Always returns a result; upstream trouble yields the neutral fallback.
pub async fn get_mood(fetcher: &QuoteFetcher, symbol: Option<&str>) -> MoodResult {
    let quote = fetcher.fetch(symbol).await;
    let mood = derive_mood(quote.as_ref());

    match &quote {
        Some(q) => info!("Market mood from {}: {} ({})", q.symbol, mood.value, mood.status),
        None => info!("Market mood unavailable upstream, serving fallback {}", mood.status),
    }
    mood
}

/// Derive the market mood from a quote, or the neutral fallback without one.
pub fn derive_mood(quote: Option<&Quote>) -> MoodResult {
    match quote {
        Some(quote) => mood_from_change(quote.change_percent),
        None => MoodResult::fallback(),
    }
}

/// Map a daily change percent onto the 0-100 mood index.
pub fn mood_from_change(change_percent: f64) -> MoodResult {
    let change = if change_percent.is_nan() { 0.0 } else { change_percent };

    let (status, raw) = MOOD_BANDS
        .iter()
        .find(|band| (band.applies)(change))
        .map(|band| (band.status, (band.score)(change)))
        .unwrap_or((MoodStatus::Neutral, NEUTRAL_SCORE));

    MoodResult {
        value: raw.clamp(0.0, 100.0).round() as u8,
        status,
        change,
    }
}
