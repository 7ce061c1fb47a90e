//! Human-readable rendering of train records.

use super::types::{TrainRecord, field};

/// Two-line summary of a scheduled train.
///
/// ```text
/// Train 123: Suburban Station → 30th Street Station
/// Departure: 10:00 | Arrival: 10:20 | Delay: 5 min
/// ```
///
/// Missing fields read `Unknown`. The delay clause only appears for a
/// non-zero delay.
pub fn format_schedule(record: &TrainRecord) -> String {
    let mut schedule = format!(
        "Train {}: {} → {}\nDeparture: {} | Arrival: {}",
        record.text_or_unknown(field::TRAIN_ID),
        record.text_or_unknown(field::ORIGIN),
        record.text_or_unknown(field::DESTINATION),
        record.text_or_unknown(field::DEPARTURE_TIME),
        record.text_or_unknown(field::ARRIVAL_TIME),
    );

    if let Some(delay) = record.text(field::DELAY).filter(|d| !is_zero_delay(d)) {
        schedule.push_str(&format!(" | Delay: {delay} min"));
    }

    schedule
}

fn is_zero_delay(delay: &str) -> bool {
    let delay = delay.trim();
    delay.is_empty() || delay.parse::<f64>().is_ok_and(|d| d == 0.0)
}
