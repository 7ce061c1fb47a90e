//! Text rendering of search results for the output region.

use crate::septa::{TrainRecord, field, format_schedule};

/// Output text for a successful search with at least one record.
pub fn render_records(origin: &str, destination: &str, records: &[TrainRecord]) -> String {
    let mut text = format!(
        "Trains from {origin} to {destination}\nFound {} trains:\n{}\n\n",
        records.len(),
        "=".repeat(60)
    );

    for (i, record) in records.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, format_schedule(record)));

        let live = [
            ("Current Status", field::CURRENT_STATUS),
            ("Current Location", field::CURRENT_LOCATION),
            ("Is Late", field::IS_LATE),
        ];
        for (label, name) in live {
            if record.get(name).is_some() {
                text.push_str(&format!("   {label}: {}\n", record.text_or_unknown(name)));
            }
        }
        text.push('\n');
    }

    text
}

pub const NO_TRAINS_OUTPUT: &str = "No trains found for the selected route.";

pub fn failure_output(message: &str) -> String {
    format!("Error occurred: {message}")
}

pub fn success_status(count: usize, updated: &str) -> String {
    format!("Found {count} trains - Last updated: {updated}")
}
