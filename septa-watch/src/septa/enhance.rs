//! Join scheduled trains with live train status.

use std::collections::HashMap;

use serde_json::Value;

use super::types::{TrainRecord, field};

/// Copy live status onto each scheduled record sharing its train ID.
///
/// Output has the same length and order as `scheduled`. When several live
/// records share an ID the first one wins. Records without a live match,
/// or without an ID, are returned unchanged.
pub fn enrich_with_live(scheduled: Vec<TrainRecord>, live: &[TrainRecord]) -> Vec<TrainRecord> {
    let mut by_id: HashMap<String, &TrainRecord> = HashMap::new();
    for record in live {
        if let Some(id) = record.train_id() {
            by_id.entry(id).or_insert(record);
        }
    }

    scheduled
        .into_iter()
        .map(|mut record| {
            if let Some(view) = record.train_id().and_then(|id| by_id.get(&id).copied()) {
                record.insert(
                    field::CURRENT_STATUS,
                    view.text_or_unknown(field::STATUS),
                );
                record.insert(
                    field::CURRENT_LOCATION,
                    view.text_or_unknown(field::CURRENT_LOCATION),
                );
                record.insert(
                    field::IS_LATE,
                    view.get(field::IS_LATE).cloned().unwrap_or(Value::Bool(false)),
                );
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<TrainRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn unmatched_records_pass_through() {
        let scheduled = records(json!([{"train_id": "1"}, {"origin": "Paoli"}]));
        let live = records(json!([{"train_id": "2", "status": "On Time"}]));

        let out = enrich_with_live(scheduled.clone(), &live);
        assert_eq!(out, scheduled);
    }

    #[test]
    fn missing_live_fields_default() {
        let scheduled = records(json!([{"train_id": "7"}]));
        let live = records(json!([{"train_id": "7"}]));

        let out = enrich_with_live(scheduled, &live);
        assert_eq!(out[0].text("current_status").as_deref(), Some("Unknown"));
        assert_eq!(out[0].text("current_location").as_deref(), Some("Unknown"));
        assert_eq!(out[0].get("is_late"), Some(&json!(false)));
    }

    #[test]
    fn first_live_match_wins() {
        let scheduled = records(json!([{"train_id": "7"}]));
        let live = records(json!([
            {"train_id": "7", "status": "first"},
            {"train_id": "7", "status": "second"},
        ]));

        let out = enrich_with_live(scheduled, &live);
        assert_eq!(out[0].text("current_status").as_deref(), Some("first"));
    }

    #[test]
    fn numeric_and_text_ids_match() {
        let scheduled = records(json!([{"train_id": "553"}]));
        let live = records(json!([{"train_id": 553, "status": "Late", "is_late": true}]));

        let out = enrich_with_live(scheduled, &live);
        assert_eq!(out[0].text("current_status").as_deref(), Some("Late"));
        assert_eq!(out[0].get("is_late"), Some(&json!(true)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn id_list() -> impl Strategy<Value = Vec<Option<u8>>> {
            prop::collection::vec(prop::option::of(0u8..10), 0..12)
        }

        fn build(ids: &[Option<u8>]) -> Vec<TrainRecord> {
            ids.iter()
                .enumerate()
                .map(|(i, id)| {
                    let mut r = TrainRecord::default();
                    r.insert("seq", i as u64);
                    if let Some(id) = id {
                        r.insert(field::TRAIN_ID, id.to_string());
                    }
                    r
                })
                .collect()
        }

        proptest! {
            #[test]
            fn output_matches_input_one_to_one(sched in id_list(), live in id_list()) {
                let scheduled = build(&sched);
                let live_records = build(&live);
                let live_ids: Vec<String> =
                    live.iter().flatten().map(|id| id.to_string()).collect();

                let out = enrich_with_live(scheduled.clone(), &live_records);
                prop_assert_eq!(out.len(), scheduled.len());

                for (before, after) in scheduled.iter().zip(&out) {
                    prop_assert_eq!(before.get("seq"), after.get("seq"));
                    let matched = before.train_id().is_some_and(|id| live_ids.contains(&id));
                    prop_assert_eq!(after.get(field::CURRENT_STATUS).is_some(), matched);
                    prop_assert_eq!(after.get(field::IS_LATE).is_some(), matched);
                }
            }
        }
    }
}
