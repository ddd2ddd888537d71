/// Arrow schema and batch conversion for answer records.
///
/// One row per answer. Nested outputs (deadlines, actions, references) are
/// stored as JSON strings so the row writer can persist them without knowing
/// their shape.
pub mod answers {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Date32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use chrono::NaiveDate;
    use serde::Serialize;

    use crate::record::AnswerRecord;

    /// Schema for extracted answer records.
    pub fn answer_record_schema() -> Schema {
        Schema::new(vec![
            Field::new("registration_number", DataType::Utf8, false),
            Field::new("outcome_status", DataType::Utf8, false),
            Field::new("final_outcome_status", DataType::Utf8, false),
            Field::new("law_implementation_date", DataType::Date32, true),
            Field::new("commission_deadlines", DataType::Utf8, true),
            Field::new("laws_actions", DataType::Utf8, true),
            Field::new("policies_actions", DataType::Utf8, true),
            Field::new("related_eu_legislation", DataType::Utf8, true),
        ])
    }

    /// Convert records into a single batch matching [`answer_record_schema`].
    pub fn records_to_batch(records: &[AnswerRecord]) -> anyhow::Result<RecordBatch> {
        let registration: StringArray = records
            .iter()
            .map(|r| Some(r.registration_number.as_str()))
            .collect();
        let status: StringArray = records
            .iter()
            .map(|r| Some(r.outcome_status.as_str()))
            .collect();
        let label: StringArray = records
            .iter()
            .map(|r| Some(r.final_outcome_status.as_str()))
            .collect();
        let implementation: Date32Array = records
            .iter()
            .map(|r| r.law_implementation_date.map(days_since_epoch))
            .collect();

        let deadlines = json_column(records, |r| r.commission_deadlines.as_ref())?;
        let laws = json_column(records, |r| r.laws_actions.as_ref())?;
        let policies = json_column(records, |r| r.policies_actions.as_ref())?;
        let legislation = json_column(records, |r| r.related_eu_legislation.as_ref())?;

        let columns: Vec<ArrayRef> = vec![
            Arc::new(registration),
            Arc::new(status),
            Arc::new(label),
            Arc::new(implementation),
            Arc::new(deadlines),
            Arc::new(laws),
            Arc::new(policies),
            Arc::new(legislation),
        ];

        Ok(RecordBatch::try_new(
            Arc::new(answer_record_schema()),
            columns,
        )?)
    }

    fn json_column<T, F>(records: &[AnswerRecord], field: F) -> anyhow::Result<StringArray>
    where
        T: Serialize,
        F: Fn(&AnswerRecord) -> Option<&T>,
    {
        let values = records
            .iter()
            .map(|r| field(r).map(serde_json::to_string).transpose())
            .collect::<Result<Vec<Option<String>>, _>>()?;
        Ok(StringArray::from(values))
    }

    fn days_since_epoch(date: NaiveDate) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        (date - epoch).num_days() as i32
    }
}
