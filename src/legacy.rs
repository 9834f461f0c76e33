//! `crs_stat` output: one NAME/TYPE/TARGET/STATE block per resource.

use crate::record::{split_field, split_state, Formatter, OutputRow};

#[derive(Default, Debug)]
pub struct LegacyFormatter {
    name: String,
    type_raw: String,
    target: String,
}

impl LegacyFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Formatter for LegacyFormatter {
    fn consume(&mut self, line: &str, rows: &mut Vec<OutputRow>) {
        let Some((key, value)) = split_field(line) else {
            return;
        };

        match key {
            "NAME" => {
                self.reset();
                self.name = value.to_string();
            }
            "TYPE" => self.type_raw = value.to_string(),
            "TARGET" => self.target = value.trim().to_string(),
            "STATE" => {
                let (state, node) = split_state(value);
                rows.push(OutputRow {
                    name: self.name.clone(),
                    type_label: self.type_raw.clone(),
                    target: self.target.clone(),
                    state,
                    node,
                    ..OutputRow::default()
                });
                self.reset();
            }
            _ => (),
        }
    }

    fn finish(&mut self, _rows: &mut Vec<OutputRow>) {
        if !self.name.is_empty() {
            tracing::warn!(name = %self.name, "record without STATE dropped");
        }
        self.reset();
    }
}
