//! `crsctl status resource -v` output.
//!
//! A record starts at `NAME` and is emitted at `STATE_DETAILS`. Resources of
//! a multi-state type (ASM, ONS, listeners, networks) list one comma
//! separated TARGET/STATE entry per cluster member and produce one row per
//! entry. Several instance blocks may follow a single `NAME`; each one ends
//! with its own `STATE_DETAILS`.

use crate::labels;
use crate::record::{split_field, split_state, Formatter, OutputRow, Scope};

/// Per-instance fields, cleared after every emission.
#[derive(Default, Debug, PartialEq, Eq)]
struct Block {
    scope: Option<Scope>,
    last_server: String,
    target: Option<String>,
    state: Option<String>,
    failure_count: Option<u32>,
    restart_count: Option<u32>,
}

#[derive(Default, Debug)]
pub struct VerboseFormatter {
    name: String,
    type_label: String,
    multi_state: bool,
    block: Block,
}

fn parse_count(key: &str, value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(count) => Some(count),
        Err(_) => {
            tracing::warn!(key, value, "ignoring unparsable counter");
            None
        }
    }
}

impl VerboseFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn row(&self, target: String, state: String, node: String, details: &str) -> OutputRow {
        OutputRow {
            name: self.name.clone(),
            type_label: self.type_label.clone(),
            scope: Some(self.block.scope.unwrap_or(Scope::Cluster)),
            target,
            state,
            node,
            failure_count: self.block.failure_count,
            restart_count: self.block.restart_count,
            state_details: details.to_string(),
        }
    }

    fn node_or_last_server(&self, node: String) -> String {
        if node.is_empty() {
            self.block.last_server.clone()
        } else {
            node
        }
    }

    fn emit(&mut self, details: &str, rows: &mut Vec<OutputRow>) {
        if self.name.is_empty() && self.block.state.is_none() {
            self.block = Block::default();
            return;
        }

        let state_raw = self.block.state.clone().unwrap_or_default();
        if self.multi_state {
            let targets: Vec<String> = self
                .block
                .target
                .as_deref()
                .map(|t| t.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default();
            let states: Vec<&str> = state_raw.split(',').collect();
            if targets.len() != states.len() {
                tracing::warn!(
                    name = %self.name,
                    targets = targets.len(),
                    states = states.len(),
                    "TARGET and STATE instance counts differ"
                );
            }

            for (i, entry) in states.into_iter().enumerate() {
                let (state, node) = split_state(entry);
                let node = self.node_or_last_server(node);
                let target = targets.get(i).cloned().unwrap_or_default();
                rows.push(self.row(target, state, node, details));
            }
        } else {
            let (state, node) = split_state(&state_raw);
            let node = self.node_or_last_server(node);
            let target = self
                .block
                .target
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string();
            rows.push(self.row(target, state, node, details));
        }

        self.block = Block::default();
    }

    /// An instance block has fields but its STATE_DETAILS never came.
    fn is_truncated(&self) -> bool {
        self.block != Block::default()
    }

    fn flush_unterminated(&mut self, rows: &mut Vec<OutputRow>) {
        if !self.is_truncated() {
            return;
        }

        if self.block.state.is_some() {
            tracing::warn!(name = %self.name, "record without STATE_DETAILS");
            self.emit("", rows);
        } else {
            tracing::warn!(name = %self.name, "record without STATE or STATE_DETAILS dropped");
            self.block = Block::default();
        }
    }
}

impl Formatter for VerboseFormatter {
    fn consume(&mut self, line: &str, rows: &mut Vec<OutputRow>) {
        let Some((key, value)) = split_field(line) else {
            return;
        };

        match key {
            "NAME" => {
                self.flush_unterminated(rows);
                *self = Self::default();
                self.name = value.to_string();
                self.type_label = labels::name_label(value);
            }
            "TYPE" => {
                self.type_label = labels::resolve(value, &self.name);
                self.multi_state = labels::is_multi_state(labels::type_token(value));
            }
            "CARDINALITY_ID" => self.block.scope = Some(Scope::from_cardinality(value.trim())),
            "LAST_SERVER" => self.block.last_server = value.trim().to_string(),
            "RESTART_COUNT" => self.block.restart_count = parse_count(key, value),
            "FAILURE_COUNT" => self.block.failure_count = parse_count(key, value),
            "TARGET" => self.block.target = Some(value.to_string()),
            "STATE" => self.block.state = Some(value.to_string()),
            "STATE_DETAILS" => self.emit(value, rows),
            _ => (),
        }
    }

    fn finish(&mut self, rows: &mut Vec<OutputRow>) {
        self.flush_unterminated(rows);
        *self = Self::default();
    }
}
