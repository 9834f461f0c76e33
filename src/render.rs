//! Fixed width, colored table lines.

use colored::{ColoredString, Colorize};

use crate::record::{Format, OutputRow};

const NAME_WIDTH: usize = 40;
const SCOPE_WIDTH: usize = 1;
const TARGET_WIDTH: usize = 10;
const STATE_WIDTH: usize = 12;
const NODE_WIDTH: usize = 15;
const COUNT_WIDTH: usize = 2;

const DETAILS_HEADER: &str = "State details";

/// Color of a printed line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    /// Resource not in its target state
    Alert,
    Normal,
    /// Titles, column headers and separators
    Header,
}

impl Tone {
    pub fn of(row: &OutputRow) -> Tone {
        if row.is_anomalous() {
            Tone::Alert
        } else {
            Tone::Normal
        }
    }

    pub fn paint(&self, line: &str) -> ColoredString {
        match self {
            Tone::Alert => line.red().bold(),
            Tone::Normal => line.normal(),
            Tone::Header => line.cyan(),
        }
    }
}

struct Cells<'a> {
    name: &'a str,
    type_label: &'a str,
    scope: &'a str,
    target: &'a str,
    state: &'a str,
    node: &'a str,
    failures: &'a str,
    restarts: &'a str,
    details: &'a str,
}

/// Column layout, one per input format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Legacy,
    Verbose,
}

impl From<Format> for Layout {
    fn from(format: Format) -> Self {
        match format {
            Format::Legacy => Layout::Legacy,
            Format::Verbose => Layout::Verbose,
        }
    }
}

impl Layout {
    fn type_width(&self) -> usize {
        match self {
            Layout::Legacy => 14,
            Layout::Verbose => 16,
        }
    }

    fn line(&self, cells: &Cells) -> String {
        let line = match self {
            Layout::Legacy => format!(
                "{:<nw$} {:<tw$} {:<gw$} {:<sw$} {:<hw$}",
                cells.name,
                cells.type_label,
                cells.target,
                cells.state,
                cells.node,
                nw = NAME_WIDTH,
                tw = self.type_width(),
                gw = TARGET_WIDTH,
                sw = STATE_WIDTH,
                hw = NODE_WIDTH,
            ),
            Layout::Verbose => format!(
                "{:<nw$} {:<tw$} {:<cw$} {:<gw$} {:<sw$} {:<hw$} {:>fw$} {:>fw$} {}",
                cells.name,
                cells.type_label,
                cells.scope,
                cells.target,
                cells.state,
                cells.node,
                cells.failures,
                cells.restarts,
                cells.details,
                nw = NAME_WIDTH,
                tw = self.type_width(),
                cw = SCOPE_WIDTH,
                gw = TARGET_WIDTH,
                sw = STATE_WIDTH,
                hw = NODE_WIDTH,
                fw = COUNT_WIDTH,
            ),
        };
        line.trim_end().to_string()
    }

    /// Plain text of a row, without any color.
    pub fn row(&self, row: &OutputRow) -> String {
        let failures = row.failure_count.map(|c| c.to_string()).unwrap_or_default();
        let restarts = row.restart_count.map(|c| c.to_string()).unwrap_or_default();
        self.line(&Cells {
            name: &row.name,
            type_label: &row.type_label,
            scope: row.scope.map(|s| s.indicator()).unwrap_or_default(),
            target: &row.target,
            state: &row.state,
            node: &row.node,
            failures: &failures,
            restarts: &restarts,
            details: &row.state_details,
        })
    }

    pub fn header(&self) -> String {
        self.line(&Cells {
            name: "Name",
            type_label: "Type",
            scope: "S",
            target: "Target",
            state: "State",
            node: "Host",
            failures: "FC",
            restarts: "RC",
            details: DETAILS_HEADER,
        })
    }

    pub fn separator(&self) -> String {
        let name = "-".repeat(NAME_WIDTH);
        let type_label = "-".repeat(self.type_width());
        let scope = "-".repeat(SCOPE_WIDTH);
        let target = "-".repeat(TARGET_WIDTH);
        let state = "-".repeat(STATE_WIDTH);
        let node = "-".repeat(NODE_WIDTH);
        let count = "-".repeat(COUNT_WIDTH);
        let details = "-".repeat(DETAILS_HEADER.len());
        self.line(&Cells {
            name: &name,
            type_label: &type_label,
            scope: &scope,
            target: &target,
            state: &state,
            node: &node,
            failures: &count,
            restarts: &count,
            details: &details,
        })
    }
}
