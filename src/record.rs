use std::fmt;

/// Layout of the text produced by the clusterware status command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `crs_stat`: one flat NAME/TYPE/TARGET/STATE block per resource
    Legacy,
    /// `crsctl status resource -v`: multi-attribute, possibly multi-instance
    Verbose,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Legacy => write!(f, "legacy"),
            Format::Verbose => write!(f, "verbose"),
        }
    }
}

/// Where a resource runs: on every node by itself, or placed by the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Local,
    Cluster,
}

impl Scope {
    /// A node-local resource reports its cardinality as an ONLINE/OFFLINE
    /// flag, anything else is a member count or list.
    pub fn from_cardinality(value: &str) -> Scope {
        match value {
            "ONLINE" | "OFFLINE" => Scope::Local,
            _ => Scope::Cluster,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            Scope::Local => "L",
            Scope::Cluster => "C",
        }
    }
}

/// One line of the status table
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputRow {
    pub name: String,
    pub type_label: String,
    /// Absent in the legacy format
    pub scope: Option<Scope>,
    pub target: String,
    pub state: String,
    pub node: String,
    pub failure_count: Option<u32>,
    pub restart_count: Option<u32>,
    pub state_details: String,
}

impl OutputRow {
    /// The resource should be up but is not.
    pub fn is_anomalous(&self) -> bool {
        self.target == "ONLINE" && self.state != "ONLINE"
    }
}

/// Line-driven accumulator turning status command output into rows.
///
/// Rows are pushed to `rows` as soon as a record is complete, in input order.
pub trait Formatter {
    fn consume(&mut self, line: &str, rows: &mut Vec<OutputRow>);

    /// Called once the stream is exhausted.
    fn finish(&mut self, rows: &mut Vec<OutputRow>);
}

/// Splits a `KEY=value` line on the first `=`.
pub(crate) fn split_field(line: &str) -> Option<(&str, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split_once('=')
}

/// Splits a raw state such as `ONLINE on node1` into the state and the node.
///
/// The node is the third whitespace separated token, empty when missing.
pub(crate) fn split_state(raw: &str) -> (String, String) {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let state = tokens.first().copied().unwrap_or_default().to_string();
    let node = tokens.get(2).copied().unwrap_or_default().to_string();
    (state, node)
}
