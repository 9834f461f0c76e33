//! Status of Oracle Clusterware resources as a colored table.
//!
//! The output of the clusterware status command is parsed into
//! [`OutputRow`]s by the [`Formatter`] matching its [`Format`], then
//! rendered and filtered by a [`Report`].

use std::io::{self, BufRead};
use std::process::ExitStatus;

pub mod config;
pub mod discovery;
pub mod labels;
pub mod legacy;
pub mod record;
pub mod render;
pub mod report;
pub mod verbose;

pub use config::{find_configs, Config};
pub use discovery::Environment;
pub use legacy::LegacyFormatter;
pub use record::{Format, Formatter, OutputRow, Scope};
pub use render::{Layout, Tone};
pub use report::Report;
pub use verbose::VerboseFormatter;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot discover the clusterware environment: {0}")]
    EnvironmentUndiscoverable(String),

    #[error("{command} failed with {status}: {stderr}")]
    UpstreamCommandFailure {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{0} produced no output")]
    EmptyOutput(String),

    #[error("configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parses the whole status command output in `format`.
///
/// Invalid UTF-8 is replaced, so a stray byte only garbles its own field.
pub fn parse<Input: BufRead>(format: Format, input: Input) -> Result<Vec<OutputRow>> {
    let mut formatter: Box<dyn Formatter> = match format {
        Format::Legacy => Box::new(LegacyFormatter::new()),
        Format::Verbose => Box::new(VerboseFormatter::new()),
    };

    let mut rows = Vec::new();
    for line in input.split(b'\n') {
        formatter.consume(&String::from_utf8_lossy(&line?), &mut rows);
    }
    formatter.finish(&mut rows);

    tracing::debug!(%format, rows = rows.len(), "status parsed");
    Ok(rows)
}
