//! Filters rows and writes them as tables.

use std::io::Write;

use regex::{Regex, RegexBuilder};

use crate::record::{OutputRow, Scope};
use crate::render::{Layout, Tone};
use crate::Result;

pub static LOCAL_TITLE: &str = "Local Resources";
pub static CLUSTER_TITLE: &str = "Cluster Resources";

#[derive(Debug)]
pub struct Report {
    layout: Layout,
    search: Option<Regex>,
}

impl Report {
    /// `search` is matched case-insensitively, as plain text, against the
    /// whole rendered row.
    pub fn new(layout: Layout, search: Option<&str>) -> Result<Report> {
        let search = search
            .filter(|term| !term.is_empty())
            .map(|term| {
                RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()
            })
            .transpose()?;

        Ok(Report { layout, search })
    }

    fn matches(&self, line: &str) -> bool {
        self.search.as_ref().map_or(true, |re| re.is_match(line))
    }

    /// Rendered rows of `scope` (every row when `None`) matching the search.
    pub fn select(&self, rows: &[OutputRow], scope: Option<Scope>) -> Vec<(String, Tone)> {
        rows.iter()
            .filter(|row| scope.is_none() || row.scope == scope)
            .map(|row| (self.layout.row(row), Tone::of(row)))
            .filter(|(line, _)| self.matches(line))
            .collect()
    }

    pub fn write_table<W: Write>(
        &self,
        out: &mut W,
        title: Option<&str>,
        rows: &[OutputRow],
        scope: Option<Scope>,
    ) -> Result<()> {
        if let Some(title) = title {
            writeln!(out, "{}", Tone::Header.paint(title))?;
        }
        writeln!(out, "{}", Tone::Header.paint(&self.layout.header()))?;
        writeln!(out, "{}", Tone::Header.paint(&self.layout.separator()))?;

        for (line, tone) in self.select(rows, scope) {
            writeln!(out, "{}", tone.paint(&line))?;
        }

        Ok(())
    }

    /// Local resources first, then cluster resources.
    pub fn write_split<W: Write>(&self, out: &mut W, rows: &[OutputRow]) -> Result<()> {
        if self.layout == Layout::Legacy {
            tracing::warn!("legacy output has no resource scope, printing a single table");
            return self.write_table(out, None, rows, None);
        }

        self.write_table(out, Some(LOCAL_TITLE), rows, Some(Scope::Local))?;
        writeln!(out)?;
        self.write_table(out, Some(CLUSTER_TITLE), rows, Some(Scope::Cluster))
    }
}
