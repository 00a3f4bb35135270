// src/report.rs
// =============================================================================
// Turns checked link records into a report a human can act on.
//
// - One status line per link (status tag, HTTP code or error, URL)
// - A summary: total / valid / skipped / broken
// - A remediation list of every broken link with the file and structural
//   path where it lives, so an editor can go straight to it
//
// Invariant: total == valid + skipped + broken. The counts are derived from
// the records in one place and the report can't be mutated afterwards.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::checker::{LinkRecord, LinkStatus};

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    records: Vec<LinkRecord>,
    total: usize,
    valid: usize,
    skipped: usize,
    broken: usize,
}

impl ValidationReport {
    pub fn from_records(records: Vec<LinkRecord>) -> Self {
        let count = |wanted: fn(LinkStatus) -> bool| {
            records.iter().filter(|r| wanted(r.status)).count()
        };
        let valid = count(|s| s == LinkStatus::Ok);
        let skipped = count(|s| s == LinkStatus::Skip);
        let broken = count(LinkStatus::is_broken);

        ValidationReport {
            total: records.len(),
            records,
            valid,
            skipped,
            broken,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn valid(&self) -> usize {
        self.valid
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn broken(&self) -> usize {
        self.broken
    }

    /// Records that need fixing (WARN or FAIL), in report order
    pub fn broken_records(&self) -> impl Iterator<Item = &LinkRecord> {
        self.records.iter().filter(|r| r.status.is_broken())
    }

    // Renders the full human-readable report
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        self.write_table(&mut out)?;
        self.write_summary(&mut out)?;
        self.write_remediation(&mut out)?;
        Ok(out)
    }

    fn write_table(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{:<9} | {:<15} | URL", "STATUS", "CODE")?;
        writeln!(out, "{}", "-".repeat(80))?;
        for record in &self.records {
            writeln!(
                out,
                "{} {:<4} | {:<15} | {}",
                status_icon(record.status),
                record.status.tag(),
                record.detail.to_string(),
                record.url
            )?;
        }
        writeln!(out, "{}", "-".repeat(80))
    }

    fn write_summary(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "🏁 Summary:")?;
        writeln!(out, "   Total Links: {}", self.total)?;
        writeln!(out, "   Valid:       {}", self.valid)?;
        writeln!(out, "   Skipped:     {} (N/A or placeholders)", self.skipped)?;
        writeln!(out, "   Broken/Warn: {}", self.broken)
    }

    fn write_remediation(&self, out: &mut String) -> std::fmt::Result {
        if self.broken == 0 {
            return Ok(());
        }
        writeln!(out)?;
        writeln!(out, "⚠️  Broken Links Details:")?;
        for record in self.broken_records() {
            writeln!(
                out,
                "   - {} › {}: {} ({})",
                record.source, record.path, record.url, record.detail
            )?;
        }
        Ok(())
    }
}

fn status_icon(status: LinkStatus) -> &'static str {
    match status {
        LinkStatus::Ok => "✅",
        LinkStatus::Warn => "⚠️",
        LinkStatus::Fail => "❌",
        LinkStatus::Skip => "⏭️",
    }
}
