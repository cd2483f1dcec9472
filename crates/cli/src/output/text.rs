// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text output formatter.
//!
//! ```text
//! === Europe (GDPR) Compliance Report ===
//! <model reply>
//!
//! Europe (GDPR): PASSED
//!
//! === Final Verdict ===
//! Europe (GDPR): PASSED
//! US Privacy: FAILED
//! 1 of 2 regions failed
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::color::scheme;
use crate::runner::{RegionOutcome, RunResult};
use crate::verdict::Verdict;

/// Text output formatter with color support.
pub struct TextFormatter<W: WriteColor> {
    out: W,
}

impl TextFormatter<StandardStream> {
    /// Formatter writing to stdout.
    pub fn stdout(color_choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(color_choice))
    }
}

impl<W: WriteColor> TextFormatter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write the model reply and verdict (or error) for one region.
    pub fn write_outcome(&mut self, outcome: &RegionOutcome) -> std::io::Result<()> {
        let label = outcome.region.label();

        self.out.set_color(&scheme::heading())?;
        write!(self.out, "=== {} Compliance Report ===", label)?;
        self.out.reset()?;
        writeln!(self.out)?;

        match &outcome.result {
            Ok(assessment) => {
                writeln!(self.out, "{}", assessment.reply.trim_end())?;
                writeln!(self.out)?;
                self.write_status(label, verdict_status(assessment.verdict))?;
            }
            Err(err) => {
                self.write_status(label, Status::Error)?;
                writeln!(self.out, "  {}", err)?;
            }
        }
        writeln!(self.out)
    }

    /// Write the per-region verdict table and the closing line.
    pub fn write_summary(&mut self, result: &RunResult) -> std::io::Result<()> {
        self.out.set_color(&scheme::heading())?;
        write!(self.out, "=== Final Verdict ===")?;
        self.out.reset()?;
        writeln!(self.out)?;

        for outcome in &result.outcomes {
            let status = match &outcome.result {
                Ok(a) => verdict_status(a.verdict),
                Err(_) => Status::Error,
            };
            self.write_status(outcome.region.label(), status)?;
        }

        let total = result.outcomes.len();
        let failed = result.failed_count();
        if failed == 0 {
            writeln!(
                self.out,
                "{} region{} passed",
                total,
                if total == 1 { "" } else { "s" }
            )
        } else {
            writeln!(
                self.out,
                "{} of {} region{} failed",
                failed,
                total,
                if total == 1 { "" } else { "s" }
            )
        }
    }

    /// List selected files relative to `root`, one per line.
    pub fn write_file_list(&mut self, root: &Path, files: &[PathBuf]) -> std::io::Result<()> {
        for file in files {
            let shown = file.strip_prefix(root).unwrap_or(file);
            self.out.set_color(&scheme::path())?;
            write!(self.out, "{}", shown.display())?;
            self.out.reset()?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn write_status(&mut self, label: &str, status: Status) -> std::io::Result<()> {
        write!(self.out, "{}: ", label)?;
        self.out.set_color(&status.color())?;
        write!(self.out, "{}", status.text())?;
        self.out.reset()?;
        writeln!(self.out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Passed,
    Failed,
    NoVerdict,
    Error,
}

impl Status {
    fn text(self) -> &'static str {
        match self {
            Status::Passed => "PASSED",
            Status::Failed => "FAILED",
            Status::NoVerdict => "FAILED (no verdict)",
            Status::Error => "FAILED (error)",
        }
    }

    fn color(self) -> ColorSpec {
        match self {
            Status::Passed => scheme::pass(),
            Status::Failed => scheme::fail(),
            Status::NoVerdict | Status::Error => scheme::warn(),
        }
    }
}

fn verdict_status(verdict: Verdict) -> Status {
    match verdict {
        Verdict::Passed => Status::Passed,
        Verdict::Failed => Status::Failed,
        Verdict::Unrecognized => Status::NoVerdict,
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
