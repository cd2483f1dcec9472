// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Verdict extraction from model replies.
//!
//! Three interchangeable decoders share the [`VerdictDecoder`] trait:
//!
//! - [`StructuredDecoder`]: the last JSON object in the reply shaped
//!   `{"region": "<key>", "passed": bool}` decides.
//! - [`PhraseDecoder`]: the last line mentioning "policy" must carry the
//!   canonical `<key> policy PASSED` phrase.
//! - [`CompliantDecoder`]: the whole reply is the single word `Compliant`.
//!
//! Every decoder fails closed: anything it cannot recognise is
//! [`Verdict::Unrecognized`], which does not count as a pass.

use std::fmt;

use serde::Deserialize;

use crate::region::Region;

/// Outcome of decoding one reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The model declared the code compliant.
    Passed,
    /// The model declared the code non-compliant.
    Failed,
    /// No recognised verdict in the reply.
    Unrecognized,
}

impl Verdict {
    /// Only an explicit pass counts.
    pub fn is_pass(self) -> bool {
        self == Verdict::Passed
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Passed => "PASSED",
            Verdict::Failed => "FAILED",
            Verdict::Unrecognized => "NO VERDICT",
        })
    }
}

/// Turns a model reply into a verdict for one region.
pub trait VerdictDecoder: Send + Sync {
    /// Decode `reply` as an answer about `region`.
    fn decode(&self, reply: &str, region: Region) -> Verdict;
}

/// Which decoder (and matching prompt contract) to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    /// JSON object `{region, passed}`.
    #[default]
    Structured,
    /// Final `<Region> policy PASSED|FAILED` line.
    Phrase,
    /// Whole reply equal to `Compliant`.
    Compliant,
}

impl DecoderKind {
    /// The decoder implementing this contract.
    pub fn decoder(self) -> &'static dyn VerdictDecoder {
        match self {
            DecoderKind::Structured => &StructuredDecoder,
            DecoderKind::Phrase => &PhraseDecoder,
            DecoderKind::Compliant => &CompliantDecoder,
        }
    }
}

/// Last-policy-line phrase matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhraseDecoder;

impl PhraseDecoder {
    /// The last trimmed line containing "policy" (case-insensitive).
    pub fn verdict_line(reply: &str) -> Option<&str> {
        reply
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| line.to_lowercase().contains("policy"))
    }
}

impl VerdictDecoder for PhraseDecoder {
    fn decode(&self, reply: &str, region: Region) -> Verdict {
        let Some(line) = Self::verdict_line(reply) else {
            tracing::debug!("{}: no policy line in reply", region.key());
            return Verdict::Unrecognized;
        };
        tracing::debug!("{}: verdict line: {}", region.key(), line);

        let line = line.to_lowercase();
        if line.contains(&region.pass_phrase().to_lowercase()) {
            Verdict::Passed
        } else if line.contains(&region.fail_phrase().to_lowercase()) {
            Verdict::Failed
        } else {
            Verdict::Unrecognized
        }
    }
}

/// Single-word `Compliant` matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompliantDecoder;

impl VerdictDecoder for CompliantDecoder {
    fn decode(&self, reply: &str, _region: Region) -> Verdict {
        let cleaned = reply.trim().to_lowercase();
        if cleaned == "compliant" {
            Verdict::Passed
        } else if cleaned.is_empty() {
            Verdict::Unrecognized
        } else {
            // Anything else is the model listing violations.
            Verdict::Failed
        }
    }
}

/// JSON `{region, passed}` matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDecoder;

#[derive(Debug, Deserialize)]
struct StructuredAnswer {
    region: String,
    passed: bool,
}

impl StructuredDecoder {
    /// Balanced `{...}` spans in `reply`, outermost only, in order.
    ///
    /// Braces inside JSON strings do not count. Code quoted in the prose
    /// yields spans too; they simply fail to decode.
    fn object_spans(reply: &str) -> Vec<&str> {
        let mut spans = Vec::new();
        let mut start = None;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape = false;

        for (index, ch) in reply.char_indices() {
            let Some(begin) = start else {
                if ch == '{' {
                    start = Some(index);
                    depth = 0;
                    in_string = false;
                    escape = false;
                }
                continue;
            };
            if in_string {
                if escape {
                    escape = false;
                } else if ch == '\\' {
                    escape = true;
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' if depth == 0 => {
                    spans.push(&reply[begin..index + ch.len_utf8()]);
                    start = None;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }
        spans
    }

    /// The last span that decodes as a verdict object.
    fn last_answer(reply: &str) -> Option<StructuredAnswer> {
        Self::object_spans(reply)
            .into_iter()
            .rev()
            .find_map(|span| serde_json::from_str(span).ok())
    }
}

impl VerdictDecoder for StructuredDecoder {
    fn decode(&self, reply: &str, region: Region) -> Verdict {
        let Some(answer) = Self::last_answer(reply) else {
            tracing::debug!("{}: no verdict object in reply", region.key());
            return Verdict::Unrecognized;
        };
        if !answer.region.trim().eq_ignore_ascii_case(region.key()) {
            tracing::warn!(
                "{}: verdict object names region {:?}",
                region.key(),
                answer.region
            );
            return Verdict::Unrecognized;
        }
        if answer.passed {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }
}

#[cfg(test)]
#[path = "verdict_tests.rs"]
mod tests;
