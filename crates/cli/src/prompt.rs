// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt construction.
//!
//! The output-format directive at the end of the prompt must stay in step
//! with the decoder that reads the reply, so both are keyed on
//! [`DecoderKind`].

use crate::collect::SourceBundle;
use crate::region::Region;
use crate::verdict::DecoderKind;

/// Marker closing the policy section.
pub const END_POLICY: &str = "=== END POLICY ===";
/// Marker opening the code section.
pub const BEGIN_CODE: &str = "=== BEGIN FRONTEND SOURCE CODE ===";
/// Marker closing the code section.
pub const END_CODE: &str = "=== END CODE ===";

/// Marker opening the policy section for `region`.
pub fn begin_policy(region: Region) -> String {
    format!("=== BEGIN {} POLICY ===", region.label())
}

/// Build the full instruction for one region.
pub fn build(region: Region, policy: &str, bundle: &SourceBundle, decoder: DecoderKind) -> String {
    let label = region.label();
    format!(
        "You are a GDPR/Privacy Compliance Expert.\n\
         \n\
         Evaluate the following frontend source code against the {label} policy below.\n\
         Point out every place where the code is non-compliant and explain why.\n\
         \n\
         {begin}\n\
         {policy}\n\
         {END_POLICY}\n\
         \n\
         {BEGIN_CODE}\n\
         {code}\n\
         {END_CODE}\n\
         \n\
         {directive}\n",
        begin = begin_policy(region),
        code = bundle.render(),
        directive = format_directive(region, decoder),
    )
}

/// Instruction describing every verdict form the decoder accepts.
pub fn format_directive(region: Region, decoder: DecoderKind) -> String {
    let key = region.key();
    match decoder {
        DecoderKind::Structured => format!(
            "OUTPUT FORMAT: end your reply with a single JSON object and nothing after it:\n\
             {{\"region\": \"{key}\", \"passed\": true}} if the code is compliant, or\n\
             {{\"region\": \"{key}\", \"passed\": false}} if it is not."
        ),
        DecoderKind::Phrase => format!(
            "OUTPUT FORMAT: the last line of your reply must be exactly one of:\n\
             {pass}\n\
             {fail}",
            pass = region.pass_phrase(),
            fail = region.fail_phrase(),
        ),
        DecoderKind::Compliant => "OUTPUT FORMAT: if everything is compliant, reply with exactly: \
             Compliant (no quotes and no other text). Otherwise list the violations."
            .to_string(),
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
