// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for compliance runs.

pub mod text;

pub use text::TextFormatter;
