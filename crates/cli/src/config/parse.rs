// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unknown-key detection for lenient config parsing.

use std::path::Path;

/// Known top-level keys in the config.
const KNOWN_KEYS: &[&str] = &[
    "version",
    "source",
    "repository",
    "model",
    "verdict",
    "regions",
];

/// Known keys per section.
const KNOWN_SECTION_KEYS: &[(&str, &[&str])] = &[
    ("source", &["root", "extensions", "exclude", "git_ignore"]),
    ("repository", &["url", "path", "branch"]),
    (
        "model",
        &[
            "endpoint",
            "name",
            "temperature",
            "api_key_env",
            "referer",
            "title",
            "timeout_secs",
        ],
    ),
    ("verdict", &["decoder"]),
    ("regions", &["europe", "us"]),
];

/// Known keys inside each `[regions.<name>]` table.
const KNOWN_REGION_KEYS: &[&str] = &["policy_url", "enabled"];

pub(super) fn warn_unknown_key(path: &Path, key: &str) {
    eprintln!(
        "privacy-gate: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

/// Remove keys of `table` not listed in `known`, warning for each.
fn strip_table(table: &mut toml::Table, known: &[&str], prefix: &str, path: &Path) {
    let unknown: Vec<String> = table
        .keys()
        .filter(|k| !known.contains(&k.as_str()))
        .cloned()
        .collect();
    for key in unknown {
        warn_unknown_key(path, &format!("{}{}", prefix, key));
        table.remove(&key);
    }
}

/// Drop every unrecognized key from a parsed config, warning on stderr.
pub(super) fn strip_unknown_keys(table: &mut toml::Table, path: &Path) {
    strip_table(table, KNOWN_KEYS, "", path);

    for (section, known) in KNOWN_SECTION_KEYS {
        if let Some(toml::Value::Table(inner)) = table.get_mut(*section) {
            strip_table(inner, known, &format!("{}.", section), path);
        }
    }

    if let Some(toml::Value::Table(regions)) = table.get_mut("regions") {
        for (name, value) in regions.iter_mut() {
            if let toml::Value::Table(region) = value {
                strip_table(region, KNOWN_REGION_KEYS, &format!("regions.{}.", name), path);
            }
        }
    }
}
