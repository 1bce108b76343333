use crate::output;
use colored::Colorize;
use std::collections::HashSet;

/// Detects configuration keys that x2sync does not understand
pub struct ConfigValidator {
    /// Fully qualified keys (`section.field`) recognised by x2sync
    known_fields: HashSet<&'static str>,
}

impl ConfigValidator {
    /// Create a new validator with known configuration fields
    #[must_use]
    pub fn new() -> Self {
        let known_fields = [
            "scan",
            "scan.exclude_contents",
            "scan.excluded_prefix",
            "scan.follow_symlinks",
            "manifest",
            "manifest.atomic_write",
            "manifest.line_ending",
            "manifest.indent",
        ]
        .into_iter()
        .collect();

        Self { known_fields }
    }

    /// Lists every key in `content` that is not a known field
    ///
    /// Returns an empty list when the content is not valid TOML; parse
    /// errors are reported by [`crate::config::Config::parse`].
    #[must_use]
    pub fn unknown_fields(&self, content: &str) -> Vec<String> {
        let Ok(parsed) = toml::from_str::<toml::Value>(content) else {
            return Vec::new();
        };

        let mut unknown = Vec::new();
        self.check_table(&parsed, "", &mut unknown);
        unknown
    }

    /// Prints a warning for every unknown field in `content`
    pub fn warn_unknown_fields(&self, content: &str) {
        let unknown = self.unknown_fields(content);
        if unknown.is_empty() {
            return;
        }

        output::warning("Configuration warnings:");
        for field in &unknown {
            tracing::debug!(field = %field, "unknown configuration field");
            eprintln!("  Unknown configuration field: {}", field.yellow());
        }
    }

    /// Recursively checks a TOML table for unknown fields
    ///
    /// # Arguments
    ///
    /// * `table` - The TOML value to validate (expected to be a table)
    /// * `prefix` - The current path prefix (e.g., "scan")
    /// * `unknown` - Vector to collect unknown field paths
    fn check_table(&self, table: &toml::Value, prefix: &str, unknown: &mut Vec<String>) {
        if let toml::Value::Table(map) = table {
            for (key, value) in map {
                let full_key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };

                if !self.known_fields.contains(full_key.as_str()) {
                    unknown.push(full_key);
                } else if let toml::Value::Table(_) = value {
                    self.check_table(value, &full_key, unknown);
                }
            }
        }
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
