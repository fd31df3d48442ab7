//! Shared output layer for human/JSON parity across CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: key/value lines for humans, stable JSON for machines.

use std::io::{self, Write};

/// Shared width for human output separators.
pub const RULE_WIDTH: usize = 48;

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-optimized key/value output.
    Human,
    /// Machine-readable JSON (one object per result).
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    #[must_use]
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Write a horizontal separator used by human output.
pub fn rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)
}

/// Render a left-aligned key/value line in human output.
pub fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<13} {}", format!("{key}:"), value.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_aligns_keys() {
        let mut buf = Vec::new();
        kv(&mut buf, "when", "5pm").expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "when:         5pm\n");
    }

    #[test]
    fn json_mode_detection() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Human.is_json());
    }
}
