//! REAPER ExtState file codec
//!
//! `reaper-extstate.ini` is a sectioned key-value text file: one `[Section]`
//! per scope, followed by `key=value` lines. REAPER rewrites the file in
//! full, so the bridge must do the same — parse everything, change one
//! field, write everything back. Keys the bridge does not understand are
//! kept verbatim so a rewrite never clobbers state owned by other scripts.
//!
//! Parsing is permissive: blank lines, comments and lines without a `=` are
//! skipped, and a malformed file never fails to parse — it just yields
//! fewer entries.

/// One `[Section]` block with its entries in file order
#[derive(Debug, Clone, Default)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

/// In-memory image of an ExtState file
///
/// Preserves section and key order so that a parse/serialize round trip
/// only changes the fields that were actually set.
#[derive(Debug, Clone, Default)]
pub struct ExtStateDoc {
    sections: Vec<Section>,
}

impl ExtStateDoc {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from file contents
    ///
    /// Never fails. Lines outside any section and lines without `=` are
    /// ignored; duplicate section headers are merged into the first
    /// occurrence.
    pub fn parse(input: &str) -> Self {
        let mut doc = Self::new();
        let mut current: Option<usize> = None;

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current = Some(doc.section_index(name));
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim_end();
                if key.is_empty() {
                    continue;
                }
                if let Some(idx) = current {
                    doc.set_in_section(idx, key, value.trim_start());
                }
            }
        }

        doc
    }

    /// Look up a raw value
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == section)?
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, creating the section if absent
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let idx = self.section_index(section);
        self.set_in_section(idx, key, value);
    }

    /// Number of sections
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn section_index(&mut self, name: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.name == name) {
            idx
        } else {
            self.sections.push(Section {
                name: name.to_string(),
                entries: Vec::new(),
            });
            self.sections.len() - 1
        }
    }

    fn set_in_section(&mut self, idx: usize, key: &str, value: impl Into<String>) {
        let entries = &mut self.sections[idx].entries;
        if let Some(entry) = entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value.into();
        } else {
            entries.push((key.to_string(), value.into()));
        }
    }
}

impl std::fmt::Display for ExtStateDoc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{}={}", key, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let doc = ExtStateDoc::parse("[EQ1]\ngain=3.5\nfreq=440\n");

        assert_eq!(doc.get("EQ1", "gain"), Some("3.5"));
        assert_eq!(doc.get("EQ1", "freq"), Some("440"));
        assert_eq!(doc.get("EQ1", "missing"), None);
        assert_eq!(doc.get("EQ2", "gain"), None);
    }

    #[test]
    fn test_parse_tolerates_noise() {
        let input = "orphan=1\n\n; comment\n# also a comment\n[EQ1]\n  gain = 3.5  \nnot a pair\n";
        let doc = ExtStateDoc::parse(input);

        // Orphan line before any section is dropped
        assert_eq!(doc.section_count(), 1);
        // Whitespace around `=` is trimmed
        assert_eq!(doc.get("EQ1", "gain"), Some("3.5"));
    }

    #[test]
    fn test_duplicate_sections_merge() {
        let doc = ExtStateDoc::parse("[EQ1]\ngain=1\n[EQ2]\nmix=0.5\n[EQ1]\nfreq=440\n");

        assert_eq!(doc.section_count(), 2);
        assert_eq!(doc.get("EQ1", "gain"), Some("1"));
        assert_eq!(doc.get("EQ1", "freq"), Some("440"));
    }

    #[test]
    fn test_set_creates_and_overwrites() {
        let mut doc = ExtStateDoc::new();

        doc.set("EQ1", "gain", "1.0");
        doc.set("EQ1", "gain", "2.0");
        doc.set("EQ2", "gain", "3.0");

        assert_eq!(doc.get("EQ1", "gain"), Some("2.0"));
        assert_eq!(doc.get("EQ2", "gain"), Some("3.0"));
        assert_eq!(doc.section_count(), 2);
    }

    #[test]
    fn test_round_trip_preserves_foreign_entries() {
        // Entries owned by other REAPER scripts must survive a rewrite
        let input = "[SWS]\nlast_project=/tmp/mix.rpp\n\n[EQ1]\ngain=3.5\n";
        let mut doc = ExtStateDoc::parse(input);

        doc.set("EQ1", "gain", "4.0");
        let rewritten = doc.to_string();
        let reparsed = ExtStateDoc::parse(&rewritten);

        assert_eq!(reparsed.get("SWS", "last_project"), Some("/tmp/mix.rpp"));
        assert_eq!(reparsed.get("EQ1", "gain"), Some("4.0"));
    }

    #[test]
    fn test_float_values_round_trip_losslessly() {
        // Rust's f64 Display is shortest-round-trip, so text storage is lossless
        for value in [3.5_f64, 0.1 + 0.2, -1.0e-9, 12345.678901234567] {
            let mut doc = ExtStateDoc::new();
            doc.set("EQ1", "gain", value.to_string());

            let reparsed = ExtStateDoc::parse(&doc.to_string());
            let parsed: f64 = reparsed.get("EQ1", "gain").unwrap().parse().unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn test_display_format() {
        let mut doc = ExtStateDoc::new();
        doc.set("EQ1", "gain", "3.5");
        doc.set("EQ2", "mix", "0.25");

        assert_eq!(doc.to_string(), "[EQ1]\ngain=3.5\n\n[EQ2]\nmix=0.25\n");
    }

    #[test]
    fn test_case_sensitive_lookup() {
        let doc = ExtStateDoc::parse("[EQ1]\nGain=1\n");

        assert_eq!(doc.get("EQ1", "Gain"), Some("1"));
        assert_eq!(doc.get("EQ1", "gain"), None);
        assert_eq!(doc.get("eq1", "Gain"), None);
    }
}
