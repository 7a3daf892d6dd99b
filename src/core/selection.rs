// EMS Log Filter - core/selection.rs
//
// Remembered checkbox state: an ordered key -> checked mapping and its
// line-delimited text form (`key=true` / `key=false`).
// Core layer: pure string conversion, the app layer does the file I/O.

use crate::util::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Ordered key -> checked mapping, decoupled from the checkbox widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySelection {
    entries: Vec<(String, bool)>,
}

impl KeySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key's state, keeping its original position if already present.
    pub fn set(&mut self, key: &str, checked: bool) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, value)) => *value = checked,
            None => self.entries.push((key.to_string(), checked)),
        }
    }

    /// Remembered state for `key`, `None` if the key was never recorded.
    pub fn get(&self, key: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, checked)| *checked)
    }

    /// Checked state for `key`; unknown keys are unchecked.
    pub fn is_checked(&self, key: &str) -> bool {
        self.get(key).unwrap_or(false)
    }

    /// Keys that are checked, in order.
    pub fn checked_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, bool)> for KeySelection {
    fn from_iter<I: IntoIterator<Item = (&'a str, bool)>>(iter: I) -> Self {
        let mut selection = KeySelection::new();
        for (key, checked) in iter {
            selection.set(key, checked);
        }
        selection
    }
}

/// Serialise to one `key=true|false` line per key, in order.
pub fn encode_selection(selection: &KeySelection) -> String {
    selection
        .iter()
        .map(|(key, checked)| format!("{key}={checked}\n"))
        .collect()
}

/// Parse the `key=true|false` text form.
///
/// Blank lines and `#` comments are skipped. Any other line must split on
/// its last `=` into a non-empty key and `true` or `false`.
pub fn decode_selection(text: &str) -> Result<KeySelection, ConfigError> {
    let mut selection = KeySelection::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let invalid = || ConfigError::InvalidSelection {
            line: idx + 1,
            content: line.to_string(),
        };
        let (key, value) = line.rsplit_once('=').ok_or_else(invalid)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(invalid());
        }
        let checked = match value.trim() {
            "true" => true,
            "false" => false,
            _ => return Err(invalid()),
        };
        selection.set(key, checked);
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_preserves_order() {
        let selection: KeySelection = [("srcname", true), ("date", false), ("dstip", true)]
            .into_iter()
            .collect();
        assert_eq!(
            encode_selection(&selection),
            "srcname=true\ndate=false\ndstip=true\n"
        );
        assert_eq!(selection.checked_keys(), vec!["srcname", "dstip"]);
    }

    #[test]
    fn test_decode_encoded_text() {
        let text = "# remembered keys\nsrcname=true\n\n date = false \nurl=true\n";
        let selection = decode_selection(text).unwrap();
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.get("date"), Some(false));
        assert!(selection.is_checked("url"));
        assert!(!selection.is_checked("never-seen"));
        assert_eq!(decode_selection(&encode_selection(&selection)).unwrap(), selection);
    }

    #[test]
    fn test_decode_rejects_malformed_lines() {
        let err = decode_selection("srcname=true\nbogus line\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelection { line: 2, .. }));

        assert!(decode_selection("srcname=yes").is_err());
        assert!(decode_selection("=true").is_err());
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut selection = KeySelection::new();
        selection.set("a", true);
        selection.set("b", true);
        selection.set("a", false);
        let keys: Vec<_> = selection.iter().collect();
        assert_eq!(keys, vec![("a", false), ("b", true)]);
    }
}
