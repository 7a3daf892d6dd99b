// EMS Log Filter - core/parser.rs
//
// Line-oriented parsing of FortiClient EMS `key=value` logs.
// Core layer: accepts text, never touches the filesystem directly.

use crate::core::model::{KeySet, LogEntry, ParsedLog};
use crate::util::error::LoadError;
use regex::Regex;
use std::sync::OnceLock;

/// Configuration for parsing operations.
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// Key that marks the start of the key=value section (e.g. `date`).
    ///
    /// When set, everything before the first `<anchor>=` is the prefix and
    /// lines without the anchor carry no fields. When unset, the prefix is the
    /// text before the first token.
    pub anchor_key: Option<String>,
}

/// `key=value` where value is a double-quoted string or a run of non-space.
fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Static pattern, covered by the unit tests below.
    RE.get_or_init(|| Regex::new(r#"\b(\w+)=("[^"]*"|\S+)"#).expect("token_regex: invalid regex"))
}

/// Parse the full contents of a log file.
///
/// Produces one entry per physical line (blank lines included, so entry
/// indices match file line indices) and the set of keys in first-seen order.
///
/// Returns `LoadError::EmptyLog` when the text has no non-blank line.
/// Malformed tokens never fail the parse.
pub fn parse_entries(content: &str, config: &ParseConfig) -> Result<ParsedLog, LoadError> {
    let mut entries = Vec::new();
    let mut keys = KeySet::new();
    let mut malformed_tokens = 0;

    for (index, line) in content.lines().enumerate() {
        let (entry, malformed) = parse_line(index, line, config);
        for field in &entry.fields {
            keys.insert(&field.key);
        }
        if malformed > 0 {
            tracing::debug!(
                line = index + 1,
                malformed,
                text = crate::util::logging::preview(line),
                "Line has malformed tokens"
            );
        }
        malformed_tokens += malformed;
        entries.push(entry);
    }

    if entries.iter().all(LogEntry::is_blank) {
        return Err(LoadError::EmptyLog { path: None });
    }

    tracing::debug!(
        entries = entries.len(),
        keys = keys.len(),
        malformed_tokens,
        "Parsing complete"
    );

    Ok(ParsedLog {
        entries,
        keys,
        malformed_tokens,
    })
}

/// Parse one line into an entry. Returns the entry and its malformed-token count.
pub fn parse_line(index: usize, line: &str, config: &ParseConfig) -> (LogEntry, usize) {
    let kv_start = match config.anchor_key.as_deref() {
        Some(anchor) => find_anchor(line, anchor),
        None => token_regex().find(line).map(|m| m.start()),
    };

    let Some(start) = kv_start else {
        return (LogEntry::new(index, line, line.trim()), 0);
    };

    let mut entry = LogEntry::new(index, line, line[..start].trim());
    let mut malformed = 0;
    for caps in token_regex().captures_iter(&line[start..]) {
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let value = value.as_str();
        if is_dangling_quote(value) {
            malformed += 1;
        }
        entry.insert(key.as_str(), value);
    }
    (entry, malformed)
}

/// Byte offset of the first `<anchor>=` that starts at a word boundary.
fn find_anchor(line: &str, anchor: &str) -> Option<usize> {
    let needle = format!("{anchor}=");
    line.match_indices(&needle).map(|(i, _)| i).find(|&i| {
        line[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_'))
    })
}

/// A value that opens a quote it never closes.
fn is_dangling_quote(value: &str) -> bool {
    value.starts_with('"') && (value.len() == 1 || !value.ends_with('"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<189>date=2024-05-01 time=10:00:01 devname=\"EMS Server\" srcname=PC1 dstip=10.0.0.5\n\
                          <189>date=2024-05-01 time=10:00:02 devname=\"EMS Server\" srcname=PC2 url=/index.html\n";

    #[test]
    fn test_parse_basic_lines() {
        let parsed = parse_entries(SAMPLE, &ParseConfig::default()).unwrap();
        assert_eq!(parsed.entries.len(), 2);

        let first = &parsed.entries[0];
        assert_eq!(first.prefix, "<189>");
        assert_eq!(first.line_number, 1);
        assert_eq!(first.get("devname"), Some("\"EMS Server\""));
        assert_eq!(first.get("dstip"), Some("10.0.0.5"));
        assert_eq!(
            parsed.keys.as_slice(),
            ["date", "time", "devname", "srcname", "dstip", "url"]
        );
    }

    #[test]
    fn test_parse_keeps_blank_lines_as_entries() {
        let parsed = parse_entries("a=1\n\nb=2\n", &ParseConfig::default()).unwrap();
        assert_eq!(parsed.entries.len(), 3);
        assert!(parsed.entries[1].fields.is_empty());
        assert_eq!(parsed.entries[2].index, 2);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let parsed = parse_entries("a=1\r\nb=2\r\n", &ParseConfig::default()).unwrap();
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].raw, "a=1");
        assert_eq!(parsed.entries[0].get("a"), Some("1"));
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(matches!(
            parse_entries("", &ParseConfig::default()),
            Err(LoadError::EmptyLog { path: None })
        ));
        assert!(matches!(
            parse_entries("\n  \n\t\n", &ParseConfig::default()),
            Err(LoadError::EmptyLog { .. })
        ));
    }

    #[test]
    fn test_parse_malformed_tokens_do_not_fail() {
        let content = "just some words\nmsg=\"unterminated value here\nkey= =x ==\n";
        let parsed = parse_entries(content, &ParseConfig::default()).unwrap();
        assert_eq!(parsed.entries.len(), 3);

        assert!(parsed.entries[0].fields.is_empty());
        assert_eq!(parsed.entries[0].prefix, "just some words");

        assert_eq!(parsed.entries[1].get("msg"), Some("\"unterminated"));
        assert_eq!(parsed.malformed_tokens, 1);
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let parsed = parse_entries("a=1 b=2 a=3", &ParseConfig::default()).unwrap();
        let entry = &parsed.entries[0];
        assert_eq!(entry.get("a"), Some("3"));
        assert_eq!(entry.fields[0].key, "a");
        assert_eq!(entry.fields.len(), 2);
    }

    #[test]
    fn test_parse_keys_are_case_sensitive() {
        let parsed = parse_entries("User=a user=b", &ParseConfig::default()).unwrap();
        assert_eq!(parsed.keys.as_slice(), ["User", "user"]);
    }

    #[test]
    fn test_parse_with_anchor_key() {
        let config = ParseConfig {
            anchor_key: Some("date".to_string()),
        };
        let content = "May  1 10:00:01 host pid=7 date=2024-05-01 srcname=PC1\n\
                       update=5 no anchor here\n";
        let parsed = parse_entries(content, &config).unwrap();

        let first = &parsed.entries[0];
        assert_eq!(first.prefix, "May  1 10:00:01 host pid=7");
        assert_eq!(first.get("pid"), None);
        assert_eq!(first.get("srcname"), Some("PC1"));

        let second = &parsed.entries[1];
        assert!(second.fields.is_empty());
        assert_eq!(second.prefix, "update=5 no anchor here");
    }
}
