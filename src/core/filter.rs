// EMS Log Filter - core/filter.rs
//
// Builds the saved output from parsed entries and a criteria snapshot.
// Key-selection and text filters are AND-combined; matches pull in
// context lines, each source line emitted at most once.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{FilterCriteria, FilterMode, FilterResult, LogEntry, OutputLine};
use std::collections::HashSet;

/// Apply `criteria` to `entries` and produce the output lines.
///
/// Entries are assumed to be indexed by file line (as produced by the
/// parser), so context windows are contiguous index ranges. The result is
/// deterministic for identical inputs.
pub fn build_output(entries: &[LogEntry], criteria: &FilterCriteria) -> FilterResult {
    let selected: HashSet<&str> = criteria.selected_keys.iter().map(String::as_str).collect();
    let matches = matching_indices(entries, criteria, &selected);

    let mut keep = vec![false; entries.len()];
    for &idx in &matches {
        let start = idx.saturating_sub(criteria.lines_before);
        let end = idx
            .saturating_add(criteria.lines_after)
            .min(entries.len().saturating_sub(1));
        for flag in &mut keep[start..=end] {
            *flag = true;
        }
    }

    let lines = entries
        .iter()
        .zip(&keep)
        .filter(|(_, kept)| **kept)
        .map(|(entry, _)| OutputLine {
            line_number: entry.line_number,
            text: render_line(entry, criteria, &selected),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        entries = entries.len(),
        matched = matches.len(),
        output_lines = lines.len(),
        "Filter applied"
    );

    FilterResult {
        lines,
        matched_entries: matches.len(),
    }
}

/// Indices of entries that pass both the key-selection and the text filter.
pub fn matching_indices(
    entries: &[LogEntry],
    criteria: &FilterCriteria,
    selected: &HashSet<&str>,
) -> Vec<usize> {
    let needle = criteria.active_filter_text().map(|text| {
        if criteria.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    });

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| passes_key_filter(entry, criteria, selected))
        .filter(|(_, entry)| passes_text_filter(entry, criteria, needle.as_deref()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Key eligibility. Vacuously true with no selection or in projection-only mode.
fn passes_key_filter(entry: &LogEntry, criteria: &FilterCriteria, selected: &HashSet<&str>) -> bool {
    if !criteria.key_mode.requires_key() || selected.is_empty() {
        return true;
    }
    entry.fields.iter().any(|f| selected.contains(f.key.as_str()))
}

/// Substring test on the raw line. `needle` is already lowercased when the
/// match is case-insensitive.
fn passes_text_filter(entry: &LogEntry, criteria: &FilterCriteria, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    let contains = if criteria.case_sensitive {
        entry.raw.contains(needle)
    } else {
        entry.raw.to_lowercase().contains(needle)
    };
    match criteria.filter_mode {
        FilterMode::Include => contains,
        FilterMode::Exclude => !contains,
    }
}

/// Render an entry for output.
///
/// Projection keeps the prefix and only the selected `key=value` tokens in
/// entry order. With nothing selected, or in `Require` mode, the raw line is
/// emitted unchanged.
pub fn render_line(entry: &LogEntry, criteria: &FilterCriteria, selected: &HashSet<&str>) -> String {
    if !criteria.key_mode.projects() || selected.is_empty() {
        return entry.raw.clone();
    }

    let tokens = entry
        .fields
        .iter()
        .filter(|f| selected.contains(f.key.as_str()))
        .map(|f| f.token());

    std::iter::once(entry.prefix.clone())
        .chain(tokens)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::KeySelectionMode;
    use crate::core::parser::{parse_entries, ParseConfig};

    fn entries(content: &str) -> Vec<LogEntry> {
        parse_entries(content, &ParseConfig::default()).unwrap().entries
    }

    const THREE: &str = "time=1 srcname=PC1 dstip=10.0.0.5\n\
                         time=2 srcname=PC2 dstip=10.0.0.9\n\
                         time=3 srcname=PC1 dstip=10.0.0.5\n";

    fn ten_lines() -> Vec<LogEntry> {
        let content: String = (1..=10)
            .map(|i| {
                let tag = if i == 3 || i == 5 || i == 10 { " hit=yes" } else { "" };
                format!("n={i}{tag}\n")
            })
            .collect();
        entries(&content)
    }

    #[test]
    fn test_no_criteria_returns_every_line_raw() {
        let result = build_output(&entries(THREE), &FilterCriteria::default());
        assert_eq!(result.line_numbers(), vec![1, 2, 3]);
        assert_eq!(result.lines[1].text, "time=2 srcname=PC2 dstip=10.0.0.9");
        assert_eq!(result.matched_entries, 3);
    }

    #[test]
    fn test_end_to_end_example_require_mode() {
        let criteria = FilterCriteria {
            selected_keys: vec!["srcname".to_string()],
            filter_text: Some("PC1".to_string()),
            lines_after: 1,
            key_mode: KeySelectionMode::Require,
            ..Default::default()
        };
        let result = build_output(&entries(THREE), &criteria);
        assert_eq!(result.line_numbers(), vec![1, 2, 3]);
        assert_eq!(result.matched_entries, 2);
        assert_eq!(result.lines[1].text, "time=2 srcname=PC2 dstip=10.0.0.9");
    }

    #[test]
    fn test_end_to_end_example_project_mode() {
        let criteria = FilterCriteria {
            selected_keys: vec!["srcname".to_string()],
            filter_text: Some("PC1".to_string()),
            lines_after: 1,
            ..Default::default()
        };
        let result = build_output(&entries(THREE), &criteria);
        let texts: Vec<_> = result.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["srcname=PC1", "srcname=PC2", "srcname=PC1"]);
    }

    #[test]
    fn test_project_keeps_prefix_and_entry_order() {
        let content = "<189>date=2024-05-01 srcname=PC1 dstip=10.0.0.5 user=\"bob smith\"\n";
        let criteria = FilterCriteria {
            selected_keys: vec!["user".to_string(), "date".to_string()],
            ..Default::default()
        };
        let result = build_output(&entries(content), &criteria);
        assert_eq!(result.lines[0].text, "<189> date=2024-05-01 user=\"bob smith\"");
    }

    #[test]
    fn test_require_mode_drops_entries_without_selected_key() {
        let content = "srcname=PC1 a=1\nb=2\nurl=/x srcname=PC9\n";
        let criteria = FilterCriteria {
            selected_keys: vec!["srcname".to_string()],
            key_mode: KeySelectionMode::Require,
            ..Default::default()
        };
        let result = build_output(&entries(content), &criteria);
        assert_eq!(result.line_numbers(), vec![1, 3]);
        assert_eq!(result.lines[1].text, "url=/x srcname=PC9");
    }

    #[test]
    fn test_both_mode_requires_and_projects() {
        let content = "srcname=PC1 a=1\nb=2\nurl=/x srcname=PC9\n";
        let criteria = FilterCriteria {
            selected_keys: vec!["srcname".to_string()],
            key_mode: KeySelectionMode::Both,
            ..Default::default()
        };
        let result = build_output(&entries(content), &criteria);
        let texts: Vec<_> = result.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["srcname=PC1", "srcname=PC9"]);
    }

    #[test]
    fn test_include_and_exclude_ip() {
        let content = "srcip=192.168.1.1 action=allow\n\
                       srcip=192.168.1.10 action=deny\n\
                       srcip=10.1.1.1 action=allow\n";
        let parsed = entries(content);

        let include = FilterCriteria {
            filter_text: Some("192.168.1.1".to_string()),
            ..Default::default()
        };
        let result = build_output(&parsed, &include);
        // Substring match: 192.168.1.10 contains 192.168.1.1.
        assert_eq!(result.line_numbers(), vec![1, 2]);
        assert!(result.lines.iter().all(|l| l.text.contains("192.168.1.1")));

        let exclude = FilterCriteria {
            filter_mode: FilterMode::Exclude,
            ..include
        };
        let result = build_output(&parsed, &exclude);
        assert_eq!(result.line_numbers(), vec![3]);
        assert!(result.lines.iter().all(|l| !l.text.contains("192.168.1.1")));
    }

    #[test]
    fn test_text_filter_case_sensitivity() {
        let parsed = entries("msg=Denied\nmsg=denied\nmsg=ok\n");
        let sensitive = FilterCriteria {
            filter_text: Some("denied".to_string()),
            ..Default::default()
        };
        assert_eq!(build_output(&parsed, &sensitive).line_numbers(), vec![2]);

        let insensitive = FilterCriteria {
            case_sensitive: false,
            ..sensitive
        };
        assert_eq!(build_output(&parsed, &insensitive).line_numbers(), vec![1, 2]);
    }

    #[test]
    fn test_empty_filter_text_in_exclude_mode_keeps_everything() {
        let criteria = FilterCriteria {
            filter_text: Some(String::new()),
            filter_mode: FilterMode::Exclude,
            ..Default::default()
        };
        assert_eq!(build_output(&entries(THREE), &criteria).line_numbers(), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_context_yields_only_matches() {
        let criteria = FilterCriteria {
            filter_text: Some("hit=yes".to_string()),
            ..Default::default()
        };
        let result = build_output(&ten_lines(), &criteria);
        assert_eq!(result.line_numbers(), vec![3, 5, 10]);
    }

    #[test]
    fn test_overlapping_context_is_deduplicated_and_ordered() {
        let criteria = FilterCriteria {
            filter_text: Some("hit=yes".to_string()),
            lines_before: 1,
            lines_after: 1,
            ..Default::default()
        };
        let result = build_output(&ten_lines(), &criteria);
        // Windows [2,4], [4,6], [9,10] with line 4 shared.
        assert_eq!(result.line_numbers(), vec![2, 3, 4, 5, 6, 9, 10]);
        assert_eq!(result.matched_entries, 3);
    }

    #[test]
    fn test_context_clamped_to_file_bounds() {
        let parsed = entries("hit=first\nx=1\nx=2\nhit=last\n");
        let criteria = FilterCriteria {
            filter_text: Some("hit=".to_string()),
            lines_before: 50,
            lines_after: usize::MAX,
            ..Default::default()
        };
        let result = build_output(&parsed, &criteria);
        assert_eq!(result.line_numbers(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_context_window_contains_every_line_once() {
        let parsed = ten_lines();
        let criteria = FilterCriteria {
            filter_text: Some("hit=yes".to_string()),
            lines_before: 2,
            lines_after: 3,
            ..Default::default()
        };
        let result = build_output(&parsed, &criteria);
        let numbers = result.line_numbers();
        for m in [3usize, 5, 10] {
            let lo = m.saturating_sub(2).max(1);
            let hi = (m + 3).min(10);
            for n in lo..=hi {
                assert_eq!(numbers.iter().filter(|&&x| x == n).count(), 1, "line {n}");
            }
        }
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_no_match_is_empty_result() {
        let criteria = FilterCriteria {
            filter_text: Some("nowhere".to_string()),
            lines_before: 3,
            lines_after: 3,
            ..Default::default()
        };
        let result = build_output(&entries(THREE), &criteria);
        assert!(result.is_empty());
        assert_eq!(result.matched_entries, 0);
    }

    #[test]
    fn test_no_entries_is_empty_result() {
        let criteria = FilterCriteria {
            lines_after: 2,
            ..Default::default()
        };
        assert!(build_output(&[], &criteria).is_empty());
    }

    #[test]
    fn test_build_output_is_deterministic() {
        let parsed = ten_lines();
        let criteria = FilterCriteria {
            selected_keys: vec!["n".to_string()],
            filter_text: Some("hit".to_string()),
            lines_before: 1,
            ..Default::default()
        };
        assert_eq!(build_output(&parsed, &criteria), build_output(&parsed, &criteria));
    }
}
