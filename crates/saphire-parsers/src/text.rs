//! Line helpers shared by the parsers

/// Byte-order mark as decoded into text
pub const BOM: char = '\u{feff}';

/// Remove any number of leading BOMs
#[inline]
#[must_use]
pub fn strip_leading_boms(content: &str) -> &str {
    content.trim_start_matches(BOM)
}

/// Remove leading BOMs and whitespace in any interleaving
#[inline]
#[must_use]
pub fn strip_boms_and_whitespace(content: &str) -> &str {
    content.trim_start_matches(|c: char| c == BOM || c.is_whitespace())
}

/// Whether the text holds only BOMs and whitespace
#[inline]
#[must_use]
pub fn is_blank(content: &str) -> bool {
    strip_boms_and_whitespace(content).is_empty()
}

/// Trimmed line with BOMs removed from both ends
#[inline]
#[must_use]
pub fn clean_line(line: &str) -> &str {
    line.trim_matches(|c: char| c == BOM || c.is_whitespace())
}

/// Non-empty cleaned lines with 1-based line numbers
pub fn content_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, clean_line(line)))
        .filter(|(_, line)| !line.is_empty())
}

/// Split on `sep` and trim every field
#[must_use]
pub fn split_fields(line: &str, sep: char) -> Vec<&str> {
    line.split(sep).map(str::trim).collect()
}

/// Field at `index` if present and non-empty
#[inline]
#[must_use]
pub fn non_empty_field<'a>(fields: &[&'a str], index: usize) -> Option<&'a str> {
    fields.get(index).copied().filter(|f| !f.is_empty())
}

/// Per-line error message
#[must_use]
pub fn line_error(line_no: usize, message: impl std::fmt::Display) -> String {
    format!("line {line_no}: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_repeated_boms() {
        assert_eq!(strip_leading_boms("\u{feff}\u{feff}abc"), "abc");
        assert_eq!(strip_boms_and_whitespace("\n\u{feff} \u{feff}abc"), "abc");
        assert!(is_blank("\u{feff}\n \t"));
        assert!(!is_blank("\u{feff}x"));
    }

    #[test]
    fn content_lines_skip_blank_and_number_from_one() {
        let lines: Vec<_> = content_lines("a\r\n\n  \u{feff}b  \n").collect();
        assert_eq!(lines, vec![(1, "a"), (3, "b")]);
    }

    #[test]
    fn fields() {
        let fields = split_fields("Y, S1, , OK", ',');
        assert_eq!(fields, vec!["Y", "S1", "", "OK"]);
        assert_eq!(non_empty_field(&fields, 2), None);
        assert_eq!(non_empty_field(&fields, 3), Some("OK"));
        assert_eq!(non_empty_field(&fields, 9), None);
    }
}
