use unicode_width::UnicodeWidthStr;

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Split a DOT label on its line-break escapes (`\n`, `\l`, `\r`).
pub fn split_label_lines(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut result = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'\\' {
            if matches!(bytes[i + 1], b'n' | b'l' | b'r') {
                result.push(&s[start..i]);
                start = i + 2;
            }
            // skip the escaped character either way
            i += 2;
            continue;
        }
        i += 1;
    }
    result.push(&s[start..]);
    result
}

/// Maximum display width among the label's lines.
pub fn multiline_width(s: &str) -> usize {
    split_label_lines(s)
        .iter()
        .map(|line| display_width(line))
        .max()
        .unwrap_or(0)
}

/// Label text with line-break escapes turned into real newlines.
pub fn plain_text(s: &str) -> String {
    split_label_lines(s).join("\n")
}
