use similar::TextDiff;

const MAX_DIFF_LINES: usize = 100;

/// A unified diff between `original` and `updated`, truncated after
/// `MAX_DIFF_LINES` lines with a trailing marker - mirrors the original
/// `difflib.unified_diff` truncation behavior exactly.
pub fn unified_diff(path: &str, original: &str, updated: &str) -> String {
    let diff = TextDiff::from_lines(original, updated);
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header(&format!("{path} (original)"), &format!("{path} (modified)"))
        .to_string();

    let mut lines: Vec<&str> = unified.lines().collect();
    if lines.len() > MAX_DIFF_LINES {
        lines.truncate(MAX_DIFF_LINES);
        let mut truncated = lines.join("\n");
        truncated.push_str("\n... (diff truncated after 100 lines)");
        truncated
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_a_single_line_change() {
        let diff = unified_diff("a.txt", "one\ntwo\nthree\n", "one\nTWO\nthree\n");
        assert!(diff.contains("-two"));
        assert!(diff.contains("+TWO"));
    }

    #[test]
    fn truncates_long_diffs() {
        let original: String = (0..500).map(|n| format!("line {n}\n")).collect();
        let updated: String = (0..500).map(|n| format!("LINE {n}\n")).collect();
        let diff = unified_diff("big.txt", &original, &updated);
        assert!(diff.ends_with("... (diff truncated after 100 lines)"));
    }
}
