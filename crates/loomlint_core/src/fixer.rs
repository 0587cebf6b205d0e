//! Single-pass fix application.

use loomlint_ast::Span;
use tracing::{debug, warn};

use crate::diagnostic::Diagnostic;

/// Result of applying one pass of fixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixerResult {
    /// Number of fixes applied.
    pub fixes_applied: usize,
    /// The fixed content.
    pub fixed_content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

impl FixerResult {
    /// Creates a new fixer result.
    pub fn new(fixes_applied: usize, fixed_content: String, modified: bool) -> Self {
        Self {
            fixes_applied,
            fixed_content,
            modified,
        }
    }

    /// Creates a result indicating no changes were made.
    pub fn unchanged(content: String) -> Self {
        Self {
            fixes_applied: 0,
            fixed_content: content,
            modified: false,
        }
    }
}

/// Applies the fixes carried by `diagnostics` to `content`.
///
/// Fixes are ordered by start, then end; ties keep diagnostic order. They are
/// applied left to right. A fix starting before the end of the previously
/// applied one overlaps it and is skipped, as is a second fix for a range
/// that was already fixed. Applied diagnostics are marked `fixed`.
pub fn apply_fixes(content: &str, diagnostics: &mut [Diagnostic]) -> FixerResult {
    let mut order: Vec<usize> = diagnostics
        .iter()
        .enumerate()
        .filter(|(_, d)| d.fix.is_some())
        .map(|(i, _)| i)
        .collect();

    if order.is_empty() {
        return FixerResult::unchanged(content.to_string());
    }

    order.sort_by_key(|&i| diagnostics[i].fix.as_ref().map(|f| (f.span.start, f.span.end)));

    let mut result = String::with_capacity(content.len());
    let mut cursor = 0usize;
    let mut last_applied: Option<Span> = None;
    let mut applied = 0;

    for i in order {
        let Some(fix) = diagnostics[i].fix.as_ref() else {
            continue;
        };

        if !fix.is_applicable(content) {
            warn!(
                "Invalid fix span: start={}, end={}, content_len={}",
                fix.span.start,
                fix.span.end,
                content.len()
            );
            continue;
        }

        let (start, end) = (fix.span.start as usize, fix.span.end as usize);
        if start < cursor || last_applied == Some(fix.span) {
            warn!(
                "Skipping overlapping fix at [{}, {}]",
                fix.span.start, fix.span.end
            );
            continue;
        }

        debug!(
            "Applying fix: replace [{}..{}] with '{}'",
            start, end, fix.text
        );

        result.push_str(&content[cursor..start]);
        result.push_str(&fix.text);
        cursor = end;
        last_applied = Some(fix.span);
        diagnostics[i].fixed = true;
        applied += 1;
    }

    if applied == 0 {
        return FixerResult::unchanged(content.to_string());
    }

    result.push_str(&content[cursor..]);
    let modified = result != content;
    FixerResult::new(applied, result, modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomlint_ast::{Location, Position};
    use pretty_assertions::assert_eq;

    use crate::diagnostic::Fix;

    fn loc() -> Location {
        Location::new(Position::new(1, 0), Position::new(1, 0))
    }

    fn make_diagnostic_with_fix(start: u32, end: u32, replacement: &str) -> Diagnostic {
        Diagnostic::new("test-rule", "Test message", Span::new(start, end), loc())
            .with_fix(Fix::new(Span::new(start, end), replacement))
    }

    fn make_diagnostic_without_fix(start: u32, end: u32) -> Diagnostic {
        Diagnostic::new("test-rule", "Test message", Span::new(start, end), loc())
    }

    fn fixed_flags(diagnostics: &[Diagnostic]) -> Vec<bool> {
        diagnostics.iter().map(|d| d.fixed).collect()
    }

    #[test]
    fn apply_single_fix() {
        let mut diagnostics = vec![make_diagnostic_with_fix(0, 5, "Hi")];

        let result = apply_fixes("Hello World", &mut diagnostics);

        assert_eq!(result.fixed_content, "Hi World");
        assert_eq!(result.fixes_applied, 1);
        assert!(result.modified);
        assert!(diagnostics[0].fixed);
    }

    #[test]
    fn apply_multiple_fixes_out_of_order() {
        let mut diagnostics = vec![
            make_diagnostic_with_fix(6, 11, "Earth"),
            make_diagnostic_with_fix(0, 5, "Hi"),
        ];

        let result = apply_fixes("Hello World", &mut diagnostics);

        assert_eq!(result.fixed_content, "Hi Earth");
        assert_eq!(result.fixes_applied, 2);
    }

    #[test]
    fn apply_delete_and_insert() {
        let mut diagnostics = vec![
            make_diagnostic_with_fix(5, 11, ""),
            make_diagnostic_with_fix(0, 0, ">> "),
        ];

        let result = apply_fixes("Hello World", &mut diagnostics);

        assert_eq!(result.fixed_content, ">> Hello");
    }

    #[test]
    fn no_fixes_returns_unchanged() {
        let mut diagnostics = vec![make_diagnostic_without_fix(0, 5)];

        let result = apply_fixes("Hello World", &mut diagnostics);

        assert_eq!(result, FixerResult::unchanged("Hello World".to_string()));
        assert!(!diagnostics[0].fixed);
    }

    #[test]
    fn overlapping_fix_is_skipped_and_stays_unfixed() {
        let mut diagnostics = vec![
            make_diagnostic_with_fix(3, 8, "XXX"),
            make_diagnostic_with_fix(0, 5, "Hi"),
        ];

        let result = apply_fixes("Hello World", &mut diagnostics);

        assert_eq!(result.fixed_content, "Hi World");
        assert_eq!(result.fixes_applied, 1);
        assert_eq!(fixed_flags(&diagnostics), vec![false, true]);
        assert!(diagnostics[0].has_unapplied_fix());
    }

    #[test]
    fn nested_fix_is_skipped() {
        let mut diagnostics = vec![
            make_diagnostic_with_fix(0, 11, "outer"),
            make_diagnostic_with_fix(2, 4, "inner"),
        ];

        let result = apply_fixes("Hello World", &mut diagnostics);

        assert_eq!(result.fixed_content, "outer");
        assert_eq!(fixed_flags(&diagnostics), vec![true, false]);
    }

    #[test]
    fn adjacent_fixes_both_apply() {
        let mut diagnostics = vec![
            make_diagnostic_with_fix(5, 10, "f2"),
            make_diagnostic_with_fix(0, 5, "f1"),
        ];

        let result = apply_fixes("0123456789", &mut diagnostics);

        assert_eq!(result.fixed_content, "f1f2");
        assert_eq!(result.fixes_applied, 2);
    }

    #[test]
    fn identical_ranges_first_wins() {
        let mut diagnostics = vec![
            make_diagnostic_with_fix(2, 4, "first"),
            make_diagnostic_with_fix(2, 4, "second"),
            make_diagnostic_with_fix(6, 6, "A"),
            make_diagnostic_with_fix(6, 6, "B"),
        ];

        let result = apply_fixes("abcdefgh", &mut diagnostics);

        assert_eq!(result.fixed_content, "abfirstefAgh");
        assert_eq!(fixed_flags(&diagnostics), vec![true, false, true, false]);
    }

    #[test]
    fn insertions_at_same_position_with_different_ranges() {
        let mut diagnostics = vec![
            make_diagnostic_with_fix(2, 4, "X"),
            make_diagnostic_with_fix(2, 2, "<"),
        ];

        let result = apply_fixes("abcdef", &mut diagnostics);

        assert_eq!(result.fixed_content, "ab<Xef");
        assert_eq!(result.fixes_applied, 2);
    }

    #[test]
    fn multibyte_text_fix() {
        // "東京" = 6 bytes, each "に" = 3 bytes
        let mut diagnostics = vec![make_diagnostic_with_fix(9, 12, "")];

        let result = apply_fixes("東京にに行く", &mut diagnostics);

        assert_eq!(result.fixed_content, "東京に行く");
    }

    #[test]
    fn invalid_spans_are_skipped() {
        let mut diagnostics = vec![
            make_diagnostic_with_fix(0, 100, "Hi"),
            make_diagnostic_with_fix(1, 2, "x"),
        ];

        let result = apply_fixes("東", &mut diagnostics);

        assert_eq!(result.fixed_content, "東");
        assert_eq!(result.fixes_applied, 0);
        assert!(!result.modified);
    }

    #[test]
    fn identity_fix_counts_but_does_not_modify() {
        let mut diagnostics = vec![make_diagnostic_with_fix(0, 5, "Hello")];

        let result = apply_fixes("Hello World", &mut diagnostics);

        assert_eq!(result.fixes_applied, 1);
        assert!(!result.modified);
    }
}
