use crate::LineEnding;
use diffy::{Line, PatchFormatter};

/// Render a unified diff between two documents.
///
/// Returns the rendered hunks joined with `line_sep` and the number of
/// inserted plus deleted lines. An empty `line_sep` is resolved from the
/// original content. Both sides are compared with LF line breaks so a pure
/// line-ending change does not show up as a whole-file rewrite; it renders
/// as a single `line endings: {from} -> {to}` line with no changed lines.
pub fn multiline_diff(original: &str, formatted: &str, line_sep: &str) -> (String, usize) {
    let sep = if line_sep.is_empty() {
        LineEnding::detect(original.as_bytes()).as_str()
    } else {
        line_sep
    };

    let normalized = original.replace("\r\n", "\n");
    let normalized_formatted = formatted.replace("\r\n", "\n");
    if normalized == normalized_formatted {
        if original == formatted {
            return (String::new(), 0);
        }
        let note = format!(
            "line endings: {} -> {}",
            ending_name(original),
            ending_name(formatted)
        );
        return (note, 0);
    }
    let (original, formatted) = (normalized, normalized_formatted);

    let patch = diffy::create_patch(&original, &formatted);
    let changed = patch
        .hunks()
        .iter()
        .flat_map(|hunk| hunk.lines())
        .filter(|line| matches!(line, Line::Insert(_) | Line::Delete(_)))
        .count();

    let rendered = PatchFormatter::new().fmt_patch(&patch).to_string();
    let body = rendered
        .lines()
        .skip_while(|line| line.starts_with("--- ") || line.starts_with("+++ "))
        .collect::<Vec<_>>()
        .join(sep);

    (body, changed)
}

fn ending_name(text: &str) -> &'static str {
    let crlf = text.matches("\r\n").count();
    let lf = text.matches('\n').count() - crlf;
    match (lf, crlf) {
        (0, 0) => "none",
        (_, 0) => "lf",
        (0, _) => "crlf",
        _ => "mixed",
    }
}
