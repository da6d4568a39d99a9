// src/utils/html_debug.rs
use std::fs;
use std::path::Path;
use regex::Regex;
use crate::utils::error::AppError;

/// Markers worth seeing when a document yields a surprising outline.
pub const OUTLINE_DEBUG_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)regional\s+coverage|regional\s+analysis|company\s+profiles|competitive\s+landscape", "stop"),
    (r"(?i)\bby\s+(?:region|country|geograph\w*)\b", "regional"),
    (r"(?i)\bby\s+[a-z][a-z &/\-]*", "heading"),
    (r"\b\d+(?:\.\d+)+\b", "numeral"),
];

/// Wraps each highlighted byte range of `html` in a classed `<span>` inside a
/// minimal page with a colour legend. Overlapping ranges keep the earliest.
pub fn annotate_html(html: &str, highlights: &[(usize, usize, &str)]) -> String {
    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".highlight-stop { background-color: #FFA500; }\n");
    debug_html.push_str(".highlight-regional { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-heading { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-numeral { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-custom { background-color: #FFC0CB; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut last_pos = 0;
    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    for (start, end, highlight_type) in sorted_highlights {
        if start < last_pos || end > html.len() || start >= end {
            continue;
        }
        debug_html.push_str(&html[last_pos..start]);

        let css_class = match highlight_type {
            "stop" => "highlight-stop",
            "regional" => "highlight-regional",
            "heading" => "highlight-heading",
            "numeral" => "highlight-numeral",
            _ => "highlight-custom",
        };

        debug_html.push_str(&format!(
            "<span class=\"{}\" title=\"Position: {}-{}, Type: {}\">",
            css_class, start, end, highlight_type
        ));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");

        last_pos = end;
    }

    if last_pos < html.len() {
        debug_html.push_str(&html[last_pos..]);
    }

    debug_html.push_str("\n</body>\n</html>");
    debug_html
}

/// Creates a debug copy of a document with every match of the given regex
/// patterns highlighted, and writes it to `path`.
pub fn create_debug_html(html: &str, path: &Path, patterns: &[(&str, &str)]) -> Result<(), AppError> {
    let mut highlights = Vec::new();

    for (pattern, highlight_type) in patterns {
        let re = Regex::new(pattern).map_err(|e| {
            AppError::Config(format!("Invalid regex pattern '{}': {}", pattern, e))
        })?;

        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *highlight_type));
        }
    }

    fs::write(path, annotate_html(html, &highlights))?;
    tracing::info!("Saved debug HTML to {}", path.display());
    Ok(())
}
