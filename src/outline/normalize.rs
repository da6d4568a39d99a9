// src/outline/normalize.rs
//! Turns flat candidate entries into a forest, and a forest into canonical
//! gapless numbering. Source numerals only ever decide depth; output numbers
//! always come from the per-call counters below.

use super::{DepthSignal, OutlineEntry, OutlineNode, RawEntry};

/// Dot-count of a numeral like `"5.1.2"` (trailing dot allowed), or `None`
/// when it is not a dotted run of digits.
pub fn dot_count(numeral: &str) -> Option<usize> {
    let trimmed = numeral.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    let mut dots = 0;
    for part in trimmed.split('.') {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        dots += 1;
    }
    Some(dots - 1)
}

/// Places entries into a forest in document order.
///
/// A depth more than one level below the currently open node is pulled up to
/// open depth + 1, entries deeper than `max_depth` are dropped together with
/// anything nested under them, and an unparsable numeral keeps the depth of
/// the entry before it.
pub fn nest(entries: Vec<RawEntry>, max_depth: usize) -> Vec<OutlineNode> {
    let mut forest: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();
    // Dot-count of the numeral that opened the current top-level node.
    let mut base_dots: Option<usize> = None;
    let mut open_depth: Option<usize> = None;

    for entry in entries {
        let (wanted, raw_numbering) = match entry.signal {
            DepthSignal::Level(depth) => {
                if depth == 0 {
                    base_dots = None;
                }
                (depth, None)
            }
            DepthSignal::Numeral(raw) => match dot_count(&raw) {
                Some(dots) => match base_dots {
                    Some(base) if dots > base => (dots - base, Some(raw)),
                    _ => {
                        base_dots = Some(dots);
                        (0, Some(raw))
                    }
                },
                None => {
                    tracing::debug!("Unparsable numeral '{}' for '{}', keeping current depth", raw, entry.label);
                    (open_depth.unwrap_or(0), Some(raw))
                }
            },
        };

        let depth = match open_depth {
            Some(open) => wanted.min(open + 1),
            None => 0,
        };

        if depth > max_depth {
            tracing::debug!("Dropping '{}' at depth {} (deepest modelled level is {})", entry.label, depth, max_depth);
            continue;
        }

        close_to(&mut stack, &mut forest, depth);
        stack.push(OutlineNode {
            label: entry.label,
            raw_numbering,
            depth,
            children: Vec::new(),
        });
        open_depth = Some(depth);
    }

    close_to(&mut stack, &mut forest, 0);
    forest
}

// Pops open nodes until `depth` of them remain, attaching each to its parent.
fn close_to(stack: &mut Vec<OutlineNode>, forest: &mut Vec<OutlineNode>, depth: usize) {
    while stack.len() > depth {
        let Some(node) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => forest.push(node),
        }
    }
}

/// Pre-order walk assigning canonical paths.
///
/// One counter per open depth: visiting depth `d` bumps counter `d` and
/// forgets every deeper counter, so numbering restarts at 1 under each parent.
pub fn renumber(forest: &[OutlineNode]) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    let mut counters: Vec<usize> = Vec::new();
    let mut work: Vec<(&OutlineNode, usize)> = forest.iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, depth)) = work.pop() {
        counters.truncate(depth + 1);
        counters.resize(depth + 1, 0);
        counters[depth] += 1;

        entries.push(OutlineEntry {
            path: counters.clone(),
            label: node.label.clone(),
        });

        work.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    entries
}
