//! Front-matter extraction for content files.
//!
//! A content file may open with a metadata block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Weekend notes
//! tags: misc
//! ---
//! The body starts here.
//! ```
//!
//! Keys and values are split on the *first* colon and trimmed on both sides,
//! so values may themselves contain colons (`url: https://example.com`).
//! Lines inside the block without a colon are ignored, as are lines whose
//! key trims to nothing.
//!
//! Parsing never fails. If the first line is not `---`, or the block is never
//! closed, the whole input is returned as the body with an empty map — a file
//! with broken front matter still renders, it just has no metadata. The body
//! is the exact remainder of the input after the closing delimiter line;
//! nothing is trimmed from it.

use std::collections::BTreeMap;

/// Split `input` into a front-matter map and the remaining body.
///
/// The returned body borrows from the input, so callers that only need the
/// metadata pay nothing for the (typically much larger) body text.
pub fn parse(input: &str) -> (BTreeMap<String, String>, &str) {
    let (first_line, after_first) = split_line(input);
    if strip_cr(first_line) != "---" {
        return (BTreeMap::new(), input);
    }

    // Find the closing delimiter line inside the remainder.
    let mut pos = 0;
    let mut block = None;
    while pos < after_first.len() {
        let (line, next) = line_at(after_first, pos);
        if strip_cr(line) == "---" {
            block = Some((pos, next));
            break;
        }
        pos = next;
    }

    let Some((block_end, body_start)) = block else {
        // Opening delimiter without a closing one: not front matter at all.
        return (BTreeMap::new(), input);
    };

    let mut meta = BTreeMap::new();
    for line in after_first[..block_end].lines() {
        let Some(colon) = line.find(':') else { continue };
        let key = line[..colon].trim();
        let value = line[colon + 1..].trim();
        if !key.is_empty() {
            meta.insert(key.to_string(), value.to_string());
        }
    }

    (meta, &after_first[body_start..])
}

/// First line of `s` (without its newline) and everything after it.
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

/// Line starting at byte `pos` and the offset just past its newline.
fn line_at(s: &str, pos: usize) -> (&str, usize) {
    match s[pos..].find('\n') {
        Some(i) => (&s[pos..pos + i], pos + i + 1),
        None => (&s[pos..], s.len()),
    }
}

fn strip_cr(s: &str) -> &str {
    s.strip_suffix('\r').unwrap_or(s)
}
