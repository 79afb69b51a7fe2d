//! Path-based lookup into an arbitrarily shaped response tree.
//!
//! Paths combine dotted field access with bracketed numeric or string
//! indices, e.g. `results.channels[0].alternatives[0].transcript` or
//! `data["audio"].url`. Extraction is total: any malformed path, missing
//! node, or null intermediate yields `None` so callers can apply a fallback.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// Reads the value at `path` out of `value`, or `None` if any step of the
/// traversal fails. Never panics.
pub fn extract<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path)?;
    let mut current = value;
    for segment in &segments {
        if current.is_null() {
            return None;
        }
        current = match segment {
            Segment::Field(name) => current.get(name.as_str())?,
            Segment::Index(i) => current.get(*i)?,
        };
    }
    if current.is_null() {
        return None;
    }
    Some(current)
}

/// Convenience wrapper returning a non-empty string at `path`.
pub fn extract_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    extract(value, path).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn parse_path(path: &str) -> Option<Vec<Segment>> {
    if path.is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if buf.is_empty() {
                    // Leading, trailing, or doubled dot.
                    return None;
                }
                segments.push(Segment::Field(std::mem::take(&mut buf)));
            }
            '[' => {
                if !buf.is_empty() {
                    segments.push(Segment::Field(std::mem::take(&mut buf)));
                }
                let mut inner = String::new();
                let mut closed = false;
                for n in chars.by_ref() {
                    if n == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(n);
                }
                if !closed || inner.is_empty() {
                    return None;
                }
                segments.push(parse_bracket(&inner)?);
                // A bracket may be followed by '.', another '[', or the end.
                if chars.peek() == Some(&'.') {
                    chars.next();
                    if chars.peek().is_none() {
                        return None;
                    }
                }
            }
            ']' => return None,
            _ => buf.push(ch),
        }
    }

    if !buf.is_empty() {
        segments.push(Segment::Field(buf));
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments)
}

fn parse_bracket(inner: &str) -> Option<Segment> {
    let quoted = (inner.starts_with('"') && inner.ends_with('"') && inner.len() >= 2)
        || (inner.starts_with('\'') && inner.ends_with('\'') && inner.len() >= 2);
    if quoted {
        return Some(Segment::Field(inner[1..inner.len() - 1].to_string()));
    }
    inner.parse::<usize>().ok().map(Segment::Index)
}
