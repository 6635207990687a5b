//! Identifiers name states and tape letters.
//!
//! An identifier is either a maximal run of ASCII letters, digits, `_` and `-`,
//! or a parenthesized group `( ... )` holding zero or more identifiers written
//! back to back. Identifiers are opaque and compared by their text.

/// Returns `true` if `c` may appear in a flat identifier.
fn is_identifier_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'-'
}

/// Consumes one identifier starting at `pos` and returns the position right after it.
fn scan(text: &[u8], pos: usize) -> Option<usize> {
    match *text.get(pos)? {
        c if is_identifier_char(c) => {
            let run = text[pos..]
                .iter()
                .take_while(|&&c| is_identifier_char(c))
                .count();
            Some(pos + run)
        }
        b'(' => {
            let mut end = pos + 1;
            while let Some(next) = scan(text, end) {
                end = next;
            }
            (text.get(end) == Some(&b')')).then_some(end + 1)
        }
        _ => None,
    }
}

/// Checks whether `text` is exactly one identifier.
pub fn is_identifier(text: &str) -> bool {
    scan(text.as_bytes(), 0) == Some(text.len())
}

/// Returns the parenthesis nesting depth of an identifier. Flat identifiers have depth 0.
pub fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0;
    for c in text.bytes() {
        match c {
            b'(' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max_depth
}

/// Encloses `text` in `count` pairs of parentheses.
pub fn wrap(text: &str, count: usize) -> String {
    let mut wrapped = String::with_capacity(text.len() + 2 * count);
    wrapped.extend(std::iter::repeat('(').take(count));
    wrapped.push_str(text);
    wrapped.extend(std::iter::repeat(')').take(count));
    wrapped
}

/// Builds a composite identifier `((p1)(p2)...(pk))` from identifier parts.
///
/// Each part sits in its own group, so the parts can be read back unambiguously
/// and distinct part lists always produce distinct identifiers.
pub fn compound<S: AsRef<str>>(parts: &[S]) -> String {
    let mut name = String::from("(");
    for part in parts {
        name.push('(');
        name.push_str(part.as_ref());
        name.push(')');
    }
    name.push(')');
    name
}
