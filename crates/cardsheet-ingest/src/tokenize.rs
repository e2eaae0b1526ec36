//! Splitting one line of spreadsheet CSV into field values.
//!
//! Three field forms are recognised, tried in order at each field start:
//!
//! - single-quoted: `'...'`, a backslash escapes the next character
//! - double-quoted: `"..."`, same escaping
//! - bare: no quotes, commas or backslashes; internal whitespace kept
//!
//! Whitespace around a field is stripped. Field text is returned raw:
//! escape sequences inside quotes are not unescaped.
//!
//! A trailing delimiter with nothing after it does not yield an empty
//! last field (`a,b,` is two fields). A position where no field form
//! fits (an unterminated quote, a stray quote inside a bare value) is
//! skipped one character at a time until a field matches again, so
//! malformed quoting degrades into a partial split rather than an error.

/// Split `line` into its field values.
pub fn tokenize(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos <= chars.len() {
        match match_field(&chars, pos) {
            Some((value, end)) => {
                fields.push(value);
                pos = end;
            }
            None => pos += 1,
        }
    }
    fields
}

/// Try to match one field starting at `start`.
///
/// Returns the field value and the position just past its delimiter.
fn match_field(chars: &[char], start: usize) -> Option<(String, usize)> {
    // Nothing but whitespace left: no field, not even an empty one.
    if chars[start..].iter().all(|c| c.is_whitespace()) {
        return None;
    }
    let pos = skip_whitespace(chars, start);
    let (value, after_value) = match chars.get(pos) {
        Some(&quote @ ('\'' | '"')) => match_quoted(chars, pos, quote)?,
        _ => match_bare(chars, pos),
    };
    let end = skip_whitespace(chars, after_value);
    match chars.get(end) {
        None => Some((value, end)),
        Some(',') => Some((value, end + 1)),
        Some(_) => None,
    }
}

fn skip_whitespace(chars: &[char], mut pos: usize) -> usize {
    while chars.get(pos).is_some_and(|c| c.is_whitespace()) {
        pos += 1;
    }
    pos
}

/// `quote`-delimited value starting at the opening quote.
fn match_quoted(chars: &[char], open: usize, quote: char) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut pos = open + 1;
    loop {
        match *chars.get(pos)? {
            '\\' => {
                let escaped = *chars.get(pos + 1)?;
                value.push('\\');
                value.push(escaped);
                pos += 2;
            }
            c if c == quote => return Some((value, pos + 1)),
            c => {
                value.push(c);
                pos += 1;
            }
        }
    }
}

fn is_bare_char(c: char) -> bool {
    !matches!(c, ',' | '\'' | '"' | '\\') && !c.is_whitespace()
}

/// Runs of bare characters separated by whitespace. Trailing whitespace
/// is left for the caller.
fn match_bare(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while chars.get(end).copied().is_some_and(is_bare_char) {
        end += 1;
    }
    loop {
        let gap = skip_whitespace(chars, end);
        if gap == end || !chars.get(gap).copied().is_some_and(is_bare_char) {
            break;
        }
        end = gap;
        while chars.get(end).copied().is_some_and(is_bare_char) {
            end += 1;
        }
    }
    (chars[start..end].iter().collect(), end)
}
