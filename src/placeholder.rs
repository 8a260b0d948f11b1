//! Placeholder encoding for translation keys.
//!
//! Keys are stored in an escaped form so that a `.tr` line can always be split
//! on its first bare `=`:
//! - `@n` marks a line break (a segment marker),
//! - `@=` is a literal `=`,
//! - `@@` is a literal `@`,
//! - `@1`..`@9` are positional substitutions and pass through unchanged.
//!
//! [`split`] cuts a key into text and marker tokens so individual pieces can be
//! translated and glued back together without touching the markers.

/// The segment marker standing for an embedded line break.
pub const MARKER: &str = "@n";

const ESCAPE: char = '@';

/// One piece of a split key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Plain text, possibly containing `@=`, `@@` or `@<digit>` escapes.
    Text(&'a str),
    /// A line-break marker (`@n`).
    Marker,
}

impl Token<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            Token::Text(text) => text,
            Token::Marker => MARKER,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Token::Marker)
    }
}

/// Encodes a raw source literal into its canonical key form.
///
/// Steps, in order:
/// 1. literal concatenations (`" .. "`) are collapsed,
/// 2. an `@` not followed by `n`, `=`, `@` or a digit is doubled,
/// 3. line breaks, raw or written as `\n`, become `@n`,
/// 4. every bare `=` becomes `@=`.
pub fn encode(raw: &str) -> String {
    let joined = collapse_concatenation(raw);
    let escaped = escape_at_signs(&joined);
    let lines = escaped.replace('\n', MARKER).replace("\\n", MARKER);
    escape_equals(&lines)
}

/// Removes `" .. "` / `' .. '` joins left over from a concatenated literal.
/// Quotes preceded by a backslash are left alone.
fn collapse_concatenation(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            out.push(c);
            if let Some(&next) = chars.get(i + 1) {
                out.push(next);
            }
            i += 2;
            continue;
        }
        if (c == '"' || c == '\'')
            && let Some(end) = concatenation_end(&chars, i, c)
        {
            i = end;
            continue;
        }
        out.push(c);
        i += 1;
    }

    out
}

/// If a join starts at `start` (quote, spaces, `..`, spaces, same quote),
/// returns the index just past it.
fn concatenation_end(chars: &[char], start: usize, quote: char) -> Option<usize> {
    let mut j = start + 1;
    while chars.get(j).is_some_and(|c| c.is_whitespace()) {
        j += 1;
    }
    if chars.get(j) != Some(&'.') || chars.get(j + 1) != Some(&'.') {
        return None;
    }
    j += 2;
    while chars.get(j).is_some_and(|c| c.is_whitespace()) {
        j += 1;
    }
    (chars.get(j) == Some(&quote)).then_some(j + 1)
}

fn escape_at_signs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&next) if matches!(next, 'n' | '=' | '@') || next.is_ascii_digit() => {
                out.push(ESCAPE);
                out.push(next);
                chars.next();
            }
            _ => out.push_str("@@"),
        }
    }

    out
}

fn escape_equals(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                out.push(ESCAPE);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '=' => out.push_str("@="),
            _ => out.push(c),
        }
    }

    out
}

/// Splits a key into alternating text and marker tokens.
///
/// Concatenating the tokens in order gives back `key` exactly. Empty text
/// tokens are never produced.
pub fn split(key: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut chars = key.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c != ESCAPE {
            continue;
        }
        match chars.peek() {
            Some(&(_, 'n')) => {
                if idx > text_start {
                    tokens.push(Token::Text(&key[text_start..idx]));
                }
                tokens.push(Token::Marker);
                chars.next();
                text_start = idx + MARKER.len();
            }
            Some(_) => {
                // keep escape pairs such as `@@n` inside the text
                chars.next();
            }
            None => {}
        }
    }

    if text_start < key.len() {
        tokens.push(Token::Text(&key[text_start..]));
    }

    tokens
}

/// Concatenates tokens back into a key.
pub fn join(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(Token::as_str).collect()
}

/// The marker-free text pieces of a key, in order.
pub fn fragments(key: &str) -> impl Iterator<Item = &str> {
    split(key).into_iter().filter_map(|token| match token {
        Token::Text(text) if !text.is_empty() => Some(text),
        _ => None,
    })
}

/// Returns true if `key` contains a `=` that is not part of an escape pair.
pub fn has_bare_equals(key: &str) -> bool {
    find_bare_equals(key).is_some()
}

/// Byte index of the first `=` that is not part of an `@x` escape pair.
pub fn find_bare_equals(line: &str) -> Option<usize> {
    let mut chars = line.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            ESCAPE => {
                chars.next();
            }
            '=' => return Some(idx),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain_text_is_unchanged() {
        assert_eq!(encode("Hello World"), "Hello World");
    }

    #[test]
    fn test_encode_line_breaks() {
        assert_eq!(encode("Hello\nWorld"), "Hello@nWorld");
        assert_eq!(encode("Hello\\nWorld"), "Hello@nWorld");
        assert_eq!(encode("Hello@nWorld"), "Hello@nWorld");
    }

    #[test]
    fn test_encode_equals() {
        assert_eq!(encode("a=b"), "a@=b");
        assert_eq!(encode("a@=b"), "a@=b");
        assert_eq!(encode("a@@=b"), "a@@@=b");
    }

    #[test]
    fn test_encode_at_signs() {
        assert_eq!(encode("mail@home"), "mail@@home");
        assert_eq!(encode("trailing@"), "trailing@@");
        assert_eq!(encode("Hello @1, you have @2 items"), "Hello @1, you have @2 items");
        assert_eq!(encode("already @@ escaped"), "already @@ escaped");
    }

    #[test]
    fn test_encode_collapses_concatenation() {
        assert_eq!(encode(r#"Hello " .. "World"#), "Hello World");
        assert_eq!(encode("Hello '..  'World"), "Hello World");
        // an escaped quote never starts a join
        assert_eq!(encode(r#"say \" .. "x"#), r#"say \" .. "x"#);
    }

    #[test]
    fn test_split_markers() {
        assert_eq!(
            split("Hello@nWorld"),
            vec![Token::Text("Hello"), Token::Marker, Token::Text("World")]
        );
        assert_eq!(
            split("@nA@n@n"),
            vec![Token::Marker, Token::Text("A"), Token::Marker, Token::Marker]
        );
    }

    #[test]
    fn test_split_keeps_escape_pairs_in_text() {
        assert_eq!(split("a@@nb"), vec![Token::Text("a@@nb")]);
        assert_eq!(
            split("x@=y@n@1"),
            vec![Token::Text("x@=y"), Token::Marker, Token::Text("@1")]
        );
    }

    #[test]
    fn test_split_non_ascii() {
        let key = "Grüße@né@";
        let tokens = split(key);
        assert_eq!(
            tokens,
            vec![Token::Text("Grüße"), Token::Marker, Token::Text("é@")]
        );
        assert_eq!(join(&tokens), key);
    }

    #[test]
    fn test_fragments_skip_markers() {
        let pieces: Vec<&str> = fragments("One@n@nTwo").collect();
        assert_eq!(pieces, vec!["One", "Two"]);
        assert_eq!(fragments("@n").count(), 0);
    }

    #[test]
    fn test_find_bare_equals() {
        assert_eq!(find_bare_equals("key=value"), Some(3));
        assert_eq!(find_bare_equals("a@=b=c"), Some(4));
        assert_eq!(find_bare_equals("a@@=b"), Some(3));
        assert_eq!(find_bare_equals("no delimiter@="), None);
        assert!(!has_bare_equals(&encode("x = y = z")));
    }
}
