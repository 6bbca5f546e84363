//! Delimiter stripping for string, key and regular expression lexemes.
//!
//! Lexemes enter the AST raw. These helpers run exactly once per literal,
//! when a visitor evaluates it.

/// Strip the surrounding quotes (or backticks) and decode escapes.
///
/// Recognised escapes: `\" \' \` \\ \/ \b \f \n \r \t \uXXXX`. Any other
/// escaped character is kept verbatim, backslash included.
pub fn unquote(raw: &str) -> String {
    let inner = strip_delimiters(raw);
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some(c @ ('"' | '\'' | '`' | '\\' | '/')) => result.push(c),
            Some('u') => {
                let high = read_hex4(&mut chars);
                match high {
                    Some(h @ 0xD800..=0xDBFF) => {
                        // Surrogate pair: expect a second \uXXXX for the low half
                        let mut lookahead = chars.clone();
                        let low = match (lookahead.next(), lookahead.next()) {
                            (Some('\\'), Some('u')) => read_hex4(&mut lookahead),
                            _ => None,
                        };
                        match low {
                            Some(l @ 0xDC00..=0xDFFF) => {
                                chars = lookahead;
                                let code = 0x10000 + ((h - 0xD800) << 10) + (l - 0xDC00);
                                result.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                            }
                            _ => result.push('\u{FFFD}'),
                        }
                    }
                    Some(code) => result.push(char::from_u32(code).unwrap_or('\u{FFFD}')),
                    None => result.push_str("\\u"),
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Strip the slashes of a regular expression lexeme and unescape `\/`.
///
/// Every other escape is left for the regex engine.
pub fn regexp_source(raw: &str) -> String {
    let inner = strip_delimiters(raw);
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('/') => result.push('/'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }
    result
}

fn strip_delimiters(raw: &str) -> &str {
    let mut chars = raw.chars();
    match (chars.next(), chars.next_back()) {
        (Some(_), Some(_)) => chars.as_str(),
        _ => "",
    }
}

fn read_hex4<I: Iterator<Item = char>>(chars: &mut I) -> Option<u32> {
    let mut code = 0;
    for _ in 0..4 {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    Some(code)
}
