//! Regular expression and LIKE pattern compilation.
//!
//! Compiling a query walks its tree once and compiles every pattern it
//! finds, so evaluation only clones cached `Regex` handles.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::{
    ast::{BinOp, Expr, Visitor, literals},
    evaluator::EvalError,
};

/// Identifies a pattern by its evaluated source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternKey {
    /// Source of a `/regexp/` literal, slashes stripped
    Regexp(String),
    /// Shell wildcard pattern of a `LIKE`, quotes stripped
    Glob(String),
}

impl PatternKey {
    /// Source text handed to the regex engine.
    pub fn regex_source(&self) -> String {
        match self {
            PatternKey::Regexp(source) => source.clone(),
            PatternKey::Glob(glob) => glob_to_regex(glob),
        }
    }
}

/// Compiled patterns of one query.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    case_sensitive: bool,
    compiled: HashMap<PatternKey, Regex>,
}

impl PatternCache {
    pub fn new(case_sensitive: bool) -> Self {
        PatternCache {
            case_sensitive,
            compiled: HashMap::new(),
        }
    }

    /// Compiles every pattern in `expr`.
    pub fn collect(expr: &Expr, case_sensitive: bool) -> Result<Self, EvalError> {
        let mut collector = Collector {
            cache: PatternCache::new(case_sensitive),
        };
        expr.accept(&mut collector)?;
        Ok(collector.cache)
    }

    /// The compiled pattern, compiling it now if it was not collected.
    pub fn get(&self, key: &PatternKey) -> Result<Regex, EvalError> {
        match self.compiled.get(key) {
            Some(regex) => Ok(regex.clone()),
            None => compile(key, self.case_sensitive),
        }
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    fn insert(&mut self, key: PatternKey) -> Result<(), EvalError> {
        if !self.compiled.contains_key(&key) {
            let regex = compile(&key, self.case_sensitive)?;
            self.compiled.insert(key, regex);
        }
        Ok(())
    }
}

pub fn compile(key: &PatternKey, case_sensitive: bool) -> Result<Regex, EvalError> {
    let source = key.regex_source();
    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|source_error| EvalError::InvalidPattern {
            pattern: source,
            source: source_error,
        })
}

/// Translates a shell wildcard pattern into an anchored regular expression.
///
/// `*` matches any run of characters, `?` any single character, `[seq]` any
/// character in seq and `[!seq]` any character not in seq. Everything else
/// matches itself.
pub fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::from("^(?s:");
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        i += 1;
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut j = i;
                if j < chars.len() && chars[j] == '!' {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    out.push_str(r"\[");
                    continue;
                }

                let (negated, set) = match &chars[i..j] {
                    ['!', rest @ ..] => (true, rest),
                    set => (false, set),
                };
                i = j + 1;
                let class = set_to_class(set);
                match (negated, class.is_empty()) {
                    (false, true) => out.push_str(r"[^\x00-\x{10FFFF}]"),
                    (true, true) => out.push('.'),
                    (false, false) => {
                        out.push('[');
                        out.push_str(&class);
                        out.push(']');
                    }
                    (true, false) => {
                        out.push_str("[^");
                        out.push_str(&class);
                        out.push(']');
                    }
                }
            }
            other => out.push_str(&escape_char(other)),
        }
    }

    out.push_str(")$");
    out
}

/// Body of a regex character class for the members of a wildcard set.
///
/// Every member is escaped so `&&`, `~~` and `--` stay literal. Reversed
/// ranges match nothing and are dropped.
fn set_to_class(set: &[char]) -> String {
    let mut class = String::new();
    let mut k = 0;

    while k < set.len() {
        let start = set[k];
        if k + 2 < set.len() && set[k + 1] == '-' {
            let end = set[k + 2];
            if start <= end {
                class.push_str(&escape_char(start));
                class.push('-');
                class.push_str(&escape_char(end));
            }
            k += 3;
        } else {
            class.push_str(&escape_char(start));
            k += 1;
        }
    }
    class
}

fn escape_char(ch: char) -> String {
    regex::escape(ch.encode_utf8(&mut [0; 4]))
}

/// Gathers the patterns of a tree into a cache.
struct Collector {
    cache: PatternCache,
}

impl Visitor for Collector {
    type Output = Result<(), EvalError>;

    fn visit_number(&mut self, _: f64) -> Self::Output {
        Ok(())
    }

    fn visit_boolean(&mut self, _: bool) -> Self::Output {
        Ok(())
    }

    fn visit_null(&mut self) -> Self::Output {
        Ok(())
    }

    fn visit_now(&mut self) -> Self::Output {
        Ok(())
    }

    fn visit_string(&mut self, _: &str) -> Self::Output {
        Ok(())
    }

    fn visit_regexp(&mut self, raw: &str) -> Self::Output {
        self.cache
            .insert(PatternKey::Regexp(literals::regexp_source(raw)))
    }

    fn visit_array(&mut self, items: &[Expr]) -> Self::Output {
        items.iter().try_for_each(|item| item.accept(self))
    }

    fn visit_field(&mut self, _: &str) -> Self::Output {
        Ok(())
    }

    fn visit_not(&mut self, operand: &Expr) -> Self::Output {
        operand.accept(self)
    }

    fn visit_binary(&mut self, op: BinOp, left: &Expr, right: &Expr) -> Self::Output {
        if op == BinOp::Like
            && let Expr::String(raw) = right
        {
            let mut glob = literals::unquote(raw);
            if !self.cache.case_sensitive {
                glob = glob.to_lowercase();
            }
            self.cache.insert(PatternKey::Glob(glob))?;
        }
        left.accept(self)?;
        right.accept(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob_matches(glob: &str, text: &str) -> bool {
        compile(&PatternKey::Glob(glob.to_string()), true)
            .unwrap()
            .is_match(text)
    }

    #[test]
    fn test_glob_wildcards() {
        assert!(glob_matches("*admin*", "test_admin_username"));
        assert!(glob_matches("test?admin?username", "test_admin_username"));
        assert!(!glob_matches("test", "test_admin_username"));
        assert!(glob_matches("*.txt", "notes.txt"));
        assert!(!glob_matches("*.txt", "notes_txt"));
    }

    #[test]
    fn test_glob_sets() {
        assert!(glob_matches("file[0-9]", "file7"));
        assert!(!glob_matches("file[!0-9]", "file7"));
        assert!(glob_matches("file[!0-9]", "fileX"));
        // Unclosed bracket is a literal
        assert!(glob_matches("a[b", "a[b"));
    }

    #[test]
    fn test_glob_set_members_are_literal() {
        assert!(glob_matches("a[&&b]", "a&"));
        assert!(glob_matches("a[&&b]", "ab"));
        assert!(glob_matches("a[~~b]", "a~"));
        assert!(glob_matches("a[--/]", "a."));
        assert!(glob_matches("[^x]", "^"));
        assert!(!glob_matches("[^x]", "y"));
        assert!(glob_matches("[!]]", "a"));
        assert!(!glob_matches("[!]]", "]"));
        assert!(glob_matches("[a-]", "-"));
    }

    #[test]
    fn test_glob_reversed_range_matches_nothing() {
        assert!(!glob_matches("[z-a]", "m"));
        assert!(glob_matches("[!z-a]", "m"));
        assert!(glob_matches("[z-ax]", "x"));
    }

    #[test]
    fn test_invalid_regexp_is_reported() {
        let err = compile(&PatternKey::Regexp("(".into()), true).unwrap_err();
        assert!(matches!(err, EvalError::InvalidPattern { .. }));
    }
}
