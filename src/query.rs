use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::{
    ast::Expr,
    compiler::{FilterCompiler, FilterResult},
    error::Error,
    evaluator::MatchEvaluator,
    lexer::{Dialect, Lexer},
    parser::Parser,
    patterns::PatternCache,
    resolver::ResolveOptions,
    validator::validate,
    value::Value,
};

/// Options for [`CompiledQuery::new`].
///
/// Every field has a default, so the struct can be read from a partial
/// config document.
///
/// ```
/// use sift_lang::CompileOptions;
///
/// let options: CompileOptions =
///     serde_json::from_str(r#"{"case_sensitive": false}"#).unwrap();
/// assert!(!options.case_sensitive);
/// assert_eq!(options.key_separator, ".");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Split field paths on `key_separator`
    pub use_nested_keys: bool,
    pub key_separator: String,
    /// When false, strings on both sides are lower-cased and patterns
    /// ignore case
    pub case_sensitive: bool,
    /// Fail with `KeyNotFound` when a field resolves to nothing
    pub raise_on_missing_key: bool,
    /// Run the validator before accepting the query
    pub validate: bool,
    pub dialect: Dialect,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            use_nested_keys: true,
            key_separator: ".".to_string(),
            case_sensitive: true,
            raise_on_missing_key: false,
            validate: true,
            dialect: Dialect::default(),
        }
    }
}

impl CompileOptions {
    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            use_nested_keys: self.use_nested_keys,
            key_separator: self.key_separator.clone(),
            strict: self.raise_on_missing_key,
        }
    }
}

/// A parsed, validated query with its patterns compiled, ready to be
/// evaluated against any number of records.
///
/// Evaluation only reads the query, so one instance can be shared between
/// threads.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    source: String,
    expr: Option<Expr>,
    options: CompileOptions,
    resolve: ResolveOptions,
    patterns: PatternCache,
}

impl CompiledQuery {
    pub fn new(text: &str, options: CompileOptions) -> Result<Self, Error> {
        let expr = Parser::new(Lexer::with_dialect(text, options.dialect))?.parse()?;

        if options.validate
            && let Some(expr) = &expr
        {
            validate(expr)?;
        }

        let patterns = match &expr {
            Some(expr) => PatternCache::collect(expr, options.case_sensitive)?,
            None => PatternCache::new(options.case_sensitive),
        };
        tracing::debug!(query = text, patterns = patterns.len(), "compiled query");

        Ok(CompiledQuery {
            source: text.to_string(),
            expr,
            resolve: options.resolve_options(),
            options,
            patterns,
        })
    }

    /// The query text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed tree, `None` for an empty query.
    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Tests one record. An empty query matches nothing.
    pub fn matches(&self, record: &Value) -> Result<bool, Error> {
        let Some(expr) = &self.expr else {
            return Ok(false);
        };
        let matched = MatchEvaluator::new(
            record,
            &self.resolve,
            self.options.case_sensitive,
            &self.patterns,
        )
        .evaluate(expr)?;
        tracing::trace!(query = %self.source, matched, "evaluated record");
        Ok(matched)
    }

    /// Lazily yields the records that match.
    pub fn filter<I>(&self, records: I) -> Filter<&Self, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        Filter::new(self, records.into_iter())
    }

    /// Like [`CompiledQuery::filter`], taking ownership of the query.
    pub fn into_filter<I>(self, records: I) -> Filter<Self, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<Value>,
    {
        Filter::new(self, records.into_iter())
    }

    /// Translates the query into a MongoDB-style filter document.
    pub fn to_external_filter(&self) -> Result<FilterResult, Error> {
        let filter = FilterCompiler::new(self.options.case_sensitive).compile(self.expr.as_ref())?;
        tracing::debug!(query = %self.source, "translated query");
        Ok(filter)
    }
}

/// Iterator over the records of `I` that match a query.
///
/// Consumes its source, so it can be run once. A record whose evaluation
/// fails is reported in place as `Err` and iteration can continue past it.
pub struct Filter<Q, I> {
    query: Q,
    records: I,
}

impl<Q, I> Filter<Q, I> {
    fn new(query: Q, records: I) -> Self {
        Filter { query, records }
    }
}

impl<Q, I> Iterator for Filter<Q, I>
where
    Q: Borrow<CompiledQuery>,
    I: Iterator,
    I::Item: Borrow<Value>,
{
    type Item = Result<I::Item, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            let query: &CompiledQuery = self.query.borrow();
            match query.matches(record.borrow()) {
                Ok(true) => return Some(Ok(record)),
                Ok(false) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}
