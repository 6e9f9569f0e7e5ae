//! Version constraint grammar
//!
//! ```text
//! directive  := "pragma" "solidity" clause clause?
//! clause     := comparator? version
//! comparator := "^" | "~" | "<=" | "<" | ">=" | ">" | "="
//! version    := digits "." digits "." digits
//!             | "0" "." digits ("." digits)?
//! ```
//!
//! Whitespace around comparators and between version components is ignored.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::version::semver::SemanticVersion;

/// Comparison operator preceding a version in a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `=`
    Exact,
    /// `<=`
    AtMost,
    /// `>=`
    AtLeast,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// No symbol; resolves like `Exact`
    Unspecified,
}

impl Comparator {
    /// Longest symbols first so `<=` is not read as `<`
    const SYMBOLS: [(&'static str, Comparator); 7] = [
        ("<=", Comparator::AtMost),
        (">=", Comparator::AtLeast),
        ("<", Comparator::LessThan),
        (">", Comparator::GreaterThan),
        ("=", Comparator::Exact),
        ("^", Comparator::Caret),
        ("~", Comparator::Tilde),
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Exact => "=",
            Comparator::AtMost => "<=",
            Comparator::AtLeast => ">=",
            Comparator::LessThan => "<",
            Comparator::GreaterThan => ">",
            Comparator::Caret => "^",
            Comparator::Tilde => "~",
            Comparator::Unspecified => "",
        }
    }

    /// Whether a clause with this comparator resolves to its own version,
    /// with no catalog lookup
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Comparator::Unspecified | Comparator::Exact | Comparator::AtMost | Comparator::AtLeast
        )
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `(comparator, version)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Clause {
    pub comparator: Comparator,
    pub version: SemanticVersion,
}

impl Clause {
    pub fn new(comparator: Comparator, version: SemanticVersion) -> Self {
        Self {
            comparator,
            version,
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.comparator, self.version)
    }
}

/// The clauses of one directive: a single clause or a two-bound range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseSet {
    Single(Clause),
    Range(Clause, Clause),
}

impl ClauseSet {
    /// Renders the full statement, e.g. `pragma solidity >=0.8.0 <0.9.0;`
    pub fn to_directive(&self) -> String {
        format!("pragma solidity {};", self)
    }
}

impl fmt::Display for ClauseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseSet::Single(clause) => write!(f, "{}", clause),
            ClauseSet::Range(first, second) => write!(f, "{} {}", first, second),
        }
    }
}

impl FromStr for ClauseSet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_constraint(s)
    }
}

/// Error type for constraint parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// `pragma solidity` keywords absent or out of order
    #[error("expected `pragma solidity` directive")]
    MissingDirective,

    /// No version number where one was required
    #[error("expected a version number at offset {position}")]
    MissingVersion { position: usize },

    /// Numeric pattern matched but is not an acceptable version
    #[error("invalid version {text:?}: {reason}")]
    InvalidVersion { text: String, reason: &'static str },

    /// More than two clauses
    #[error("at most two version clauses are allowed, found a third at offset {position}")]
    TooManyClauses { position: usize },

    /// Anything that is neither a comparator nor a version
    #[error("unexpected token {token:?} at offset {position}")]
    UnexpectedToken { position: usize, token: String },
}

/// Parses a full directive statement such as `pragma solidity ^0.8.0;`.
///
/// Leading and trailing whitespace and a final `;` are allowed.
pub fn parse_directive(directive: &str) -> Result<ClauseSet, ParseError> {
    let mut cursor = Cursor::new(directive);
    cursor.skip_whitespace();
    if !cursor.eat_keyword("pragma") {
        return Err(ParseError::MissingDirective);
    }
    cursor.skip_whitespace();
    if !cursor.eat_keyword("solidity") {
        return Err(ParseError::MissingDirective);
    }

    let body = cursor.rest().trim_end();
    let body = body.strip_suffix(';').unwrap_or(body);
    parse_constraint(body)
}

/// Parses constraint text (the part after `pragma solidity`) into its clauses
pub fn parse_constraint(raw: &str) -> Result<ClauseSet, ParseError> {
    let mut cursor = Cursor::new(raw);

    let first = parse_clause(&mut cursor)?;
    if cursor.at_end() {
        debug!("Parsed single clause {} from {:?}", first, raw);
        return Ok(ClauseSet::Single(first));
    }

    let second = parse_clause(&mut cursor)?;
    if cursor.at_end() {
        debug!("Parsed range {} {} from {:?}", first, second, raw);
        return Ok(ClauseSet::Range(first, second));
    }

    let position = cursor.pos;
    parse_clause(&mut cursor)?;
    Err(ParseError::TooManyClauses { position })
}

fn parse_clause(cursor: &mut Cursor<'_>) -> Result<Clause, ParseError> {
    cursor.skip_whitespace();
    let start = cursor.pos;
    let comparator = parse_comparator(cursor);
    if cursor.peek().is_some_and(is_comparator_char) {
        return Err(ParseError::UnexpectedToken {
            position: start,
            token: cursor.token_from(start).to_string(),
        });
    }
    cursor.skip_whitespace();

    if !cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
        if comparator.is_some() || cursor.is_empty() {
            return Err(ParseError::MissingVersion {
                position: cursor.pos,
            });
        }
        return Err(ParseError::UnexpectedToken {
            position: start,
            token: cursor.token_from(start).to_string(),
        });
    }

    let version = parse_version(cursor)?;
    Ok(Clause::new(
        comparator.unwrap_or(Comparator::Unspecified),
        version,
    ))
}

fn parse_comparator(cursor: &mut Cursor<'_>) -> Option<Comparator> {
    Comparator::SYMBOLS
        .iter()
        .find(|(symbol, _)| cursor.eat(symbol))
        .map(|(_, comparator)| *comparator)
}

fn is_comparator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '^' | '~')
}

fn parse_version(cursor: &mut Cursor<'_>) -> Result<SemanticVersion, ParseError> {
    let start = cursor.pos;
    let major = parse_number(cursor, start)?;

    cursor.skip_whitespace();
    if !cursor.eat(".") {
        return Err(ParseError::MissingVersion { position: start });
    }
    cursor.skip_whitespace();
    let minor = parse_number(cursor, start)?;

    // Optional patch; rewind if the dot is not there
    let before_patch = cursor.pos;
    cursor.skip_whitespace();
    if cursor.eat(".") {
        cursor.skip_whitespace();
        let patch = parse_number(cursor, start)?;
        return Ok(SemanticVersion::new(major, minor, patch));
    }
    cursor.pos = before_patch;

    if major != 0 {
        return Err(ParseError::InvalidVersion {
            text: cursor.input[start..cursor.pos].to_string(),
            reason: "two-component versions are only accepted for major version 0",
        });
    }
    Ok(SemanticVersion::major_minor(major, minor))
}

fn parse_number(cursor: &mut Cursor<'_>, version_start: usize) -> Result<u64, ParseError> {
    let digits = cursor.take_while(|c| c.is_ascii_digit());
    if digits.is_empty() {
        return Err(ParseError::MissingVersion {
            position: version_start,
        });
    }
    digits.parse().map_err(|_| ParseError::InvalidVersion {
        text: digits.to_string(),
        reason: "component does not fit in 64 bits",
    })
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Skips whitespace and reports whether nothing else remains
    fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.is_empty()
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Like `eat`, but the keyword must not continue into an identifier
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        let Some(after) = rest.strip_prefix(keyword) else {
            return false;
        };
        if after
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            return false;
        }
        self.pos += keyword.len();
        true
    }

    /// The whitespace-delimited token starting at `start`
    fn token_from(&self, start: usize) -> &'a str {
        let rest = &self.input[start..];
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        &rest[..end]
    }
}
