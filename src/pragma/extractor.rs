//! Locates the `pragma solidity ...;` directive in Solidity source text

use regex::Regex;

/// Constraint text found between `pragma solidity` and the terminating `;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawConstraint {
    text: String,
    /// 0-based line of the `pragma` keyword
    pub line: usize,
}

impl RawConstraint {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Extractor for the first version directive in a source file
pub struct PragmaExtractor {
    /// Regex for `pragma solidity <constraint>;`, possibly spanning lines.
    /// The constraint never contains braces, so an unterminated directive does
    /// not run into the contract body.
    directive_re: Regex,
}

impl PragmaExtractor {
    pub fn new() -> Self {
        Self {
            directive_re: Regex::new(r"\bpragma\s+solidity\b([^;{}]*);").unwrap(),
        }
    }

    /// Returns the constraint of the first directive, or `None` if the source declares none
    pub fn extract(&self, source: &str) -> Option<RawConstraint> {
        let caps = self.directive_re.captures(source)?;
        let directive = caps.get(0)?;
        let constraint = caps.get(1)?;

        let line = source[..directive.start()].matches('\n').count();

        Some(RawConstraint::new(constraint.as_str().trim(), line))
    }
}

impl Default for PragmaExtractor {
    fn default() -> Self {
        Self::new()
    }
}
