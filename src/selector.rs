//! Source text to compiler version: extract, parse, resolve

use thiserror::Error;
use tracing::debug;

use crate::pragma::constraint::{ClauseSet, ParseError, parse_constraint};
use crate::pragma::extractor::PragmaExtractor;
use crate::version::catalog::VersionCatalog;
use crate::version::error::ResolutionError;
use crate::version::resolver::{operative_clause, resolve};
use crate::version::semver::SemanticVersion;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The source declares no constraint; callers usually fall back to a default
    #[error("no `pragma solidity` directive found")]
    NoDirectiveFound,

    #[error("invalid pragma on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// A parsed directive, not yet resolved against a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedPragma {
    pub clauses: ClauseSet,
    /// 0-based line of the directive
    pub line: usize,
}

impl ParsedPragma {
    /// Whether resolving this directive reads the catalog at all
    pub fn needs_catalog(&self) -> bool {
        !operative_clause(&self.clauses).comparator.is_literal()
    }

    pub fn resolve(self, catalog: &VersionCatalog) -> Result<Selection, SelectError> {
        let version = resolve(&self.clauses, catalog)?;
        debug!("Resolved `{}` to {}", self.clauses, version);

        Ok(Selection {
            clauses: self.clauses,
            version,
            line: self.line,
        })
    }
}

/// A resolved directive together with the clauses it was resolved from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub clauses: ClauseSet,
    pub version: SemanticVersion,
    /// 0-based line of the directive
    pub line: usize,
}

/// Extracts and parses the directive of one source file
pub fn parse_source(extractor: &PragmaExtractor, source: &str) -> Result<ParsedPragma, SelectError> {
    let raw = extractor
        .extract(source)
        .ok_or(SelectError::NoDirectiveFound)?;

    let clauses = parse_constraint(raw.as_str()).map_err(|source| SelectError::Parse {
        line: raw.line,
        source,
    })?;

    Ok(ParsedPragma {
        clauses,
        line: raw.line,
    })
}

/// Extracts, parses and resolves the directive of one source file
pub fn select_version(
    extractor: &PragmaExtractor,
    source: &str,
    catalog: &VersionCatalog,
) -> Result<Selection, SelectError> {
    parse_source(extractor, source)?.resolve(catalog)
}
