//! Selects one concrete version for a parsed constraint
//!
//! A two-clause range is first collapsed to a single operative clause: the clause
//! with the smaller version wins, the first clause on a tie. The operative clause
//! is then resolved per comparator:
//!
//! - `=`, `<=`, `>=` or no comparator: the literal version, no catalog lookup
//! - `<`: the catalog entry right after the exact match (next older)
//! - `>`: the catalog entry right before the exact match (next newer)
//! - `^`, `~`: the first (newest) entry on the same `major.minor` line

use tracing::debug;

use crate::pragma::constraint::{Clause, ClauseSet, Comparator};
use crate::version::catalog::VersionCatalog;
use crate::version::error::ResolutionError;
use crate::version::semver::SemanticVersion;

/// Picks the operative clause of a clause set.
///
/// For `>=X <Y` this keeps the lower bound, so the range resolves to `X` rather than
/// to the intersection of both bounds.
pub fn operative_clause(clauses: &ClauseSet) -> Clause {
    match *clauses {
        ClauseSet::Single(clause) => clause,
        ClauseSet::Range(first, second) => {
            if second.version < first.version {
                second
            } else {
                first
            }
        }
    }
}

/// Resolves a clause set against a newest-first catalog
pub fn resolve(
    clauses: &ClauseSet,
    catalog: &VersionCatalog,
) -> Result<SemanticVersion, ResolutionError> {
    let operative = operative_clause(clauses);
    debug!("Operative clause for {}: {}", clauses, operative);
    resolve_clause(&operative, catalog)
}

/// Resolves a single clause against a newest-first catalog
pub fn resolve_clause(
    clause: &Clause,
    catalog: &VersionCatalog,
) -> Result<SemanticVersion, ResolutionError> {
    let version = clause.version;

    match clause.comparator {
        Comparator::Unspecified | Comparator::Exact | Comparator::AtMost | Comparator::AtLeast => {
            Ok(version)
        }
        Comparator::LessThan => {
            let index = catalog
                .position(&version)
                .ok_or(ResolutionError::VersionNotInCatalog(version))?;
            catalog
                .get(index + 1)
                .copied()
                .ok_or(ResolutionError::NoOlderVersion(version))
        }
        Comparator::GreaterThan => {
            let index = catalog
                .position(&version)
                .ok_or(ResolutionError::VersionNotInCatalog(version))?;
            index
                .checked_sub(1)
                .and_then(|newer| catalog.get(newer))
                .copied()
                .ok_or(ResolutionError::NoNewerVersion(version))
        }
        Comparator::Caret | Comparator::Tilde => catalog
            .iter()
            .find(|candidate| candidate.same_minor_line(&version))
            .copied()
            .ok_or(ResolutionError::NoMatchingMinorLine {
                major: version.major,
                minor: version.minor,
            }),
    }
}
