//! Pragma layer
//! - extractor.rs: finds the `pragma solidity` directive in source text
//! - constraint.rs: constraint grammar (Comparator, Clause, ClauseSet, ParseError)

pub mod constraint;
pub mod extractor;

pub use constraint::{
    Clause, ClauseSet, Comparator, ParseError, parse_constraint, parse_directive,
};
pub use extractor::{PragmaExtractor, RawConstraint};
