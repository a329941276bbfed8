//! Arc-consistency engine computing per-pattern-vertex candidate domains.

mod domain;
mod engine;

pub use domain::{Domain, DomainSet};
pub use engine::{propagate, Exclusions};
