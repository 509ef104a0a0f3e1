//! Core dependency-consistency domain: dependency records, version
//! grouping, policy filtering, divergence classification and convergence
//! suggestions.

pub mod domain;
pub mod policies;
pub mod services;
