//! # bbx-types
//!
//! Core types for the black-box optimization core: variable domains,
//! parameter vectors, the fitness-function contract and the shared error type.

pub mod domain;
pub mod errors;
pub mod fitness;
pub mod vector;

pub use domain::*;
pub use errors::*;
pub use fitness::*;
pub use vector::*;
