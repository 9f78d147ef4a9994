// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod http;
pub mod logging;
pub mod validation;

pub use validation::Validator;
