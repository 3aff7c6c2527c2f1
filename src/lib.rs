//! Prime factorization trees.
//!
//! A user starts a composite number and repeatedly splits composite bubbles
//! into factor pairs until every leaf is prime; the completed tree reports
//! the factorization in expanded and exponent form.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
