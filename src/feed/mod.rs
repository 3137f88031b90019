//! The fetcher's JSON contract.
//!
//! The fetcher itself is an external collaborator; this module only reads what
//! it writes.

pub mod document;
pub mod models;

pub use document::{FeedDocument, OddsByCompany};
