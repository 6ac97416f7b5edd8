//! Core domain types
//!
//! These types are produced by the client crate and consumed by whatever
//! drives the polling loop. None of them carry transport details.

pub mod build;
pub mod outcome;
pub mod submission;
