//! Relay Core
//!
//! Core types and pure logic for triggering remote builds and correlating
//! them with the build server's queue and history.
//!
//! This crate contains:
//! - Domain types: Submission, Outcome, build and queue records
//! - DTOs: wire shapes returned by the build server's JSON API
//! - Token generation for correlating a trigger with a later build
//! - Correlation lookups and the submission state machine

pub mod correlation;
pub mod domain;
pub mod dto;
pub mod state;
pub mod token;
