//! combine-prs - fold open dependency-update PRs into one combined PR
//!
//! Candidate PRs (matched by branch prefix, minus ignored ones) are merged
//! one by one into an integration branch. A single combined PR tracks the
//! folded branches in an append-only body, and can optionally be merged
//! automatically, closing the originals once their content has landed.

pub mod auth;
pub mod combine;
pub mod config;
pub mod error;
pub mod platform;
pub mod schedule;
pub mod types;
