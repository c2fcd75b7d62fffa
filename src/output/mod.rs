//! Delivery of rendered documents.
//!
//! # Design Decisions
//! - The proxy must never observe a half-written document
//! - Write to a sibling temporary file, then rename over the target

pub mod writer;
