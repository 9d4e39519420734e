//! Static domain model for the portfolio page.
//!
//! # Responsibility
//! - Define the section, contact link and content descriptor shapes.
//! - Keep content data-driven so it can be validated and rendered separately.
//!
//! # Invariants
//! - Every section is identified by a stable, well-formed `SectionId`.
//! - Model values are immutable after configuration is built.

pub mod content;
pub mod section;
