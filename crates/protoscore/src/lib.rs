//! Protocol Complexity Score (PCS) engine for clinical-trial protocol drafts.
//!
//! The [`scoring`] module holds the pure scoring engine and the what-if
//! simulation contract; [`protocols`] owns the protocol catalog, its file
//! importers, and the HTTP surface that ties both together.

pub mod config;
pub mod error;
pub mod protocols;
pub mod scoring;
pub mod telemetry;
