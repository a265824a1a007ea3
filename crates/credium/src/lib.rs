//! Credium: approval estimates and offer ranking for a consumer credit
//! marketplace, plus the client for the catalog backend.

pub mod backend;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod onboarding;
pub mod scoring;
pub mod telemetry;
