//! Core engine for the campus placement portal.
//!
//! The library owns the three pieces of the portal with real invariants:
//! deciding which job postings a student may see ([`eligibility`]),
//! governing the application status lifecycle and reconciling uploaded
//! shortlists ([`applications`]), and the store traits both lean on
//! ([`store`]). Presentation concerns live in the companion API service.

pub mod applications;
pub mod config;
pub mod domain;
pub mod eligibility;
pub mod error;
pub mod store;
pub mod telemetry;
