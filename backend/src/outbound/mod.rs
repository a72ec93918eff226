//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories over Diesel
//! - **memory**: process-local store for development and tests
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod memory;
pub mod persistence;
