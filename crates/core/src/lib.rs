//! Domain types shared by every vidgen crate.
//!
//! Holds the persisted [`job::JobRecord`], the vendor-side
//! [`job::TaskSnapshot`], generation request parameters, and the
//! [`error::CoreError`] taxonomy.

pub mod error;
pub mod generation;
pub mod job;
pub mod types;
