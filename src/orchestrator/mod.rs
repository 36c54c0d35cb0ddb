//! Transaction orchestration.
//!
//! # Data Flow
//! ```text
//! resources (create/update/delete ACL or frontend)
//!     → runner.rs (version → transaction → stage → commit, bounded retry)
//!         → guard.rs (duplicate check before a create)
//!         → mutation.rs (what to stage, implemented per object type)
//!     → Applied { id, version, object }
//! ```
//!
//! # Design Decisions
//! - Optimistic concurrency: a moved version surfaces as a failed commit
//!   and the whole sequence restarts
//! - Stale transaction ids are never reused
//! - Map entries do not go through here; they have no transactions

pub mod guard;
pub mod mutation;
pub mod runner;

pub use mutation::{Applied, Mutation};
pub use runner::TransactionRunner;
