//! Pure domain logic for the Defter learning platform.
//!
//! Everything in this crate is deterministic and I/O-free: the spaced
//! repetition scheduler, streak and level rules, badge evaluation, and the
//! analytics derived from a user's attempt log. All clock inputs are explicit
//! parameters so callers (and tests) control time.

pub mod badges;
pub mod engine;
pub mod error;
pub mod profile;
pub mod srs;
pub mod types;
