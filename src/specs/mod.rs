// src/specs/mod.rs
//! # Page “specs”
//!
//! Each module here knows how to read one kind of page, or one layer of the
//! activity page. Activity pages come in several generations, so reading one
//! is a cascade:
//!
//! ```text
//! embedded_json → runtime_state → legacy_script → network_capture
//!        (first non-empty fragment wins, the rest are skipped)
//!                          ↓
//!                     supplement (always; only fills absent keys)
//!                          ↓
//!              record::merge_fragments → record::canonicalize
//! ```
//!
//! ## What lives here
//! - **Strategies** (`Strategy` impls): one self-contained way of getting the
//!   activity data out of a rendered page or a live session.
//! - **The chain** (`activity::ActivityChain`): priority order, short-circuit,
//!   supplement, merge.
//! - **Listing discovery** (`athlete`): recent activity ids for an athlete.
//!
//! ## What does **not** live here
//! - Navigation order, retries, skipping: that's `runner`.
//! - Persistence: `store`.
//! - Type coercion into the persisted shape: `record`.
//!
//! ## Conventions
//! - A strategy never fails. Anything that goes wrong inside one is logged at
//!   debug level and reported as an empty fragment.
//! - Strategies only read. The session is shared by reference; nothing here
//!   navigates except `athlete` discovery.
//! - Loose UI strings go through `core::parse` and degrade to null.
//! - Everything is testable offline against saved markup.
pub mod activity;
pub mod athlete;
pub mod embedded_json;
pub mod legacy_script;
pub mod network_capture;
pub mod runtime_state;
pub mod supplement;

pub use activity::{ActivityChain, Extraction, PageContext, Source, Strategy};
