//! Glass box land-use compatibility audit engine.
//!
//! Batch pipeline: buffer parcel footprints by the adjacency distance, find
//! every directed pair of parcels within that threshold through an R-tree,
//! score each pair with a policy matrix, reduce per parcel to the worst-case
//! (minimum) score, and tabulate the distribution city-wide and per class.

#![deny(
    clippy::mutable_key_type,
    clippy::map_entry,
    clippy::boxed_local,
    clippy::let_unit_value,
    clippy::redundant_allocation,
    clippy::bool_comparison,
    clippy::bind_instead_of_map,
    clippy::vec_box,
    clippy::while_let_loop,
    clippy::useless_asref,
    clippy::repeat_once,
    clippy::deref_addrof,
    clippy::suspicious_map,
    clippy::single_char_pattern,
    clippy::for_kv_map,
    clippy::let_and_return,
    clippy::iter_nth,
    clippy::iter_cloned_collect,
    clippy::match_result_ok,
    clippy::cmp_owned,
    clippy::op_ref
)]

pub mod adjacency;
pub mod buffering;
pub mod matrix;
pub mod models;
pub mod pipeline;
pub mod reports;
pub mod scoring;
pub mod spatial;

pub use matrix::CompatibilityMatrix;
pub use models::{AdjacencyPair, CoordSpace, Parcel, ParcelScore, ScoredPair, ScoredParcel};
pub use pipeline::{AuditError, AuditOptions, AuditOutput, run_audit};
