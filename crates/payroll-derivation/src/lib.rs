//! # payroll-derivation: Layered Regulation Derivation
//!
//! A payroll stacks regulations in layers. The same named object (a case, a
//! wage type, a lookup value, ...) may be defined by several layers at once,
//! e.g. a country base regulation and a company override. This crate computes
//! the *effective* object for every named key by folding field values from
//! the less specific layers into the more specific ones.
//!
//! ## Pipeline
//!
//! ```text
//! CandidateSupplier ──► Grouper ──► Derivation Order ──► Override Filter ──► Field Merger ──► Resolution
//!   (supplier.rs)      (group.rs)    (candidate.rs)        (filter.rs)        (merge.rs)      (resolver.rs)
//! ```
//!
//! Each entity kind declares an [`EntityProfile`]: its natural key and a
//! table mapping every mergeable field to one of three strategies
//! (scalar override, list union, map overlay). The engine is written once
//! and parameterized by that table.
//!
//! ## Purity
//!
//! The resolver performs no I/O, owns no long-lived state, and never mutates
//! its input: folding produces new candidate values. Concurrent calls are
//! safe as long as each call owns its candidate list.

pub mod candidate;
pub mod config;
pub mod entities;
pub mod filter;
pub mod group;
pub mod merge;
pub mod ownership;
pub mod profile;
pub mod query;
pub mod resolver;
pub mod supplier;

// Re-export primary types.
pub use candidate::{derivation_order, Candidate};
pub use config::{FilterAnchor, MapPrecedence, ResolverConfig};
pub use entities::{describe_profile, RegulationObjects};
pub use filter::OverrideFilter;
pub use group::{group_candidates, Groups};
pub use merge::{derive_group, MergeStrategy};
pub use ownership::verify_ownership;
pub use profile::{Derivable, EntityProfile, FieldRule, ObjectKey, ProfileDescription};
pub use query::{ClusterSet, DerivationQuery};
pub use resolver::{DerivationResolver, DerivedGroup, Resolution, ResolutionStats};
pub use supplier::{CandidateSupplier, RegulationBundle, RegulationEntry, RegulationStore};
