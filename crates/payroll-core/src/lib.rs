//! # payroll-core: Foundational Types for Regulation Derivation
//!
//! This crate is the leaf of the workspace. It defines the primitives every
//! other crate shares: identifier newtypes, the override policy tag, the
//! catalogue of derivable entity kinds, and the payroll layer stack that
//! establishes derivation order.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `TenantId`, `PayrollId`,
//!    `RegulationId`, `ObjectId` are positive-integer newtypes with validated
//!    constructors. A non-positive identifier cannot be represented.
//!
//! 2. **Single `EntityKind` enum.** One definition, eleven variants,
//!    exhaustive `match` everywhere. Adding a kind forces every consumer
//!    (profiles, CLI dispatch) to handle it at compile time.
//!
//! 3. **One error hierarchy.** Every failure surfaces as a [`PayrollError`]
//!    variant from the invalid-argument / unknown-reference /
//!    unsupported-override taxonomy.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `payroll-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod kind;
pub mod payroll;
pub mod values;

// Re-export primary types for ergonomic imports.
pub use error::{PayrollError, PayrollResult};
pub use identity::{ObjectId, PayrollId, RegulationId, TenantId};
pub use kind::{EntityKind, OverrideType, ENTITY_KIND_COUNT};
pub use payroll::{LayerRank, Payroll, PayrollLayer, Regulation};
pub use values::{Attributes, Localizations};
