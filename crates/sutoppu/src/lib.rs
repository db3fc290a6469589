//! Sutoppu - composable business rules with the Specification pattern.
//!
//! A specification is a predicate object that encapsulates one business rule.
//! Specifications combine with AND, OR and NOT into larger rules, and every
//! evaluation records which rules failed and why.
//!
//! # Quick Start
//!
//! ```rust
//! use sutoppu::{rule, Rule, Specification};
//!
//! struct Fruit {
//!     sweet: bool,
//!     bitter: bool,
//! }
//!
//! struct FruitIsSweet;
//!
//! #[rule(description = "Fruit must be sweet.")]
//! impl Rule for FruitIsSweet {
//!     type Candidate = Fruit;
//!
//!     fn is_satisfied_by(&self, fruit: &Fruit) -> bool {
//!         fruit.sweet
//!     }
//! }
//!
//! struct FruitIsBitter;
//!
//! #[rule(description = "Fruit must be bitter.")]
//! impl Rule for FruitIsBitter {
//!     type Candidate = Fruit;
//!
//!     fn is_satisfied_by(&self, fruit: &Fruit) -> bool {
//!         fruit.bitter
//!     }
//! }
//!
//! let mut spec = FruitIsSweet & !FruitIsBitter;
//!
//! let lemon = Fruit { sweet: false, bitter: true };
//! assert!(!spec.is_satisfied_by(&lemon));
//! assert_eq!(spec.errors()["FruitIsSweet"], "Fruit must be sweet.");
//! assert_eq!(
//!     spec.errors()["FruitIsBitter"],
//!     "Expected condition to NOT satisfy: Fruit must be bitter."
//! );
//! ```
//!
//! # Evaluation Semantics
//!
//! - Both children of AND and OR are always evaluated, in order. There is no
//!   short-circuit, so the error map names every failing branch.
//! - The error map of a node is cleared at the start of each evaluation; it
//!   never accumulates across calls.
//! - AND and OR merge their children's error maps regardless of their own
//!   result. A satisfied OR can therefore still list the branch that failed.
//! - NOT reports an entry, keyed by the wrapped node's class name, exactly
//!   when it evaluates to `false`.
//!
//! # Features
//!
//! - `macros` (default) - the [`macro@rule`] attribute for declaring leaf rules
//! - `serde` - `Serialize` for [`SpecificationError`]

mod error;
mod ops;
mod rule;
mod specification;

pub use error::{Result, SpecificationError};
pub use rule::{Predicate, Rule, DEFAULT_DESCRIPTION};
pub use specification::{all_of, any_of, ErrorMap, Specification, NOT_PREFIX};

#[cfg(feature = "macros")]
pub use sutoppu_macros::rule;

/// Crate version, from build metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything needed to declare and combine rules.
pub mod prelude {
    pub use crate::{all_of, any_of, Predicate, Rule, Specification, SpecificationError};

    #[cfg(feature = "macros")]
    pub use crate::rule;
}
