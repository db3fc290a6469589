//! The leaf contract.
//!
//! A [`Rule`] is a single business rule written by application code. It only
//! answers "does this candidate satisfy me?"; error bookkeeping is done by the
//! [`Specification`](crate::Specification) node that wraps it.

use std::fmt;
use std::marker::PhantomData;

/// Description used by rules that do not provide their own.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// A single business rule over a candidate value.
///
/// Only [`is_satisfied_by`](Rule::is_satisfied_by) is required. A type that
/// does not provide it cannot implement the trait, so there is no way to
/// construct a rule without a body:
///
/// ```compile_fail
/// use sutoppu::Rule;
///
/// struct WrongRule;
///
/// impl Rule for WrongRule {
///     type Candidate = str;
/// }
/// ```
///
/// # Example
///
/// ```
/// use sutoppu::{Rule, Specification};
///
/// struct IsShort;
///
/// impl Rule for IsShort {
///     type Candidate = str;
///
///     fn is_satisfied_by(&self, candidate: &str) -> bool {
///         candidate.len() < 8
///     }
///
///     fn description(&self) -> &str {
///         "Value must be shorter than 8 characters."
///     }
/// }
///
/// let mut spec = Specification::new(IsShort);
/// assert!(!spec.is_satisfied_by("much too long"));
/// assert_eq!(
///     spec.errors().get("IsShort").map(String::as_str),
///     Some("Value must be shorter than 8 characters.")
/// );
/// ```
pub trait Rule {
    /// The domain type this rule evaluates.
    type Candidate: ?Sized;

    /// Returns `true` if the candidate satisfies the rule.
    fn is_satisfied_by(&self, candidate: &Self::Candidate) -> bool;

    /// Human-readable reason reported when the rule fails.
    fn description(&self) -> &str {
        DEFAULT_DESCRIPTION
    }

    /// Identifier used as the key in error maps.
    ///
    /// Defaults to the simple name of the implementing type, derived from
    /// [`std::any::type_name`], whose exact output is not guaranteed across
    /// compiler versions. Implementors that are not plain named types (tuples,
    /// references, closures) should override this, or set
    /// `#[rule(name = "...")]`.
    fn class_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Strips the module path and generic arguments from a type name.
///
/// `my_app::rules::MinLen<alloc::string::String>` becomes `MinLen`.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A rule backed by a closure.
///
/// Useful for one-off rules that do not deserve their own type. The name is
/// used as the error map key, exactly like a type name would be.
///
/// ```
/// use sutoppu::{Predicate, Specification};
///
/// let mut adult = Specification::new(Predicate::new(
///     "IsAdult",
///     "Person must be at least 18.",
///     |age: &u32| *age >= 18,
/// ));
///
/// assert!(adult.is_satisfied_by(&21));
/// assert!(!adult.is_satisfied_by(&12));
/// assert!(adult.errors().contains_key("IsAdult"));
/// ```
pub struct Predicate<T: ?Sized, F> {
    name: String,
    description: String,
    check: F,
    _candidate: PhantomData<fn(&T) -> bool>,
}

impl<T, F> Predicate<T, F>
where
    T: ?Sized,
    F: Fn(&T) -> bool,
{
    /// Creates a rule reported as `name` with `description` when `check` fails.
    pub fn new(name: impl Into<String>, description: impl Into<String>, check: F) -> Self {
        Predicate {
            name: name.into(),
            description: description.into(),
            check,
            _candidate: PhantomData,
        }
    }
}

impl<T, F> Rule for Predicate<T, F>
where
    T: ?Sized,
    F: Fn(&T) -> bool,
{
    type Candidate = T;

    fn is_satisfied_by(&self, candidate: &T) -> bool {
        (self.check)(candidate)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn class_name(&self) -> &str {
        &self.name
    }
}

impl<T: ?Sized, F> fmt::Debug for Predicate<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Anything;

    impl Rule for Anything {
        type Candidate = str;

        fn is_satisfied_by(&self, _candidate: &str) -> bool {
            true
        }
    }

    struct Wrapper<T>(T);

    impl Rule for Wrapper<u8> {
        type Candidate = u8;

        fn is_satisfied_by(&self, candidate: &u8) -> bool {
            *candidate == self.0
        }
    }

    #[test]
    fn short_type_name_strips_path_and_generics() {
        assert_eq!(short_type_name("FruitIsSweet"), "FruitIsSweet");
        assert_eq!(short_type_name("app::rules::FruitIsSweet"), "FruitIsSweet");
        assert_eq!(
            short_type_name("app::MinLen<alloc::string::String>"),
            "MinLen"
        );
    }

    #[test]
    fn default_description_and_class_name() {
        assert_eq!(Anything.description(), DEFAULT_DESCRIPTION);
        assert_eq!(Anything.class_name(), "Anything");
        assert_eq!(Wrapper(3u8).class_name(), "Wrapper");
    }

    struct Between(u8, u8);

    impl Rule for (Between, Between) {
        type Candidate = u8;

        fn is_satisfied_by(&self, candidate: &u8) -> bool {
            (self.0 .0..=self.0 .1).contains(candidate) || (self.1 .0..=self.1 .1).contains(candidate)
        }

        fn class_name(&self) -> &str {
            "InEitherRange"
        }
    }

    #[test]
    fn tuple_rule_overrides_class_name() {
        let rule = (Between(1, 3), Between(7, 9));

        assert!(rule.is_satisfied_by(&8));
        assert_eq!(rule.class_name(), "InEitherRange");

        let mut spec = crate::Specification::new(rule);
        assert!(!spec.is_satisfied_by(&5));
        assert_eq!(spec.errors()["InEitherRange"], DEFAULT_DESCRIPTION);
    }

    #[test]
    fn predicate_uses_explicit_name() {
        let rule = Predicate::new("NonEmpty", "Must not be empty.", |s: &str| !s.is_empty());

        assert!(rule.is_satisfied_by("x"));
        assert!(!rule.is_satisfied_by(""));
        assert_eq!(rule.class_name(), "NonEmpty");
        assert_eq!(rule.description(), "Must not be empty.");
    }
}
