//! Specification nodes and the evaluation protocol.
//!
//! A [`Specification`] is either a leaf wrapping a [`Rule`] or a composite
//! (AND, OR, NOT) wrapping other specifications. Evaluation always goes
//! through [`Specification::is_satisfied_by`], which:
//!
//! 1. clears the node's error map,
//! 2. runs the node's body (the rule, or the children and the operator),
//! 3. records the node's error contribution,
//! 4. returns the boolean result unchanged.
//!
//! Error contributions per kind:
//!
//! | Kind | Recorded when | Key | Value |
//! |------|---------------|-----|-------|
//! | Leaf | result is `false` | rule class name | rule description |
//! | And / Or | always | merged from both children | merged from both children |
//! | Not | result is `false` | child class name | `Expected condition to NOT satisfy: …` |

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SpecificationError};
use crate::rule::{Rule, DEFAULT_DESCRIPTION};

/// Failing rule name → human-readable description.
pub type ErrorMap = BTreeMap<String, String>;

/// Prefix of the description synthesized for negated specifications.
pub const NOT_PREFIX: &str = "Expected condition to NOT satisfy: ";

enum Kind<T: ?Sized> {
    Leaf(Box<dyn Rule<Candidate = T> + Send>),
    And(Box<Specification<T>>, Box<Specification<T>>),
    Or(Box<Specification<T>>, Box<Specification<T>>),
    Not(Box<Specification<T>>),
}

/// A composable business rule with per-evaluation error reporting.
///
/// Build leaves with [`Specification::new`] (or straight from a `#[rule]`
/// type) and combine them with `&`, `|` and `!`. Both children of an AND or
/// OR are always evaluated, so the error map lists every failing branch, not
/// only the first one.
///
/// # Example
///
/// ```
/// use sutoppu::{Predicate, Specification};
///
/// let sweet = Specification::new(Predicate::new(
///     "FruitIsSweet",
///     "Fruit must be sweet.",
///     |sugar: &u32| *sugar > 10,
/// ));
/// let huge = Specification::new(Predicate::new(
///     "FruitIsHuge",
///     "Fruit must be huge.",
///     |sugar: &u32| *sugar > 1000,
/// ));
///
/// let mut spec = sweet & !huge;
/// assert!(!spec.is_satisfied_by(&5000));
/// assert_eq!(
///     spec.errors().get("FruitIsHuge").map(String::as_str),
///     Some("Expected condition to NOT satisfy: Fruit must be huge.")
/// );
/// ```
///
/// # Concurrency
///
/// A node's error map is rewritten on every evaluation, which is why
/// evaluation takes `&mut self`. Sharing one tree between threads requires
/// external synchronization (for example a `Mutex`); separate trees share no
/// state and can be evaluated independently. Rules must be `Send`, so every
/// specification can be moved to, or locked from, another thread.
pub struct Specification<T: ?Sized> {
    kind: Kind<T>,
    description: String,
    errors: ErrorMap,
}

impl<T: ?Sized> Specification<T> {
    /// Wraps a rule into a leaf specification.
    pub fn new<R>(rule: R) -> Self
    where
        R: Rule<Candidate = T> + Send + 'static,
    {
        let description = rule.description().to_owned();
        Specification {
            kind: Kind::Leaf(Box::new(rule)),
            description,
            errors: ErrorMap::new(),
        }
    }

    fn composite(kind: Kind<T>, description: String) -> Self {
        Specification {
            kind,
            description,
            errors: ErrorMap::new(),
        }
    }

    /// Evaluates the candidate and refreshes the error map.
    ///
    /// The previous error map is discarded before evaluation starts.
    pub fn is_satisfied_by(&mut self, candidate: &T) -> bool {
        self.errors.clear();
        let result = self.evaluate(candidate);
        self.report_error(result);
        tracing::trace!(
            specification = self.class_name(),
            result,
            failures = self.errors.len(),
            "evaluated specification"
        );
        result
    }

    fn evaluate(&mut self, candidate: &T) -> bool {
        match &mut self.kind {
            Kind::Leaf(rule) => rule.is_satisfied_by(candidate),
            Kind::And(a, b) => {
                let a = a.is_satisfied_by(candidate);
                let b = b.is_satisfied_by(candidate);
                a && b
            }
            Kind::Or(a, b) => {
                let a = a.is_satisfied_by(candidate);
                let b = b.is_satisfied_by(candidate);
                a || b
            }
            Kind::Not(spec) => !spec.is_satisfied_by(candidate),
        }
    }

    fn report_error(&mut self, result: bool) {
        let Specification {
            kind,
            description,
            errors,
        } = self;

        match kind {
            Kind::Leaf(rule) => {
                if !result {
                    tracing::debug!(rule = rule.class_name(), "rule not satisfied");
                    errors.insert(rule.class_name().to_owned(), description.clone());
                }
            }
            // The result is irrelevant here, children already reported.
            Kind::And(a, b) | Kind::Or(a, b) => {
                for spec in [a, b] {
                    errors.extend(
                        spec.errors
                            .iter()
                            .map(|(name, reason)| (name.clone(), reason.clone())),
                    );
                }
            }
            Kind::Not(spec) => {
                if !result {
                    errors.insert(spec.class_name().to_owned(), description.clone());
                }
            }
        }
    }

    /// Evaluates the candidate and turns a failure into an error.
    ///
    /// The error carries a copy of this node's error map, which stays
    /// available through [`errors`](Specification::errors) as well.
    ///
    /// ```
    /// use sutoppu::{Predicate, Specification, SpecificationError};
    ///
    /// let mut spec = Specification::new(Predicate::new("IsEven", "Must be even.", |n: &i32| n % 2 == 0));
    /// assert!(spec.validate(&4).is_ok());
    ///
    /// let err = spec.validate(&3).unwrap_err();
    /// assert_eq!(err.to_string(), "candidate does not satisfy IsEven: IsEven: Must be even.");
    /// ```
    pub fn validate(&mut self, candidate: &T) -> Result<()> {
        if self.is_satisfied_by(candidate) {
            Ok(())
        } else {
            Err(SpecificationError::Unsatisfied {
                specification: self.class_name().to_owned(),
                errors: self.errors.clone(),
            })
        }
    }

    /// Returns a closure equivalent to calling [`is_satisfied_by`](Specification::is_satisfied_by).
    ///
    /// ```
    /// use sutoppu::{Predicate, Specification};
    ///
    /// let mut positive = Specification::new(Predicate::new("IsPositive", "Must be positive.", |n: &i32| *n > 0));
    /// let kept: Vec<i32> = vec![-2, 5, 0, 7].into_iter().filter(positive.as_fn()).collect();
    /// assert_eq!(kept, vec![5, 7]);
    /// ```
    pub fn as_fn(&mut self) -> impl FnMut(&T) -> bool + '_ {
        move |candidate: &T| self.is_satisfied_by(candidate)
    }

    /// Errors recorded by the most recent evaluation.
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// The description fixed when this node was built.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Identifier of this node: the rule's name for leaves, the operator
    /// name for composites.
    pub fn class_name(&self) -> &str {
        match &self.kind {
            Kind::Leaf(rule) => rule.class_name(),
            Kind::And(..) => "AndSpecification",
            Kind::Or(..) => "OrSpecification",
            Kind::Not(_) => "NotSpecification",
        }
    }

    /// Returns `true` for AND, OR and NOT nodes.
    pub fn is_composite(&self) -> bool {
        !matches!(self.kind, Kind::Leaf(_))
    }

    /// Combines with `other`; satisfied when both are.
    pub fn and(self, other: impl Into<Specification<T>>) -> Self {
        Specification::composite(
            Kind::And(Box::new(self), Box::new(other.into())),
            DEFAULT_DESCRIPTION.to_owned(),
        )
    }

    /// Combines with `other`; satisfied when either is.
    pub fn or(self, other: impl Into<Specification<T>>) -> Self {
        Specification::composite(
            Kind::Or(Box::new(self), Box::new(other.into())),
            DEFAULT_DESCRIPTION.to_owned(),
        )
    }

    /// Shorthand for `self.and(other.negate())`.
    pub fn and_not(self, other: impl Into<Specification<T>>) -> Self {
        self.and(other.into().negate())
    }

    /// Shorthand for `self.or(other.negate())`.
    pub fn or_not(self, other: impl Into<Specification<T>>) -> Self {
        self.or(other.into().negate())
    }

    /// Inverts this specification.
    pub fn negate(self) -> Self {
        let description = format!("{NOT_PREFIX}{}", self.description);
        Specification::composite(Kind::Not(Box::new(self)), description)
    }
}

/// Chains specifications with AND, left to right.
///
/// Returns `None` when `specs` is empty.
pub fn all_of<T, I>(specs: I) -> Option<Specification<T>>
where
    T: ?Sized,
    I: IntoIterator<Item = Specification<T>>,
{
    specs.into_iter().reduce(Specification::and)
}

/// Chains specifications with OR, left to right.
///
/// Returns `None` when `specs` is empty.
pub fn any_of<T, I>(specs: I) -> Option<Specification<T>>
where
    T: ?Sized,
    I: IntoIterator<Item = Specification<T>>,
{
    specs.into_iter().reduce(Specification::or)
}

impl<T: ?Sized> fmt::Display for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.class_name(), self.description)
    }
}

impl<T: ?Sized> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("class_name", &self.class_name())
            .field("description", &self.description)
            .field("errors", &self.errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Predicate;

    fn positive() -> Specification<i32> {
        Specification::new(Predicate::new("IsPositive", "Must be positive.", |n: &i32| *n > 0))
    }

    fn even() -> Specification<i32> {
        Specification::new(Predicate::new("IsEven", "Must be even.", |n: &i32| n % 2 == 0))
    }

    #[test]
    fn leaf_records_failure() {
        let mut spec = positive();

        assert!(spec.is_satisfied_by(&3));
        assert!(spec.errors().is_empty());

        assert!(!spec.is_satisfied_by(&-3));
        assert_eq!(spec.errors().len(), 1);
        assert_eq!(spec.errors()["IsPositive"], "Must be positive.");
    }

    #[test]
    fn and_evaluates_both_children() {
        let mut spec = positive() & even();

        assert!(!spec.is_satisfied_by(&-3));
        assert_eq!(spec.errors().len(), 2);
        assert!(spec.errors().contains_key("IsPositive"));
        assert!(spec.errors().contains_key("IsEven"));
    }

    #[test]
    fn or_keeps_failing_branch_even_when_satisfied() {
        let mut spec = positive() | even();

        assert!(spec.is_satisfied_by(&3));
        assert_eq!(spec.errors().len(), 1);
        assert_eq!(spec.errors()["IsEven"], "Must be even.");
    }

    #[test]
    fn not_reports_under_child_name() {
        let mut spec = !positive();

        assert!(spec.is_satisfied_by(&-1));
        assert!(spec.errors().is_empty());

        assert!(!spec.is_satisfied_by(&1));
        assert_eq!(
            spec.errors()["IsPositive"],
            "Expected condition to NOT satisfy: Must be positive."
        );
    }

    #[test]
    fn double_negation_reports_under_not_name() {
        let mut spec = positive().negate().negate();

        assert!(!spec.is_satisfied_by(&-1));
        assert_eq!(
            spec.errors()["NotSpecification"],
            "Expected condition to NOT satisfy: Expected condition to NOT satisfy: Must be positive."
        );
    }

    #[test]
    fn colliding_keys_keep_second_child() {
        let first = Specification::new(Predicate::new("Same", "first", |_: &i32| false));
        let second = Specification::new(Predicate::new("Same", "second", |_: &i32| false));
        let mut spec = first & second;

        assert!(!spec.is_satisfied_by(&0));
        assert_eq!(spec.errors().len(), 1);
        assert_eq!(spec.errors()["Same"], "second");
    }

    #[test]
    fn and_not_and_or_not() {
        let mut spec = positive().and_not(even());
        assert!(spec.is_satisfied_by(&3));
        assert!(!spec.is_satisfied_by(&4));

        let mut spec = positive().or_not(even());
        assert!(spec.is_satisfied_by(&-3));
        assert!(!spec.is_satisfied_by(&-4));
    }

    #[test]
    fn class_names_and_descriptions() {
        let leaf = positive();
        assert_eq!(leaf.class_name(), "IsPositive");
        assert!(!leaf.is_composite());

        let and = positive() & even();
        assert_eq!(and.class_name(), "AndSpecification");
        assert_eq!(and.description(), DEFAULT_DESCRIPTION);
        assert!(and.is_composite());

        assert_eq!((positive() | even()).class_name(), "OrSpecification");

        let not = !even();
        assert_eq!(not.class_name(), "NotSpecification");
        assert_eq!(not.description(), "Expected condition to NOT satisfy: Must be even.");
    }

    #[test]
    fn display_form() {
        assert_eq!(positive().to_string(), "<IsPositive: Must be positive.>");
        assert_eq!(
            (positive() & even()).to_string(),
            "<AndSpecification: No description provided.>"
        );
    }

    #[test]
    fn all_of_and_any_of() {
        assert!(all_of(Vec::<Specification<i32>>::new()).is_none());
        assert!(any_of(Vec::<Specification<i32>>::new()).is_none());

        let mut all = all_of([positive(), even()]).unwrap();
        assert!(all.is_satisfied_by(&2));
        assert!(!all.is_satisfied_by(&1));
        assert_eq!(all.errors().len(), 1);

        let mut any = any_of([positive(), even()]).unwrap();
        assert!(any.is_satisfied_by(&-2));
        assert!(!any.is_satisfied_by(&-1));
        assert_eq!(any.errors().len(), 2);
    }

    #[test]
    fn shared_tree_behind_mutex() {
        use std::sync::{Arc, Mutex};

        let shared = Arc::new(Mutex::new(positive() & even()));
        let worker = Arc::clone(&shared);

        let result = std::thread::spawn(move || worker.lock().unwrap().is_satisfied_by(&3))
            .join()
            .unwrap();

        assert!(!result);
        let spec = shared.lock().unwrap();
        assert_eq!(spec.errors().len(), 1);
        assert_eq!(spec.errors()["IsEven"], "Must be even.");
    }

    #[test]
    fn validate_carries_errors() {
        let mut spec = positive() & even();

        assert_eq!(spec.validate(&2), Ok(()));

        let err = spec.validate(&-1).unwrap_err();
        let SpecificationError::Unsatisfied {
            specification,
            errors,
        } = err;
        assert_eq!(specification, "AndSpecification");
        assert_eq!(&errors, spec.errors());
    }
}
