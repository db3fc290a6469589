//! Operator overloading for specification combinators.
//!
//! `&`, `|` and `!` map to [`Specification::and`], [`Specification::or`] and
//! [`Specification::negate`]. The right-hand side of `&` and `|` can be
//! anything that converts into a specification of the same candidate type,
//! which includes leaf types declared with `#[rule]`.

use std::ops::{BitAnd, BitOr, Not};

use crate::specification::Specification;

impl<T, R> BitAnd<R> for Specification<T>
where
    T: ?Sized,
    R: Into<Specification<T>>,
{
    type Output = Specification<T>;

    fn bitand(self, rhs: R) -> Self::Output {
        self.and(rhs)
    }
}

impl<T, R> BitOr<R> for Specification<T>
where
    T: ?Sized,
    R: Into<Specification<T>>,
{
    type Output = Specification<T>;

    fn bitor(self, rhs: R) -> Self::Output {
        self.or(rhs)
    }
}

impl<T: ?Sized> Not for Specification<T> {
    type Output = Specification<T>;

    fn not(self) -> Self::Output {
        self.negate()
    }
}
