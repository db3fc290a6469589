//! Proc macros for Sutoppu.
//!
//! # Available Macros
//!
//! - [`macro@rule`] - Declare a leaf rule's metadata and make it composable
//!   with `&`, `|` and `!`
//!
//! These macros are re-exported by the `sutoppu` crate (feature `macros`,
//! enabled by default); depend on `sutoppu` rather than on this crate.
//!
//! For working examples, see `sutoppu/tests/rule_macro.rs`.

mod rule;

use proc_macro::TokenStream;

/// Declares a leaf rule on an `impl Rule for Type` block.
///
/// The impl block is kept as written. Attribute keys inject the metadata
/// methods, and the leaf type gains `From<Type>` for `Specification`, plus
/// `BitAnd`, `BitOr` and `Not`, so it can be combined without wrapping it
/// in `Specification::new` first.
///
/// # Attribute Keys
///
/// | Key | Description |
/// |-----|-------------|
/// | `description = "..."` | Reason reported when the rule fails |
/// | `name = "..."` | Error map key (defaults to the type name) |
///
/// # Example
///
/// ```rust,ignore
/// use sutoppu::{rule, Rule};
///
/// struct FruitIsYellow;
///
/// #[rule(description = "Fruit must be yellow.")]
/// impl Rule for FruitIsYellow {
///     type Candidate = Fruit;
///
///     fn is_satisfied_by(&self, fruit: &Fruit) -> bool {
///         fruit.color == "yellow"
///     }
/// }
///
/// let mut spec = FruitIsYellow & !FruitIsSweet;
/// ```
///
/// # Compile-Time Errors
///
/// The macro fails to compile if:
/// - It is not placed on an `impl Rule for Type` block
/// - The impl block has no `type Candidate = ...;`
/// - A key is also implemented by hand in the impl block
/// - An unknown key or a non-string value is given
#[proc_macro_attribute]
pub fn rule(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = proc_macro2::TokenStream::from(attr);
    let item = proc_macro2::TokenStream::from(item);
    rule::rule_impl(attr, item)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
