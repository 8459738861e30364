//! Relation queries on parsed values.
//!
//! Both operands are normalized and compared member by member with
//! [`evaluate_relation`]. The quantifier decides how members of a set or
//! list are combined; it applies to both sides and defaults to
//! [`Quantifier::Any`].

use tracing::trace;

use crate::allen::{evaluate_relation, Relation};
use crate::ast::Edtf;
use crate::normalize::normalize;
use crate::truth::{Quantifier, Truth};

/// `a relation b`, with `quantifier` applied across the members of both.
///
/// # Examples
///
/// ```
/// use edtf_engine::{parse, relate, Quantifier, Relation, Truth};
///
/// let a = parse("198X", None).unwrap();
/// let b = parse("1985", None).unwrap();
/// assert_eq!(relate(&a, &b, Relation::Equals, Quantifier::Any), Truth::Maybe);
/// ```
pub fn relate(a: &Edtf, b: &Edtf, relation: Relation, quantifier: Quantifier) -> Truth {
    let truth = evaluate_relation(&normalize(a), &normalize(b), relation, quantifier, quantifier);
    trace!(%a, %b, %relation, %truth, "relation evaluated");
    truth
}

macro_rules! relations {
    ($($name:ident, $with:ident => $relation:ident;)*) => {
        $(
            #[doc = concat!("`a ", stringify!($relation), " b` with [`Quantifier::Any`].")]
            pub fn $name(a: &Edtf, b: &Edtf) -> Truth {
                relate(a, b, Relation::$relation, Quantifier::Any)
            }

            #[doc = concat!("`a ", stringify!($relation), " b` with an explicit quantifier.")]
            pub fn $with(a: &Edtf, b: &Edtf, quantifier: Quantifier) -> Truth {
                relate(a, b, Relation::$relation, quantifier)
            }
        )*
    };
}

relations! {
    is_before, is_before_with => Before;
    is_after, is_after_with => After;
    meets, meets_with => Meets;
    overlaps, overlaps_with => Overlaps;
    starts, starts_with => Starts;
    during, during_with => During;
    contains, contains_with => Contains;
    finishes, finishes_with => Finishes;
    equals, equals_with => Equals;
    intersects, intersects_with => Intersects;
    disjoint, disjoint_with => Disjoint;
    touches, touches_with => Touches;
    during_or_equal, during_or_equal_with => DuringOrEqual;
    contains_or_equal, contains_or_equal_with => ContainsOrEqual;
}
