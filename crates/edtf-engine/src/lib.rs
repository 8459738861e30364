//! # edtf-engine
//!
//! Level-aware parsing and comparison of Extended Date/Time Format (EDTF,
//! ISO 8601-2) values.
//!
//! A string is parsed into a typed [`Edtf`] value at the lowest conformance
//! level that can express it, normalized into four-bound millisecond ranges,
//! and compared with Allen's interval relations in four-valued logic
//! (`YES`, `NO`, `MAYBE`, `UNKNOWN`), so imprecise and open-ended dates can
//! be related without guessing.
//!
//! ## Modules
//!
//! - [`parser`]: level detection, Level 0/1/2 grammars and fallback
//! - [`ast`]: the parsed value types and their canonical strings
//! - [`normalize`]: values to [`Member`]s and [`Shape`]s
//! - [`allen`]: the 13 base and 5 derived relations over members
//! - [`compare`]: relation queries on parsed values
//! - [`truth`]: four-valued truth and its combinators
//! - [`projection`]: bounds to fixed-width storage columns
//! - [`calendar`]: proleptic Gregorian arithmetic on big integers
//! - [`season`]: season codes and their month spans
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```
//! use edtf_engine::{is_before, parse, Truth};
//!
//! let decade = parse("198X", None).unwrap();
//! let year = parse("1995", None).unwrap();
//! assert_eq!(is_before(&decade, &year), Truth::Yes);
//! ```

pub mod allen;
pub mod ast;
mod bignum;
pub mod calendar;
pub mod compare;
pub mod error;
pub mod normalize;
pub mod parser;
pub mod projection;
pub mod season;
pub mod truth;

pub use allen::{evaluate, evaluate_relation, Relation};
pub use ast::{
    Atom, Date, DateTime, Edtf, Interval, Level, List, PartValue, PartialQualification,
    Precision, Qualification, Season, Set, Terminal, YearValue,
};
pub use compare::{
    contains, contains_or_equal, contains_or_equal_with, contains_with, disjoint, disjoint_with,
    during, during_or_equal, during_or_equal_with, during_with, equals, equals_with, finishes,
    finishes_with, intersects, intersects_with, is_after, is_after_with, is_before,
    is_before_with, meets, meets_with, overlaps, overlaps_with, relate, starts, starts_with,
    touches, touches_with,
};
pub use error::{ErrorCode, ParseError, ParseFailure, ProjectionError, Span, UnknownRelation};
pub use normalize::{
    convex_hull, normalize, normalize_to_convex_hull, normalize_to_members, normalize_with_options,
    BoundKind, ListMode, Member, NormalizeOptions, Qualifiers, Shape,
};
pub use parser::{detect_level, is_valid, parse, MAX_EXPONENT, MAX_RANGE_EXPANSION};
pub use projection::{project, project_member, ProjectedRow, ProjectionOptions};
pub use season::SeasonTable;
pub use truth::{combine_with_all, combine_with_any, Quantifier, Truth};
