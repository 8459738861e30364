//! Fixed-width projection of normalized bounds for storage.
//!
//! Members carry [`BigInt`] bounds; storage columns are `i64` milliseconds.
//! [`project`] converts a [`Shape`] into rows of nullable millisecond
//! columns with open/unknown flags and a precision rank. Values outside the
//! configured range are clamped (and flagged) or rejected.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::Serialize;

use crate::error::ProjectionError;
use crate::normalize::{BoundKind, Member, Shape};

/// Largest instant, in ms, a JavaScript `Date` can hold.
pub const SAFE_MAX_MILLIS: i64 = 8_640_000_000_000_000;
pub const SAFE_MIN_MILLIS: i64 = -SAFE_MAX_MILLIS;

/// Options for [`project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionOptions {
    /// Clamp out-of-range bounds instead of failing.
    pub clamp: bool,
    pub min_millis: i64,
    pub max_millis: i64,
    /// Project a multi-member shape as its convex hull.
    pub flatten: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            clamp: true,
            min_millis: SAFE_MIN_MILLIS,
            max_millis: SAFE_MAX_MILLIS,
            flatten: true,
        }
    }
}

/// One row of storage columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedRow {
    pub s_min: Option<i64>,
    pub s_max: Option<i64>,
    pub e_min: Option<i64>,
    pub e_max: Option<i64>,
    pub start_open: bool,
    pub start_unknown: bool,
    pub end_open: bool,
    pub end_unknown: bool,
    pub precision_rank: u8,
    pub uncertain: bool,
    pub approximate: bool,
    /// At least one bound was moved into the storage range.
    pub clamped: bool,
}

/// Project a shape: one row for the hull when flattening, otherwise one
/// row per member.
///
/// # Errors
///
/// [`ProjectionError::OutOfRange`] when clamping is off and a bound falls
/// outside `[min_millis, max_millis]`.
///
/// # Examples
///
/// ```
/// use edtf_engine::{normalize, parse, project, ProjectionOptions};
///
/// let shape = normalize(&parse("1970", None).unwrap());
/// let rows = project(&shape, &ProjectionOptions::default()).unwrap();
/// assert_eq!(rows[0].s_min, Some(0));
/// assert_eq!(rows[0].e_max, Some(31_535_999_999));
/// ```
pub fn project(
    shape: &Shape,
    options: &ProjectionOptions,
) -> Result<Vec<ProjectedRow>, ProjectionError> {
    if options.flatten {
        return Ok(vec![project_member(&shape.convex_hull(), options)?]);
    }
    shape
        .members
        .iter()
        .map(|member| project_member(member, options))
        .collect()
}

/// Project one member into a fixed-width row.
///
/// Unresolved bounds (open or unknown sides) stay `None`; the side flags
/// carry which of the two it was.
///
/// # Errors
///
/// [`ProjectionError::OutOfRange`] when `options.clamp` is off and any bound
/// does not fit in `[min_millis, max_millis]`. With clamping on the bound is
/// moved to the nearer limit and `clamped` is set instead.
pub fn project_member(
    member: &Member,
    options: &ProjectionOptions,
) -> Result<ProjectedRow, ProjectionError> {
    let mut clamped = false;
    let mut column = |value: &Option<BigInt>| -> Result<Option<i64>, ProjectionError> {
        value
            .as_ref()
            .map(|v| -> Result<i64, ProjectionError> {
                let (stored, moved) = fit(v, options)?;
                clamped |= moved;
                Ok(stored)
            })
            .transpose()
    };
    let s_min = column(&member.s_min)?;
    let s_max = column(&member.s_max)?;
    let e_min = column(&member.e_min)?;
    let e_max = column(&member.e_max)?;
    let qualifiers = member.qualifiers.unwrap_or_default();
    Ok(ProjectedRow {
        s_min,
        s_max,
        e_min,
        e_max,
        start_open: member.start_kind == BoundKind::Open,
        start_unknown: member.start_kind == BoundKind::Unknown,
        end_open: member.end_kind == BoundKind::Open,
        end_unknown: member.end_kind == BoundKind::Unknown,
        precision_rank: member.precision.rank(),
        uncertain: qualifiers.uncertain,
        approximate: qualifiers.approximate,
        clamped,
    })
}

/// The stored value and whether it had to be clamped.
fn fit(value: &BigInt, options: &ProjectionOptions) -> Result<(i64, bool), ProjectionError> {
    let (min, max) = (options.min_millis, options.max_millis);
    let out_of_range = || ProjectionError::OutOfRange {
        value: value.to_string(),
        min,
        max,
    };
    match value.to_i64() {
        Some(v) if (min..=max).contains(&v) => Ok((v, false)),
        _ if !options.clamp => Err(out_of_range()),
        _ if *value < BigInt::from(min) => Ok((min, true)),
        _ => Ok((max, true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::parse;

    fn shape(input: &str) -> Shape {
        normalize(&parse(input, None).unwrap_or_else(|e| panic!("{input}: {e}")))
    }

    #[test]
    fn test_precise_year() {
        let rows = project(&shape("1970"), &ProjectionOptions::default()).unwrap();
        let row = &rows[0];
        assert_eq!((row.s_min, row.s_max), (Some(0), Some(0)));
        assert_eq!(row.e_min, row.e_max);
        assert!(!row.clamped && !row.start_open && !row.end_unknown);
        assert_eq!(row.precision_rank, crate::Precision::Year.rank());
    }

    #[test]
    fn test_open_and_unknown_flags() {
        let row = &project(&shape("1985/.."), &ProjectionOptions::default()).unwrap()[0];
        assert!(row.end_open && !row.end_unknown);
        assert_eq!((row.e_min, row.e_max), (None, None));
        let row = &project(&shape("/1985"), &ProjectionOptions::default()).unwrap()[0];
        assert!(row.start_unknown);
        assert_eq!(row.s_min, None);
    }

    #[test]
    fn test_qualifier_flags() {
        let row = &project(&shape("1984?"), &ProjectionOptions::default()).unwrap()[0];
        assert!(row.uncertain && !row.approximate);
    }

    #[test]
    fn test_flatten_and_per_member() {
        let set = shape("[1667,1668,1670]");
        assert_eq!(project(&set, &ProjectionOptions::default()).unwrap().len(), 1);
        let options = ProjectionOptions {
            flatten: false,
            ..ProjectionOptions::default()
        };
        assert_eq!(project(&set, &options).unwrap().len(), 3);
    }

    #[test]
    fn test_flattened_set_keeps_member_spread() {
        let rows = project(&shape("[1970,1972]"), &ProjectionOptions::default()).unwrap();
        let row = &rows[0];
        assert_eq!(row.s_min, Some(0));
        // 1972 starts two non-leap years after the epoch
        assert_eq!(row.s_max, Some(63_072_000_000));
        assert_eq!(row.e_min, Some(31_535_999_999));
        assert!(row.s_max > row.e_min);
    }

    #[test]
    fn test_project_member_reports_the_offending_bound() {
        let options = ProjectionOptions {
            clamp: false,
            min_millis: 0,
            max_millis: 1_000,
            ..ProjectionOptions::default()
        };
        let member = crate::normalize_to_convex_hull(&parse("1985", None).unwrap());
        match project_member(&member, &options) {
            Err(ProjectionError::OutOfRange { value, min, max }) => {
                assert_eq!(value, member.s_min.unwrap().to_string());
                assert_eq!((min, max), (0, 1_000));
            }
            other => panic!("expected out of range, got {other:?}"),
        }
    }

    #[test]
    fn test_clamping() {
        let far = shape("Y-17E7");
        let row = &project(&far, &ProjectionOptions::default()).unwrap()[0];
        assert!(row.clamped);
        assert_eq!(row.s_min, Some(SAFE_MIN_MILLIS));

        let tight = ProjectionOptions {
            min_millis: 0,
            max_millis: 1_000,
            ..ProjectionOptions::default()
        };
        let row = &project(&shape("1985"), &tight).unwrap()[0];
        assert_eq!(row.s_min, Some(1_000));
        assert!(row.clamped);
    }

    #[test]
    fn test_out_of_range_without_clamping() {
        let options = ProjectionOptions {
            clamp: false,
            ..ProjectionOptions::default()
        };
        let err = project(&shape("Y-17E7"), &options).unwrap_err();
        assert!(matches!(err, ProjectionError::OutOfRange { min: SAFE_MIN_MILLIS, .. }));
        assert!(project(&shape("1985"), &options).is_ok());
    }
}
