//! Normalization of parsed values into four-bound ranges.
//!
//! Every [`Edtf`] value becomes a [`Shape`]: one or more [`Member`]s, each a
//! range whose start lies in `[s_min, s_max]` and whose end lies in
//! `[e_min, e_max]`, all in milliseconds since 1970-01-01T00:00:00Z as
//! [`BigInt`]s.
//!
//! For a value without placeholders the bounds collapse to `s_min == s_max`
//! and `e_min == e_max`. Placeholders widen them to the earliest and latest
//! resolutions, so a masked date may have `s_max > e_min` (`1985-XX` can
//! start in December and end in January). A convex hull over several
//! members relaxes the same way. What always holds for a closed
//! member is `s_min <= s_max`, `e_min <= e_max`, `s_min <= e_min` and
//! `s_max <= e_max`.
//!
//! # Functions
//!
//! - [`normalize`] / [`normalize_with_options`]: value to [`Shape`]
//! - [`normalize_to_members`]: the members alone
//! - [`normalize_to_convex_hull`]: one member covering the whole shape

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::Serialize;
use tracing::trace;

use crate::allen::Ext;
use crate::ast::{
    Atom, Date, DateTime as DateTimeNode, Edtf, Interval, Precision, Qualification, Season,
    Terminal,
};
use crate::calendar;
use crate::season::SeasonTable;

// ── Types ───────────────────────────────────────────────────────────────────

/// What is known about one side of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundKind {
    /// Both bound values are present.
    Closed,
    /// Unbounded (`..`): extends without limit in that direction.
    Open,
    /// The side exists but nothing is known about it.
    Unknown,
}

/// Uncertainty flags merged from every qualifier that contributed to a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Qualifiers {
    pub uncertain: bool,
    pub approximate: bool,
}

impl Qualifiers {
    /// Merge qualifiers; `None` when nothing is uncertain or approximate.
    pub fn any_of<I>(qualifications: I) -> Option<Qualifiers>
    where
        I: IntoIterator<Item = Qualification>,
    {
        let merged = qualifications
            .into_iter()
            .fold(Qualifiers::default(), |acc, q| Qualifiers {
                uncertain: acc.uncertain || q.is_uncertain(),
                approximate: acc.approximate || q.is_approximate(),
            });
        (merged.uncertain || merged.approximate).then_some(merged)
    }

    fn union(a: Option<Qualifiers>, b: Option<Qualifiers>) -> Option<Qualifiers> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Qualifiers {
                uncertain: a.uncertain || b.uncertain,
                approximate: a.approximate || b.approximate,
            }),
            (a, b) => a.or(b),
        }
    }
}

/// A normalized range with four bounds.
///
/// Bounds are `None` exactly when the corresponding kind is not `Closed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    #[serde(serialize_with = "crate::bignum::serialize_opt")]
    pub s_min: Option<BigInt>,
    #[serde(serialize_with = "crate::bignum::serialize_opt")]
    pub s_max: Option<BigInt>,
    #[serde(serialize_with = "crate::bignum::serialize_opt")]
    pub e_min: Option<BigInt>,
    #[serde(serialize_with = "crate::bignum::serialize_opt")]
    pub e_max: Option<BigInt>,
    pub start_kind: BoundKind,
    pub end_kind: BoundKind,
    pub precision: Precision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<Qualifiers>,
}

impl Member {
    /// A member with both sides closed.
    pub fn closed(
        s_min: BigInt,
        s_max: BigInt,
        e_min: BigInt,
        e_max: BigInt,
        precision: Precision,
    ) -> Self {
        Self {
            s_min: Some(s_min),
            s_max: Some(s_max),
            e_min: Some(e_min),
            e_max: Some(e_max),
            start_kind: BoundKind::Closed,
            end_kind: BoundKind::Closed,
            precision,
            qualifiers: None,
        }
    }

    /// A precise range: start and end are single instants.
    pub fn exact(start: BigInt, end: BigInt, precision: Precision) -> Self {
        Self::closed(start.clone(), start, end.clone(), end, precision)
    }

    pub fn with_qualifiers(mut self, qualifiers: Option<Qualifiers>) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.start_kind == BoundKind::Closed && self.end_kind == BoundKind::Closed
    }
}

/// How the members of a multi-member shape combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ListMode {
    /// Set: exactly one member applies.
    OneOf,
    /// List: every member applies.
    AllOf,
}

/// The normalized form of a whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub members: Vec<Member>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_mode: Option<ListMode>,
}

impl Shape {
    pub fn single(member: Member) -> Self {
        Self {
            members: vec![member],
            list_mode: None,
        }
    }

    /// One member covering every member of this shape.
    pub fn convex_hull(&self) -> Member {
        convex_hull(&self.members)
    }
}

/// Options for [`normalize_with_options`].
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Calendar month span of each season code.
    pub seasons: SeasonTable,
}

// ── normalize ───────────────────────────────────────────────────────────────

/// Normalize a value with the default season table.
///
/// # Panics
///
/// Panics on values no parser can produce: a date with no calendar
/// resolution (`1985-02-30` built by hand) or a season code outside the
/// season table.
///
/// # Examples
///
/// ```
/// use edtf_engine::{normalize, parse, ListMode};
///
/// let shape = normalize(&parse("[1667..1669]", None).unwrap());
/// assert_eq!(shape.members.len(), 3);
/// assert_eq!(shape.list_mode, Some(ListMode::OneOf));
/// ```
pub fn normalize(value: &Edtf) -> Shape {
    normalize_with_options(value, &NormalizeOptions::default())
}

/// Normalize a value with explicit options.
pub fn normalize_with_options(value: &Edtf, options: &NormalizeOptions) -> Shape {
    let shape = match value {
        Edtf::Date(d) => Shape::single(date_member(d)),
        Edtf::DateTime(dt) => Shape::single(date_time_member(dt)),
        Edtf::Season(s) => Shape::single(season_member(s, &options.seasons)),
        Edtf::Interval(i) => Shape::single(interval_member(i, options)),
        Edtf::Set(set) => Shape {
            members: set.values.iter().map(|a| atom_member(a, options)).collect(),
            list_mode: Some(ListMode::OneOf),
        },
        Edtf::List(list) => Shape {
            members: list.values.iter().map(|a| atom_member(a, options)).collect(),
            list_mode: Some(ListMode::AllOf),
        },
    };
    trace!(value = %value, members = shape.members.len(), "normalized EDTF value");
    shape
}

/// The members of a value, without the list mode.
///
/// A single date, date-time, season or interval gives one member; a set or
/// list gives one per element, with `..` ranges expanded.
///
/// # Examples
///
/// ```
/// use edtf_engine::{normalize_to_members, parse};
///
/// let members = normalize_to_members(&parse("[1667,1670..1672]", None).unwrap());
/// assert_eq!(members.len(), 4);
/// ```
pub fn normalize_to_members(value: &Edtf) -> Vec<Member> {
    normalize(value).members
}

/// One member covering every member of a value. See [`convex_hull`].
///
/// # Examples
///
/// ```
/// use edtf_engine::{normalize_to_convex_hull, normalize_to_members, parse};
///
/// let value = parse("[1667,1669]", None).unwrap();
/// let members = normalize_to_members(&value);
/// let hull = normalize_to_convex_hull(&value);
/// assert_eq!(hull.s_min, members[0].s_min);
/// assert_eq!(hull.s_max, members[1].s_max);
/// assert_eq!(hull.e_min, members[0].e_min);
/// assert_eq!(hull.e_max, members[1].e_max);
/// ```
pub fn normalize_to_convex_hull(value: &Edtf) -> Member {
    normalize(value).convex_hull()
}

/// The member of a single calendar value.
pub(crate) fn atom_member(atom: &Atom, options: &NormalizeOptions) -> Member {
    match atom {
        Atom::Date(d) => date_member(d),
        Atom::DateTime(dt) => date_time_member(dt),
        Atom::Season(s) => season_member(s, &options.seasons),
    }
}

/// Seconds collapse into the enclosing minute.
fn date_time_member(dt: &DateTimeNode) -> Member {
    let start = dt.minute_start_millis();
    let end = &start + (calendar::MILLIS_PER_MINUTE - 1);
    Member::exact(start, end, Precision::Minute)
}

fn date_member(date: &Date) -> Member {
    let Some((earliest, latest)) = date.extremes() else {
        panic!("date '{date}' has no calendar resolution");
    };
    let qualifications = date
        .qualification
        .into_iter()
        .chain(date.partial.iter().flat_map(|p| p.iter()));
    Member::closed(
        earliest.start_millis(),
        latest.start_millis(),
        earliest.end_millis(),
        latest.end_millis(),
        date.precision(),
    )
    .with_qualifiers(Qualifiers::any_of(qualifications))
}

fn season_member(season: &Season, table: &SeasonTable) -> Member {
    let Some(span) = table.span(season.season) else {
        panic!("season code {} is not in the season table", season.season);
    };
    let end_year = if span.crosses_year() {
        &season.year + 1u32
    } else {
        season.year.clone()
    };
    Member::exact(
        calendar::month_start_millis(&season.year, span.start_month),
        calendar::month_end_millis(&end_year, span.end_month),
        Precision::Subyear,
    )
    .with_qualifiers(Qualifiers::any_of(season.qualification))
}

fn interval_member(interval: &Interval, options: &NormalizeOptions) -> Member {
    let side = |terminal: &Terminal| match terminal {
        Terminal::Value(atom) => (BoundKind::Closed, Some(atom_member(atom, options))),
        Terminal::Open => (BoundKind::Open, None),
        Terminal::Unknown => (BoundKind::Unknown, None),
    };
    let (start_kind, start) = side(&interval.start);
    let (end_kind, end) = side(&interval.end);
    let precision = match (&start, &end) {
        (Some(s), Some(e)) => s.precision.merge(e.precision),
        _ => Precision::Unknown,
    };
    let (s_min, s_max) = start.map_or((None, None), |m| (m.s_min, m.s_max));
    let (e_min, e_max) = end.map_or((None, None), |m| (m.e_min, m.e_max));
    Member {
        s_min,
        s_max,
        e_min,
        e_max,
        start_kind,
        end_kind,
        precision,
        qualifiers: Qualifiers::any_of(interval.qualification),
    }
}

// ── Convex hull ─────────────────────────────────────────────────────────────

/// Collapse members into one that spans all of them.
///
/// Each bound is the minimum or maximum of the matching member bounds: the
/// start lies anywhere from the earliest member start to the latest one, and
/// likewise for the end. Not knowing which member applies therefore stays
/// visible as uncertainty, while gaps between members are lost. A single
/// member is returned unchanged. With no members the result is unknown on
/// both sides.
pub fn convex_hull(members: &[Member]) -> Member {
    if let [only] = members {
        return only.clone();
    }
    if members.is_empty() {
        return Member {
            s_min: None,
            s_max: None,
            e_min: None,
            e_max: None,
            start_kind: BoundKind::Unknown,
            end_kind: BoundKind::Unknown,
            precision: Precision::Unknown,
            qualifiers: None,
        };
    }
    let min_of = |f: fn(&Member) -> &Option<BigInt>| {
        members.iter().filter_map(|m| f(m).clone()).min()
    };
    let max_of = |f: fn(&Member) -> &Option<BigInt>| {
        members.iter().filter_map(|m| f(m).clone()).max()
    };
    let kind = |f: fn(&Member) -> BoundKind| {
        if members.iter().any(|m| f(m) == BoundKind::Open) {
            BoundKind::Open
        } else if members.iter().any(|m| f(m) == BoundKind::Unknown) {
            BoundKind::Unknown
        } else {
            BoundKind::Closed
        }
    };
    let start_kind = kind(|m| m.start_kind);
    let end_kind = kind(|m| m.end_kind);
    let closed = |k: BoundKind, v: Option<BigInt>| if k == BoundKind::Closed { v } else { None };
    Member {
        s_min: closed(start_kind, min_of(|m| &m.s_min)),
        s_max: closed(start_kind, max_of(|m| &m.s_max)),
        e_min: closed(end_kind, min_of(|m| &m.e_min)),
        e_max: closed(end_kind, max_of(|m| &m.e_max)),
        start_kind,
        end_kind,
        precision: Precision::Mixed,
        qualifiers: members
            .iter()
            .fold(None, |acc, m| Qualifiers::union(acc, m.qualifiers)),
    }
}

// ── Naive ordering ──────────────────────────────────────────────────────────

impl Edtf {
    /// Earliest possible instant of this value as a `chrono` timestamp.
    ///
    /// This is a lossy view: `None` when the start is open or unknown, or
    /// when the instant is outside what `chrono` can represent.
    pub fn min(&self) -> Option<DateTime<Utc>> {
        normalize_to_convex_hull(self)
            .s_min
            .as_ref()
            .and_then(calendar::millis_to_datetime)
    }

    /// Latest possible instant of this value; lossy like [`Edtf::min`].
    pub fn max(&self) -> Option<DateTime<Utc>> {
        normalize_to_convex_hull(self)
            .e_max
            .as_ref()
            .and_then(calendar::millis_to_datetime)
    }

    /// Order two values by earliest start, then latest end.
    ///
    /// Exact on arbitrary years. An open or unknown start sorts before any
    /// date, an open or unknown end after any date.
    pub fn naive_cmp(&self, other: &Edtf) -> Ordering {
        let a = normalize_to_convex_hull(self);
        let b = normalize_to_convex_hull(other);
        let start = |m: &Member| match &m.s_min {
            Some(v) => Ext::Finite(v.clone()),
            None => Ext::NegInf,
        };
        let end = |m: &Member| match &m.e_max {
            Some(v) => Ext::Finite(v.clone()),
            None => Ext::PosInf,
        };
        start(&a)
            .cmp(&start(&b))
            .then_with(|| end(&a).cmp(&end(&b)))
    }
}
