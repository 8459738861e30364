//! Allen's interval relations over normalized members, in four-valued logic.
//!
//! Each side of a [`Member`] is read as an edge: the range `[lo, hi]` in
//! which that instant can fall, with `-inf`/`+inf` standing in for open and
//! unknown sides. A relation is a conjunction of strict comparisons between
//! edges, each of which is
//!
//! - `YES` when every resolution satisfies it,
//! - `NO` when none does,
//! - `MAYBE` when the edges overlap and every bound involved is known,
//! - `UNKNOWN` when an unknown side is involved and the outcome is not forced.
//!
//! Open sides are infinite, not unknown. A comparison that fails because a
//! side is infinite is `NO`; one that holds only because a side is infinite
//! is `MAYBE`, so `during("1990", "1985/..")` is `MAYBE` while
//! `before("1985/..", "1990")` is `NO`.
//!
//! The derived relations are unions of base relations combined with
//! [`combine_with_any`].

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use serde::Serialize;

use crate::error::UnknownRelation;
use crate::normalize::{BoundKind, Member, Shape};
use crate::truth::{combine_with_all, combine_with_any, Quantifier, Truth};

// ── Relation ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    Before,
    After,
    Meets,
    MetBy,
    Overlaps,
    OverlappedBy,
    Starts,
    StartedBy,
    During,
    Contains,
    Finishes,
    FinishedBy,
    Equals,
    Intersects,
    Disjoint,
    Touches,
    DuringOrEqual,
    ContainsOrEqual,
}

impl Relation {
    pub const BASE: [Relation; 13] = [
        Relation::Before,
        Relation::After,
        Relation::Meets,
        Relation::MetBy,
        Relation::Overlaps,
        Relation::OverlappedBy,
        Relation::Starts,
        Relation::StartedBy,
        Relation::During,
        Relation::Contains,
        Relation::Finishes,
        Relation::FinishedBy,
        Relation::Equals,
    ];

    pub const DERIVED: [Relation; 5] = [
        Relation::Intersects,
        Relation::Disjoint,
        Relation::Touches,
        Relation::DuringOrEqual,
        Relation::ContainsOrEqual,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Relation::Before => "before",
            Relation::After => "after",
            Relation::Meets => "meets",
            Relation::MetBy => "metBy",
            Relation::Overlaps => "overlaps",
            Relation::OverlappedBy => "overlappedBy",
            Relation::Starts => "starts",
            Relation::StartedBy => "startedBy",
            Relation::During => "during",
            Relation::Contains => "contains",
            Relation::Finishes => "finishes",
            Relation::FinishedBy => "finishedBy",
            Relation::Equals => "equals",
            Relation::Intersects => "intersects",
            Relation::Disjoint => "disjoint",
            Relation::Touches => "touches",
            Relation::DuringOrEqual => "duringOrEqual",
            Relation::ContainsOrEqual => "containsOrEqual",
        }
    }

    pub fn is_base(self) -> bool {
        Relation::BASE.contains(&self)
    }

    /// The base relations a derived relation is the union of; empty for a
    /// base relation.
    pub fn components(self) -> &'static [Relation] {
        use Relation::*;
        match self {
            Intersects => &[
                Meets,
                MetBy,
                Overlaps,
                OverlappedBy,
                Starts,
                StartedBy,
                During,
                Contains,
                Finishes,
                FinishedBy,
                Equals,
            ],
            Disjoint => &[Before, After],
            Touches => &[Meets, MetBy],
            DuringOrEqual => &[During, Starts, Finishes, Equals],
            ContainsOrEqual => &[Contains, StartedBy, FinishedBy, Equals],
            _ => &[],
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Relation {
    type Err = UnknownRelation;

    /// Accepts `metBy`, `met_by`, `met-by` and `METBY` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Relation::BASE
            .into_iter()
            .chain(Relation::DERIVED)
            .find(|r| r.name().to_lowercase() == key)
            .ok_or_else(|| UnknownRelation(s.to_string()))
    }
}

// ── Edges ───────────────────────────────────────────────────────────────────

/// An instant on the extended time line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Ext {
    NegInf,
    Finite(BigInt),
    PosInf,
}

/// The possible range of one side of a member.
#[derive(Debug, Clone)]
struct Edge {
    lo: Ext,
    hi: Ext,
    kind: BoundKind,
}

impl Edge {
    fn is_unknown(&self) -> bool {
        self.kind == BoundKind::Unknown
    }

    fn is_open(&self) -> bool {
        self.kind == BoundKind::Open
    }

    fn is_point(&self) -> bool {
        self.kind == BoundKind::Closed && self.lo == self.hi
    }
}

struct Ends {
    start: Edge,
    end: Edge,
}

fn finite(value: &Option<BigInt>, side: &str) -> Ext {
    match value {
        Some(v) => Ext::Finite(v.clone()),
        None => panic!("closed member is missing its {side} bound"),
    }
}

impl Ends {
    fn of(m: &Member) -> Self {
        let start = match m.start_kind {
            BoundKind::Closed => Edge {
                lo: finite(&m.s_min, "s_min"),
                hi: finite(&m.s_max, "s_max"),
                kind: BoundKind::Closed,
            },
            BoundKind::Open => Edge {
                lo: Ext::NegInf,
                hi: Ext::NegInf,
                kind: BoundKind::Open,
            },
            // an unknown start still cannot come after the latest end
            BoundKind::Unknown => Edge {
                lo: Ext::NegInf,
                hi: m.e_max.clone().map_or(Ext::PosInf, Ext::Finite),
                kind: BoundKind::Unknown,
            },
        };
        let end = match m.end_kind {
            BoundKind::Closed => Edge {
                lo: finite(&m.e_min, "e_min"),
                hi: finite(&m.e_max, "e_max"),
                kind: BoundKind::Closed,
            },
            BoundKind::Open => Edge {
                lo: Ext::PosInf,
                hi: Ext::PosInf,
                kind: BoundKind::Open,
            },
            BoundKind::Unknown => Edge {
                lo: m.s_min.clone().map_or(Ext::NegInf, Ext::Finite),
                hi: Ext::PosInf,
                kind: BoundKind::Unknown,
            },
        };
        Ends { start, end }
    }
}

/// `x < y`.
fn lt(x: &Edge, y: &Edge) -> Truth {
    let unknown = x.is_unknown() || y.is_unknown();
    if x.lo >= y.hi {
        return Truth::No;
    }
    if x.hi < y.lo && !x.is_open() && !y.is_open() {
        return Truth::Yes;
    }
    if unknown {
        Truth::Unknown
    } else {
        Truth::Maybe
    }
}

/// `x == y`.
fn eq(x: &Edge, y: &Edge) -> Truth {
    if x.hi < y.lo || y.hi < x.lo {
        return Truth::No;
    }
    if x.is_point() && y.is_point() {
        return Truth::Yes;
    }
    if x.is_unknown() || y.is_unknown() {
        Truth::Unknown
    } else {
        Truth::Maybe
    }
}

#[derive(Clone, Copy)]
enum Cmp {
    Lt,
    Eq,
}

/// Conjunction of edge comparisons. A `MAYBE` that leans on an unknown
/// side is reported as `UNKNOWN`.
fn all(terms: &[(Cmp, &Edge, &Edge)]) -> Truth {
    let truth = combine_with_all(terms.iter().map(|(cmp, x, y)| match cmp {
        Cmp::Lt => lt(x, y),
        Cmp::Eq => eq(x, y),
    }));
    let unknown = terms.iter().any(|(_, x, y)| x.is_unknown() || y.is_unknown());
    if truth == Truth::Maybe && unknown {
        Truth::Unknown
    } else {
        truth
    }
}

// ── Evaluation ──────────────────────────────────────────────────────────────

/// Evaluate `a relation b` on two members.
///
/// # Panics
///
/// Panics when a side marked `Closed` is missing a bound value.
pub fn evaluate(a: &Member, b: &Member, relation: Relation) -> Truth {
    if !relation.is_base() {
        return combine_with_any(
            relation
                .components()
                .iter()
                .map(|r| evaluate(a, b, *r)),
        );
    }
    let Ends {
        start: a_s,
        end: a_e,
    } = Ends::of(a);
    let Ends {
        start: b_s,
        end: b_e,
    } = Ends::of(b);
    use Cmp::{Eq, Lt};
    match relation {
        Relation::Before => all(&[(Lt, &a_e, &b_s)]),
        Relation::After => all(&[(Lt, &b_e, &a_s)]),
        Relation::Meets => all(&[(Eq, &a_e, &b_s)]),
        Relation::MetBy => all(&[(Eq, &b_e, &a_s)]),
        Relation::Overlaps => all(&[(Lt, &a_s, &b_s), (Lt, &b_s, &a_e), (Lt, &a_e, &b_e)]),
        Relation::OverlappedBy => all(&[(Lt, &b_s, &a_s), (Lt, &a_s, &b_e), (Lt, &b_e, &a_e)]),
        Relation::Starts => all(&[(Eq, &a_s, &b_s), (Lt, &a_e, &b_e)]),
        Relation::StartedBy => all(&[(Eq, &a_s, &b_s), (Lt, &b_e, &a_e)]),
        Relation::During => all(&[(Lt, &b_s, &a_s), (Lt, &a_e, &b_e)]),
        Relation::Contains => all(&[(Lt, &a_s, &b_s), (Lt, &b_e, &a_e)]),
        Relation::Finishes => all(&[(Eq, &a_e, &b_e), (Lt, &b_s, &a_s)]),
        Relation::FinishedBy => all(&[(Eq, &a_e, &b_e), (Lt, &a_s, &b_s)]),
        Relation::Equals => all(&[(Eq, &a_s, &b_s), (Eq, &a_e, &b_e)]),
        derived => unreachable!("{derived} is not a base relation"),
    }
}

/// Evaluate a relation between two shapes.
///
/// For each member of `a`, the results against every member of `b` are
/// combined with `quantifier_b`; those per-member results are then
/// combined with `quantifier_a`.
pub fn evaluate_relation(
    a: &Shape,
    b: &Shape,
    relation: Relation,
    quantifier_a: Quantifier,
    quantifier_b: Quantifier,
) -> Truth {
    quantifier_a.combine(a.members.iter().map(|ma| {
        quantifier_b.combine(b.members.iter().map(|mb| evaluate(ma, mb, relation)))
    }))
}

macro_rules! member_relations {
    ($($name:ident => $relation:ident),* $(,)?) => {
        $(
            #[doc = concat!("`a ", stringify!($name), " b` on two members.")]
            pub fn $name(a: &Member, b: &Member) -> Truth {
                evaluate(a, b, Relation::$relation)
            }
        )*
    };
}

member_relations! {
    before => Before,
    after => After,
    meets => Meets,
    met_by => MetBy,
    overlaps => Overlaps,
    overlapped_by => OverlappedBy,
    starts => Starts,
    started_by => StartedBy,
    during => During,
    contains => Contains,
    finishes => Finishes,
    finished_by => FinishedBy,
    equals => Equals,
    intersects => Intersects,
    disjoint => Disjoint,
    touches => Touches,
    during_or_equal => DuringOrEqual,
    contains_or_equal => ContainsOrEqual,
}
