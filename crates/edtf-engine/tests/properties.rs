//! Property tests: round-trips, truth laws and Allen relation invariants.

use edtf_engine::{
    allen, combine_with_all, combine_with_any, during_or_equal, normalize_to_convex_hull, parse,
    Member, Precision, Relation, Truth,
};
use num_bigint::BigInt;
use proptest::prelude::*;

fn truth() -> impl Strategy<Value = Truth> {
    prop::sample::select(Truth::ALL.to_vec())
}

fn qualifier() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "", "?", "~", "%"])
}

/// Level 0/1 dates: `YYYY[-MM[-DD]]` with an optional trailing qualifier.
fn date_string() -> impl Strategy<Value = String> {
    let parts = (
        1000u32..=2999,
        prop::option::of(1u32..=12),
        1u32..=28,
        any::<bool>(),
        qualifier(),
    );
    parts.prop_map(|(year, month, day, with_day, q)| match month {
        Some(m) if with_day => format!("{year:04}-{m:02}-{day:02}{q}"),
        Some(m) => format!("{year:04}-{m:02}{q}"),
        None => format!("{year:04}{q}"),
    })
}

/// Placeholders in the year, month or day, optionally qualified.
fn masked_date() -> impl Strategy<Value = String> {
    let masked = prop_oneof![
        (100u32..=299).prop_map(|y| format!("{y}X")),
        (10u32..=29).prop_map(|y| format!("{y}XX")),
        (1000u32..=2999).prop_map(|y| format!("{y}-XX")),
        (1000u32..=2999).prop_map(|y| format!("{y}-XX-XX")),
        (1000u32..=2999).prop_map(|y| format!("{y}-1X")),
        (1000u32..=2999, 1u32..=12).prop_map(|(y, m)| format!("{y}-{m:02}-XX")),
        (100u32..=299, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| format!("{y}X-{m:02}-{d:02}")),
    ];
    (masked, qualifier()).prop_map(|(date, q)| format!("{date}{q}"))
}

/// Qualifiers on single components: `2004?-06-~11`, `?2004-06`, `2004-06%-11`.
fn component_qualified_date() -> impl Strategy<Value = String> {
    let q = || prop::sample::select(vec!["?", "~", "%"]);
    (1000u32..=2999, 1u32..=12, 1u32..=28, q(), q(), 0u8..4).prop_map(
        |(y, m, d, a, b, form)| match form {
            0 => format!("{y}{a}-{m:02}-{b}{d:02}"),
            1 => format!("{a}{y}-{m:02}"),
            2 => format!("{y}-{a}{m:02}-{d:02}"),
            _ => format!("{y}-{m:02}{a}-{b}{d:02}"),
        },
    )
}

/// `Y` years, exponents and negative years.
fn extended_year() -> impl Strategy<Value = String> {
    let sign = || prop::sample::select(vec!["", "-"]);
    prop_oneof![
        (sign(), 10_000u64..=999_999_999).prop_map(|(s, n)| format!("Y{s}{n}")),
        (sign(), 1u32..=99, 1u32..=9).prop_map(|(s, m, e)| format!("Y{s}{m}E{e}")),
        (1u32..=9999).prop_map(|y| format!("-{y:04}")),
        (1u32..=9999, 1u32..=12).prop_map(|(y, m)| format!("-{y:04}-{m:02}")),
    ]
}

/// Significant-digit hints on plain and extended years.
fn significant_year() -> impl Strategy<Value = String> {
    prop_oneof![
        (1000u32..=2999, 1u32..=4).prop_map(|(y, s)| format!("{y}S{s}")),
        (10_000u64..=999_999, 1u32..=6).prop_map(|(y, s)| format!("Y{y}S{s}")),
        (1u32..=99, 1u32..=9, 1u32..=3).prop_map(|(m, e, s)| format!("Y{m}E{e}S{s}")),
    ]
}

/// Complete date-times with or without seconds and a UTC offset.
fn date_time() -> impl Strategy<Value = String> {
    let offset = prop_oneof![
        Just(String::new()),
        Just("Z".to_string()),
        (prop::sample::select(vec!["+", "-"]), 0u32..=23, 0u32..=59)
            .prop_map(|(s, h, m)| format!("{s}{h:02}:{m:02}")),
        (prop::sample::select(vec!["+", "-"]), 0u32..=23).prop_map(|(s, h)| format!("{s}{h:02}")),
        (0u32..=23, 0u32..=59).prop_map(|(h, m)| format!("+{h:02}{m:02}")),
    ];
    let clock = (0u32..=23, 0u32..=59, prop::option::of(0u32..=59));
    (1000u32..=2999, 1u32..=12, 1u32..=28, clock, offset).prop_map(
        |(y, mo, d, (h, mi, sec), tz)| {
            let seconds = sec.map(|s| format!(":{s:02}")).unwrap_or_default();
            format!("{y}-{mo:02}-{d:02}T{h:02}:{mi:02}{seconds}{tz}")
        },
    )
}

/// A single date, date-time or season in any supported syntax.
fn atom_string() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => date_string(),
        2 => masked_date(),
        2 => component_qualified_date(),
        1 => extended_year(),
        1 => significant_year(),
        1 => date_time(),
        1 => (1000u32..=2999, 21u32..=41, qualifier()).prop_map(|(y, s, q)| format!("{y}-{s}{q}")),
    ]
}

/// Set or list members, including small `a..b` ranges.
fn member_string() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => atom_string(),
        1 => (1000u32..=2999, 0u32..5).prop_map(|(a, n)| format!("{a}..{}", a + n)),
        1 => (1000u32..=2999, 1u32..=12, 0u32..3).prop_map(|(y, m, n)| {
            format!("{y}-{m:02}..{y}-{:02}", (m + n).min(12))
        }),
    ]
}

fn collection_string() -> impl Strategy<Value = String> {
    let members = prop::collection::vec(member_string(), 1..4);
    (members, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(values, list, earlier, later)| {
            let (open, close) = if list { ("{", "}") } else { ("[", "]") };
            let earlier = if earlier { ".." } else { "" };
            let later = if later { ".." } else { "" };
            format!("{open}{earlier}{}{later}{close}", values.join(","))
        },
    )
}

fn edtf_string() -> impl Strategy<Value = String> {
    prop_oneof![
        atom_string(),
        (atom_string(), atom_string()).prop_map(|(a, b)| format!("{a}/{b}")),
        atom_string().prop_map(|a| format!("{a}/..")),
        atom_string().prop_map(|a| format!("../{a}")),
        atom_string().prop_map(|a| format!("/{a}")),
        atom_string().prop_map(|a| format!("{a}/")),
        collection_string(),
    ]
}

/// A precise, non-degenerate member from two distinct instants.
fn precise_member() -> impl Strategy<Value = Member> {
    (-1_000_000i64..1_000_000, 1i64..1_000_000).prop_map(|(start, width)| {
        Member::exact(
            BigInt::from(start),
            BigInt::from(start + width),
            Precision::Minute,
        )
    })
}

proptest! {
    // ── round-trip ──────────────────────────────────────────────────────

    #[test]
    fn prop_canonical_string_reparses_to_same_value(input in edtf_string()) {
        // rejected inputs such as reversed intervals are skipped
        if let Ok(value) = parse(&input, None) {
            let reparsed = parse(&value.to_string(), None).unwrap();
            prop_assert_eq!(reparsed, value);
        }
    }

    #[test]
    fn prop_plain_dates_always_parse(input in date_string()) {
        prop_assert!(parse(&input, None).is_ok());
    }

    #[test]
    fn prop_extended_syntax_always_parses(
        input in prop_oneof![
            masked_date(),
            component_qualified_date(),
            extended_year(),
            date_time(),
        ]
    ) {
        let value = parse(&input, None);
        prop_assert!(value.is_ok(), "{}: {:?}", input, value);
    }

    // ── truth laws ──────────────────────────────────────────────────────

    #[test]
    fn prop_double_negation(t in truth()) {
        prop_assert_eq!(t.negate().negate(), t);
    }

    #[test]
    fn prop_combinators_ignore_order(values in prop::collection::vec(truth(), 0..6)) {
        let mut reversed = values.clone();
        reversed.reverse();
        prop_assert_eq!(combine_with_any(values.clone()), combine_with_any(reversed.clone()));
        prop_assert_eq!(combine_with_all(values), combine_with_all(reversed));
    }

    // ── allen ───────────────────────────────────────────────────────────

    #[test]
    fn prop_exactly_one_base_relation(a in precise_member(), b in precise_member()) {
        let results: Vec<Truth> = Relation::BASE
            .iter()
            .map(|r| allen::evaluate(&a, &b, *r))
            .collect();
        prop_assert_eq!(results.iter().filter(|t| **t == Truth::Yes).count(), 1);
        prop_assert!(results.iter().all(|t| *t == Truth::Yes || *t == Truth::No));
    }

    #[test]
    fn prop_relations_have_converses(a in precise_member(), b in precise_member()) {
        let pairs = [
            (Relation::Before, Relation::After),
            (Relation::Meets, Relation::MetBy),
            (Relation::Overlaps, Relation::OverlappedBy),
            (Relation::Starts, Relation::StartedBy),
            (Relation::During, Relation::Contains),
            (Relation::Finishes, Relation::FinishedBy),
            (Relation::Equals, Relation::Equals),
        ];
        for (r, converse) in pairs {
            prop_assert_eq!(allen::evaluate(&a, &b, r), allen::evaluate(&b, &a, converse));
        }
    }

    #[test]
    fn prop_masked_decade_contains_its_years(year in 1000u32..=2999) {
        let concrete = parse(&year.to_string(), None).unwrap();
        let masked = parse(&format!("{}X", year / 10), None).unwrap();
        let truth = during_or_equal(&concrete, &masked);
        prop_assert!(truth == Truth::Maybe || truth == Truth::Yes);

        let (c, m) = (normalize_to_convex_hull(&concrete), normalize_to_convex_hull(&masked));
        prop_assert!(m.s_min <= c.s_min && c.e_max <= m.e_max);
    }

    #[test]
    fn prop_unknown_end_is_never_maybe(year in 1000u32..=2999, other in 1000u32..=2999) {
        let a = parse(&format!("{year}/"), None).unwrap();
        let b = normalize_to_convex_hull(&parse(&other.to_string(), None).unwrap());
        let a = normalize_to_convex_hull(&a);
        let relations = [
            Relation::Before,
            Relation::Meets,
            Relation::Overlaps,
            Relation::Starts,
            Relation::During,
            Relation::Finishes,
            Relation::Equals,
        ];
        for r in relations {
            prop_assert_ne!(allen::evaluate(&a, &b, r), Truth::Maybe);
        }
    }
}
