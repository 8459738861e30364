//! Four-valued truth and its combinators.
//!
//! `Maybe` and `Unknown` are different epistemic states. `Maybe` means the
//! operands are fully known ranges and some resolutions satisfy the query
//! while others do not. `Unknown` means a bound the query depends on is
//! missing altogether. The combinators below are the only way values are
//! merged. Each has its own precedence order and both are tested separately.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Truth {
    Yes,
    No,
    Maybe,
    Unknown,
}

impl Truth {
    pub const ALL: [Truth; 4] = [Truth::Yes, Truth::No, Truth::Maybe, Truth::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Truth::Yes => "YES",
            Truth::No => "NO",
            Truth::Maybe => "MAYBE",
            Truth::Unknown => "UNKNOWN",
        }
    }

    /// Swaps `Yes` and `No`; `Maybe` and `Unknown` are fixed points.
    pub fn negate(self) -> Truth {
        negate(self)
    }

    pub fn and(self, other: Truth) -> Truth {
        and(self, other)
    }

    pub fn or(self, other: Truth) -> Truth {
        or(self, other)
    }

    pub fn is_yes(self) -> bool {
        self == Truth::Yes
    }

    /// `true` for anything except a definite `No`.
    pub fn is_possible(self) -> bool {
        self != Truth::No
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value {
            Truth::Yes
        } else {
            Truth::No
        }
    }
}

/// Existential combination: `Yes` > `Unknown` > `Maybe` > `No`. Empty input is `No`.
pub fn combine_with_any<I>(values: I) -> Truth
where
    I: IntoIterator<Item = Truth>,
{
    let mut saw_unknown = false;
    let mut saw_maybe = false;
    for value in values {
        match value {
            Truth::Yes => return Truth::Yes,
            Truth::Unknown => saw_unknown = true,
            Truth::Maybe => saw_maybe = true,
            Truth::No => {}
        }
    }
    if saw_unknown {
        Truth::Unknown
    } else if saw_maybe {
        Truth::Maybe
    } else {
        Truth::No
    }
}

/// Universal combination: `No` > `Unknown` > `Maybe` > `Yes`. Empty input is `Yes`.
pub fn combine_with_all<I>(values: I) -> Truth
where
    I: IntoIterator<Item = Truth>,
{
    let mut saw_unknown = false;
    let mut saw_maybe = false;
    for value in values {
        match value {
            Truth::No => return Truth::No,
            Truth::Unknown => saw_unknown = true,
            Truth::Maybe => saw_maybe = true,
            Truth::Yes => {}
        }
    }
    if saw_unknown {
        Truth::Unknown
    } else if saw_maybe {
        Truth::Maybe
    } else {
        Truth::Yes
    }
}

pub fn negate(value: Truth) -> Truth {
    match value {
        Truth::Yes => Truth::No,
        Truth::No => Truth::Yes,
        other => other,
    }
}

pub fn and(a: Truth, b: Truth) -> Truth {
    combine_with_all([a, b])
}

pub fn or(a: Truth, b: Truth) -> Truth {
    combine_with_any([a, b])
}

/// How a relation result is combined across the members of a set or list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quantifier {
    /// Existential: the relation could hold for some member.
    #[default]
    Any,
    /// Universal: the relation holds for every member.
    All,
}

impl Quantifier {
    pub fn combine<I>(self, values: I) -> Truth
    where
        I: IntoIterator<Item = Truth>,
    {
        match self {
            Quantifier::Any => combine_with_any(values),
            Quantifier::All => combine_with_all(values),
        }
    }
}
