//! JSON rendering for big integers: a number when it fits `i64`, else a decimal string.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::Serializer;

pub(crate) fn serialize<S>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.to_i64() {
        Some(n) => serializer.serialize_i64(n),
        None => serializer.serialize_str(&value.to_string()),
    }
}

pub(crate) fn serialize_opt<S>(value: &Option<BigInt>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serialize(v, serializer),
        None => serializer.serialize_none(),
    }
}
