//! Shared serde helper functions for the diff wire format.

use serde::de::{Deserialize, Deserializer, Error, IgnoredAny, MapAccess, SeqAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// Serde default function that returns `true`.
///
/// Used for `nullable`, which SQL treats as the default for a column.
pub fn default_true() -> bool {
    true
}

/// Deserialize an ordered sequence that may be bare or `items`-wrapped.
///
/// Some engine builds serialize their growable lists as `{"items": [...],
/// "capacity": N}` instead of a plain array. Any field other than `items`
/// is ignored, and `null` yields an empty sequence. Errors inside an element
/// are reported as-is.
pub fn ordered_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserializer.deserialize_option(OrderedSeqVisitor(PhantomData))
}

struct OrderedSeqVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for OrderedSeqVisitor<T>
where
    T: Deserialize<'de>,
{
    type Value = Vec<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list, or an object with an `items` list")
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(items)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut items: Option<Vec<T>> = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "items" {
                if items.is_some() {
                    return Err(A::Error::duplicate_field("items"));
                }
                items = Some(map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(items.unwrap_or_default())
    }
}
