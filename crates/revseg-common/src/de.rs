use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// Deserialize a JSON object into `(key, value)` pairs, keeping the order the keys
/// appear on the wire:
///
/// ```text
/// {"iPhone": 200.5, "Services": 85.2}  ->  [("iPhone", 200.5), ("Services", 85.2)]
/// ```
///
/// A `HashMap` would lose that order, which the chart's tie-break depends on.
pub fn de_ordered_pairs<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    deserializer.deserialize_map(OrderedPairs(PhantomData))
}

struct OrderedPairs<V>(PhantomData<V>);

impl<'de, V> Visitor<'de> for OrderedPairs<V>
where
    V: Deserialize<'de>,
{
    type Value = Vec<(String, V)>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            // repeated key: last value wins, first position is kept
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => pairs.push((key, value)),
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Wrapper {
        #[serde(deserialize_with = "de_ordered_pairs")]
        inner: Vec<(String, f64)>,
    }

    #[test]
    fn keeps_key_order() {
        let w: Wrapper = serde_json::from_str(r#"{"inner": {"z": 1, "a": 2.5, "m": -3}}"#).unwrap();
        let keys: Vec<_> = w.inner.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(w.inner[2].1, -3.0);
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let w: Wrapper = serde_json::from_str(r#"{"inner": {"a": 1, "b": 2, "a": 3}}"#).unwrap();
        assert_eq!(w.inner, vec![("a".to_string(), 3.0), ("b".to_string(), 2.0)]);
    }

    #[test]
    fn rejects_non_numeric_values() {
        let res = serde_json::from_str::<Wrapper>(r#"{"inner": {"a": "lots"}}"#);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_arrays() {
        let res = serde_json::from_str::<Wrapper>(r#"{"inner": [1, 2]}"#);
        assert!(res.is_err());
    }
}
