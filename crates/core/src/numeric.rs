//! Type coercion for numbers and text arriving from form input or from
//! stored rows written by older page versions.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

/// Coerce user-entered text to a number. Blank, unparsable and non-finite
/// input all become `0.0`.
pub fn coerce_number(input: &str) -> f64 {
    finite_or_zero(input.trim().parse::<f64>().unwrap_or(0.0))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

struct LenientNumber;

impl<'de> Visitor<'de> for LenientNumber {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value, read as a number")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(finite_or_zero(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<f64, E> {
        Ok(if v { 1.0 } else { 0.0 })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        Ok(coerce_number(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_none<E: de::Error>(self) -> Result<f64, E> {
        Ok(0.0)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<f64, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(0.0)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<f64, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(0.0)
    }
}

/// `deserialize_with` target for numeric record fields.
pub fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    deserializer.deserialize_any(LenientNumber)
}

struct LenientText;

impl<'de> Visitor<'de> for LenientText {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value, read as text")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_unit<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<String, E> {
        Ok(String::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<String, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(String::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<String, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(String::new())
    }
}

/// `deserialize_with` target for text record fields.
pub fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(LenientText)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_blank_and_garbage_to_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
    }

    #[test]
    fn coerce_trims_and_parses() {
        assert_eq!(coerce_number(" 2.5 "), 2.5);
        assert_eq!(coerce_number("-4"), -4.0);
        assert_eq!(coerce_number("1e3"), 1000.0);
    }

    #[derive(serde::Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_number")]
        n: f64,
        #[serde(default, deserialize_with = "lenient_text")]
        s: String,
    }

    #[test]
    fn lenient_fields_accept_mixed_json() {
        let rows: Vec<Row> = serde_json::from_str(
            r#"[{"n": 3, "s": "a"}, {"n": "4.5", "s": 7}, {"n": null, "s": null}, {"n": ""}, {}]"#,
        )
        .unwrap();
        let ns: Vec<f64> = rows.iter().map(|r| r.n).collect();
        assert_eq!(ns, vec![3.0, 4.5, 0.0, 0.0, 0.0]);
        assert_eq!(rows[1].s, "7");
        assert_eq!(rows[2].s, "");
        assert_eq!(rows[4].s, "");
    }

    #[test]
    fn nested_values_read_as_zero_or_blank() {
        let rows: Vec<Row> = serde_json::from_str(
            r#"[{"n": {"v": 2}, "s": ["a", "b"]}, {"n": [1, 2], "s": {"k": {"deep": [1]}}}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].n, 0.0);
        assert_eq!(rows[0].s, "");
        assert_eq!(rows[1].n, 0.0);
        assert_eq!(rows[1].s, "");
    }
}
