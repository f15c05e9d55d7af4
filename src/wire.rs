//! Wire shape for operations.
//!
//! An operation travels as an ordered list where each element is one of:
//!
//! - a positive integer: retain that many characters;
//! - a non-empty string: insert that text;
//! - a single-field map `{"d": n}` with `n` positive: delete `n`
//!   characters.
//!
//! So `[1, "ab", {"d": 2}]` retains one character, inserts `"ab"`, and
//! deletes two. The impls here are format-agnostic serde; the tests pin
//! the JSON rendering, which is the interchange contract with the
//! transport. Decoding is strict - zero or negative lengths, empty
//! strings, and unknown map shapes are errors - and a decoded operation
//! is normalized, so the wire shape round-trips through normalization
//! without semantic change.

use std::fmt;

use serde::de;
use serde::de::Deserializer;
use serde::de::MapAccess;
use serde::de::SeqAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;
use serde::ser::Serializer;
use serde::Deserialize;
use serde::Serialize;

use crate::op::normalize;
use crate::op::Component;
use crate::op::Operation;

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        return match self {
            Component::Retain(n) => serializer.serialize_u64(*n as u64),
            Component::Insert(text) => serializer.serialize_str(text),
            Component::Delete(n) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("d", &(*n as u64))?;
                map.end()
            }
        };
    }
}

struct ComponentVisitor;

impl<'de> Visitor<'de> for ComponentVisitor {
    type Value = Component;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return f.write_str(
            "a positive integer (retain), a non-empty string (insert), \
             or a {\"d\": n} map (delete)",
        );
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<Component, E> {
        if n == 0 {
            return Err(E::invalid_value(
                de::Unexpected::Unsigned(n),
                &"a positive retain count",
            ));
        }
        return Ok(Component::Retain(n as usize));
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<Component, E> {
        if n <= 0 {
            return Err(E::invalid_value(
                de::Unexpected::Signed(n),
                &"a positive retain count",
            ));
        }
        return self.visit_u64(n as u64);
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Component, E> {
        if text.is_empty() {
            return Err(E::invalid_value(
                de::Unexpected::Str(text),
                &"a non-empty insert string",
            ));
        }
        return Ok(Component::Insert(text.to_string()));
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Component, A::Error> {
        let Some((key, n)) = map.next_entry::<String, u64>()? else {
            return Err(de::Error::invalid_length(0, &"a single \"d\" entry"));
        };
        if key != "d" {
            return Err(de::Error::unknown_field(&key, &["d"]));
        }
        if n == 0 {
            return Err(de::Error::invalid_value(
                de::Unexpected::Unsigned(n),
                &"a positive delete count",
            ));
        }
        if map.next_entry::<String, u64>()?.is_some() {
            return Err(de::Error::invalid_length(2, &"a single \"d\" entry"));
        }
        return Ok(Component::Delete(n as usize));
    }
}

impl<'de> Deserialize<'de> for Component {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Component, D::Error> {
        return deserializer.deserialize_any(ComponentVisitor);
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.components().len()))?;
        for component in self.components() {
            seq.serialize_element(component)?;
        }
        return seq.end();
    }
}

struct OperationVisitor;

impl<'de> Visitor<'de> for OperationVisitor {
    type Value = Operation;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return f.write_str("a list of operation components");
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Operation, A::Error> {
        let mut components = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(component) = seq.next_element::<Component>()? {
            components.push(component);
        }
        return Ok(normalize(components));
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Operation, D::Error> {
        return deserializer.deserialize_seq(OperationVisitor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> serde_json::Result<Operation> {
        return serde_json::from_str(json);
    }

    #[test]
    fn encodes_each_component_kind() {
        let mut op = Operation::new();
        op.retain(3).insert("ab").delete(2);

        assert_eq!(
            serde_json::to_string(&op).unwrap(),
            r#"[3,"ab",{"d":2}]"#
        );
    }

    #[test]
    fn decodes_each_component_kind() {
        let op = decode(r#"[3,"ab",{"d":2}]"#).unwrap();

        let mut expected = Operation::new();
        expected.retain(3).insert("ab").delete(2);
        assert_eq!(op, expected);
    }

    #[test]
    fn round_trips_normalized_operations() {
        let mut op = Operation::new();
        op.retain(1).insert("héllo 日本").delete(4);

        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(decode(&json).unwrap(), op);
    }

    #[test]
    fn decoding_normalizes_fragmented_input() {
        // Adjacent same-kind components merge, trailing retain drops.
        let op = decode(r#"[1,2,"a","b",{"d":1},{"d":2},7]"#).unwrap();

        let mut expected = Operation::new();
        expected.retain(3).insert("ab").delete(3);
        assert_eq!(op, expected);
    }

    #[test]
    fn empty_operation_is_an_empty_list() {
        assert_eq!(serde_json::to_string(&Operation::new()).unwrap(), "[]");
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_zero_retain() {
        assert!(decode("[0]").is_err());
    }

    #[test]
    fn rejects_negative_retain() {
        assert!(decode("[-2]").is_err());
    }

    #[test]
    fn rejects_empty_insert() {
        assert!(decode(r#"[""]"#).is_err());
    }

    #[test]
    fn rejects_zero_delete() {
        assert!(decode(r#"[{"d":0}]"#).is_err());
    }

    #[test]
    fn rejects_unknown_map_shapes() {
        assert!(decode(r#"[{"x":1}]"#).is_err());
        assert!(decode(r#"[{"d":1,"e":2}]"#).is_err());
        assert!(decode(r#"[{}]"#).is_err());
    }

    #[test]
    fn rejects_non_component_values() {
        assert!(decode("[true]").is_err());
        assert!(decode("[1.5]").is_err());
        assert!(decode("[[1]]").is_err());
    }
}
