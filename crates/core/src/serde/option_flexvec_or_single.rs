//! (De)serialize `Option<Vec<T>>` where a single-element list appears on the wire as a bare
//! value rather than a one-element array.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de;
use serde::de::{DeserializeOwned, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Serialize an optional list, collapsing a single element to a bare value.
///
/// # Errors
///
/// An error if an element fails to serialize.
pub fn serialize<T, S>(value: &Option<Vec<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    let Some(some_val) = value.as_ref() else {
        return serializer.serialize_none();
    };

    if some_val.len() == 1 {
        return serializer.serialize_some(&some_val[0]);
    }

    let mut seq = serializer.serialize_seq(Some(some_val.len()))?;
    for e in some_val {
        seq.serialize_element(e)?;
    }
    seq.end()
}

/// Deserialize a bare value or an array of values.
///
/// # Errors
///
/// An error if an element is neither a string convertible via `FromStr` nor an object.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    T: DeserializeOwned + FromStr,
    D: Deserializer<'de>,
{
    struct VisitorImpl<T>(PhantomData<fn() -> Vec<T>>);

    impl<'de, T> Visitor<'de> for VisitorImpl<T>
    where
        T: DeserializeOwned + FromStr,
    {
        type Value = Option<Vec<T>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a single value or array of values")
        }

        // a bare string deserializes to a single-element Vec<T>
        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let Ok(res) = T::from_str(value) else {
                return Err(de::Error::invalid_type(de::Unexpected::Str(value), &self));
            };
            Ok(Some(vec![res]))
        }

        // a bare object deserializes to a single-element Vec<T>
        fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            let res = T::deserialize(de::value::MapAccessDeserializer::new(map))?;
            Ok(Some(vec![res]))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut deser: Vec<T> = Vec::new();
            while let Some(curr) = seq.next_element::<serde_json::Value>()? {
                match curr {
                    serde_json::Value::String(s) => {
                        let Ok(res) = T::from_str(&s) else {
                            return Err(de::Error::invalid_type(de::Unexpected::Str(&s), &self));
                        };
                        deser.push(res);
                    }
                    serde_json::Value::Object(o) => {
                        let Ok(res) = serde_json::from_value::<T>(serde_json::Value::Object(o))
                        else {
                            return Err(de::Error::invalid_type(de::Unexpected::Map, &self));
                        };
                        deser.push(res);
                    }
                    _ => {
                        return Err(de::Error::custom(
                            "invalid type: cannot deserialize array element",
                        ));
                    }
                }
            }
            Ok(Some(deser))
        }
    }

    deserializer.deserialize_any(VisitorImpl(PhantomData))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use crate::serde::option_flexvec_or_single;

    #[derive(Clone, Debug, Default, Deserialize, Serialize)]
    #[serde(default)]
    struct TestData {
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(with = "option_flexvec_or_single")]
        controller: Option<Vec<String>>,
    }

    #[test]
    fn single_collapses_to_string() {
        let data = TestData {
            controller: Some(vec!["did:example:123".to_string()]),
        };
        let val = serde_json::to_value(&data).expect("failed to serialize");
        assert_eq!(val, json!({"controller": "did:example:123"}));

        let back: TestData = serde_json::from_value(val).expect("failed to deserialize");
        assert_eq!(back.controller, data.controller);
    }

    #[test]
    fn multiple_stay_an_array() {
        let data = TestData {
            controller: Some(vec!["did:example:123".to_string(), "did:example:456".to_string()]),
        };
        let val = serde_json::to_value(&data).expect("failed to serialize");
        assert_eq!(val, json!({"controller": ["did:example:123", "did:example:456"]}));

        let back: TestData = serde_json::from_value(val).expect("failed to deserialize");
        assert_eq!(back.controller, data.controller);
    }
}
