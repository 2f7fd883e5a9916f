//! Services express ways of communicating with the DID subject or associated entities: any type
//! of service the DID subject wants to advertise, including decentralized identity management
//! services for further discovery, authentication, authorization, or interaction.

use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use crate::serde::flexvec_or_single;

/// Service description.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    /// Identifier for the service. Should be unique for services within the DID document.
    pub id: String,
    /// The type of service.
    #[serde(rename = "type")]
    #[serde(with = "flexvec_or_single")]
    pub type_: Vec<String>,
    /// Location(s) of the service.
    #[serde(with = "endpoint_serialization")]
    pub service_endpoint: Vec<Endpoint>,
}

/// A service endpoint can be a string, a map or a set composed of one or more strings and/or
/// maps. All string values must be valid URIs.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Endpoint {
    /// Location of the service endpoint, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Map of endpoint names to locations, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_map: Option<HashMap<String, Vec<String>>>,
}

/// Required by serde to deserialize a service endpoint expressed as a bare string.
impl FromStr for Endpoint {
    type Err = Infallible;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            url: Some(url.to_string()),
            url_map: None,
        })
    }
}

/// Serialize a service endpoint to a string or map. If only the `url` field is set, serialize to
/// a string, otherwise serialize to a map.
impl Serialize for Endpoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match (&self.url, &self.url_map) {
            (Some(url), None) => serializer.serialize_str(url),
            (None, Some(map)) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
            _ => Err(serde::ser::Error::custom("Service endpoint must be a string or map")),
        }
    }
}

pub(super) mod endpoint_serialization {
    use std::collections::HashMap;
    use std::fmt;
    use std::marker::PhantomData;
    use std::str::FromStr;

    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::ser::{SerializeSeq, Serializer};
    use serde::Deserialize;

    use super::Endpoint;

    pub(crate) fn serialize<S>(value: &[Endpoint], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.len() == 1 {
            serializer.serialize_some(&value[0])
        } else {
            let mut seq = serializer.serialize_seq(Some(value.len()))?;
            for e in value {
                seq.serialize_element(e)?;
            }
            seq.end()
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Endpoint>, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct StringMapOrSeq<T>(PhantomData<fn() -> Vec<T>>);

        impl<'de> Visitor<'de> for StringMapOrSeq<Vec<Endpoint>> {
            type Value = Vec<Endpoint>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("service endpoint as a string, map or set of strings/maps")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match Endpoint::from_str(value) {
                    Ok(res) => Ok(vec![res]),
                    Err(_) => Err(de::Error::invalid_type(de::Unexpected::Str(value), &self)),
                }
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let url_map = HashMap::<String, Vec<String>>::deserialize(
                    de::value::MapAccessDeserializer::new(map),
                )?;
                Ok(vec![Endpoint {
                    url: None,
                    url_map: Some(url_map),
                }])
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                // could be mixed array of strings and objects
                let mut deser: Vec<Endpoint> = Vec::new();
                while let Some(curr) = seq.next_element::<serde_json::Value>()? {
                    match curr {
                        serde_json::Value::String(s) => {
                            let Ok(res) = Endpoint::from_str(&s) else {
                                return Err(de::Error::invalid_type(
                                    de::Unexpected::Str(&s),
                                    &self,
                                ));
                            };
                            deser.push(res);
                        }
                        serde_json::Value::Object(o) => {
                            let Ok(map) = serde_json::from_value::<HashMap<String, Vec<String>>>(
                                serde_json::Value::Object(o),
                            ) else {
                                return Err(de::Error::invalid_type(de::Unexpected::Map, &self));
                            };
                            deser.push(Endpoint {
                                url: None,
                                url_map: Some(map),
                            });
                        }
                        _ => {
                            return Err(de::Error::custom(
                                "invalid type: cannot deserialize array element",
                            ));
                        }
                    }
                }
                Ok(deser)
            }
        }

        deserializer.deserialize_any(StringMapOrSeq(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serialize_single_endpoint() {
        let service = Service {
            id: "did:example:123#vcs".to_string(),
            type_: vec!["VerifiableCredentialService".to_string()],
            service_endpoint: vec![Endpoint {
                url: Some("https://example.com/vc/".to_string()),
                url_map: None,
            }],
        };
        let val = serde_json::to_value(&service).expect("failed to serialize");
        assert_eq!(
            val,
            json!({
                "id": "did:example:123#vcs",
                "type": "VerifiableCredentialService",
                "serviceEndpoint": "https://example.com/vc/"
            })
        );
    }

    #[test]
    fn deserialize_mixed_endpoints() {
        let input = json!({
            "id": "did:example:123#hub",
            "type": ["IdentityHub"],
            "serviceEndpoint": [
                "https://example.com/hub/",
                { "origins": ["https://example.com/origin/"] }
            ]
        });
        let service: Service = serde_json::from_value(input).expect("failed to deserialize");
        assert_eq!(service.service_endpoint.len(), 2);
        assert_eq!(service.service_endpoint[0].url.as_deref(), Some("https://example.com/hub/"));
        assert!(service.service_endpoint[1].url_map.is_some());
    }
}
