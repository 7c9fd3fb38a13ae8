use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::{BoundUriTemplate, UriTemplate, Values};

impl Serialize for UriTemplate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

struct UriTemplateVisitor;

impl<'de> Visitor<'de> for UriTemplateVisitor {
    type Value = UriTemplate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a URI template string")
    }

    fn visit_str<E>(self, v: &str) -> Result<UriTemplate, E>
    where
        E: de::Error,
    {
        UriTemplate::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for UriTemplate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(UriTemplateVisitor)
    }
}

impl Serialize for Values {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, values) in self.iter() {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

impl Serialize for BoundUriTemplate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("BoundUriTemplate", 2)?;
        state.serialize_field("template", self.template())?;
        state.serialize_field("values", self.values())?;
        state.end()
    }
}
