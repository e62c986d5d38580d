use serde::{Deserialize, Deserializer, de::Visitor};

use super::Parameters;

struct ParametersVisitor;

impl<'de> Visitor<'de> for ParametersVisitor {
    type Value = Parameters;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("map of parameter names to string values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut parameters = Parameters::with_capacity(map.size_hint().unwrap_or(0));

        while let Some((name, value)) = map.next_entry::<String, String>()? {
            parameters.insert(name, value);
        }

        Ok(parameters)
    }
}

impl<'de> Deserialize<'de> for Parameters {
    fn deserialize<D>(deserializer: D) -> Result<Parameters, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ParametersVisitor)
    }
}
