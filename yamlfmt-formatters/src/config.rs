use crate::FormatterError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Key carrying the formatter's type tag in a config map.
pub const TYPE_KEY: &str = "type";

/// Deserialize a backend config from a plain map, ignoring the `type` key.
pub(crate) fn parse_config<T: DeserializeOwned>(
    type_tag: &str,
    config: &Map<String, Value>,
) -> Result<T, FormatterError> {
    let mut map = config.clone();
    map.remove(TYPE_KEY);
    serde_json::from_value(Value::Object(map)).map_err(|e| FormatterError::InvalidConfig {
        type_tag: type_tag.to_string(),
        message: e.to_string(),
    })
}

/// Plain-value view of a backend config with `type` set to the tag.
pub(crate) fn config_map<T: Serialize>(
    type_tag: &str,
    config: &T,
) -> anyhow::Result<Map<String, Value>> {
    let mut map = match serde_json::to_value(config)? {
        Value::Object(map) => map,
        other => anyhow::bail!("{type_tag} config serialized to non-object {other}"),
    };
    map.insert(TYPE_KEY.to_string(), Value::String(type_tag.to_string()));
    Ok(map)
}
