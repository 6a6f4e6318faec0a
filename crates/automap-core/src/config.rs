use crate::{Error, Result};

use indexmap::IndexMap;

/// Flat key/value configuration with dotted namespacing.
///
/// Keys look like `automap.my.pkg.Order.table`. A [`subset`](Self::subset)
/// view strips a prefix so class-level code can ask for `table` directly.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Configuration {
    entries: IndexMap<String, String>,
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration::default()
    }

    /// Sets a key, builder style.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Configuration {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Loads configuration from a JSON document.
    ///
    /// Nested objects are flattened into dotted keys, so
    /// `{"automap": {"Order": {"table": "ORDERS"}}}` yields
    /// `automap.Order.table = ORDERS`. Arrays become comma separated lists.
    pub fn from_json(src: &str) -> Result<Configuration> {
        let document: serde_json::Value = serde_json::from_str(src)?;

        let serde_json::Value::Object(map) = document else {
            return Err(Error::invalid_configuration(
                "configuration document must be a JSON object",
            ));
        };

        let mut config = Configuration::new();
        for (key, value) in map {
            config.flatten(key, value)?;
        }
        Ok(config)
    }

    fn flatten(&mut self, key: String, value: serde_json::Value) -> Result<()> {
        use serde_json::Value::*;

        match value {
            Object(map) => {
                for (child, value) in map {
                    self.flatten(format!("{key}.{child}"), value)?;
                }
            }
            Array(items) => {
                let items = items
                    .into_iter()
                    .map(|item| match item {
                        String(s) => Ok(s),
                        Bool(_) | Number(_) => Ok(item.to_string()),
                        _ => Err(Error::invalid_configuration(format!(
                            "`{key}` may only list scalar values"
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.insert(key, items.join(","));
            }
            String(s) => self.insert(key, s),
            Null => {}
            Bool(_) | Number(_) => {
                let text = value.to_string();
                self.insert(key, text);
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing key is a configuration error.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::invalid_configuration(format!("missing required key `{key}`")))
    }

    /// Reads a boolean flag, using `default` when the key is absent.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(Error::invalid_configuration(format!(
                "`{key}` must be a boolean, found `{value}`"
            ))),
        }
    }

    /// Reads a comma separated list. Blank items are skipped.
    pub fn get_list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .collect()
        })
    }

    /// Returns the entries under `prefix.`, with the prefix removed.
    pub fn subset(&self, prefix: &str) -> Configuration {
        let prefix = format!("{}.", prefix.trim_end_matches('.'));

        Configuration {
            entries: self
                .entries
                .iter()
                .filter_map(|(key, value)| {
                    key.strip_prefix(&prefix)
                        .map(|rest| (rest.to_string(), value.clone()))
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}
