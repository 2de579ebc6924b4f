//! Key-value documents describing an engine connection.
//!
//! A [`ConfigDocument`] keeps "absent" and "present but empty" apart: [`get`]
//! reports the raw value, [`non_empty`] is what the builder imports from.
//!
//! [`get`]: ConfigDocument::get
//! [`non_empty`]: ConfigDocument::non_empty

use std::collections::BTreeMap;

use ortho_config::serde_json::Value;

/// A flat document of engine connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    values: BTreeMap<String, String>,
}

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, which may be empty.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the value for `key` unless it is absent or empty.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Number of keys in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the document holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds a document from a JSON object.
    ///
    /// Strings are kept verbatim, booleans become `"1"`/`"0"` and numbers
    /// their decimal form. Nulls, arrays and nested objects are skipped.
    /// Returns `None` when `value` is not an object.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let values = object
            .iter()
            .filter_map(|(key, field)| {
                let text = match field {
                    Value::String(text) => text.clone(),
                    Value::Bool(flag) => String::from(if *flag { "1" } else { "0" }),
                    Value::Number(number) => number.to_string(),
                    Value::Null | Value::Array(_) | Value::Object(_) => return None,
                };
                Some((key.clone(), text))
            })
            .collect();
        Some(Self { values })
    }

    /// Parses a shell-style env file.
    ///
    /// Accepts `KEY=VALUE` lines with an optional `export ` prefix and
    /// optional matching quotes around the value. Blank lines, `#` comments
    /// and lines without `=` are ignored.
    #[must_use]
    pub fn from_env_file(content: &str) -> Self {
        let values = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let assignment = line.strip_prefix("export ").unwrap_or(line);
                let (raw_key, raw_value) = assignment.split_once('=')?;
                let key = raw_key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_owned(), unquote(raw_value.trim()).to_owned()))
            })
            .collect();
        Self { values }
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigDocument
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Strips one pair of matching single or double quotes.
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| {
            value
                .strip_prefix(*quote)
                .and_then(|inner| inner.strip_suffix(*quote))
        })
        .unwrap_or(value)
}
