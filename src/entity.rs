//! Per-call record types: the `Entity` a formatter renders and the read-only
//! `Summary` hooks receive after the rendered bytes reached the sink.

use crate::level::Level;
use chrono::{DateTime, Local, SecondsFormat};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Structured key/value payload attached to a record.
///
/// Values are converted to JSON when attached. A value whose `Serialize` impl
/// fails is remembered so the failure surfaces when the record is formatted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: BTreeMap<String, Value>,
    invalid: Option<String>,
}

pub(crate) static EMPTY_FIELDS: Fields = Fields::new();

impl Fields {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            invalid: None,
        }
    }

    /// Adds or replaces one field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(v) => {
                self.values.insert(key, v);
            }
            Err(e) => {
                self.values.remove(&key);
                self.invalid = Some(format!("field {key:?}: {e}"));
            }
        }
    }

    /// A set holding only an unserializable value is not empty: formatting it must fail.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.invalid.is_none()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// JSON object for the `fields` key.
    ///
    /// # Errors
    /// `Error::Format` when a value failed to serialize on insertion.
    pub fn to_json(&self) -> Result<Map<String, Value>, crate::Error> {
        if let Some(reason) = &self.invalid {
            return Err(crate::Error::Format(reason.clone()));
        }
        Ok(self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl<K: Into<String>, V: Serialize> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// One log occurrence, built once per emitted call and dropped after dispatch.
#[derive(Debug, Clone)]
pub struct Entity<'a> {
    name: &'a str,
    level: Level,
    message: String,
    time: DateTime<Local>,
    time_format: Option<&'a str>,
    fields: &'a Fields,
    caller: Option<String>,
}

impl<'a> Entity<'a> {
    #[must_use]
    pub fn new(name: &'a str, level: Level, message: impl Into<String>, time: DateTime<Local>) -> Self {
        Self {
            name,
            level,
            message: message.into(),
            time,
            time_format: None,
            fields: &EMPTY_FIELDS,
            caller: None,
        }
    }

    #[must_use]
    pub const fn with_fields(mut self, fields: &'a Fields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// strftime pattern for `time_string`; `None` keeps RFC 3339.
    #[must_use]
    pub const fn with_time_format(mut self, format: Option<&'a str>) -> Self {
        self.time_format = format;
        self
    }

    #[must_use]
    pub const fn name(&self) -> &str {
        self.name
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn time(&self) -> DateTime<Local> {
        self.time
    }

    /// RFC 3339 with second precision unless a custom strftime pattern is set.
    /// A pattern chrono cannot render falls back to RFC 3339 instead of panicking.
    #[must_use]
    pub fn time_string(&self) -> String {
        if let Some(format) = self.time_format {
            let mut out = String::new();
            if write!(out, "{}", self.time.format(format)).is_ok() {
                return out;
            }
        }
        self.time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    #[must_use]
    pub const fn fields(&self) -> &Fields {
        self.fields
    }

    /// `"file:line"`, or empty when no caller was captured.
    #[must_use]
    pub fn caller(&self) -> &str {
        self.caller.as_deref().unwrap_or("")
    }

    #[must_use]
    pub const fn has_caller(&self) -> bool {
        self.caller.is_some()
    }
}

/// What a hook sees: the entity plus the exact bytes written to the sink.
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    entity: &'a Entity<'a>,
    formatted: &'a [u8],
}

impl<'a> Summary<'a> {
    #[must_use]
    pub const fn new(entity: &'a Entity<'a>, formatted: &'a [u8]) -> Self {
        Self { entity, formatted }
    }

    #[must_use]
    pub const fn name(&self) -> &str {
        self.entity.name()
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.entity.level()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.entity.message()
    }

    #[must_use]
    pub const fn time(&self) -> DateTime<Local> {
        self.entity.time()
    }

    #[must_use]
    pub fn time_string(&self) -> String {
        self.entity.time_string()
    }

    #[must_use]
    pub const fn fields(&self) -> &Fields {
        self.entity.fields()
    }

    #[must_use]
    pub fn has_field(&self, key: &str) -> bool {
        self.entity.fields().contains_key(key)
    }

    #[must_use]
    pub fn caller(&self) -> &str {
        self.entity.caller()
    }

    #[must_use]
    pub const fn has_caller(&self) -> bool {
        self.entity.has_caller()
    }

    /// Rendered record including its trailing newline.
    #[must_use]
    pub const fn bytes(&self) -> &[u8] {
        self.formatted
    }

    #[must_use]
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.formatted)
    }
}
