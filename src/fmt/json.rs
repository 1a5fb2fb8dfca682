//! JSON lines formatter with configurable output key names.
//!
//! When every key keeps its default name the record is serialized through a
//! fixed-shape struct borrowed from a pool; any remapped key switches the
//! formatter to a generic map. Both paths emit keys in sorted order, so the
//! same entity renders byte-identically through either one.

use super::pool::{Pool, Reset};
use super::Formatter;
use crate::entity::Entity;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Logical keys a formatter can remap, in the order of their struct fields.
pub const KEYS: [&str; 6] = ["name", "time", "level", "message", "fields", "caller"];

static DEFAULT_FORMATTER: OnceLock<JsonFormatter> = OnceLock::new();

/// Shared formatter with default keys and `full = false`, built on first use.
pub fn default_json_formatter() -> &'static JsonFormatter {
    DEFAULT_FORMATTER.get_or_init(JsonFormatter::default)
}

/// Field order is the serialization order and must stay alphabetical.
#[derive(Debug, Default, Serialize)]
struct JsonRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Map<String, Value>>,
    level: &'static str,
    message: String,
    name: String,
    time: String,
}

impl Reset for JsonRecord {
    fn reset(&mut self) {
        self.caller = None;
        self.fields = None;
        self.level = "";
        self.message.clear();
        self.name.clear();
        self.time.clear();
    }
}

static RECORDS: Pool<JsonRecord> = Pool::new();

/// Serializes entities as newline-terminated JSON objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFormatter {
    name: String,
    time: String,
    level: String,
    message: String,
    fields: String,
    caller: String,
    full: bool,
    structural: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            time: "time".to_string(),
            level: "level".to_string(),
            message: "message".to_string(),
            fields: "fields".to_string(),
            caller: "caller".to_string(),
            full: false,
            structural: true,
        }
    }
}

impl JsonFormatter {
    /// Builds a formatter from logical-key → output-key pairs.
    ///
    /// An empty output name leaves that key at its default. `full` forces the
    /// `fields` and `caller` keys into every record for a stable shape.
    ///
    /// # Errors
    /// `Error::InvalidFormatterKey` when a logical key is not one of [`KEYS`].
    pub fn new<K, V>(keys: impl IntoIterator<Item = (K, V)>, full: bool) -> Result<Self, crate::Error>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut f = Self {
            full,
            ..Self::default()
        };

        for (key, value) in keys {
            let value: String = value.into();
            let slot = match key.as_ref() {
                "name" => &mut f.name,
                "time" => &mut f.time,
                "level" => &mut f.level,
                "message" => &mut f.message,
                "fields" => &mut f.fields,
                "caller" => &mut f.caller,
                other => return Err(crate::Error::InvalidFormatterKey(other.to_string())),
            };
            if !value.is_empty() && *slot != value {
                *slot = value;
                f.structural = false;
            }
        }

        Ok(f)
    }

    /// Like [`JsonFormatter::new`] for call sites whose keys are already known to be valid.
    ///
    /// # Panics
    /// Panics when a key is invalid.
    #[must_use]
    pub fn must_new<K, V>(keys: impl IntoIterator<Item = (K, V)>, full: bool) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::new(keys, full).unwrap_or_else(|e| panic!("{e}"))
    }

    /// True while every output key equals its logical name.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        self.structural
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.full
    }

    /// Output name for a logical key.
    #[must_use]
    pub fn key(&self, logical: &str) -> Option<&str> {
        match logical {
            "name" => Some(&self.name),
            "time" => Some(&self.time),
            "level" => Some(&self.level),
            "message" => Some(&self.message),
            "fields" => Some(&self.fields),
            "caller" => Some(&self.caller),
            _ => None,
        }
    }

    /// `None` means the key is omitted from this record.
    fn fields_value(&self, entity: &Entity<'_>) -> Result<Option<Map<String, Value>>, crate::Error> {
        let fields = entity.fields();
        if !fields.is_empty() {
            return fields.to_json().map(Some);
        }
        Ok(self.full.then(Map::new))
    }

    fn caller_value(&self, entity: &Entity<'_>) -> Option<String> {
        (self.full || entity.has_caller()).then(|| entity.caller().to_string())
    }

    fn format_structural(&self, entity: &Entity<'_>, buf: &mut Vec<u8>) -> Result<(), crate::Error> {
        let mut record = RECORDS.get();
        record.caller = self.caller_value(entity);
        record.fields = self.fields_value(entity)?;
        record.level = entity.level().as_str();
        record.message.push_str(entity.message());
        record.name.push_str(entity.name());
        record.time.push_str(&entity.time_string());

        serde_json::to_writer(&mut *buf, &*record)?;
        Ok(())
    }

    fn format_mapped(&self, entity: &Entity<'_>, buf: &mut Vec<u8>) -> Result<(), crate::Error> {
        let mut kv = Map::new();
        kv.insert(self.name.clone(), Value::from(entity.name()));
        kv.insert(self.time.clone(), Value::from(entity.time_string()));
        kv.insert(self.level.clone(), Value::from(entity.level().as_str()));
        kv.insert(self.message.clone(), Value::from(entity.message()));
        if let Some(fields) = self.fields_value(entity)? {
            kv.insert(self.fields.clone(), Value::Object(fields));
        }
        if let Some(caller) = self.caller_value(entity) {
            kv.insert(self.caller.clone(), Value::String(caller));
        }

        serde_json::to_writer(&mut *buf, &kv)?;
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entity: &Entity<'_>, buf: &mut Vec<u8>) -> Result<(), crate::Error> {
        let start = buf.len();
        let result = if self.structural {
            self.format_structural(entity, buf)
        } else {
            self.format_mapped(entity, buf)
        };

        match result {
            Ok(()) => {
                buf.push(b'\n');
                Ok(())
            }
            Err(e) => {
                // Never leave half a record behind.
                buf.truncate(start);
                Err(e)
            }
        }
    }
}
