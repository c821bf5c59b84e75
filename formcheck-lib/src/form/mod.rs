//! Bound form data.
//!
//! [`FormData`] is the container a form writes into and a coordinator reads
//! from. Every effective change publishes the top-level key that changed, so
//! a coordinator can watch fields without polling.

mod path;

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tokio::sync::broadcast;

pub use path::is_present;
pub use path::value_at;

/// Number of change notifications buffered per subscriber.
const CHANGE_CAPACITY: usize = 64;

/// Shared, change-notifying form data.
///
/// Cheap to clone; all clones see the same values and publish to the same
/// subscribers.
///
/// # Example
///
/// ```
/// use formcheck_lib::form::FormData;
/// use serde_json::json;
///
/// let data = FormData::from_value(json!({ "name": "", "email": "x@y.com" })).unwrap();
/// let mut changes = data.subscribe();
///
/// data.set("name", "Ada");
/// assert_eq!(changes.try_recv().unwrap(), "name");
/// assert!(data.has_value("name"));
/// ```
#[derive(Debug, Clone)]
pub struct FormData {
    values: Arc<RwLock<Map<String, Value>>>,
    changes: broadcast::Sender<String>,
}

impl FormData {
    /// Creates empty form data.
    pub fn new() -> Self {
        Self::from_map(Map::new())
    }

    /// Creates form data from an existing JSON object.
    pub fn from_map(values: Map<String, Value>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            values: Arc::new(RwLock::new(values)),
            changes,
        }
    }

    /// Creates form data from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(serde::de::Error::invalid_type(
                unexpected(&other),
                &"a JSON object of form fields",
            )),
        }
    }

    /// Creates form data by serializing a struct or map.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::to_value(value)?)
    }

    /// Returns a clone of a top-level field's value.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.read().get(field).cloned()
    }

    /// Looks up a field by exact key, falling back to a dotted path.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        let values = self.read();
        if let Some(value) = values.get(path) {
            return Some(value.clone());
        }
        let (head, rest) = path.split_once('.')?;
        values.get(head).and_then(|v| value_at(v, rest)).cloned()
    }

    /// Returns `true` if the field is set to something other than `null` or `""`.
    pub fn has_value(&self, path: &str) -> bool {
        is_present(self.lookup(path).as_ref())
    }

    /// Sets a top-level field, notifying subscribers if the value changed.
    pub fn set(&self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        let changed = {
            let mut values = self.write();
            if values.get(&field) == Some(&value) {
                false
            } else {
                values.insert(field.clone(), value);
                true
            }
        };
        if changed {
            self.notify(field);
        }
    }

    /// Mutates a top-level field in place, notifying subscribers if it changed.
    ///
    /// A missing field starts out as `null`.
    pub fn update<F>(&self, field: impl Into<String>, f: F)
    where
        F: FnOnce(&mut Value),
    {
        let field = field.into();
        let changed = {
            let mut values = self.write();
            let slot = values.entry(field.clone()).or_insert(Value::Null);
            let before = slot.clone();
            f(slot);
            *slot != before
        };
        if changed {
            self.notify(field);
        }
    }

    /// Returns the top-level field names.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Returns the whole object, as sent in a validation request.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.read().clone())
    }

    /// Subscribes to change notifications carrying the changed field name.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }

    fn notify(&self, field: String) {
        // No subscribers is fine: nobody is watching yet.
        let _ = self.changes.send(field);
    }

    fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

fn unexpected(value: &Value) -> serde::de::Unexpected<'_> {
    use serde::de::Unexpected;
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
