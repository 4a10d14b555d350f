//! Workspace application model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A registered workspace application.
///
/// Only the name is interpreted; it doubles as the path identifier for
/// the permissions endpoint. Everything else the API returns is kept
/// verbatim for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppResource {
    /// Unique application name.
    pub name: String,

    /// Remaining fields as returned by the API.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppResource {
    /// Creates an application with no extra fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Returns a string field from the extra metadata, if present.
    #[must_use]
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

impl TryFrom<Value> for AppResource {
    type Error = Value;

    /// Accepts objects with a string `name`; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut map) = value else {
            return Err(value);
        };

        match map.remove("name") {
            Some(Value::String(name)) => Ok(Self { name, extra: map }),
            other => {
                if let Some(name) = other {
                    map.insert("name".to_string(), name);
                }
                Err(Value::Object(map))
            }
        }
    }
}

/// Response body of the apps collection endpoint.
///
/// Entries are kept raw so one malformed app cannot hide the others;
/// see [`AppList::into_resources`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppList {
    /// Registered applications; absent or `null` means none.
    #[serde(default, deserialize_with = "crate::de::null_as_empty")]
    pub apps: Vec<Value>,
}

impl AppList {
    /// Splits the listing into usable apps and entries without a string name.
    #[must_use]
    pub fn into_resources(self) -> (Vec<AppResource>, Vec<Value>) {
        let mut resources = Vec::with_capacity(self.apps.len());
        let mut rejected = Vec::new();
        for value in self.apps {
            match AppResource::try_from(value) {
                Ok(app) => resources.push(app),
                Err(value) => rejected.push(value),
            }
        }
        (resources, rejected)
    }
}
