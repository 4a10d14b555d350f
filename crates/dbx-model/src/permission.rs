//! Access-control list model and transforms.
//!
//! An access-control list is read from the API as a sequence of
//! [`PermissionEntry`], filtered with [`strip_group`], reduced with
//! [`normalize`] and written back wholesale as an
//! [`AccessControlUpdate`].
//!
//! Entries are decoded leniently: principal fields and grants are kept as
//! raw JSON, so drifted metadata on one entry never makes the whole list
//! unreadable.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The blanket group whose grants are removed from every application.
///
/// Matching is exact: no case folding and no whitespace trimming.
pub const ACCOUNT_USERS_GROUP: &str = "account users";

/// One entry of an access-control list as returned by the API.
///
/// Well-formed entries populate exactly one principal field with a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionEntry {
    /// User principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<Value>,

    /// Group principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<Value>,

    /// Service principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_principal_name: Option<Value>,

    /// Grants held by the principal, e.g. `{"permission_level": "CAN_USE"}`.
    #[serde(
        default,
        deserialize_with = "crate::de::null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub all_permissions: Vec<Value>,

    /// Any other metadata the API attaches to the entry.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PermissionEntry {
    /// Creates an entry for a user.
    #[must_use]
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            user_name: Some(Value::String(name.into())),
            ..Self::default()
        }
    }

    /// Creates an entry for a group.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            group_name: Some(Value::String(name.into())),
            ..Self::default()
        }
    }

    /// Creates an entry for a service principal.
    #[must_use]
    pub fn service_principal(name: impl Into<String>) -> Self {
        Self {
            service_principal_name: Some(Value::String(name.into())),
            ..Self::default()
        }
    }

    /// Adds a direct grant at the given level.
    #[must_use]
    pub fn with_permission(mut self, level: impl Into<String>) -> Self {
        let level: String = level.into();
        self.all_permissions
            .push(json!({ "permission_level": level }));
        self
    }

    /// Returns the principal this entry grants to, whichever kind it is.
    ///
    /// Only string principals are reported.
    #[must_use]
    pub fn principal(&self) -> Option<&str> {
        [
            &self.user_name,
            &self.group_name,
            &self.service_principal_name,
        ]
        .into_iter()
        .find_map(|field| field.as_ref().and_then(Value::as_str))
    }

    /// Returns the raw permission level of the first grant, if any.
    ///
    /// A grant that is not an object, or whose level is `null`, has none.
    #[must_use]
    pub fn first_permission(&self) -> Option<&Value> {
        self.all_permissions
            .first()
            .and_then(|grant| grant.get("permission_level"))
            .filter(|level| !level.is_null())
    }

    /// Returns the first permission level when it is a string.
    #[must_use]
    pub fn first_permission_level(&self) -> Option<&str> {
        self.first_permission().and_then(Value::as_str)
    }

    /// Checks whether this entry is a grant to exactly the given group.
    #[must_use]
    pub fn is_group(&self, group: &str) -> bool {
        self.group_name.as_ref().and_then(Value::as_str) == Some(group)
    }
}

/// Response body of the permissions endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessControlList {
    /// Object the list belongs to, e.g. `/apps/sales-dash`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<Value>,

    /// Object type, e.g. `apps`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<Value>,

    /// Entries; absent or `null` means empty.
    #[serde(default, deserialize_with = "crate::de::null_as_empty")]
    pub access_control_list: Vec<PermissionEntry>,
}

/// A reduced entry as submitted on write-back.
///
/// All three fields are always serialized, `null` included, and carry the
/// source values untouched. Service principals and any grant metadata
/// beyond the first level do not survive the reduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    /// User principal.
    pub user_name: Option<Value>,
    /// Group principal.
    pub group_name: Option<Value>,
    /// First permission level of the source entry.
    pub permission_level: Option<Value>,
}

impl From<&PermissionEntry> for NormalizedEntry {
    fn from(entry: &PermissionEntry) -> Self {
        Self {
            user_name: entry.user_name.clone(),
            group_name: entry.group_name.clone(),
            permission_level: entry.first_permission().cloned(),
        }
    }
}

/// Request body of the permissions write-back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlUpdate {
    /// Replacement list.
    pub access_control_list: Vec<NormalizedEntry>,
}

impl From<Vec<NormalizedEntry>> for AccessControlUpdate {
    fn from(access_control_list: Vec<NormalizedEntry>) -> Self {
        Self {
            access_control_list,
        }
    }
}

/// Removes every entry granting to `group`, preserving the order of the rest.
#[must_use]
pub fn strip_group(entries: Vec<PermissionEntry>, group: &str) -> Vec<PermissionEntry> {
    entries
        .into_iter()
        .filter(|entry| !entry.is_group(group))
        .collect()
}

/// Reduces each entry to its user, group and first permission level.
#[must_use]
pub fn normalize(entries: &[PermissionEntry]) -> Vec<NormalizedEntry> {
    entries.iter().map(NormalizedEntry::from).collect()
}
