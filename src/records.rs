use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A category as handed to us by the content backend.
///
/// Nothing about these is trusted: every field may be missing, empty, or
/// inconsistent with the canonical taxonomy, and `children` may nest
/// arbitrarily.  Use `from_json` to salvage records out of loosely-typed JSON
/// rather than failing the whole list on one bad field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: Option<i64>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub parent_slug: Option<String>,
    pub is_active: Option<bool>,
    pub children: Option<Vec<CategoryRecord>>,
}

/// Trimmed contents of an optional string, or `None` if there's nothing there.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl CategoryRecord {
    pub fn slug(&self) -> Option<&str> {
        non_empty(&self.slug)
    }

    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn parent_slug(&self) -> Option<&str> {
        non_empty(&self.parent_slug)
    }

    pub fn children(&self) -> &[CategoryRecord] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Explicitly marked inactive; a missing flag counts as active.
    pub fn is_inactive(&self) -> bool {
        self.is_active == Some(false)
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_slug().is_none()
    }

    /// Leniently extract a record from a JSON value.  Returns `None` only when
    /// the value isn't an object at all; wrongly-typed fields are treated as
    /// missing.  Both camelCase and snake_case keys are accepted, and a
    /// `parent` that is either a slug string or an object with a `slug` is
    /// understood as the parent reference.
    pub fn from_json(value: &Value) -> Option<CategoryRecord> {
        let obj = value.as_object()?;

        let parent_slug = string_field(obj, &["parentSlug", "parent_slug"]).or_else(|| {
            match obj.get("parent") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Object(parent)) => string_field(parent, &["slug"]),
                _ => None,
            }
        });

        let children = match obj.get("children") {
            Some(Value::Array(items)) => {
                Some(items.iter().filter_map(CategoryRecord::from_json).collect())
            }
            _ => None,
        };

        Some(CategoryRecord {
            id: id_field(obj.get("id")),
            slug: string_field(obj, &["slug"]),
            name: string_field(obj, &["name"]),
            parent_slug,
            is_active: bool_field(obj, &["isActive", "is_active"]),
            children,
        })
    }
}

/// Salvage a record list from a backend payload: either a bare array or an
/// object wrapping the array under `data` or `categories`.  Non-object
/// entries are dropped.
pub fn records_from_json(value: &Value) -> Option<Vec<CategoryRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => match obj.get("data").or_else(|| obj.get("categories")) {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };
    Some(items.iter().filter_map(CategoryRecord::from_json).collect())
}

/// Read a backend payload from `reader` the way the engine treats a flaky
/// provider: anything unreadable, unparseable, or without a category list is
/// reported with a warning and comes back as `None`, i.e. "no data".
/// `origin` only labels the warnings.
pub fn read_records<R: Read>(mut reader: R, origin: &str) -> Option<Vec<CategoryRecord>> {
    let mut text = String::new();
    if let Err(err) = reader.read_to_string(&mut text) {
        warn!("Unable to read category input [{}]: {}", origin, err);
        return None;
    }
    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            warn!("Unable to parse category input [{}]: {}", origin, err);
            return None;
        }
    };
    let records = records_from_json(&value);
    if records.is_none() {
        warn!("Category input [{}] holds no category list", origin);
    }
    records
}

/// `read_records` on a file, or on stdin when `path` is `-`.
pub fn load_records(path: &Path) -> Option<Vec<CategoryRecord>> {
    let origin = path.display().to_string();
    if path == Path::new("-") {
        return read_records(io::stdin().lock(), &origin);
    }
    match File::open(path) {
        Ok(file) => read_records(file, &origin),
        Err(err) => {
            warn!("Unable to open category input [{}]: {}", origin, err);
            None
        }
    }
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn id_field(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        Some(Value::String(s)) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}
