//! Per-cycle fingerprints of rendered items.
//!
//! These are *not* the dedup key of the result set. They only stop the same
//! rendered element from being extracted twice within one cycle and carry no
//! meaning once the view has scrolled.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemIdentity {
    DataAttribute(String),
    DomId(String),
    Geometry(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Fingerprint {
    data_id: Option<String>,
    dom_id: Option<String>,
    rect: Option<[f64; 4]>,
}

impl ItemIdentity {
    /// Reads the value produced by [`fingerprint_function`].
    ///
    /// Accepts the object itself or its JSON string form.
    pub fn from_fingerprint(value: &Value) -> Option<Self> {
        let fingerprint: Fingerprint = match value {
            Value::String(text) => serde_json::from_str(text).ok()?,
            Value::Object(_) => serde_json::from_value(value.clone()).ok()?,
            _ => return None,
        };

        if let Some(id) = non_empty(fingerprint.data_id) {
            return Some(Self::DataAttribute(id));
        }
        if let Some(id) = non_empty(fingerprint.dom_id) {
            return Some(Self::DomId(id));
        }
        fingerprint
            .rect
            .map(|[x, y, w, h]| Self::Geometry(format!("{x}:{y}:{w}:{h}")))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// JS function declaration evaluated with the item element bound to `this`.
///
/// `data_key` is the camel-cased `data-*` attribute holding a stable item id.
/// The result is returned as a JSON string so drivers that only hand back
/// primitives by value still work.
pub fn fingerprint_function(data_key: &str) -> String {
    let key = serde_json::to_string(data_key).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "function() {{ \
            const r = this.getBoundingClientRect(); \
            return JSON.stringify({{ \
                dataId: this.dataset[{key}] || null, \
                domId: this.id || null, \
                rect: [r.x, r.y, r.width, r.height] \
            }}); \
        }}"
    )
}

/// Advisory set of identities handled in the current cycle.
#[derive(Debug, Clone, Default)]
pub struct IdentityGuard {
    seen: HashSet<ItemIdentity>,
}

impl IdentityGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `identity` as seen and reports whether the item should be processed.
    /// Items without an identity are always processed.
    pub fn first_sighting(&mut self, identity: Option<ItemIdentity>) -> bool {
        match identity {
            Some(identity) => self.seen.insert(identity),
            None => true,
        }
    }
}
