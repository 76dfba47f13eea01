//! Deep merge of configuration fragments.
//!
//! Overlay semantics: nested objects merge key-by-key recursively, arrays
//! concatenate base-first (`rules` and `plugins` accumulate across layers),
//! scalars in the overlay replace the base, and a null overlay value leaves
//! the base untouched. The merge is structural only - semantic validity of
//! the merged values is the consumers' concern.

use serde_json::Value;

use crate::config::BundlerConfig;
use crate::error::{ComposeError, Result};

/// Merge an environment overlay onto a base configuration.
pub fn merge(base: &BundlerConfig, overlay: &BundlerConfig) -> Result<BundlerConfig> {
    let mut merged = serde_json::to_value(base)
        .map_err(|err| ComposeError::InvalidOverlay(err.to_string()))?;
    let overlay = serde_json::to_value(overlay)
        .map_err(|err| ComposeError::InvalidOverlay(err.to_string()))?;

    merge_values(&mut merged, &overlay);

    serde_json::from_value(merged).map_err(|err| ComposeError::InvalidOverlay(err.to_string()))
}

pub(crate) fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, Value::Object(update_map)) => {
            let mut new_obj = serde_json::Map::with_capacity(update_map.len());
            for (key, value) in update_map {
                new_obj.insert(key.clone(), value.clone());
            }
            *target_slot = Value::Object(new_obj);
        }
        (Value::Array(target_items), Value::Array(update_items)) => {
            target_items.extend(update_items.iter().cloned());
        }
        (target_slot, Value::Array(_)) => {
            *target_slot = update.clone();
        }
        (_, Value::Null) => {}
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}
