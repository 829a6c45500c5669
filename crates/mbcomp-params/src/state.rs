//! Opaque state blobs for hosts.
//!
//! The blob is a flat JSON object mapping each parameter's string id to its
//! stored value. Keys are names rather than indices so blobs survive
//! parameters being added or reordered.

use serde_json::{Map, Value};

use crate::{ParamError, ParamStore};

impl ParamStore {
    /// Serializes every parameter value.
    pub fn save_state(&self) -> Result<Vec<u8>, ParamError> {
        let mut map = Map::new();
        for (i, desc) in self.descriptors().iter().enumerate() {
            let value = self.get_value(i).unwrap_or(desc.default);
            map.insert(desc.string_id.to_string(), Value::from(f64::from(value)));
        }
        let bytes = serde_json::to_vec(&Value::Object(map))?;
        tracing::debug!(params = self.param_count(), bytes = bytes.len(), "saved state");
        Ok(bytes)
    }

    /// Restores values from a blob written by [`save_state`](Self::save_state).
    ///
    /// Unknown keys are skipped with a warning and parameters missing from
    /// the blob keep their current value. The blob is validated as a whole
    /// before anything is written, so a bad entry leaves the store untouched.
    /// Returns the number of parameters restored.
    pub fn load_state(&self, data: &[u8]) -> Result<usize, ParamError> {
        let Value::Object(map) = serde_json::from_slice::<Value>(data)? else {
            return Err(ParamError::StateFormat(
                "expected an object of parameter values".to_string(),
            ));
        };

        let mut updates = Vec::with_capacity(map.len());
        for (key, value) in &map {
            let Some(index) = self.index_by_string_id(key) else {
                tracing::warn!(param = %key, "ignoring unknown parameter in state");
                continue;
            };
            let number = value
                .as_f64()
                .map(|v| v as f32)
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    ParamError::invalid_value(key, value.to_string(), "expected a number")
                })?;
            updates.push((index, number));
        }

        for &(index, value) in &updates {
            self.set_value(index, value);
        }
        tracing::debug!(restored = updates.len(), "loaded state");
        Ok(updates.len())
    }
}
