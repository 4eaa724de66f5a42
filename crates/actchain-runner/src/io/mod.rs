mod manifest;

use serde::de::DeserializeOwned;
use std::path::Path;

pub use manifest::{
    declared_actions, load_action_manifest, ActionManifest, ACTION_MANIFEST_SCHEMA_0_0_1,
};

/// Decodes JSON or YAML by file extension; unknown extensions try YAML, then JSON.
pub(crate) fn decode_by_extension<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T, String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(text).map_err(|error| format!("json decode error: {error}")),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(text).map_err(|error| format!("yaml decode error: {error}"))
        }
        _ => serde_yaml::from_str(text)
            .or_else(|_| serde_json::from_str(text))
            .map_err(|error| error.to_string()),
    }
}
