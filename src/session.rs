use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::authz::role::{self, Role};
use crate::error::StewardError;

const MAX_SESSION_FILE_SIZE: u64 = 64 * 1024; // 64 KiB

/// The acting user, as persisted by the login flow.
///
/// Every policy decision takes the viewer's role explicitly; nothing in this
/// crate looks the session up on its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Viewer {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "role::deserialize_lenient")]
    pub role: Option<Role>,
}

impl Viewer {
    pub fn new(id: &str, role: Option<Role>) -> Self {
        Self {
            id: id.to_owned(),
            name: None,
            role,
        }
    }

    /// Parse a persisted session. An unrecognized role yields a viewer with no
    /// authority rather than an error.
    pub fn from_json(content: &str) -> Result<Self, StewardError> {
        let viewer: Self =
            serde_json::from_str(content).map_err(|e| StewardError::SessionLoad(e.to_string()))?;

        if viewer.id.is_empty() {
            return Err(StewardError::SessionLoad("session has an empty id".to_owned()));
        }
        if viewer.role.is_none() {
            tracing::warn!(
                user = %viewer.id,
                "session role not recognized, treating as no authority"
            );
        }

        Ok(viewer)
    }

    pub fn load(path: &Path) -> Result<Self, StewardError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            StewardError::SessionLoad(format!("cannot read {}: {e}", path.display()))
        })?;

        if metadata.len() > MAX_SESSION_FILE_SIZE {
            return Err(StewardError::SessionLoad(format!(
                "session file exceeds {MAX_SESSION_FILE_SIZE} byte limit"
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            StewardError::SessionLoad(format!("cannot read {}: {e}", path.display()))
        })?;

        Self::from_json(&content)
    }
}

/// Backend ids arrive as strings or integers depending on the endpoint.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, found {other}"
        ))),
    }
}
