use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use super::role::Role;
use crate::error::StewardError;

const MAX_LABELS_FILE_SIZE: u64 = 64 * 1024; // 64 KiB

const DEFAULT_FALLBACK_LABEL: &str = "Unknown";
const DEFAULT_FALLBACK_COLOR: &str = "bg-gray-100 text-gray-600";

/// Built-in label for a role, with a fallback for unrecognized input.
pub fn display_name(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => "Administrator",
        Some(Role::President) => "President",
        Some(Role::Leader) => "Leader",
        Some(Role::Staff) => "Staff",
        Some(Role::Member) => "Member",
        None => DEFAULT_FALLBACK_LABEL,
    }
}

/// Built-in badge class for a role, with a fallback for unrecognized input.
pub fn color_class(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => "bg-red-100 text-red-800",
        Some(Role::President) => "bg-purple-100 text-purple-800",
        Some(Role::Leader) => "bg-blue-100 text-blue-800",
        Some(Role::Staff) => "bg-green-100 text-green-800",
        Some(Role::Member) => "bg-gray-100 text-gray-800",
        None => DEFAULT_FALLBACK_COLOR,
    }
}

// --- TOML deserialization structs (private, map 1:1 to TOML schema) ---

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LabelsFile {
    fallback_label: Option<String>,
    fallback_color: Option<String>,
    #[serde(default)]
    labels: HashMap<String, String>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

fn role_key(table: &str, key: &str) -> Result<Role, StewardError> {
    match key {
        "admin" => Ok(Role::Admin),
        "president" => Ok(Role::President),
        "leader" => Ok(Role::Leader),
        "staff" => Ok(Role::Staff),
        "member" => Ok(Role::Member),
        _ => Err(StewardError::ConfigValidation(format!(
            "{table}.{key}: not a role"
        ))),
    }
}

// --- Resolved display metadata ---

/// Presentation metadata for roles: built-in defaults, optionally overridden
/// from a TOML file (localized labels, site-specific badge classes).
/// Carries no authorization semantics.
#[derive(Debug, Clone)]
pub struct RoleLabels {
    labels: HashMap<Role, String>,
    colors: HashMap<Role, String>,
    fallback_label: String,
    fallback_color: String,
}

impl Default for RoleLabels {
    fn default() -> Self {
        Self {
            labels: Role::ALL
                .iter()
                .map(|&r| (r, display_name(Some(r)).to_owned()))
                .collect(),
            colors: Role::ALL
                .iter()
                .map(|&r| (r, color_class(Some(r)).to_owned()))
                .collect(),
            fallback_label: DEFAULT_FALLBACK_LABEL.to_owned(),
            fallback_color: DEFAULT_FALLBACK_COLOR.to_owned(),
        }
    }
}

impl FromStr for RoleLabels {
    type Err = StewardError;

    /// Parse overrides from a TOML string and layer them over the defaults.
    fn from_str(content: &str) -> Result<Self, StewardError> {
        let file: LabelsFile =
            toml::from_str(content).map_err(|e| StewardError::ConfigLoad(e.to_string()))?;

        let mut resolved = Self::default();

        for (key, label) in file.labels {
            let role = role_key("labels", &key)?;
            resolved.labels.insert(role, non_empty("labels", role, label)?);
        }
        for (key, color) in file.colors {
            let role = role_key("colors", &key)?;
            resolved.colors.insert(role, non_empty("colors", role, color)?);
        }
        if let Some(label) = file.fallback_label {
            if label.trim().is_empty() {
                return Err(StewardError::ConfigValidation(
                    "fallback_label must not be empty".to_owned(),
                ));
            }
            resolved.fallback_label = label;
        }
        if let Some(color) = file.fallback_color {
            if color.trim().is_empty() {
                return Err(StewardError::ConfigValidation(
                    "fallback_color must not be empty".to_owned(),
                ));
            }
            resolved.fallback_color = color;
        }

        Ok(resolved)
    }
}

impl RoleLabels {
    /// Load overrides from a TOML file. Checks file size before reading.
    pub fn load(path: &Path) -> Result<Self, StewardError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            StewardError::ConfigLoad(format!("cannot read {}: {e}", path.display()))
        })?;

        if metadata.len() > MAX_LABELS_FILE_SIZE {
            return Err(StewardError::ConfigLoad(format!(
                "labels file exceeds {MAX_LABELS_FILE_SIZE} byte limit"
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            StewardError::ConfigLoad(format!("cannot read {}: {e}", path.display()))
        })?;

        let labels: Self = content.parse()?;
        tracing::debug!(path = %path.display(), "loaded role labels");
        Ok(labels)
    }

    pub fn display_name(&self, role: Option<Role>) -> &str {
        role.and_then(|r| self.labels.get(&r))
            .unwrap_or(&self.fallback_label)
    }

    pub fn color_class(&self, role: Option<Role>) -> &str {
        role.and_then(|r| self.colors.get(&r))
            .unwrap_or(&self.fallback_color)
    }
}

fn non_empty(table: &str, role: Role, value: String) -> Result<String, StewardError> {
    if value.trim().is_empty() {
        return Err(StewardError::ConfigValidation(format!(
            "{table}.{}: value must not be empty",
            role.as_str().to_lowercase()
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KOREAN_LABELS: &str = r#"
fallback_label = "알 수 없음"

[labels]
admin = "관리자"
president = "회장"
leader = "팀장"
staff = "운영진"
member = "회원"

[colors]
admin = "badge-danger"
"#;

    #[test]
    fn builtin_lookups() {
        assert_eq!(display_name(Some(Role::Admin)), "Administrator");
        assert_eq!(display_name(None), "Unknown");
        assert_eq!(color_class(Some(Role::Staff)), "bg-green-100 text-green-800");
        assert_eq!(color_class(None), "bg-gray-100 text-gray-600");
    }

    #[test]
    fn defaults_match_builtins() {
        let labels = RoleLabels::default();
        for role in Role::ALL {
            assert_eq!(labels.display_name(Some(role)), display_name(Some(role)));
            assert_eq!(labels.color_class(Some(role)), color_class(Some(role)));
        }
        assert_eq!(labels.display_name(None), "Unknown");
    }

    #[test]
    fn overrides_layer_over_defaults() {
        let labels = RoleLabels::from_str(KOREAN_LABELS).expect("labels should parse");
        assert_eq!(labels.display_name(Some(Role::President)), "회장");
        assert_eq!(labels.display_name(None), "알 수 없음");
        assert_eq!(labels.color_class(Some(Role::Admin)), "badge-danger");
        // Not overridden.
        assert_eq!(labels.color_class(Some(Role::Leader)), "bg-blue-100 text-blue-800");
        assert_eq!(labels.color_class(None), "bg-gray-100 text-gray-600");
    }

    #[test]
    fn empty_file_is_defaults() {
        let labels = RoleLabels::from_str("").expect("empty file should parse");
        assert_eq!(labels.display_name(Some(Role::Member)), "Member");
    }

    #[test]
    fn unknown_role_key() {
        let toml = r#"
[labels]
superadmin = "root"
"#;
        let err = RoleLabels::from_str(toml).unwrap_err();
        assert!(matches!(err, StewardError::ConfigValidation(ref m) if m.contains("superadmin")));
    }

    #[test]
    fn unknown_top_level_field() {
        let err = RoleLabels::from_str("theme = \"dark\"\n").unwrap_err();
        assert!(matches!(err, StewardError::ConfigLoad(_)));
    }

    #[test]
    fn empty_label_rejected() {
        let toml = r#"
[labels]
staff = "  "
"#;
        let err = RoleLabels::from_str(toml).unwrap_err();
        assert!(matches!(err, StewardError::ConfigValidation(ref m) if m.contains("labels.staff")));
    }

    #[test]
    fn empty_fallback_label_rejected() {
        let err = RoleLabels::from_str("fallback_label = \"\"\n").unwrap_err();
        assert!(matches!(err, StewardError::ConfigValidation(_)));
    }

    #[test]
    fn empty_fallback_color_rejected() {
        let err = RoleLabels::from_str("fallback_color = \"\"\n").unwrap_err();
        assert!(matches!(err, StewardError::ConfigValidation(ref m) if m.contains("fallback_color")));
        let err = RoleLabels::from_str("fallback_color = \" \"\n").unwrap_err();
        assert!(matches!(err, StewardError::ConfigValidation(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.toml");
        std::fs::write(&path, KOREAN_LABELS).unwrap();
        let labels = RoleLabels::load(&path).expect("file should load");
        assert_eq!(labels.display_name(Some(Role::Staff)), "운영진");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RoleLabels::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, StewardError::ConfigLoad(_)));
    }

    #[test]
    fn load_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.toml");
        let padding = "#".repeat(MAX_LABELS_FILE_SIZE as usize + 1);
        std::fs::write(&path, padding).unwrap();
        let err = RoleLabels::load(&path).unwrap_err();
        assert!(matches!(err, StewardError::ConfigLoad(ref m) if m.contains("limit")));
    }
}
