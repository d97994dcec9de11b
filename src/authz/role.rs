use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StewardError;

/// Rank reported for input that does not name a known role.
pub const UNRANKED: u8 = 99;

/// Organization roles ordered by authority.
/// Variant order defines the `Ord` derivation: Member < Staff < Leader < President < Admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Member,
    Staff,
    Leader,
    President,
    Admin,
}

impl Role {
    /// Every role, highest authority first.
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::President,
        Role::Leader,
        Role::Staff,
        Role::Member,
    ];

    /// Upper-case tag used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::President => "PRESIDENT",
            Role::Leader => "LEADER",
            Role::Staff => "STAFF",
            Role::Member => "MEMBER",
        }
    }

    /// Rank in the hierarchy, 1 for the highest authority.
    pub fn level(self) -> u8 {
        match self {
            Role::Admin => 1,
            Role::President => 2,
            Role::Leader => 3,
            Role::Staff => 4,
            Role::Member => 5,
        }
    }

    /// May reach the administrative area.
    pub fn is_admin_tier(self) -> bool {
        self >= Role::Staff
    }

    /// May open the role-assignment workflow at all.
    pub fn can_assign_staff_tier(self) -> bool {
        self >= Role::Leader
    }

    /// Map arbitrary external input to a role. Matching is case-insensitive;
    /// anything else (including `None` and `""`) resolves to `None`.
    pub fn normalize(raw: Option<&str>) -> Option<Role> {
        raw.and_then(|s| s.parse().ok())
    }
}

impl FromStr for Role {
    type Err = StewardError;

    fn from_str(s: &str) -> Result<Self, StewardError> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "PRESIDENT" => Ok(Role::President),
            "LEADER" => Ok(Role::Leader),
            "STAFF" => Ok(Role::Staff),
            "MEMBER" => Ok(Role::Member),
            _ => Err(StewardError::UnknownRole(s.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Serde adapter for role fields in backend or session JSON.
///
/// Unrecognized strings, `null` and non-string values become `None` instead of
/// failing the whole document, so a bad role never grants anything.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Role::normalize(value.as_str()))
}
