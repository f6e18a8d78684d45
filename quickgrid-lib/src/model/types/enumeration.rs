//! Enumeration member values

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A single enumeration member.
///
/// The ordinal drives comparison and ordering. The name is what users type
/// into a filter and what remote queries receive.
///
/// # Example
///
/// ```
/// use quickgrid_lib::model::types::EnumMember;
///
/// // Ordinal only (what an accessor usually produces)
/// let status = EnumMember::new(1);
///
/// // With name (what the coercer produces)
/// let status = EnumMember::named(1, "Active");
/// assert_eq!(status, EnumMember::new(1));
/// ```
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct EnumMember {
    /// Position of the member in its declaration.
    pub ordinal: i32,
    /// The member name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EnumMember {
    /// Creates a member from its ordinal.
    pub fn new(ordinal: i32) -> Self {
        Self { ordinal, name: None }
    }

    /// Creates a member with its declared name.
    pub fn named(ordinal: i32, name: impl Into<String>) -> Self {
        Self {
            ordinal,
            name: Some(name.into()),
        }
    }
}

impl PartialEq for EnumMember {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
    }
}

impl std::hash::Hash for EnumMember {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ordinal.hash(state);
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.ordinal),
        }
    }
}

impl From<i32> for EnumMember {
    fn from(ordinal: i32) -> Self {
        Self::new(ordinal)
    }
}

impl From<EnumMember> for i32 {
    fn from(member: EnumMember) -> Self {
        member.ordinal
    }
}
