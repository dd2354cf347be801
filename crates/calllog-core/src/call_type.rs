//! Call type enum as the single source of truth for call type names and codes.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};

/// The kind of a call-log entry.
///
/// Provider codes outside the known set (vendor extensions) are read as
/// [`CallType::Missed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    Incoming,
    Outgoing,
    Missed,
    Voicemail,
    Rejected,
    Blocked,
    AnsweredExternally,
}

impl CallType {
    /// All variants, in provider code order.
    pub const ALL: [Self; 7] = [
        Self::Incoming,
        Self::Outgoing,
        Self::Missed,
        Self::Voicemail,
        Self::Rejected,
        Self::Blocked,
        Self::AnsweredExternally,
    ];

    /// Maps a call-history provider code to a call type.
    ///
    /// Unknown codes map to [`CallType::Missed`].
    pub const fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Incoming,
            2 => Self::Outgoing,
            4 => Self::Voicemail,
            5 => Self::Rejected,
            6 => Self::Blocked,
            7 => Self::AnsweredExternally,
            _ => Self::Missed,
        }
    }

    /// The call-history provider code for this type.
    pub const fn code(self) -> i64 {
        match self {
            Self::Incoming => 1,
            Self::Outgoing => 2,
            Self::Missed => 3,
            Self::Voicemail => 4,
            Self::Rejected => 5,
            Self::Blocked => 6,
            Self::AnsweredExternally => 7,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
            Self::Missed => "missed",
            Self::Voicemail => "voicemail",
            Self::Rejected => "rejected",
            Self::Blocked => "blocked",
            Self::AnsweredExternally => "answered_externally",
        }
    }

    pub const fn is_voicemail(self) -> bool {
        matches!(self, Self::Voicemail)
    }

    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallType {
    type Err = UnknownCallType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incoming" => Ok(Self::Incoming),
            "outgoing" => Ok(Self::Outgoing),
            "missed" => Ok(Self::Missed),
            "voicemail" => Ok(Self::Voicemail),
            "rejected" => Ok(Self::Rejected),
            "blocked" => Ok(Self::Blocked),
            "answered_externally" => Ok(Self::AnsweredExternally),
            _ => Err(UnknownCallType(s.to_string())),
        }
    }
}

impl Serialize for CallType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CallType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(CallTypeVisitor)
    }
}

/// Accepts either a name or a provider code, leniently.
struct CallTypeVisitor;

impl Visitor<'_> for CallTypeVisitor {
    type Value = CallType;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a call type name or provider code")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(v.parse().unwrap_or_else(|err: UnknownCallType| {
            tracing::warn!(%err, "treating unknown call type as missed");
            CallType::Missed
        }))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(CallType::from_code(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(i64::try_from(v).map_or(CallType::Missed, CallType::from_code))
    }
}

/// Error type for unknown call type names.
#[derive(Debug, Clone)]
pub struct UnknownCallType(String);

impl fmt::Display for UnknownCallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown call type: {}", self.0)
    }
}

impl std::error::Error for UnknownCallType {}
