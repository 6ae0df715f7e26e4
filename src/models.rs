use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the submitter wants to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Communication {
    Telegram,
    Email,
    Teams,
    Whatsapp,
}

impl FromStr for Communication {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "telegram" => Ok(Self::Telegram),
            "email" => Ok(Self::Email),
            "teams" => Ok(Self::Teams),
            "whatsapp" => Ok(Self::Whatsapp),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Communication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Telegram => "telegram",
            Self::Email => "email",
            Self::Teams => "teams",
            Self::Whatsapp => "whatsapp",
        };
        f.write_str(s)
    }
}

/// A persisted contact/booking record.
///
/// Stored as JSON in the submission keyspace with a retention TTL; the id
/// is generated server-side and never client-supplied. All free-text
/// fields are sanitized before the record is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub name: String,
    pub communication: Communication,
    pub info: String,
    pub comments: String,
    /// Booked slot as `YYYY-MM-DD-HH:MM`, if the submitter picked one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    /// Client-reported submission time, echoed into the record when present.
    pub timestamp: String,
    pub user_agent: String,
    pub referrer: String,
    pub ip_address: String,
    /// Server-side creation time (authoritative).
    pub created_at: String,
    pub status: String,
}

/// Form-submission request body. Field names match the browser client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub communication: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub referrer: String,
}

#[derive(Debug, Deserialize)]
pub struct PinAuthPayload {
    #[serde(default)]
    pub pin: String,
}

#[derive(Debug, Deserialize)]
pub struct DeletePayload {
    #[serde(default)]
    pub id: Option<String>,
}
