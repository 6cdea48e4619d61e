use serde::{Deserialize, Serialize};
use std::fmt;

/// Price as it travels over the wire.
///
/// The server stores whatever the admin typed, so a record may come back with
/// either a JSON number or a string. Nothing here coerces one into the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Default for Price {
    fn default() -> Self {
        Price::Text(String::new())
    }
}

impl Price {
    pub fn is_blank(&self) -> bool {
        match self {
            Price::Number(_) => false,
            Price::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Number(n) => write!(f, "{}", n),
            Price::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Pot {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// Request body for create and update. Updates replace the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotDraft {
    pub name: String,
    pub category: String,
    pub price: Price,
    pub description: String,
    pub image: String,
}

/// Response of the list endpoint. A missing `pots` field means no pots.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PotList {
    #[serde(default)]
    pub pots: Option<Vec<Pot>>,
}

impl PotList {
    pub fn into_pots(self) -> Vec<Pot> {
        self.pots.unwrap_or_default()
    }
}

/// Envelope every mutation endpoint answers with.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Logical answer to a mutation. Transport failures are errors, not outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Applied,
    Rejected(Option<String>),
}

impl From<ApiEnvelope> for MutationOutcome {
    fn from(envelope: ApiEnvelope) -> Self {
        match envelope.success {
            true => MutationOutcome::Applied,
            false => MutationOutcome::Rejected(envelope.message.filter(|m| !m.trim().is_empty())),
        }
    }
}

/// Round trip in flight for a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    Updating,
    Deleting,
}

impl PendingOp {
    pub fn label(&self) -> &'static str {
        match self {
            PendingOp::Updating => "saving…",
            PendingOp::Deleting => "deleting…",
        }
    }
}
