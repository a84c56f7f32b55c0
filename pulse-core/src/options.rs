use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::PulseError;

/// Wire schema, which also fixes how records are grouped into requests.
///
/// - `Marks`: a single request per write carrying one mark per record,
///   posted to `/stash/<id>/marks`, answered with `200 OK`.
/// - `Events`: one request per distinct record name, posted to
///   `/stash/<id>/events`, answered with `204 No Content`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    #[default]
    Marks,
    Events,
}

impl Schema {
    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Marks => "marks",
            Schema::Events => "events",
        }
    }

    pub fn expected_status(&self) -> StatusCode {
        match self {
            Schema::Marks => StatusCode::OK,
            Schema::Events => StatusCode::NO_CONTENT,
        }
    }
}

impl TryFrom<&str> for Schema {
    type Error = PulseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "marks" | "single" => Ok(Schema::Marks),
            "events" | "per-name" => Ok(Schema::Events),
            _ => Err(PulseError::InvalidSchema(value.to_string())),
        }
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
