//! Typed traffic-ticket records produced from the portal tables.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which portal table a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Media {
    /// Tickets issued by an officer on the street.
    Physical,
    /// Electronic tickets (fixed cameras).
    Virtual,
}

impl Media {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Virtual => "virtual",
        }
    }
}

impl std::fmt::Display for Media {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Money owed on a ticket. `None` when the cell is missing or unparseable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Amount {
    /// Base fine ("Valor Multa").
    pub value: Option<f64>,
    /// Accrued interest ("Interés").
    pub interes: Option<f64>,
    /// Collection costs ("Costas").
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Resolution {
    pub number: Option<String>,
    /// Date text exactly as the portal renders it.
    pub date: Option<String>,
}

/// One sanction entry for a plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TrafficTicket {
    pub media: Media,
    pub document: Option<String>,
    pub sanction_type: Option<String>,
    pub status: Option<String>,
    pub number: Option<String>,
    pub amount: Amount,
    pub resolution: Resolution,
}
