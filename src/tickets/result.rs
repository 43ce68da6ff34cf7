//! Outcome envelope returned by a plate lookup.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::models::TrafficTicket;

/// Either the tickets found for a plate, or a short error label.
///
/// Serializes as `{"success": true, "data": [...], "time": ...}` or
/// `{"success": false, "message": "...", "time": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Success {
        data: Vec<TrafficTicket>,
        time: DateTime<Utc>,
    },
    Failure {
        message: String,
        time: DateTime<Utc>,
    },
}

impl QueryResult {
    pub fn success(data: Vec<TrafficTicket>) -> Self {
        Self::Success {
            data,
            time: Utc::now(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
            time: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn data(&self) -> Option<&[TrafficTicket]> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

impl Serialize for QueryResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("QueryResult", 3)?;
        match self {
            Self::Success { data, time } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.serialize_field("time", time)?;
            }
            Self::Failure { message, time } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("message", message)?;
                state.serialize_field("time", time)?;
            }
        }
        state.end()
    }
}
