use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ticket::Ticket;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "ticket_status", rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    Running,
    Poison,
}

impl Display for TicketStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TicketStatus::Pending => write!(f, "pending"),
            TicketStatus::Running => write!(f, "running"),
            TicketStatus::Poison => write!(f, "poison"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TicketStatus::Pending),
            "running" => Ok(TicketStatus::Running),
            "poison" => Ok(TicketStatus::Poison),
            _ => Err(anyhow::anyhow!("Invalid ticket status: {}", s)),
        }
    }
}

/// A ticket as stored in the queue table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct QueuedTicket {
    pub id: Uuid,
    pub payload: serde_json::Value,
    pub status: TicketStatus,
    pub dequeue_count: i32,
    pub visible_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QueuedTicket {
    /// Decodes the JSON payload into a `Ticket`.
    pub fn ticket(&self) -> serde_json::Result<Ticket> {
        Ticket::from_json(self.payload.clone())
    }

    /// What to do with this row after its handler failed.
    pub fn disposition_after_failure(&self, max_dequeue_count: i32) -> FailureDisposition {
        FailureDisposition::for_attempt(self.dequeue_count, max_dequeue_count)
    }
}

/// Outcome for a ticket whose handler returned an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Make the ticket visible again for another attempt.
    Release,
    /// Park the ticket; it will not be delivered again.
    Poison,
}

impl FailureDisposition {
    pub fn for_attempt(dequeue_count: i32, max_dequeue_count: i32) -> Self {
        if dequeue_count >= max_dequeue_count {
            FailureDisposition::Poison
        } else {
            FailureDisposition::Release
        }
    }
}
