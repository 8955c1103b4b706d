//! Customer support ticket types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::TicketId;

/// Body of `POST /support`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupportTicket {
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A ticket recorded locally because the backend could not be reached.
///
/// Persisted in the `pendingSupportTickets` queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSupportTicket {
    #[serde(flatten)]
    pub ticket: NewSupportTicket,
    pub id: TicketId,
    pub timestamp: DateTime<Utc>,
}

/// A ticket as listed by `GET /support`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: TicketId,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<PendingSupportTicket> for SupportTicket {
    fn from(pending: PendingSupportTicket) -> Self {
        Self {
            id: pending.id,
            subject: pending.ticket.subject,
            message: pending.ticket.message,
            category: pending.ticket.category,
            status: Some("pending".to_string()),
            created_at: Some(pending.timestamp),
        }
    }
}
