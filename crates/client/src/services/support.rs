//! Support tickets with an offline queue.
//!
//! Tickets that cannot reach the backend are appended to
//! `pendingSupportTickets`. Nothing replays them automatically; callers
//! decide when to run [`ApiClient::flush_pending_support_tickets`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use thrift_core::{NewSupportTicket, PendingSupportTicket, SupportTicket, TicketId};

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::request::{ApiResponse, RequestOptions};
use crate::storage::{KeyValueStore, KeyValueStoreExt, keys};

/// Confirmation of a created ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketReceipt {
    pub ok: bool,
    pub id: TicketId,
    /// Stored in the local queue instead of reaching the backend.
    pub queued: bool,
}

/// Result of replaying the offline queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub sent: usize,
    pub remaining: usize,
}

/// Ticket id from a backend response, which may send it as a string or a number.
fn receipt_from(response: ApiResponse) -> TicketReceipt {
    let (ok, id) = match response {
        ApiResponse::Json(value) => {
            let ok = value
                .get("ok")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(true);
            let id = match value.get("id") {
                Some(serde_json::Value::String(id)) => id.clone(),
                Some(serde_json::Value::Number(id)) => id.to_string(),
                _ => String::new(),
            };
            (ok, id)
        }
        ApiResponse::Text(_) => (true, String::new()),
    };

    TicketReceipt {
        ok,
        id: TicketId::new(id),
        queued: false,
    }
}

impl ApiClient {
    /// Submit a ticket, queueing it locally if the backend is unreachable.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session, or
    /// `ApiError::Storage` if the ticket cannot be queued.
    #[instrument(skip(self, ticket), fields(subject = %ticket.subject))]
    pub async fn create_support_ticket(&self, ticket: &NewSupportTicket) -> Result<TicketReceipt> {
        let options = RequestOptions::post().json(ticket)?.requires_auth();

        match self.request("/support", options).await {
            Ok(response) => Ok(receipt_from(response)),
            Err(e) if e.is_auth_required() => Err(e),
            Err(e) => {
                warn!(error = %e, "Support backend unavailable, queueing ticket locally");
                let id = self.enqueue_support_ticket(ticket.clone())?;
                Ok(TicketReceipt {
                    ok: true,
                    id,
                    queued: true,
                })
            }
        }
    }

    /// Tickets from the backend, or the local queue when offline.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session.
    #[instrument(skip(self))]
    pub async fn support_tickets(&self) -> Result<Vec<SupportTicket>> {
        let result = self
            .request_json::<Option<Vec<SupportTicket>>>("/support", RequestOptions::get().requires_auth())
            .await
            .map(Option::unwrap_or_default);

        super::or_fallback(result, "support", || {
            Ok(self
                .pending_support_tickets()?
                .into_iter()
                .map(SupportTicket::from)
                .collect())
        })
    }

    /// Tickets waiting in the local queue.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if the queue cannot be read.
    pub fn pending_support_tickets(&self) -> Result<Vec<PendingSupportTicket>> {
        Ok(self
            .store()
            .read_json(keys::PENDING_SUPPORT_TICKETS)?
            .unwrap_or_default())
    }

    /// Resubmit queued tickets once each.
    ///
    /// Tickets the backend accepts leave the queue by id; the rest, and any
    /// queued while the flush was running, stay for a later flush.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationRequired` without a session (the
    /// queue is left untouched), or `ApiError::Storage`.
    #[instrument(skip(self))]
    pub async fn flush_pending_support_tickets(&self) -> Result<FlushReport> {
        if self.sessions().bearer_token()?.is_none() {
            return Err(ApiError::AuthenticationRequired);
        }

        let pending = self.pending_support_tickets()?;
        if pending.is_empty() {
            return Ok(FlushReport::default());
        }

        let mut sent_ids = Vec::new();

        for ticket in pending {
            let options = RequestOptions::post().json(&ticket.ticket)?.requires_auth();
            match self.request("/support", options).await {
                Ok(_) => {
                    debug!(ticket_id = %ticket.id, "Resubmitted queued ticket");
                    sent_ids.push(ticket.id);
                }
                Err(e) if e.is_auth_required() => return Err(e),
                Err(e) => {
                    warn!(ticket_id = %ticket.id, error = %e, "Queued ticket still undeliverable");
                }
            }
        }

        // Re-read: tickets may have been queued during the sends.
        let mut remaining = self.pending_support_tickets()?;
        remaining.retain(|t| !sent_ids.contains(&t.id));

        if remaining.is_empty() {
            self.store().remove(keys::PENDING_SUPPORT_TICKETS)?;
        } else {
            self.store()
                .write_json(keys::PENDING_SUPPORT_TICKETS, &remaining)?;
        }

        let sent = sent_ids.len();
        info!(sent, remaining = remaining.len(), "Flushed support ticket queue");
        Ok(FlushReport {
            sent,
            remaining: remaining.len(),
        })
    }

    /// Append to the queue under a millisecond-timestamp id unique within it.
    fn enqueue_support_ticket(&self, ticket: NewSupportTicket) -> Result<TicketId> {
        let mut queue = self.pending_support_tickets()?;

        let now = Utc::now();
        let mut millis = now.timestamp_millis();
        while queue.iter().any(|t| t.id.as_str() == millis.to_string()) {
            millis += 1;
        }
        let id = TicketId::new(millis.to_string());

        queue.push(PendingSupportTicket {
            ticket,
            id: id.clone(),
            timestamp: now,
        });
        self.store().write_json(keys::PENDING_SUPPORT_TICKETS, &queue)?;

        Ok(id)
    }
}
