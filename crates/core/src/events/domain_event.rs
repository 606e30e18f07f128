//! Domain event types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Facts about quote and client changes, emitted after the change succeeded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A draft was created in memory (not yet persisted).
    QuoteCreated { quote_id: String },

    /// A quote record was persisted. `parent_id` is set for revisions.
    QuoteSaved {
        quote_id: String,
        version: u32,
        parent_id: Option<String>,
    },

    /// A persisted quote was confirmed with an external reference.
    QuoteConfirmed {
        quote_id: String,
        reference_number: String,
    },

    /// A persisted quote was deleted remotely.
    QuoteDeleted { quote_id: String },

    /// A follow-up reminder was set or cleared on the active quote.
    ReminderChanged {
        quote_id: String,
        reminder_date: Option<NaiveDate>,
    },

    /// A client record was created.
    ClientCreated { client_id: String },
}

impl DomainEvent {
    pub fn quote_created(quote_id: &str) -> Self {
        Self::QuoteCreated {
            quote_id: quote_id.to_string(),
        }
    }

    pub fn quote_saved(quote_id: &str, version: u32, parent_id: Option<String>) -> Self {
        Self::QuoteSaved {
            quote_id: quote_id.to_string(),
            version,
            parent_id,
        }
    }

    pub fn quote_confirmed(quote_id: &str, reference_number: &str) -> Self {
        Self::QuoteConfirmed {
            quote_id: quote_id.to_string(),
            reference_number: reference_number.to_string(),
        }
    }

    pub fn quote_deleted(quote_id: &str) -> Self {
        Self::QuoteDeleted {
            quote_id: quote_id.to_string(),
        }
    }

    pub fn reminder_changed(quote_id: &str, reminder_date: Option<NaiveDate>) -> Self {
        Self::ReminderChanged {
            quote_id: quote_id.to_string(),
            reminder_date,
        }
    }

    pub fn client_created(client_id: &str) -> Self {
        Self::ClientCreated {
            client_id: client_id.to_string(),
        }
    }

    /// Event name as serialized in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::QuoteCreated { .. } => "quote_created",
            Self::QuoteSaved { .. } => "quote_saved",
            Self::QuoteConfirmed { .. } => "quote_confirmed",
            Self::QuoteDeleted { .. } => "quote_deleted",
            Self::ReminderChanged { .. } => "reminder_changed",
            Self::ClientCreated { .. } => "client_created",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_tag_matches_kind() {
        let events = vec![
            DomainEvent::quote_created("P-00000001"),
            DomainEvent::quote_saved("P-00000002", 1, Some("P-00000001".to_string())),
            DomainEvent::quote_confirmed("P-00000002", "BC-2024-118"),
            DomainEvent::quote_deleted("P-00000002"),
            DomainEvent::reminder_changed("P-00000002", None),
            DomainEvent::client_created("0007"),
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.kind());
        }
    }
}
