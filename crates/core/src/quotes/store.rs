//! Quote store: the single active quote and its lifecycle.
//!
//! ```text
//! Uninitialized --create--> Draft --save--> Persisted --confirm--> Confirmed
//!                                             |    ^
//!                                             +save+  (new version record)
//! ```
//!
//! The store is owned by the composition root and borrowed mutably for every
//! operation, so two saves can never overlap through the same store. Failed
//! operations leave the state exactly as it was so the user can retry.

use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

use super::model::{NewQuote, PricingParams, Quote};
use super::persistence::QuotePersistenceTrait;
use super::pricing::{recalculate, validate_rates};
use super::reducer::{reduce, QuoteAction};
use crate::errors::{Error, PersistenceError, QuoteError, Result};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::fx::FxServiceTrait;
use crate::ids::generate_quote_id;
use crate::settings::QuoteSettings;

/// Lifecycle position of the active quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Uninitialized,
    Draft,
    Persisted,
    Confirmed,
}

/// The active quote, tagged with its lifecycle position.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QuoteState {
    #[default]
    Uninitialized,
    /// In memory only, never submitted
    Draft(Quote),
    /// Matches a record on the server
    Persisted(Quote),
    /// Persisted and confirmed; read-only
    Confirmed(Quote),
}

impl QuoteState {
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            QuoteState::Uninitialized => None,
            QuoteState::Draft(q) | QuoteState::Persisted(q) | QuoteState::Confirmed(q) => Some(q),
        }
    }

    pub fn status(&self) -> QuoteStatus {
        match self {
            QuoteState::Uninitialized => QuoteStatus::Uninitialized,
            QuoteState::Draft(_) => QuoteStatus::Draft,
            QuoteState::Persisted(_) => QuoteStatus::Persisted,
            QuoteState::Confirmed(_) => QuoteStatus::Confirmed,
        }
    }

    /// Places a server record in the state matching its confirmation flag.
    fn from_server(quote: Quote) -> Self {
        if quote.confirmed {
            QuoteState::Confirmed(quote)
        } else {
            QuoteState::Persisted(quote)
        }
    }
}

fn validation_failure(message: &str) -> Error {
    QuoteError::ValidationFailure(message.to_string()).into()
}

/// Converts a persistence-layer error into the quote taxonomy.
fn into_quote_error(err: Error) -> Error {
    match err {
        Error::Persistence(PersistenceError::NotFound(what)) => QuoteError::NotFound(what).into(),
        Error::Persistence(e) => QuoteError::PersistenceFailure(e.to_string()).into(),
        Error::Quote(e) => e.into(),
        other => QuoteError::PersistenceFailure(other.to_string()).into(),
    }
}

/// Checks the fields the server requires before a quote is submitted.
fn validate_for_save(quote: &Quote) -> Result<()> {
    if quote.client.trim().is_empty() {
        return Err(validation_failure("A client is required before saving"));
    }
    if quote.site.trim().is_empty() {
        return Err(validation_failure("A site is required before saving"));
    }
    Ok(())
}

/// Explicit container for the active quote.
pub struct QuoteStore {
    state: QuoteState,
    persistence: Arc<dyn QuotePersistenceTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    settings: QuoteSettings,
    event_sink: Arc<dyn DomainEventSink>,
}

impl QuoteStore {
    pub fn new(
        persistence: Arc<dyn QuotePersistenceTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
        settings: QuoteSettings,
    ) -> Self {
        Self {
            state: QuoteState::Uninitialized,
            persistence,
            fx_service,
            settings,
            event_sink: Arc::new(NoOpDomainEventSink),
        }
    }

    /// Sets the domain event sink for this store.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn state(&self) -> &QuoteState {
        &self.state
    }

    pub fn status(&self) -> QuoteStatus {
        self.state.status()
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.state.quote()
    }

    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    /// Starts a new draft at version 0, replacing whatever was active.
    ///
    /// Exchange rates come from the live provider when it answers, otherwise
    /// from the configured fallbacks. Margin rates come from the request or
    /// the configured default.
    pub async fn create(&mut self, new_quote: NewQuote) -> Result<Quote> {
        let supply_margin = new_quote
            .supply_margin_rate
            .unwrap_or(self.settings.default_margin_rate);
        let labor_margin = new_quote
            .labor_margin_rate
            .unwrap_or(self.settings.default_margin_rate);

        let supply_rate = self
            .fx_service
            .rate_or_fallback(&self.settings.supply_currency)
            .await;
        let labor_rate = self
            .fx_service
            .rate_or_fallback(&self.settings.labor_currency)
            .await;

        validate_rates(supply_rate.rate, supply_margin)?;
        validate_rates(labor_rate.rate, labor_margin)?;

        let draft = Quote::new_draft(
            generate_quote_id(),
            new_quote,
            PricingParams::new(
                &supply_rate.from_currency,
                &supply_rate.to_currency,
                supply_rate.rate,
                supply_margin,
            ),
            PricingParams::new(
                &labor_rate.from_currency,
                &labor_rate.to_currency,
                labor_rate.rate,
                labor_margin,
            ),
            self.settings.vat_rate,
        );
        let draft = recalculate(&draft)?;

        info!(
            "Created draft quote {} (supply rate {} from {})",
            draft.id, supply_rate.rate, supply_rate.source
        );
        self.event_sink.emit(DomainEvent::quote_created(&draft.id));
        self.state = QuoteState::Draft(draft.clone());
        Ok(draft)
    }

    /// Loads a persisted quote and makes it the active one.
    pub async fn load(&mut self, quote_id: &str) -> Result<Quote> {
        let fetched = self
            .persistence
            .get_quote_by_id(quote_id)
            .await
            .map_err(into_quote_error)?;
        let settled = recalculate(&fetched)?;

        debug!("Loaded quote {} (version {})", settled.id, settled.version);
        self.state = QuoteState::from_server(settled.clone());
        Ok(settled)
    }

    /// Applies one edit to the active quote.
    pub fn dispatch(&mut self, action: QuoteAction) -> Result<Quote> {
        let action_name = action.name();
        let reminder_update = matches!(action, QuoteAction::SetReminderDate(_));

        let next_state = match &self.state {
            QuoteState::Uninitialized => {
                return Err(validation_failure("No active quote to edit"));
            }
            QuoteState::Confirmed(q) => {
                warn!("Rejected {} on confirmed quote {}", action_name, q.id);
                return Err(validation_failure("Confirmed quotes are read-only"));
            }
            QuoteState::Draft(q) => QuoteState::Draft(reduce(q, action)?),
            QuoteState::Persisted(q) => QuoteState::Persisted(reduce(q, action)?),
        };

        let updated = next_state
            .quote()
            .cloned()
            .ok_or_else(|| Error::Unexpected("Edited state lost its quote".to_string()))?;
        debug!("Applied {} to quote {}", action_name, updated.id);
        if reminder_update {
            self.event_sink
                .emit(DomainEvent::reminder_changed(&updated.id, updated.reminder_date));
        }
        self.state = next_state;
        Ok(updated)
    }

    /// Persists the active quote.
    ///
    /// A draft is submitted as-is. A persisted quote is submitted as a new
    /// record: fresh ID, parent set to the chain root, version + 1. The
    /// previous record is never touched.
    pub async fn save(&mut self) -> Result<Quote> {
        let candidate = match &self.state {
            QuoteState::Uninitialized => {
                return Err(validation_failure("No active quote to save"));
            }
            QuoteState::Confirmed(_) => {
                return Err(validation_failure("Confirmed quotes are read-only"));
            }
            QuoteState::Draft(q) => q.clone(),
            QuoteState::Persisted(q) => q.next_version(),
        };
        validate_for_save(&candidate)?;

        let persisted = match self.submit(&candidate).await {
            Ok(quote) => quote,
            Err(e) => {
                warn!("Saving quote {} failed: {}", candidate.id, e);
                return Err(into_quote_error(e));
            }
        };

        info!(
            "Saved quote {} (version {}, parent {:?})",
            persisted.id, persisted.version, persisted.parent_id
        );
        self.event_sink.emit(DomainEvent::quote_saved(
            &persisted.id,
            persisted.version,
            persisted.parent_id.clone(),
        ));
        self.state = QuoteState::Persisted(persisted.clone());
        Ok(persisted)
    }

    /// Sends the quote record then each item, in order. Not atomic: a
    /// failure after the record was created leaves a partial record remotely.
    async fn submit(&self, quote: &Quote) -> Result<Quote> {
        let mut stored = self.persistence.save_quote(quote).await?;

        let mut supply_items = Vec::with_capacity(quote.supply_items.len());
        for item in &quote.supply_items {
            supply_items.push(self.persistence.create_supply_item(&stored.id, item).await?);
        }
        let mut labor_items = Vec::with_capacity(quote.labor_items.len());
        for item in &quote.labor_items {
            labor_items.push(self.persistence.create_labor_item(&stored.id, item).await?);
        }

        stored.supply_items = supply_items;
        stored.labor_items = labor_items;
        recalculate(&stored)
    }

    /// Confirms the active persisted quote with an external reference number.
    pub async fn confirm(&mut self, reference_number: &str) -> Result<Quote> {
        let reference = reference_number.trim();
        let current = match &self.state {
            QuoteState::Persisted(q) => q,
            QuoteState::Draft(_) => {
                return Err(validation_failure("Save the quote before confirming it"));
            }
            QuoteState::Confirmed(_) => {
                return Err(validation_failure("Quote is already confirmed"));
            }
            QuoteState::Uninitialized => {
                return Err(validation_failure("No active quote to confirm"));
            }
        };
        if reference.is_empty() {
            return Err(validation_failure(
                "A reference number is required to confirm a quote",
            ));
        }

        let mut confirmed = match self
            .persistence
            .confirm_quote(&current.id, true, reference)
            .await
        {
            Ok(quote) => recalculate(&quote)?,
            Err(e) => {
                warn!("Confirming quote {} failed: {}", current.id, e);
                return Err(into_quote_error(e));
            }
        };
        confirmed.confirmed = true;
        confirmed.reference_number = Some(reference.to_string());

        info!("Confirmed quote {} with reference {}", confirmed.id, reference);
        self.event_sink
            .emit(DomainEvent::quote_confirmed(&confirmed.id, reference));
        self.state = QuoteState::Confirmed(confirmed.clone());
        Ok(confirmed)
    }

    /// Deletes the active quote. Drafts are discarded without a remote call.
    pub async fn delete(&mut self) -> Result<()> {
        let quote_id = match &self.state {
            QuoteState::Uninitialized => {
                return Err(validation_failure("No active quote to delete"));
            }
            QuoteState::Draft(q) => {
                debug!("Discarded draft quote {}", q.id);
                self.state = QuoteState::Uninitialized;
                return Ok(());
            }
            QuoteState::Persisted(q) | QuoteState::Confirmed(q) => q.id.clone(),
        };

        if let Err(e) = self.persistence.delete_quote(&quote_id).await {
            warn!("Deleting quote {} failed: {}", quote_id, e);
            return Err(into_quote_error(e));
        }

        info!("Deleted quote {}", quote_id);
        self.event_sink.emit(DomainEvent::quote_deleted(&quote_id));
        self.state = QuoteState::Uninitialized;
        Ok(())
    }

    /// Drops the active quote without touching the server.
    pub fn reset(&mut self) {
        self.state = QuoteState::Uninitialized;
    }
}
