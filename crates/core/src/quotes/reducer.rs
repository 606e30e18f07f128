//! Quote reducer.
//!
//! Every edit to a quote goes through [`reduce`], which applies exactly one
//! [`QuoteAction`] and re-settles prices and totals before returning. A
//! caller never observes a quote whose totals lag behind its items.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::model::{new_item_id, LaborItem, LaborItemInput, Quote, SupplyItem, SupplyItemInput};
use super::pricing::{recalculate, validate_rates};
use crate::errors::{QuoteError, Result};

/// The closed set of edits a quote accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteAction {
    SetClient(String),
    SetSite(String),
    SetObject(String),
    SetDate(NaiveDate),
    SetReminderDate(Option<NaiveDate>),
    SetSupplyExchangeRate(Decimal),
    SetSupplyMarginRate(Decimal),
    SetLaborExchangeRate(Decimal),
    SetLaborMarginRate(Decimal),
    AddSupplyItem(SupplyItemInput),
    UpdateSupplyItem { id: String, input: SupplyItemInput },
    RemoveSupplyItem { id: String },
    AddLaborItem(LaborItemInput),
    UpdateLaborItem { id: String, input: LaborItemInput },
    RemoveLaborItem { id: String },
}

impl QuoteAction {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            QuoteAction::SetClient(_) => "SET_CLIENT",
            QuoteAction::SetSite(_) => "SET_SITE",
            QuoteAction::SetObject(_) => "SET_OBJECT",
            QuoteAction::SetDate(_) => "SET_DATE",
            QuoteAction::SetReminderDate(_) => "SET_REMINDER_DATE",
            QuoteAction::SetSupplyExchangeRate(_) => "SET_SUPPLY_EXCHANGE_RATE",
            QuoteAction::SetSupplyMarginRate(_) => "SET_SUPPLY_MARGIN_RATE",
            QuoteAction::SetLaborExchangeRate(_) => "SET_LABOR_EXCHANGE_RATE",
            QuoteAction::SetLaborMarginRate(_) => "SET_LABOR_MARGIN_RATE",
            QuoteAction::AddSupplyItem(_) => "ADD_SUPPLY_ITEM",
            QuoteAction::UpdateSupplyItem { .. } => "UPDATE_SUPPLY_ITEM",
            QuoteAction::RemoveSupplyItem { .. } => "REMOVE_SUPPLY_ITEM",
            QuoteAction::AddLaborItem(_) => "ADD_LABOR_ITEM",
            QuoteAction::UpdateLaborItem { .. } => "UPDATE_LABOR_ITEM",
            QuoteAction::RemoveLaborItem { .. } => "REMOVE_LABOR_ITEM",
        }
    }
}

fn supply_item_mut<'a>(quote: &'a mut Quote, id: &str) -> Result<&'a mut SupplyItem> {
    quote
        .supply_items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| QuoteError::NotFound(format!("Supply item {} not found", id)).into())
}

fn labor_item_mut<'a>(quote: &'a mut Quote, id: &str) -> Result<&'a mut LaborItem> {
    quote
        .labor_items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| QuoteError::NotFound(format!("Labor item {} not found", id)).into())
}

fn remove_by_id<T, F>(items: &mut Vec<T>, id: &str, item_id: F, kind: &str) -> Result<()>
where
    F: Fn(&T) -> &str,
{
    let before = items.len();
    items.retain(|item| item_id(item) != id);
    if items.len() == before {
        return Err(QuoteError::NotFound(format!("{} item {} not found", kind, id)).into());
    }
    Ok(())
}

/// Applies one action to a copy of `quote` and returns the settled result.
///
/// On error `quote` is left exactly as it was.
pub fn reduce(quote: &Quote, action: QuoteAction) -> Result<Quote> {
    let mut next = quote.clone();

    match action {
        QuoteAction::SetClient(client) => next.client = client,
        QuoteAction::SetSite(site) => next.site = site,
        QuoteAction::SetObject(object) => next.object = object,
        QuoteAction::SetDate(date) => next.date = date,
        QuoteAction::SetReminderDate(date) => next.reminder_date = date,
        QuoteAction::SetSupplyExchangeRate(rate) => {
            validate_rates(rate, next.supply_pricing.margin_rate)?;
            next.supply_pricing.exchange_rate = rate;
        }
        QuoteAction::SetSupplyMarginRate(rate) => {
            validate_rates(next.supply_pricing.exchange_rate, rate)?;
            next.supply_pricing.margin_rate = rate;
        }
        QuoteAction::SetLaborExchangeRate(rate) => {
            validate_rates(rate, next.labor_pricing.margin_rate)?;
            next.labor_pricing.exchange_rate = rate;
        }
        QuoteAction::SetLaborMarginRate(rate) => {
            validate_rates(next.labor_pricing.exchange_rate, rate)?;
            next.labor_pricing.margin_rate = rate;
        }
        QuoteAction::AddSupplyItem(input) => {
            next.supply_items.push(SupplyItem::from_input(new_item_id(), input));
        }
        QuoteAction::UpdateSupplyItem { id, input } => {
            supply_item_mut(&mut next, &id)?.apply_input(input);
        }
        QuoteAction::RemoveSupplyItem { id } => {
            remove_by_id(&mut next.supply_items, &id, |item| item.id.as_str(), "Supply")?;
        }
        QuoteAction::AddLaborItem(input) => {
            next.labor_items.push(LaborItem::from_input(new_item_id(), input));
        }
        QuoteAction::UpdateLaborItem { id, input } => {
            labor_item_mut(&mut next, &id)?.apply_input(input);
        }
        QuoteAction::RemoveLaborItem { id } => {
            remove_by_id(&mut next.labor_items, &id, |item| item.id.as_str(), "Labor")?;
        }
    }

    let mut settled = recalculate(&next)?;
    settled.updated_at = Utc::now().naive_utc();
    Ok(settled)
}
