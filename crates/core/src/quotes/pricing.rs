//! Pricing calculator.
//!
//! ```text
//! converted_cost  = source_price * exchange_rate
//! unit_sell_price = converted_cost / (1 - margin_rate)
//! line_total      = unit_sell_price * billable units
//! ```
//!
//! Billable units are the quantity for supplies, and
//! `technician_count * hours * weekend_multiplier` for labor. The margin is a
//! fraction of the sell price, not of the cost. Nothing is rounded here;
//! [`round_for_display`] is for presentation only.

use rust_decimal::{Decimal, RoundingStrategy};

use super::model::{LaborItem, PricingParams, Quote, QuoteTotals, SupplyItem};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::{QuoteError, Result};

/// A line item the calculator knows how to price.
pub trait PricedItem: Clone {
    fn source_price(&self) -> Decimal;

    /// Multiplier turning the unit sell price into the line total.
    fn billable_units(&self) -> Result<Decimal>;

    /// Rejects negative raw inputs.
    fn validate_inputs(&self) -> Result<()>;

    fn set_derived(&mut self, converted_cost: Decimal, unit_sell_price: Decimal, line_total: Decimal);
}

fn require_non_negative(name: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(QuoteError::InvalidInput(format!("{} cannot be negative: {}", name, value)).into());
    }
    Ok(())
}

fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| QuoteError::InvalidInput(format!("{} * {} overflows", a, b)).into())
}

fn checked_add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| QuoteError::InvalidInput(format!("{} + {} overflows", a, b)).into())
}

fn checked_sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Result<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, checked_add)
}

impl PricedItem for SupplyItem {
    fn source_price(&self) -> Decimal {
        self.source_price
    }

    fn billable_units(&self) -> Result<Decimal> {
        Ok(self.quantity)
    }

    fn validate_inputs(&self) -> Result<()> {
        require_non_negative("source price", self.source_price)?;
        require_non_negative("quantity", self.quantity)
    }

    fn set_derived(&mut self, converted_cost: Decimal, unit_sell_price: Decimal, line_total: Decimal) {
        self.converted_cost = converted_cost;
        self.unit_sell_price = unit_sell_price;
        self.line_total = line_total;
    }
}

impl PricedItem for LaborItem {
    fn source_price(&self) -> Decimal {
        self.source_price
    }

    fn billable_units(&self) -> Result<Decimal> {
        let man_hours = checked_mul(self.technician_count, self.hours)?;
        checked_mul(man_hours, self.weekend_multiplier)
    }

    fn validate_inputs(&self) -> Result<()> {
        require_non_negative("source price", self.source_price)?;
        require_non_negative("technician count", self.technician_count)?;
        require_non_negative("hours", self.hours)?;
        require_non_negative("weekend multiplier", self.weekend_multiplier)
    }

    fn set_derived(&mut self, converted_cost: Decimal, unit_sell_price: Decimal, line_total: Decimal) {
        self.converted_cost = converted_cost;
        self.unit_sell_price = unit_sell_price;
        self.line_total = line_total;
    }
}

/// Validates an exchange rate / margin rate couple.
pub fn validate_rates(exchange_rate: Decimal, margin_rate: Decimal) -> Result<()> {
    require_non_negative("exchange rate", exchange_rate)?;
    if margin_rate < Decimal::ZERO || margin_rate >= Decimal::ONE {
        return Err(QuoteError::InvalidMarginRate(margin_rate.to_string()).into());
    }
    Ok(())
}

/// Returns a copy of `item` with its derived price fields recomputed.
pub fn compute_item_totals<T: PricedItem>(
    item: &T,
    exchange_rate: Decimal,
    margin_rate: Decimal,
) -> Result<T> {
    validate_rates(exchange_rate, margin_rate)?;
    item.validate_inputs()?;

    let converted_cost = checked_mul(item.source_price(), exchange_rate)?;
    let unit_sell_price = converted_cost
        .checked_div(Decimal::ONE - margin_rate)
        .ok_or_else(|| QuoteError::InvalidMarginRate(margin_rate.to_string()))?;
    let line_total = checked_mul(unit_sell_price, item.billable_units()?)?;

    let mut priced = item.clone();
    priced.set_derived(converted_cost, unit_sell_price, line_total);
    Ok(priced)
}

/// Re-prices every item of a list with one set of rates.
pub fn price_items<T: PricedItem>(items: &[T], params: &PricingParams) -> Result<Vec<T>> {
    items
        .iter()
        .map(|item| compute_item_totals(item, params.exchange_rate, params.margin_rate))
        .collect()
}

/// Aggregates already-priced items into HT/TVA/TTC totals.
pub fn compute_totals(
    supply_items: &[SupplyItem],
    labor_items: &[LaborItem],
    vat_rate: Decimal,
) -> Result<QuoteTotals> {
    require_non_negative("VAT rate", vat_rate)?;

    let total_supplies_ht = checked_sum(supply_items.iter().map(|item| item.line_total))?;
    let total_labor_ht = checked_sum(labor_items.iter().map(|item| item.line_total))?;
    let total_ht = checked_add(total_supplies_ht, total_labor_ht)?;
    let tva = checked_mul(total_ht, vat_rate)?;
    let total_ttc = checked_add(total_ht, tva)?;

    Ok(QuoteTotals {
        total_supplies_ht,
        total_labor_ht,
        total_ht,
        tva,
        total_ttc,
    })
}

/// Re-prices all items of a quote and re-derives its totals.
///
/// This is the only place totals are written. On error the input is untouched.
pub fn recalculate(quote: &Quote) -> Result<Quote> {
    let supply_items = price_items(&quote.supply_items, &quote.supply_pricing)?;
    let labor_items = price_items(&quote.labor_items, &quote.labor_pricing)?;
    let totals = compute_totals(&supply_items, &labor_items, quote.vat_rate)?;

    let mut settled = quote.clone();
    settled.supply_items = supply_items;
    settled.labor_items = labor_items;
    settled.totals = totals;
    Ok(settled)
}

/// Rounds an amount to 2 decimals for display (midpoint away from zero).
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}
