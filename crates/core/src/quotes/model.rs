//! Quote domain models.
//!
//! A quote carries two independent pricing sub-models (supplies and labor),
//! the raw line items, and totals derived from both. Derived fields are only
//! written by the pricing calculator.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{format_quote_id, generate_id, generate_quote_id_excluding};

// =============================================================================
// Pricing parameters
// =============================================================================

/// Exchange rate and margin rate applied to one family of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingParams {
    pub from_currency: String,
    pub to_currency: String,
    pub exchange_rate: Decimal,
    /// Fraction of the sell price kept as margin, in `[0, 1)`
    pub margin_rate: Decimal,
}

impl PricingParams {
    pub fn new(from: &str, to: &str, exchange_rate: Decimal, margin_rate: Decimal) -> Self {
        Self {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            exchange_rate,
            margin_rate,
        }
    }
}

// =============================================================================
// Line items
// =============================================================================

/// Equipment or material bought in the source currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyItem {
    pub id: String,
    pub description: String,
    /// Catalog reference, when the item comes from the supply catalog
    #[serde(default)]
    pub reference: Option<String>,
    /// Unit cost in the source currency
    pub source_price: Decimal,
    pub quantity: Decimal,
    #[serde(default)]
    pub converted_cost: Decimal,
    #[serde(default)]
    pub unit_sell_price: Decimal,
    #[serde(default)]
    pub line_total: Decimal,
}

/// Raw inputs of a supply line, as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyItemInput {
    pub description: String,
    #[serde(default)]
    pub reference: Option<String>,
    pub source_price: Decimal,
    pub quantity: Decimal,
}

impl SupplyItem {
    /// Builds an unpriced item; derived fields are filled by the calculator.
    pub fn from_input(id: String, input: SupplyItemInput) -> Self {
        Self {
            id,
            description: input.description,
            reference: input.reference,
            source_price: input.source_price,
            quantity: input.quantity,
            converted_cost: Decimal::ZERO,
            unit_sell_price: Decimal::ZERO,
            line_total: Decimal::ZERO,
        }
    }

    pub fn apply_input(&mut self, input: SupplyItemInput) {
        self.description = input.description;
        self.reference = input.reference;
        self.source_price = input.source_price;
        self.quantity = input.quantity;
    }
}

/// Technician time, costed per hour in the source currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborItem {
    pub id: String,
    pub description: String,
    /// Hourly cost of one technician in the source currency
    pub source_price: Decimal,
    pub technician_count: Decimal,
    pub hours: Decimal,
    /// 1 for weekday work
    #[serde(default = "default_weekend_multiplier")]
    pub weekend_multiplier: Decimal,
    #[serde(default)]
    pub converted_cost: Decimal,
    #[serde(default)]
    pub unit_sell_price: Decimal,
    #[serde(default)]
    pub line_total: Decimal,
}

/// Raw inputs of a labor line, as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborItemInput {
    pub description: String,
    pub source_price: Decimal,
    pub technician_count: Decimal,
    pub hours: Decimal,
    #[serde(default = "default_weekend_multiplier")]
    pub weekend_multiplier: Decimal,
}

fn default_weekend_multiplier() -> Decimal {
    Decimal::ONE
}

impl LaborItem {
    pub fn from_input(id: String, input: LaborItemInput) -> Self {
        Self {
            id,
            description: input.description,
            source_price: input.source_price,
            technician_count: input.technician_count,
            hours: input.hours,
            weekend_multiplier: input.weekend_multiplier,
            converted_cost: Decimal::ZERO,
            unit_sell_price: Decimal::ZERO,
            line_total: Decimal::ZERO,
        }
    }

    pub fn apply_input(&mut self, input: LaborItemInput) {
        self.description = input.description;
        self.source_price = input.source_price;
        self.technician_count = input.technician_count;
        self.hours = input.hours;
        self.weekend_multiplier = input.weekend_multiplier;
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregate amounts, always derived from the items and rates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    #[serde(rename = "totalSuppliesHT")]
    pub total_supplies_ht: Decimal,
    #[serde(rename = "totalLaborHT")]
    pub total_labor_ht: Decimal,
    #[serde(rename = "totalHT")]
    pub total_ht: Decimal,
    pub tva: Decimal,
    #[serde(rename = "totalTTC")]
    pub total_ttc: Decimal,
}

// =============================================================================
// Quote
// =============================================================================

/// A commercial quote ("devis").
///
/// `id` is always the canonical `P-########` identifier; use
/// [`Quote::display_id`] for the versioned form shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub client: String,
    pub site: String,
    pub object: String,
    pub date: NaiveDate,
    pub supply_pricing: PricingParams,
    pub labor_pricing: PricingParams,
    #[serde(default)]
    pub supply_items: Vec<SupplyItem>,
    #[serde(default)]
    pub labor_items: Vec<LaborItem>,
    #[serde(flatten)]
    pub totals: QuoteTotals,
    pub vat_rate: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub version: u32,
    /// Root of the version chain; `None` for the root itself
    #[serde(default, deserialize_with = "deserialize_parent_id")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub reminder_date: Option<NaiveDate>,
}

/// Input model for creating a new quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuote {
    pub client: String,
    pub site: String,
    #[serde(default)]
    pub object: String,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Defaults to the configured margin rate
    #[serde(default)]
    pub supply_margin_rate: Option<Decimal>,
    #[serde(default)]
    pub labor_margin_rate: Option<Decimal>,
    #[serde(default)]
    pub reminder_date: Option<NaiveDate>,
}

impl Quote {
    /// Builds an in-memory draft at version 0. Totals start at zero and are
    /// settled by the caller through the pricing calculator.
    pub fn new_draft(
        id: String,
        new_quote: NewQuote,
        supply_pricing: PricingParams,
        labor_pricing: PricingParams,
        vat_rate: Decimal,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id,
            client: new_quote.client,
            site: new_quote.site,
            object: new_quote.object,
            date: new_quote.date.unwrap_or_else(|| now.date()),
            supply_pricing,
            labor_pricing,
            supply_items: Vec::new(),
            labor_items: Vec::new(),
            totals: QuoteTotals::default(),
            vat_rate,
            created_at: now,
            updated_at: now,
            version: 0,
            parent_id: None,
            confirmed: false,
            reference_number: None,
            reminder_date: new_quote.reminder_date,
        }
    }

    /// Versioned identifier for display, e.g. `P-00421337-002`.
    pub fn display_id(&self) -> String {
        format_quote_id(&self.id, self.version)
    }

    /// ID of the first record of this quote's version chain.
    pub fn chain_root_id(&self) -> &str {
        self.parent_id.as_deref().unwrap_or(&self.id)
    }

    /// Mints the next version of this quote as a new record.
    ///
    /// The copy gets a fresh ID, points at the chain root, and has its
    /// version bumped by one. Its line items get fresh IDs too. `self` is
    /// left untouched.
    pub fn next_version(&self) -> Quote {
        let now = Utc::now().naive_utc();
        let mut next = self.clone();
        next.id = generate_quote_id_excluding(&self.id);
        next.parent_id = Some(self.chain_root_id().to_string());
        next.version = self.version + 1;
        for item in &mut next.supply_items {
            item.id = new_item_id();
        }
        for item in &mut next.labor_items {
            item.id = new_item_id();
        }
        next.confirmed = false;
        next.reference_number = None;
        next.created_at = now;
        next.updated_at = now;
        next
    }

    pub fn find_supply_item(&self, item_id: &str) -> Option<&SupplyItem> {
        self.supply_items.iter().find(|item| item.id == item_id)
    }

    pub fn find_labor_item(&self, item_id: &str) -> Option<&LaborItem> {
        self.labor_items.iter().find(|item| item.id == item_id)
    }
}

/// Fresh client-side key for a new line item.
pub fn new_item_id() -> String {
    generate_id()
}

/// Older records mark "no parent" with an empty string or `"0"`.
fn deserialize_parent_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|id| {
        let trimmed = id.trim();
        if trimmed.is_empty() || trimmed == "0" {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
