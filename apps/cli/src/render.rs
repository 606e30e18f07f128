use std::fmt::Write;

use rust_decimal::Decimal;
use serde::Serialize;

use devis_core::clients::{Client, Site, Split};
use devis_core::fx::ExchangeRate;
use devis_core::quotes::{round_for_display, PricingParams, Quote};

fn money(amount: Decimal) -> String {
    format!("{:.2}", round_for_display(amount))
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn pricing_line(label: &str, pricing: &PricingParams) -> String {
    format!(
        "{:<9} {} -> {} @ {}  margin {}",
        label,
        pricing.from_currency,
        pricing.to_currency,
        pricing.exchange_rate.normalize(),
        percent(pricing.margin_rate)
    )
}

/// Human-readable quote sheet.
pub fn quote_text(quote: &Quote) -> String {
    let mut out = String::new();
    let status = match (quote.confirmed, quote.reference_number.as_deref()) {
        (true, Some(reference)) => format!("confirmed ({})", reference),
        (true, None) => "confirmed".to_string(),
        (false, _) => "open".to_string(),
    };

    let _ = writeln!(out, "Devis {}  [{}]", quote.display_id(), status);
    if let Some(parent) = &quote.parent_id {
        let _ = writeln!(out, "Revision of {}", parent);
    }
    let _ = writeln!(out, "Client   {}", quote.client);
    let _ = writeln!(out, "Site     {}", quote.site);
    if !quote.object.is_empty() {
        let _ = writeln!(out, "Object   {}", quote.object);
    }
    let _ = writeln!(out, "Date     {}", quote.date);
    if let Some(reminder) = quote.reminder_date {
        let _ = writeln!(out, "Reminder {}", reminder);
    }
    let _ = writeln!(out, "{}", pricing_line("Supplies", &quote.supply_pricing));
    let _ = writeln!(out, "{}", pricing_line("Labor", &quote.labor_pricing));

    if !quote.supply_items.is_empty() {
        let _ = writeln!(out, "\nSupplies");
        for item in &quote.supply_items {
            let _ = writeln!(
                out,
                "  {:<36} {:>6} x {:>12} = {:>14}",
                item.description,
                item.quantity.normalize(),
                money(item.unit_sell_price),
                money(item.line_total)
            );
        }
    }
    if !quote.labor_items.is_empty() {
        let _ = writeln!(out, "\nLabor");
        for item in &quote.labor_items {
            let weekend = if item.weekend_multiplier > Decimal::ONE {
                format!(" (x{})", item.weekend_multiplier.normalize())
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "  {:<36} {} tech x {} h{} @ {} = {:>14}",
                item.description,
                item.technician_count.normalize(),
                item.hours.normalize(),
                weekend,
                money(item.unit_sell_price),
                money(item.line_total)
            );
        }
    }

    let totals = &quote.totals;
    let _ = writeln!(out);
    let _ = writeln!(out, "Total fournitures HT {:>14}", money(totals.total_supplies_ht));
    let _ = writeln!(out, "Total main d'oeuvre HT {:>12}", money(totals.total_labor_ht));
    let _ = writeln!(out, "Total HT {:>26}", money(totals.total_ht));
    let _ = writeln!(out, "TVA ({}) {:>22}", percent(quote.vat_rate), money(totals.tva));
    let _ = write!(out, "Total TTC {:>25}", money(totals.total_ttc));
    out
}

pub fn rate_text(rate: &ExchangeRate) -> String {
    format!(
        "{} = {} ({})",
        ExchangeRate::pair_key(&rate.from_currency, &rate.to_currency),
        rate.rate.normalize(),
        rate.source
    )
}

pub fn client_text(client: &Client) -> String {
    format!("{}  {}  margin {}", client.id, client.name, percent(client.margin_rate))
}

pub fn site_text(site: &Site) -> String {
    match &site.address {
        Some(address) => format!("{}  {}  ({})", site.id, site.name, address),
        None => format!("{}  {}", site.id, site.name),
    }
}

pub fn split_text(split: &Split) -> String {
    format!("{}  {}", split.id, split.name)
}

/// Prints either the JSON form of `value` or its text rendering.
pub fn print<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use devis_core::quotes::{reduce, NewQuote, QuoteAction, SupplyItemInput};
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_text_shows_display_id_and_totals() {
        let draft = Quote::new_draft(
            "P-00000042".to_string(),
            NewQuote {
                client: "STEG".to_string(),
                site: "Poste Bir Kassaa".to_string(),
                ..Default::default()
            },
            PricingParams::new("EUR", "TND", dec!(1.2), dec!(0.2)),
            PricingParams::new("TND", "TND", dec!(1), dec!(0.2)),
            dec!(0.19),
        );
        let quote = reduce(
            &draft,
            QuoteAction::AddSupplyItem(SupplyItemInput {
                description: "Split".to_string(),
                reference: None,
                source_price: dec!(100),
                quantity: dec!(3),
            }),
        )
        .unwrap();

        let text = quote_text(&quote);
        assert!(text.starts_with("Devis P-00000042-000  [open]"));
        assert!(text.contains("450.00"));
        assert!(text.contains("TVA (19%)"));
        assert!(text.contains("535.50"));
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(dec!(0.2)), "20%");
        assert_eq!(percent(dec!(0.185)), "18.5%");
    }
}
