use anyhow::Context;
use rust_decimal::Decimal;
use std::str::FromStr;

use devis_api_client::DEFAULT_API_URL;
use devis_core::settings::QuoteSettings;

pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub settings: QuoteSettings,
}

impl Config {
    /// Reads `.env` then the process environment. Unset variables keep the
    /// compiled-in defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = lookup("DEVIS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_token = lookup("DEVIS_API_TOKEN").filter(|t| !t.trim().is_empty());

        let mut settings = QuoteSettings::default();
        if let Some(rate) = decimal_var(&lookup, "DEVIS_VAT_RATE")? {
            settings.vat_rate = rate;
        }
        if let Some(rate) = decimal_var(&lookup, "DEVIS_DEFAULT_MARGIN_RATE")? {
            settings.default_margin_rate = rate;
        }
        if let Some(multiplier) = decimal_var(&lookup, "DEVIS_WEEKEND_MULTIPLIER")? {
            settings.weekend_multiplier = multiplier;
        }
        if let Some(rate) = decimal_var(&lookup, "DEVIS_SUPPLY_FALLBACK_RATE")? {
            settings.supply_currency.fallback_rate = rate;
        }
        if let Some(rate) = decimal_var(&lookup, "DEVIS_LABOR_FALLBACK_RATE")? {
            settings.labor_currency.fallback_rate = rate;
        }
        settings
            .validate()
            .context("Invalid pricing configuration")?;

        Ok(Self {
            api_url,
            api_token,
            settings,
        })
    }
}

fn decimal_var(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> anyhow::Result<Option<Decimal>> {
    lookup(key)
        .map(|raw| {
            Decimal::from_str(raw.trim()).with_context(|| format!("Invalid {}: {}", key, raw))
        })
        .transpose()
}
