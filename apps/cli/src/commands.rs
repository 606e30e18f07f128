use anyhow::{bail, Context};
use serde_json::Value;
use std::path::Path;

use devis_core::clients::{ClientServiceTrait, NewClient, NewSite, NewSplit};
use devis_core::fx::FxServiceTrait;
use devis_core::ids::parse_display_quote_id;
use devis_core::quotes::{reduce, recalculate, NewQuote, PricingParams, Quote, QuoteAction, QuoteStore};
use devis_core::settings::{CurrencyPair, QuoteSettings};

use crate::cli::{ClientCommand, CreateArgs};
use crate::main_lib::AppContext;
use crate::render;

/// Quote ID used for offline pricing, never persisted.
const OFFLINE_QUOTE_ID: &str = "P-00000000";

pub fn read_actions(path: &Path, settings: &QuoteSettings) -> anyhow::Result<Vec<QuoteAction>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    parse_actions(&raw, settings).with_context(|| format!("Invalid actions in {}", path.display()))
}

/// Parses an action array. A labor payload flagged `"weekend": true` without
/// an explicit `weekendMultiplier` gets the configured weekend multiplier.
pub fn parse_actions(raw: &str, settings: &QuoteSettings) -> anyhow::Result<Vec<QuoteAction>> {
    let mut actions: Vec<Value> = serde_json::from_str(raw)?;
    for action in &mut actions {
        let labor_input = match action.get("type").and_then(Value::as_str) {
            Some("ADD_LABOR_ITEM") => action.pointer_mut("/payload"),
            Some("UPDATE_LABOR_ITEM") => action.pointer_mut("/payload/input"),
            _ => None,
        };
        if let Some(Value::Object(input)) = labor_input {
            let weekend = input.remove("weekend").and_then(|v| v.as_bool()).unwrap_or(false);
            if weekend && !input.contains_key("weekendMultiplier") {
                input.insert(
                    "weekendMultiplier".to_string(),
                    Value::String(settings.weekend_multiplier.to_string()),
                );
            }
        }
    }
    actions
        .into_iter()
        .map(|action| serde_json::from_value(action).map_err(anyhow::Error::from))
        .collect()
}

/// Accepts both `P-########` and `P-########-NNN`.
fn canonical_id(id: &str) -> String {
    parse_display_quote_id(id.trim())
        .map(|(canonical, _)| canonical)
        .unwrap_or_else(|| id.trim().to_string())
}

fn apply_actions(store: &mut QuoteStore, actions: Vec<QuoteAction>) -> anyhow::Result<()> {
    for action in actions {
        let name = action.name();
        store
            .dispatch(action)
            .with_context(|| format!("{} rejected", name))?;
    }
    Ok(())
}

/// Prices actions against a draft built from the configured fallback rates.
pub fn price_offline(settings: &QuoteSettings, actions: Vec<QuoteAction>) -> anyhow::Result<Quote> {
    let pricing = |pair: &CurrencyPair| {
        PricingParams::new(&pair.from, &pair.to, pair.fallback_rate, settings.default_margin_rate)
    };
    let draft = Quote::new_draft(
        OFFLINE_QUOTE_ID.to_string(),
        NewQuote::default(),
        pricing(&settings.supply_currency),
        pricing(&settings.labor_currency),
        settings.vat_rate,
    );

    let mut quote = recalculate(&draft)?;
    for action in actions {
        let name = action.name();
        quote = reduce(&quote, action).with_context(|| format!("{} rejected", name))?;
    }
    Ok(quote)
}

/// Offline `price` command: reads an action file and prints the priced draft.
pub fn price(settings: &QuoteSettings, actions_path: &Path, json: bool) -> anyhow::Result<()> {
    let actions = read_actions(actions_path, settings)?;
    let quote = price_offline(settings, actions)?;
    render::print(json, &quote, render::quote_text)
}

pub async fn create(ctx: &mut AppContext, args: CreateArgs, json: bool) -> anyhow::Result<()> {
    let client_margin = match &args.client_id {
        Some(client_id) => Some(ctx.client_service.margin_rate_for(client_id).await?),
        None => None,
    };
    let new_quote = NewQuote {
        client: args.client,
        site: args.site,
        object: args.object,
        date: None,
        supply_margin_rate: args.supply_margin.or(client_margin),
        labor_margin_rate: args.labor_margin.or(client_margin),
        reminder_date: args.reminder,
    };

    ctx.store.create(new_quote).await?;
    if let Some(path) = &args.actions {
        let actions = read_actions(path, ctx.store.settings())?;
        apply_actions(&mut ctx.store, actions)?;
    }

    let quote = if args.dry_run {
        ctx.store
            .quote()
            .cloned()
            .context("No active quote after create")?
    } else {
        ctx.store.save().await?
    };
    render::print(json, &quote, render::quote_text)
}

pub async fn show(ctx: &mut AppContext, id: &str, json: bool) -> anyhow::Result<()> {
    let quote = ctx.store.load(&canonical_id(id)).await?;
    render::print(json, &quote, render::quote_text)
}

pub async fn revise(
    ctx: &mut AppContext,
    id: &str,
    actions_path: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let actions = read_actions(actions_path, ctx.store.settings())?;
    ctx.store.load(&canonical_id(id)).await?;
    apply_actions(&mut ctx.store, actions)?;
    let quote = ctx.store.save().await?;
    render::print(json, &quote, render::quote_text)
}

pub async fn confirm(ctx: &mut AppContext, id: &str, reference: &str, json: bool) -> anyhow::Result<()> {
    ctx.store.load(&canonical_id(id)).await?;
    let quote = ctx.store.confirm(reference).await?;
    render::print(json, &quote, render::quote_text)
}

pub async fn delete(ctx: &mut AppContext, id: &str) -> anyhow::Result<()> {
    let canonical = canonical_id(id);
    ctx.store.load(&canonical).await?;
    ctx.store.delete().await?;
    println!("Deleted {}", canonical);
    Ok(())
}

pub async fn rate(ctx: &AppContext, from: &str, to: &str, json: bool) -> anyhow::Result<()> {
    let from = from.to_ascii_uppercase();
    let to = to.to_ascii_uppercase();
    let fallback = [&ctx.settings.supply_currency, &ctx.settings.labor_currency]
        .into_iter()
        .find(|pair| pair.from == from && pair.to == to)
        .map(|pair| pair.fallback_rate);

    let rate = match fallback {
        Some(fallback_rate) => {
            ctx.fx_service
                .rate_or_fallback(&CurrencyPair::new(&from, &to, fallback_rate))
                .await
        }
        None => ctx.fx_service.get_latest_exchange_rate(&from, &to).await?,
    };
    render::print(json, &rate, render::rate_text)
}

pub async fn client(ctx: &AppContext, command: ClientCommand, json: bool) -> anyhow::Result<()> {
    let service = &ctx.client_service;
    match command {
        ClientCommand::List => {
            let clients = service.list_clients().await?;
            render::print(json, &clients, |clients| {
                clients.iter().map(render::client_text).collect::<Vec<_>>().join("\n")
            })
        }
        ClientCommand::New {
            name,
            margin,
            email,
            phone,
            address,
        } => {
            let client = service
                .create_client(NewClient {
                    name,
                    margin_rate: margin,
                    email,
                    phone,
                    address,
                })
                .await?;
            render::print(json, &client, render::client_text)
        }
        ClientCommand::Sites {
            client_id,
            add,
            address,
        } => {
            if let Some(name) = add {
                let site = service
                    .create_site(NewSite {
                        client_id,
                        name,
                        address,
                    })
                    .await?;
                return render::print(json, &site, render::site_text);
            }
            if address.is_some() {
                bail!("--address only applies with --add");
            }
            let sites = service.list_sites(&client_id).await?;
            render::print(json, &sites, |sites| {
                sites.iter().map(render::site_text).collect::<Vec<_>>().join("\n")
            })
        }
        ClientCommand::Splits { site_id, add } => {
            if let Some(name) = add {
                let split = service.create_split(NewSplit { site_id, name }).await?;
                return render::print(json, &split, render::split_text);
            }
            let splits = service.list_splits(&site_id).await?;
            render::print(json, &splits, |splits| {
                splits.iter().map(render::split_text).collect::<Vec<_>>().join("\n")
            })
        }
    }
}
