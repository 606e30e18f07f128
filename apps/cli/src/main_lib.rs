use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use devis_api_client::ApiClient;
use devis_core::clients::ClientService;
use devis_core::events::{DomainEventSink, LogDomainEventSink};
use devis_core::fx::FxService;
use devis_core::quotes::QuoteStore;
use devis_core::settings::QuoteSettings;

use crate::config::Config;

pub struct AppContext {
    pub store: QuoteStore,
    pub client_service: ClientService,
    pub fx_service: Arc<FxService>,
    pub settings: QuoteSettings,
}

pub fn init_tracing() {
    let log_format = std::env::var("DEVIS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_context(config: &Config) -> anyhow::Result<AppContext> {
    let api = Arc::new(ApiClient::new(&config.api_url, config.api_token.as_deref())?);
    tracing::info!("Quote API at {}", api.base_url());

    let event_sink: Arc<dyn DomainEventSink> = Arc::new(LogDomainEventSink);
    let fx_service = Arc::new(FxService::new(api.clone()));
    let store = QuoteStore::new(api.clone(), fx_service.clone(), config.settings.clone())
        .with_event_sink(event_sink.clone());
    let client_service = ClientService::new(api).with_event_sink(event_sink);

    Ok(AppContext {
        store,
        client_service,
        fx_service,
        settings: config.settings.clone(),
    })
}
