//! Builders wiring outbound adapters into the HTTP state.

use std::io;
use std::sync::Arc;

use actix_web::web;
use campus_finder::config::NotifierConfig;
use campus_finder::domain::ports::{ItemRepository, ItemsCommand, ItemsQuery, LostItemNotifier};
use campus_finder::domain::{ItemsService, MatchNotifyService, UnconfiguredNotifier};
use campus_finder::inbound::http::state::HttpState;
use campus_finder::outbound::memory::InMemoryItemRepository;
use campus_finder::outbound::resend::ResendEmailDispatcher;
use campus_finder::outbound::supabase::{
    SupabaseClient, SupabaseIdentityResolver, SupabaseItemRepository,
};
use mockable::DefaultClock;
use tracing::{info, warn};

use super::ServerConfig;

fn client(
    credentials: &campus_finder::config::SupabaseCredentials,
    config: &ServerConfig,
) -> io::Result<SupabaseClient> {
    SupabaseClient::new(credentials, config.upstream_timeout)
        .map_err(|e| io::Error::other(format!("failed to build Supabase client: {e}")))
}

fn build_notifier(
    notifier: &NotifierConfig,
    config: &ServerConfig,
) -> io::Result<Arc<dyn LostItemNotifier>> {
    let supabase = client(&notifier.supabase, config)?;
    let dispatcher = ResendEmailDispatcher::new(
        &config.resend_base_url,
        notifier.resend_api_key.clone(),
        config.upstream_timeout,
    )
    .map_err(|e| io::Error::other(format!("failed to build email dispatcher: {e}")))?;
    Ok(Arc::new(MatchNotifyService::new(
        Arc::new(SupabaseItemRepository::new(supabase.clone())),
        Arc::new(SupabaseIdentityResolver::new(supabase)),
        Arc::new(dispatcher),
        notifier.notification_settings(),
    )))
}

fn item_ports<R>(
    repository: Arc<R>,
    notifier: Arc<dyn LostItemNotifier>,
) -> (Arc<dyn ItemsCommand>, Arc<dyn ItemsQuery>)
where
    R: ItemRepository + 'static,
{
    let service = Arc::new(ItemsService::new(
        repository,
        notifier,
        Arc::new(DefaultClock),
    ));
    let command: Arc<dyn ItemsCommand> = service.clone();
    let query: Arc<dyn ItemsQuery> = service;
    (command, query)
}

/// Build the HTTP state from resolved configuration.
///
/// Missing notification secrets install [`UnconfiguredNotifier`]. Items use
/// the hosted store when its credentials are present and the in-memory store
/// otherwise.
///
/// # Errors
/// Returns an error when an HTTP client cannot be constructed.
pub fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let notifier = match &config.notifier {
        Ok(notifier) => build_notifier(notifier, config)?,
        Err(error) => {
            warn!(%error, "notification pipeline disabled");
            Arc::new(UnconfiguredNotifier::new(error.to_string()))
        }
    };

    let (items, items_query) = match (&config.supabase, config.memory_store) {
        (Ok(credentials), false) => {
            info!(url = %credentials.url, "using hosted item store");
            let repository = SupabaseItemRepository::new(client(credentials, config)?);
            item_ports(Arc::new(repository), notifier.clone())
        }
        (Err(error), false) => {
            warn!(%error, "hosted item store unavailable; items are kept in memory");
            item_ports(Arc::new(InMemoryItemRepository::default()), notifier.clone())
        }
        (_, true) => {
            info!("items are kept in memory");
            item_ports(Arc::new(InMemoryItemRepository::default()), notifier.clone())
        }
    };

    Ok(web::Data::new(HttpState::new(notifier, items, items_query)))
}
