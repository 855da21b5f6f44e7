//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ItemsCommand, ItemsQuery, LostItemNotifier};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub notifier: Arc<dyn LostItemNotifier>,
    pub items: Arc<dyn ItemsCommand>,
    pub items_query: Arc<dyn ItemsQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use campus_finder::domain::{ItemsService, UnconfiguredNotifier};
    /// use campus_finder::inbound::http::state::HttpState;
    /// use campus_finder::outbound::memory::InMemoryItemRepository;
    /// use mockable::DefaultClock;
    ///
    /// let notifier = Arc::new(UnconfiguredNotifier::new("Missing RESEND_API_KEY"));
    /// let items = Arc::new(ItemsService::new(
    ///     Arc::new(InMemoryItemRepository::default()),
    ///     notifier.clone(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(notifier, items.clone(), items);
    /// let _notifier = state.notifier.clone();
    /// ```
    pub fn new(
        notifier: Arc<dyn LostItemNotifier>,
        items: Arc<dyn ItemsCommand>,
        items_query: Arc<dyn ItemsQuery>,
    ) -> Self {
        Self {
            notifier,
            items,
            items_query,
        }
    }
}
