//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain reaches the item store, the identity
//! provider and the email provider. Each exposes strongly typed errors so
//! adapters map their failures into predictable variants instead of
//! returning `anyhow::Result`. Driving ports are the use-cases inbound
//! adapters call.

mod email_dispatcher;
mod identity_resolver;
mod item_repository;
mod items_command;
mod items_query;
mod lost_item_notifier;
mod macros;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use email_dispatcher::MockEmailDispatcher;
pub use email_dispatcher::{EmailDispatchError, EmailDispatcher};
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{IdentityResolver, IdentityResolverError};
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemRepository, ItemRepositoryError};
#[cfg(test)]
pub use items_command::MockItemsCommand;
pub use items_command::{ItemsCommand, ReportItemResponse};
#[cfg(test)]
pub use items_query::MockItemsQuery;
pub use items_query::ItemsQuery;
#[cfg(test)]
pub use lost_item_notifier::MockLostItemNotifier;
pub use lost_item_notifier::LostItemNotifier;
