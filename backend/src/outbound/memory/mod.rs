//! In-process adapters for local runs and tests.

mod item_repository;

pub use item_repository::InMemoryItemRepository;
