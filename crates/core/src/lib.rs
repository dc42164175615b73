pub mod app_state;
pub mod clients;
pub mod repositories;
pub mod services;
pub mod stores;

pub use app_state::AppState;
pub use stores::{Datastore, InMemoryStore, PgStore};
