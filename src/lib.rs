//! League leaderboard web app: library with models, business logic and the document store client.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use logic::{
    coerce_field_value, compare_players, rank_players, win_loss_ratio, AccessGate, AccessVerdict,
    EditMode, EditSession,
};
pub use models::{EditError, PlayerRecord, RecordField};
pub use store::{DocumentStore, JsonBinStore, StoreError};
