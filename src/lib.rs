pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, Settings};

pub use adapters::GroupMeClient;
pub use app::{Command, Reply, Session};
pub use crate::core::{codec::RosterCodec, store::RosterStore, sync::SyncEngine};
pub use domain::model::{Member, MemberRecord, Person, Roster};
pub use utils::error::{Result, RosterError};
