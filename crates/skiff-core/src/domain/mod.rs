//! Domain model (locator, environment, commands, listings, states, errors).

pub mod command;
pub mod config;
pub mod environment;
pub mod errors;
pub mod listing;
pub mod locator;
pub mod state;

pub use command::{CommandSpec, StoreDialect};
pub use config::{ConfigError, InteractiveMode, RetrieveConfig};
pub use environment::TransferEnv;
pub use errors::{
    DiscoveryError, ErrorKind, ExitReason, ProcessError, RetrieveError, TransferError,
    ValidationError, ViewerError,
};
pub use listing::{ContainerPage, KeyPage};
pub use locator::{Locator, LocatorScheme};
pub use state::RetrievalState;
