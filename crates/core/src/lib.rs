pub mod config;
pub mod jobs;
pub mod metrics;
pub mod service;
pub mod shutdown;
pub mod stats;
pub mod store;
pub mod testing;
pub mod ticket;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, JobsConfig,
    ServerConfig,
};
pub use jobs::{
    DigestError, Digester, JobDispatcher, JobOutcome, JobTracker, Payload, Sha512Digester,
};
pub use service::{AdmissionError, HashService};
pub use shutdown::{ShutdownCoordinator, ShutdownState};
pub use stats::{StatsAggregator, StatsSnapshot};
pub use store::{MemoryResultStore, ResultStore, StoreError};
pub use ticket::{Ticket, TicketIssuer};
