//! OrderApp: a small client app driving a synchronizing data store.
//!
//! The [`Controller`] turns the five user actions into store calls, keeps two
//! live queries open, and watches connectivity in the background.

pub mod action;
pub mod config;
pub mod connectivity;
pub mod controller;

pub use action::{Action, ActionOutcome, AddRecordsReport};
pub use config::{ConfigError, ControllerConfig};
pub use connectivity::{ConnectivityMonitor, ConnectivityProbe, StaticProbe, TcpProbe};
pub use controller::Controller;
