//! Status aggregation and position reconciliation for motorized
//! windows and blinds on paired smart-home accessories.
//!
//! The crate normalizes raw accessory records into a domain model,
//! filters them against a multi-criteria selection, and computes the
//! minimal batched write needed to move selected devices to a target
//! position. Pairing and session security for the device protocol are
//! out of scope; the bridge is reached through the [`client::AccessoryClient`]
//! trait, with an HTTP implementation for already-established sessions
//! and a mock for tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use skylight::{Controller, WindowSelection};
//! use skylight::mock::MockAccessoryClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MockAccessoryClient::new();
//!     let controller = Controller::new(Box::new(client), Vec::new());
//!
//!     let status = controller.read_status(&WindowSelection::default()).await?;
//!     for window in &status.windows {
//!         println!("{}: {}", window.friendly_name(), window.current_position);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod extract;
pub mod logging;
pub mod mock;
pub mod model;
pub mod selection;

// Re-export main types
pub use crate::{
    controller::Controller,
    error::{Result, SkylightError},
    model::{SensorReading, SetStatus, Status, WindowInfo, WindowKind, WindowMapping},
    selection::WindowSelection,
};
