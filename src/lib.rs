//! Core library for the ruslan disk controller.
//!
//! The crate exposes a gateway abstraction over a cloud block-storage API and
//! a controller that turns the provider's eventually-consistent disk
//! lifecycle into synchronous, idempotent volume operations: create, delete,
//! attach, and detach.

pub mod cbs;
pub mod config;
pub mod controller;
pub mod gateway;
pub mod params;
pub mod poll;
pub mod test_support;
pub mod volume;

pub use cbs::{CbsError, CbsGateway};
pub use config::CbsConfig;
pub use controller::{
    CONTROLLER_CAPABILITIES, ControllerCapability, ControllerError, ErrorCode, POLL_INTERVAL,
    VolumeController, WAIT_TIMEOUT,
};
pub use gateway::{DiskGateway, DiskSnapshot, DiskSpec, DiskState, GatewayFuture};
pub use params::{DiskParams, ParamError, ParamTable};
pub use poll::PollTimedOut;
pub use volume::{CreateVolumeRequest, Volume, VolumeCapability};
