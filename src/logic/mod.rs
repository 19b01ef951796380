//! Logic modules — turns configuration and platform snapshots into decisions.
//!
//! The logic layer is pure: no I/O and no platform calls of its own. Platform
//! state comes in through the contracts in [`crate::platform`]; configuration
//! comes in as values from [`crate::config`].
//!
//! # Modules
//!
//! - `resolver` — Per-application VPN routing resolution

pub mod resolver;
