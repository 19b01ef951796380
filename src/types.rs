//! Type-safe routing and host-list types
//!
//! This module replaces stringly-typed (or bare-integer) configuration values
//! with proper Rust enums that provide compile-time validation and exhaustive
//! matching.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Default routing mode applied to packages with no explicit override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DefaultMode {
    /// Everything bypasses the tunnel unless forced onto it
    #[default]
    NotOnVpn,
    /// Everything is routed through the tunnel unless forced off it
    OnVpn,
    /// Category-sensitive default: browsers and ordinary apps are filtered,
    /// system-privileged apps are not
    Intelligent,
}

impl DefaultMode {
    /// Check whether this mode consults the per-package category at all
    pub fn is_category_sensitive(&self) -> bool {
        matches!(self, Self::Intelligent)
    }
}

/// Final routing classification for one package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Route {
    /// Traffic goes through the filtering tunnel
    OnVpn,
    /// Traffic bypasses the filtering tunnel
    NotOnVpn,
}

/// Category assigned to a package when computing its default route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AppCategory {
    /// The application embedding this resolver
    Host,
    /// Registered handler for generic web-page viewing
    Browser,
    /// Part of the trusted base image
    SystemPrivileged,
    /// Any other user-facing application
    Ordinary,
}

/// How the DNS filter consumes entries from a host list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    /// Entries are blocked
    #[default]
    Deny,
    /// Entries are explicitly allowed, overriding deny lists
    Allow,
    /// The list is kept in the configuration but not consumed
    Ignore,
}

impl HostState {
    /// Check whether lists in this state feed the filter at all
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Ignore)
    }
}
