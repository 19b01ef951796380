//! vpnsplit: per-application split-tunnel routing policy.
//!
//! This library decides which installed applications have their traffic
//! routed through a DNS-filtering tunnel and which bypass it, based on a
//! persisted filter configuration and two injected platform contracts. It
//! also models the filter configuration itself (host lists, upstream DNS
//! servers, routing policy) with JSON persistence.
//!
//! The tunnel data-plane, DNS filtering, host-list fetching, and UI live in
//! the embedding application; this crate is the pure policy core they share.

pub mod config;
pub mod error;
pub mod logic;
pub mod platform;
pub mod types;

// Re-export main types for convenience
pub use config::{
    AppRoutingPolicy, CONFIG_VERSION, DnsServerItem, DnsServersConfig, FilterConfig,
    HostListItem, HostsConfig, location_is_downloadable,
};
pub use error::{Result, VpnSplitError};
pub use logic::resolver::{RoutingDecision, categorize, default_route, resolve_routing};
pub use platform::{
    BrowserCapabilityResolver, InstalledApp, InstalledAppProvider, WEB_VIEW_CAPABILITY,
};
pub use types::{AppCategory, DefaultMode, HostState, Route};
