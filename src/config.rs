//! Persisted filter configuration: saving and loading.
//!
//! This module models the on-disk configuration consumed by the tunnel
//! service: host lists feeding the DNS filter, upstream DNS servers, and the
//! per-application routing policy. Values use type-safe enums instead of bare
//! integers, providing compile-time validation and preventing typos.
//!
//! Fetching remote host lists is not done here; this module only decides,
//! per item, whether a fetch would be required (see
//! [`location_is_downloadable`]).

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::VpnSplitError;
use crate::types::{DefaultMode, HostState};

/// Current configuration schema version. Files with a newer version are
/// rejected; older files are migrated on load.
pub const CONFIG_VERSION: u32 = 2;

/// Returns `true` if `location` must be fetched over the network.
///
/// Strict prefix test: `true` exactly when the string starts with the
/// byte-exact prefix `"http://"` or `"https://"`. No trimming, case-folding,
/// or URI parsing is applied: `"https.example.com"` and `"file://x"` are
/// local names, not download targets.
pub fn location_is_downloadable(location: &str) -> bool {
    location.starts_with("https://") || location.starts_with("http://")
}

/// A single host-list reference inside the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostListItem {
    /// Human-readable name shown by the (external) UI
    pub title: String,
    /// Where the list lives: a remote URL or a local file name. Every
    /// persisted item carries a location; `None` only occurs for
    /// half-constructed items and is treated as a caller defect.
    pub location: Option<String>,
    /// How the filter consumes this list
    #[serde(default)]
    pub state: HostState,
}

impl HostListItem {
    pub fn new(title: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: Some(location.into()),
            state: HostState::default(),
        }
    }

    /// Whether this item's location must be fetched over the network.
    ///
    /// Fails with [`VpnSplitError::MissingLocation`] when no location is set;
    /// that is a programming error in the code that built the item, not a
    /// recoverable runtime case.
    pub fn is_downloadable(&self) -> Result<bool, VpnSplitError> {
        let location = self
            .location
            .as_deref()
            .ok_or(VpnSplitError::MissingLocation)?;
        Ok(location_is_downloadable(location))
    }
}

/// Host-list section of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostsConfig {
    /// Master switch for host-based filtering
    pub enabled: bool,
    /// Whether the service refreshes downloadable lists on its own schedule
    #[serde(default)]
    pub automatic_refresh: bool,
    #[serde(default)]
    pub items: Vec<HostListItem>,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            automatic_refresh: false,
            items: Vec::new(),
        }
    }
}

/// One upstream DNS server entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsServerItem {
    pub title: String,
    /// Server address; always present for DNS entries
    pub location: String,
    pub enabled: bool,
}

/// Upstream DNS section of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsServersConfig {
    /// When false, the system resolvers are left alone
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub items: Vec<DnsServerItem>,
}

/// Per-application routing policy: which apps go through the tunnel.
///
/// Owned by the caller and treated as read-only for the duration of one
/// resolution call. The override sets are unique by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRoutingPolicy {
    /// UI-only flag: whether system apps are listed for per-app selection.
    /// The resolver ignores it.
    #[serde(default)]
    pub show_system_apps: bool,
    /// Routing applied to packages with no explicit override
    #[serde(default)]
    pub default_mode: DefaultMode,
    /// Packages forced to bypass the tunnel
    #[serde(default)]
    pub force_bypass: BTreeSet<String>,
    /// Packages forced through the tunnel
    #[serde(default)]
    pub force_route: BTreeSet<String>,
}

fn default_ipv6() -> bool {
    true
}

/// Top-level persisted configuration for the filtering tunnel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Schema version; gates loading (see [`CONFIG_VERSION`])
    pub version: u32,

    // Service bootstrap flags, consumed by the (external) service layer
    #[serde(default)]
    pub auto_start: bool,
    #[serde(default)]
    pub watchdog: bool,
    #[serde(default = "default_ipv6")]
    pub ipv6_support: bool,

    #[serde(default)]
    pub hosts: HostsConfig,
    #[serde(default)]
    pub dns_servers: DnsServersConfig,
    #[serde(default)]
    pub app_routing: AppRoutingPolicy,
}

impl FilterConfig {
    /// Create a new configuration with sensible defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        info!("Saved filter configuration to {:?}", path.as_ref());
        Ok(())
    }

    /// Load configuration from a JSON file.
    ///
    /// Rejects files written by a newer schema version; older files are
    /// migrated in memory (the file itself is rewritten only on save).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let mut config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        if config.version > CONFIG_VERSION {
            bail!(
                "Configuration version {} is newer than supported version {}",
                config.version,
                CONFIG_VERSION
            );
        }
        config.migrate();

        info!(
            "Loaded filter configuration: {} host lists, {} DNS servers",
            config.hosts.items.len(),
            config.dns_servers.items.len()
        );
        Ok(config)
    }

    /// Bring an older configuration up to the current schema version.
    ///
    /// Sections absent from older files already landed on their defaults
    /// during deserialization; this stamps the version so the next save
    /// writes the current schema.
    pub fn migrate(&mut self) {
        if self.version < CONFIG_VERSION {
            info!(
                "Migrating configuration from version {} to {}",
                self.version, CONFIG_VERSION
            );
            self.version = CONFIG_VERSION;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version > CONFIG_VERSION {
            bail!(
                "Configuration version {} is newer than supported version {}",
                self.version,
                CONFIG_VERSION
            );
        }

        for item in &self.hosts.items {
            match item.location.as_deref() {
                None => bail!("Host list \"{}\" has no location", item.title),
                Some("") => bail!("Host list \"{}\" has an empty location", item.title),
                Some(_) => {}
            }
        }

        if self.dns_servers.enabled {
            for item in &self.dns_servers.items {
                if item.enabled && item.location.trim().is_empty() {
                    bail!("DNS server \"{}\" has an empty address", item.title);
                }
            }
        }

        // Contradictory overrides are accepted; the resolver routes such
        // packages through the tunnel. Surface them for the operator anyway.
        let contested: Vec<&String> = self
            .app_routing
            .force_bypass
            .intersection(&self.app_routing.force_route)
            .collect();
        if !contested.is_empty() {
            warn!(
                "Packages present in both override lists (will be routed on VPN): {:?}",
                contested
            );
        }

        Ok(())
    }

    /// Enabled, non-ignored host lists whose location must be fetched over
    /// the network. The (external) refresh layer downloads exactly these.
    pub fn hosts_requiring_download(&self) -> Result<Vec<&HostListItem>, VpnSplitError> {
        if !self.hosts.enabled {
            return Ok(Vec::new());
        }

        let mut downloadable = Vec::new();
        for item in &self.hosts.items {
            if !item.state.is_active() {
                continue;
            }
            if item.is_downloadable()? {
                downloadable.push(item);
            }
        }
        Ok(downloadable)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            auto_start: false,
            watchdog: false,
            ipv6_support: true,
            hosts: HostsConfig::default(),
            dns_servers: DnsServersConfig::default(),
            app_routing: AppRoutingPolicy::default(),
        }
    }
}
