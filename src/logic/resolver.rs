//! Per-application routing resolver.
//!
//! Decides, for every installed application, whether its traffic goes
//! through the filtering tunnel (`on_vpn`) or around it (`not_on_vpn`).
//!
//! # Design
//!
//! - **Pure logic**: no I/O. Platform state arrives through the
//!   [`InstalledAppProvider`] and [`BrowserCapabilityResolver`] contracts,
//!   each queried exactly once per call
//! - **Total partition**: every considered package (installed apps plus the
//!   host application) lands in exactly one of the two output sets
//! - **Deterministic**: duplicate provider rows collapse; output sets are
//!   ordered
//!
//! # Precedence
//!
//! | Rule                                | Outcome                      |
//! |-------------------------------------|------------------------------|
//! | package is the host application     | `on_vpn`, unconditionally    |
//! | package in `force_route`            | `on_vpn`                     |
//! | package in `force_bypass`           | `not_on_vpn`                 |
//! | otherwise                           | default for (mode, category) |
//!
//! A package listed in both override sets is routed through the tunnel:
//! contradictory configuration resolves toward filtering.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::AppRoutingPolicy;
use crate::platform::{BrowserCapabilityResolver, InstalledAppProvider, WEB_VIEW_CAPABILITY};
use crate::types::{AppCategory, DefaultMode, Route};

// ============================================================================
// Resolution Result
// ============================================================================

/// Outcome of one resolution pass: a total, disjoint partition of the
/// considered package identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingDecision {
    /// Packages whose traffic goes through the filtering tunnel
    pub on_vpn: BTreeSet<String>,
    /// Packages whose traffic bypasses the filtering tunnel
    pub not_on_vpn: BTreeSet<String>,
}

impl RoutingDecision {
    /// Look up the route assigned to a package, if it was considered at all
    pub fn route_for(&self, package_id: &str) -> Option<Route> {
        if self.on_vpn.contains(package_id) {
            Some(Route::OnVpn)
        } else if self.not_on_vpn.contains(package_id) {
            Some(Route::NotOnVpn)
        } else {
            None
        }
    }

    /// Total number of packages classified
    pub fn len(&self) -> usize {
        self.on_vpn.len() + self.not_on_vpn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.on_vpn.is_empty() && self.not_on_vpn.is_empty()
    }
}

// ============================================================================
// Routing Resolution
// ============================================================================

/// Resolve the routing classification of every installed application.
///
/// Queries the two platform contracts once each, then classifies every
/// installed package plus `host_package`. The host is always considered,
/// even when the provider omits it: the resolving application must be
/// classifiable.
///
/// The policy is read, never mutated; callers must not mutate it concurrently
/// with a call.
pub fn resolve_routing(
    policy: &AppRoutingPolicy,
    apps: &dyn InstalledAppProvider,
    browsers: &dyn BrowserCapabilityResolver,
    host_package: &str,
) -> RoutingDecision {
    let installed = apps.installed_apps();
    let browser_packages = browsers.handler_packages(WEB_VIEW_CAPABILITY);

    debug!(
        "Resolving routing for {} installed apps, {} browsers, mode {}",
        installed.len(),
        browser_packages.len(),
        policy.default_mode
    );

    // Collapse duplicate provider rows; a package is system-privileged if
    // any row says so.
    let mut system_flags: BTreeMap<String, bool> = BTreeMap::new();
    for app in installed {
        let flag = system_flags.entry(app.package_id).or_insert(false);
        *flag |= app.system_privileged;
    }
    system_flags.entry(host_package.to_string()).or_insert(false);

    let mut decision = RoutingDecision::default();
    for (package_id, system_privileged) in &system_flags {
        let category = categorize(package_id, host_package, *system_privileged, &browser_packages);
        match final_route(policy, category, package_id, host_package) {
            Route::OnVpn => decision.on_vpn.insert(package_id.clone()),
            Route::NotOnVpn => decision.not_on_vpn.insert(package_id.clone()),
        };
    }

    debug!(
        "Routing resolved: {} on VPN, {} bypassing",
        decision.on_vpn.len(),
        decision.not_on_vpn.len()
    );
    decision
}

/// Assign the category used by the category-sensitive default mode.
///
/// Order matters: the host wins over browser membership, browser membership
/// wins over the system flag.
pub fn categorize(
    package_id: &str,
    host_package: &str,
    system_privileged: bool,
    browser_packages: &BTreeSet<String>,
) -> AppCategory {
    if package_id == host_package {
        AppCategory::Host
    } else if browser_packages.contains(package_id) {
        AppCategory::Browser
    } else if system_privileged {
        AppCategory::SystemPrivileged
    } else {
        AppCategory::Ordinary
    }
}

/// Decision table for the default route of a package with no override.
pub fn default_route(mode: DefaultMode, category: AppCategory) -> Route {
    match mode {
        DefaultMode::NotOnVpn => Route::NotOnVpn,
        DefaultMode::OnVpn => Route::OnVpn,
        // Browsing traffic is always filtered; trusted platform components
        // bypass; everything else is filtered.
        DefaultMode::Intelligent => match category {
            AppCategory::Host | AppCategory::Browser | AppCategory::Ordinary => Route::OnVpn,
            AppCategory::SystemPrivileged => Route::NotOnVpn,
        },
    }
}

/// Apply the override chain on top of the default route.
fn final_route(
    policy: &AppRoutingPolicy,
    category: AppCategory,
    package_id: &str,
    host_package: &str,
) -> Route {
    // Self-identity outranks everything, including explicit overrides: the
    // host application is never allowed to bypass its own tunnel.
    if package_id == host_package {
        return Route::OnVpn;
    }
    if policy.force_route.contains(package_id) {
        return Route::OnVpn;
    }
    if policy.force_bypass.contains(package_id) {
        return Route::NotOnVpn;
    }
    default_route(policy.default_mode, category)
}

// ============================================================================
// Tests
// ============================================================================
