//! Platform collaborator contracts.
//!
//! The routing resolver never talks to the operating system directly. It
//! consumes two narrow contracts that platform adapters (out of scope for
//! this crate) implement against the real package database.
//!
//! # Design Goals
//!
//! 1. **Injectable**: the resolver takes `&dyn` references, so tests supply
//!    deterministic in-memory doubles without any mocking machinery.
//! 2. **Snapshot semantics**: each call returns one complete, consistent
//!    snapshot. The resolver queries each contract exactly once per
//!    resolution and never observes partial state.
//! 3. **Single source of truth**: the trait definitions ARE the boundary;
//!    adapter failure policy (empty snapshot vs. propagated fault) lives in
//!    the adapter, not here.

use std::collections::BTreeSet;

/// Capability string for the canonical "open an http/https URL" request.
///
/// The resolver passes this to [`BrowserCapabilityResolver::handler_packages`]
/// to obtain the set of installed web browsers.
pub const WEB_VIEW_CAPABILITY: &str = "view-http-url";

/// One installed application as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApp {
    /// Unique package identifier
    pub package_id: String,
    /// Whether the platform flags this package as part of the trusted base image
    pub system_privileged: bool,
}

impl InstalledApp {
    pub fn new(package_id: impl Into<String>, system_privileged: bool) -> Self {
        Self {
            package_id: package_id.into(),
            system_privileged,
        }
    }
}

/// Enumerates the applications installed on the device.
///
/// # Contract
///
/// - Returns a complete, consistent snapshot; may be empty.
/// - Duplicate rows for the same package are tolerated; the resolver
///   collapses them (a package is system-privileged if any row says so).
/// - Implementations must not block indefinitely; timeout policy belongs to
///   the caller, not the resolver.
///
/// # Example
///
/// ```ignore
/// struct StaticApps(Vec<InstalledApp>);
///
/// impl InstalledAppProvider for StaticApps {
///     fn installed_apps(&self) -> Vec<InstalledApp> {
///         self.0.clone()
///     }
/// }
/// ```
pub trait InstalledAppProvider {
    /// Return every installed application with its package identifier and
    /// system-privilege flag.
    fn installed_apps(&self) -> Vec<InstalledApp>;
}

/// Resolves which packages handle a given capability request.
///
/// # Contract
///
/// - For [`WEB_VIEW_CAPABILITY`], returns the package identifiers of every
///   application registered to handle generic web-page viewing.
/// - Multiple registered handlers inside one package collapse to a single
///   entry (the return type is a set).
/// - May return an empty set; the resolver degrades to treating no package
///   as a browser.
pub trait BrowserCapabilityResolver {
    /// Return the set of package identifiers able to handle `capability`.
    fn handler_packages(&self, capability: &str) -> BTreeSet<String>;
}
