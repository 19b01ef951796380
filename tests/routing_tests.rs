// Integration tests for per-app routing resolution.
//
// These drive the public API end to end with deterministic in-memory
// platform doubles: a fixed installed-app universe of two plain apps and two
// browsers (one of each system-privileged), with the host app absent from
// the provider output.

use std::collections::BTreeSet;

use vpnsplit::{
    AppRoutingPolicy, BrowserCapabilityResolver, DefaultMode, FilterConfig, InstalledApp,
    InstalledAppProvider, Route, resolve_routing,
};

const HOST: &str = "org.example.vpnsplit";

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct StaticApps(Vec<InstalledApp>);

impl InstalledAppProvider for StaticApps {
    fn installed_apps(&self) -> Vec<InstalledApp> {
        self.0.clone()
    }
}

struct StaticBrowsers(BTreeSet<String>);

impl BrowserCapabilityResolver for StaticBrowsers {
    fn handler_packages(&self, _capability: &str) -> BTreeSet<String> {
        self.0.clone()
    }
}

fn device_apps() -> StaticApps {
    StaticApps(vec![
        InstalledApp::new("system-app", true),
        InstalledApp::new("data-app", false),
        InstalledApp::new("system-browser", true),
        InstalledApp::new("data-browser", false),
    ])
}

fn device_browsers() -> StaticBrowsers {
    StaticBrowsers(BTreeSet::from([
        "system-browser".to_string(),
        "data-browser".to_string(),
    ]))
}

fn as_set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_bypass_mode_routes_only_host() {
    init_tracing();
    let policy = AppRoutingPolicy {
        default_mode: DefaultMode::NotOnVpn,
        ..Default::default()
    };

    let decision = resolve_routing(&policy, &device_apps(), &device_browsers(), HOST);

    assert_eq!(decision.on_vpn, as_set(&[HOST]));
    assert_eq!(
        decision.not_on_vpn,
        as_set(&["system-app", "data-app", "system-browser", "data-browser"])
    );
}

#[test]
fn test_route_mode_routes_everything() {
    init_tracing();
    let policy = AppRoutingPolicy {
        default_mode: DefaultMode::OnVpn,
        ..Default::default()
    };

    let decision = resolve_routing(&policy, &device_apps(), &device_browsers(), HOST);

    assert_eq!(
        decision.on_vpn,
        as_set(&[HOST, "system-app", "data-app", "system-browser", "data-browser"])
    );
    assert!(decision.not_on_vpn.is_empty());
}

#[test]
fn test_intelligent_mode_bypasses_trusted_non_browsers() {
    init_tracing();
    let policy = AppRoutingPolicy {
        default_mode: DefaultMode::Intelligent,
        ..Default::default()
    };

    let decision = resolve_routing(&policy, &device_apps(), &device_browsers(), HOST);

    assert_eq!(
        decision.on_vpn,
        as_set(&[HOST, "data-app", "system-browser", "data-browser"])
    );
    assert_eq!(decision.not_on_vpn, as_set(&["system-app"]));
}

#[test]
fn test_bypass_override_applies_to_browser_but_not_host() {
    init_tracing();
    let policy = AppRoutingPolicy {
        default_mode: DefaultMode::Intelligent,
        force_bypass: as_set(&[HOST, "system-browser"]),
        ..Default::default()
    };

    let decision = resolve_routing(&policy, &device_apps(), &device_browsers(), HOST);

    assert_eq!(decision.route_for(HOST), Some(Route::OnVpn));
    assert_eq!(decision.route_for("system-browser"), Some(Route::NotOnVpn));
}

#[test]
fn test_route_override_wins_in_bypass_mode() {
    init_tracing();
    let policy = AppRoutingPolicy {
        default_mode: DefaultMode::NotOnVpn,
        force_route: as_set(&["data-app"]),
        ..Default::default()
    };

    let decision = resolve_routing(&policy, &device_apps(), &device_browsers(), HOST);

    assert_eq!(decision.route_for("data-app"), Some(Route::OnVpn));
    assert_eq!(decision.route_for("data-browser"), Some(Route::NotOnVpn));
}

#[test]
fn test_empty_device_still_classifies_host() {
    init_tracing();
    let policy = AppRoutingPolicy::default();

    let decision = resolve_routing(
        &policy,
        &StaticApps(Vec::new()),
        &StaticBrowsers(BTreeSet::new()),
        HOST,
    );

    assert_eq!(decision.on_vpn, as_set(&[HOST]));
    assert!(decision.not_on_vpn.is_empty());
}

#[test]
fn test_policy_loaded_from_config_json() {
    init_tracing();

    // The policy arrives embedded in the persisted filter configuration
    let json = r#"{
        "version": 2,
        "app_routing": {
            "default_mode": "intelligent",
            "force_bypass": ["data-browser"],
            "force_route": ["system-app"]
        }
    }"#;
    let config: FilterConfig = serde_json::from_str(json).unwrap();
    config.validate().unwrap();

    let decision = resolve_routing(
        &config.app_routing,
        &device_apps(),
        &device_browsers(),
        HOST,
    );

    // Overrides flip both intelligent defaults; everything else keeps them
    assert_eq!(
        decision.on_vpn,
        as_set(&[HOST, "data-app", "system-app", "system-browser"])
    );
    assert_eq!(decision.not_on_vpn, as_set(&["data-browser"]));
}

#[test]
fn test_resolution_is_repeatable() {
    init_tracing();
    let policy = AppRoutingPolicy {
        default_mode: DefaultMode::Intelligent,
        ..Default::default()
    };

    let first = resolve_routing(&policy, &device_apps(), &device_browsers(), HOST);
    let second = resolve_routing(&policy, &device_apps(), &device_browsers(), HOST);

    assert_eq!(first, second);
}
