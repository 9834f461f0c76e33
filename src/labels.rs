//! Human readable labels for resource types.

/// Labels keyed by the last component of the resource name, used for the
/// generic `application` type.
static NAME_LABELS: &[(&str, &str)] = &[
    ("asm", "ASM"),
    ("lsnr", "Listener"),
    ("db", "Database"),
    ("inst", "Instance"),
    ("vip", "Virtual IP"),
    ("ons", "Ora Notif Svc"),
    ("gsd", "Gbl Svc Daemon"),
    ("cs", "Service"),
    ("srv", "Service"),
];

/// Labels keyed by the second component of an explicit type such as
/// `ora.scan_vip.type`.
static TYPE_LABELS: &[(&str, &str)] = &[
    ("asm", "ASM"),
    ("gsd", "Gbl Svc Daemon"),
    ("listener", "Listener"),
    ("scan_listener", "SCAN Listener"),
    ("scan_vip", "SCAN VIP"),
    ("oc4j", "OC4J"),
    ("eons", "eons"),
    ("ons", "Ora Notif Svc"),
    ("network", "Network (VIP)"),
    ("cluster_vip_net1", "Cluster VIP"),
    ("database", "Database"),
    ("diskgroup", "Disk Group"),
    ("service", "Service"),
    ("cvu", "CVU"),
];

/// Types whose TARGET and STATE list one entry per cluster member.
static MULTI_STATE_TYPES: &[&str] = &["asm", "ons", "eons", "network", "listener"];

pub const APPLICATION: &str = "application";

fn lookup(table: &[(&str, &'static str)], token: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(token))
        .map(|(_, label)| *label)
}

/// Label derived from the resource name, `unknown` when not recognized.
pub fn name_label(name: &str) -> String {
    let suffix = name.rsplit('.').next().unwrap_or_default();
    lookup(NAME_LABELS, suffix).unwrap_or("unknown").to_string()
}

/// Internal type token of a declared type: `ora.listener.type` -> `listener`.
///
/// A type without a second component is its own token.
pub fn type_token(declared: &str) -> &str {
    declared.split('.').nth(1).unwrap_or(declared)
}

/// Label for an explicit type token, the token itself when not recognized.
pub fn token_label(token: &str) -> String {
    lookup(TYPE_LABELS, token).unwrap_or(token).to_string()
}

/// Resolves the label shown for a resource.
pub fn resolve(declared: &str, name: &str) -> String {
    if declared == APPLICATION {
        name_label(name)
    } else {
        token_label(type_token(declared))
    }
}

pub fn is_multi_state(token: &str) -> bool {
    MULTI_STATE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_types_use_the_name() {
        assert_eq!(resolve("application", "ora.orcl.db"), "Database");
        assert_eq!(resolve("application", "ora.node1.LISTENER_NODE1.lsnr"), "Listener");
        assert_eq!(resolve("application", "ora.node1.vip"), "Virtual IP");
        assert_eq!(resolve("application", "ora.orcl.orcl1.inst"), "Instance");
        assert_eq!(resolve("application", "ora.orcl.batch.cs"), "Service");
        assert_eq!(resolve("application", "ora.DATA.dg"), "unknown");
        assert_eq!(resolve("application", "noextension"), "unknown");
    }

    #[test]
    fn explicit_types_use_the_type() {
        assert_eq!(resolve("ora.scan_vip.type", "ora.scan1.vip"), "SCAN VIP");
        assert_eq!(resolve("ora.scan_listener.type", "x"), "SCAN Listener");
        assert_eq!(resolve("ora.network.type", "ora.net1.network"), "Network (VIP)");
        assert_eq!(resolve("ora.cluster_vip_net1.type", "ora.node1.vip"), "Cluster VIP");
        assert_eq!(resolve("ora.LISTENER.type", "x"), "Listener");
    }

    #[test]
    fn unknown_types_pass_through() {
        assert_eq!(resolve("xyz", "ora.orcl.db"), "xyz");
        assert_eq!(resolve("ora.xyz.type", "ora.orcl.db"), "xyz");
        assert_eq!(resolve("", "ora.orcl.db"), "");
    }

    #[test]
    fn tokens() {
        assert_eq!(type_token("ora.listener.type"), "listener");
        assert_eq!(type_token("application"), "application");
        assert!(is_multi_state("listener"));
        assert!(is_multi_state("ASM"));
        assert!(!is_multi_state("scan_listener"));
        assert!(!is_multi_state("application"));
    }
}
