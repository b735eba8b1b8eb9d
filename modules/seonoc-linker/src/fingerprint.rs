use sha2::{Digest, Sha256};

use seonoc_graph::DetectedConflict;

/// Structural identity of a conflict across detection runs. Based on the
/// shape of the problem, not on entry ids, so the same conflict re-detected
/// after a delete/re-create cycle hashes identically.
///
/// SHA-256 over `network_id|type|domain_id|path|tier|target_path`,
/// truncated to 32 hex characters.
pub fn conflict_fingerprint(
    network_id: &str,
    conflict_type: &str,
    domain_id: Option<&str>,
    node_path: Option<&str>,
    tier: Option<u32>,
    target_path: Option<&str>,
) -> String {
    let parts = [
        network_id.to_string(),
        conflict_type.to_string(),
        domain_id.unwrap_or("").to_string(),
        normalize(node_path),
        tier.map(|t| t.to_string()).unwrap_or_default(),
        normalize(target_path),
    ];
    let joined = parts.join("|");
    let digest = Sha256::digest(joined.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..32].to_string()
}

fn normalize(path: Option<&str>) -> String {
    path.map(|p| p.to_lowercase().trim_matches('/').to_string())
        .unwrap_or_default()
}

pub fn fingerprint_of(detected: &DetectedConflict) -> String {
    conflict_fingerprint(
        &detected.network_id,
        detected.conflict_type.as_str(),
        Some(&detected.domain_id),
        detected.node_a_path.as_deref(),
        detected.tier,
        detected.target_path.as_deref(),
    )
}
