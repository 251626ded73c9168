//! Block metadata sanitization.

use std::collections::BTreeMap;
use strata_core::{BlockId, BlockMeta, INGESTER_LABEL, SHARD_LABEL, TENANT_LABEL, TenantId};

/// Reconcile a client-submitted descriptor with server-known identity.
///
/// The path-derived block ID and the authenticated tenant are authoritative:
/// a mismatched descriptor is corrected, not rejected, and every correction
/// is logged for audit. Label keys outside the fixed allow-list are removed.
/// The returned flag reports whether anything changed.
///
/// The only failure is `block_id` not parsing as a block ID.
pub fn sanitize_meta(
    mut meta: BlockMeta,
    block_id: &str,
    tenant: &TenantId,
) -> strata_core::Result<(BlockMeta, bool)> {
    let mut updated = false;

    let expected = BlockId::parse(block_id)?;
    if meta.id != expected {
        tracing::warn!(
            old_value = %meta.id,
            new_value = %expected,
            "updating descriptor block ID"
        );
        meta.id = expected;
        updated = true;
    }

    let tenant_ok = meta
        .labels
        .get(TENANT_LABEL)
        .is_some_and(|v| v == tenant.as_str());
    if !tenant_ok {
        let old_value = meta
            .labels
            .insert(TENANT_LABEL.to_string(), tenant.to_string());
        tracing::warn!(
            block = %expected,
            old_value = ?old_value,
            new_value = %tenant,
            "updating descriptor tenant label"
        );
        updated = true;
    }

    // Filter into a fresh map instead of deleting from the map being
    // iterated.
    let mut kept = BTreeMap::new();
    for (key, value) in std::mem::take(&mut meta.labels) {
        match key.as_str() {
            TENANT_LABEL | INGESTER_LABEL => {
                kept.insert(key, value);
            }
            SHARD_LABEL => {
                // TODO: verify that the block's series are compatible with
                // the declared shard before accepting the label.
                kept.insert(key, value);
            }
            _ => {
                tracing::warn!(
                    block = %expected,
                    label = %key,
                    value = %value,
                    "removing unknown descriptor label"
                );
                updated = true;
            }
        }
    }
    meta.labels = kept;

    // TODO: reconcile the declared file manifest against the objects
    // actually uploaded under the block prefix.

    if !updated {
        tracing::info!(block = %expected, "no changes to block metadata required");
    }

    Ok((meta, updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "01ARZ3NDEKTSV4RRFFQ69G5FAV";
    const OTHER_BLOCK: &str = "01BX5ZZKBKACTAV9WEVGEMMVRZ";

    fn tenant() -> TenantId {
        TenantId::parse("tenant-a").unwrap()
    }

    fn meta_with_labels(labels: &[(&str, &str)]) -> BlockMeta {
        BlockMeta {
            id: BlockId::parse(BLOCK).unwrap(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn corrects_mismatched_block_id() {
        let meta = meta_with_labels(&[(TENANT_LABEL, "tenant-a")]);

        let (sanitized, updated) = sanitize_meta(meta, OTHER_BLOCK, &tenant()).unwrap();
        assert!(updated);
        assert_eq!(sanitized.id, BlockId::parse(OTHER_BLOCK).unwrap());
    }

    #[test]
    fn overwrites_foreign_tenant_label() {
        let meta = meta_with_labels(&[(TENANT_LABEL, "tenant-b")]);

        let (sanitized, updated) = sanitize_meta(meta, BLOCK, &tenant()).unwrap();
        assert!(updated);
        assert_eq!(sanitized.labels[TENANT_LABEL], "tenant-a");
    }

    #[test]
    fn inserts_missing_tenant_label() {
        let meta = meta_with_labels(&[]);

        let (sanitized, updated) = sanitize_meta(meta, BLOCK, &tenant()).unwrap();
        assert!(updated);
        assert_eq!(sanitized.labels[TENANT_LABEL], "tenant-a");
    }

    #[test]
    fn strips_labels_outside_allow_list() {
        let meta = meta_with_labels(&[
            (TENANT_LABEL, "tenant-a"),
            (INGESTER_LABEL, "ingester-3"),
            (SHARD_LABEL, "2_of_4"),
            ("foo", "bar"),
            ("env", "prod"),
        ]);

        let (sanitized, updated) = sanitize_meta(meta, BLOCK, &tenant()).unwrap();
        assert!(updated);
        assert_eq!(sanitized.labels.len(), 3);
        assert_eq!(sanitized.labels[INGESTER_LABEL], "ingester-3");
        assert_eq!(sanitized.labels[SHARD_LABEL], "2_of_4");
        assert!(!sanitized.labels.contains_key("foo"));
        assert!(!sanitized.labels.contains_key("env"));
    }

    #[test]
    fn clean_descriptor_reports_no_changes() {
        let meta = meta_with_labels(&[(TENANT_LABEL, "tenant-a")]);

        let (sanitized, updated) = sanitize_meta(meta.clone(), BLOCK, &tenant()).unwrap();
        assert!(!updated);
        assert_eq!(sanitized, meta);
    }

    #[test]
    fn unparsable_block_id_fails() {
        let meta = meta_with_labels(&[]);
        assert!(sanitize_meta(meta, "not-a-block-id", &tenant()).is_err());
    }
}
