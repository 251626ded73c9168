//! Block identifiers and the block metadata descriptor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use ulid::Ulid;

/// Name of the reserved descriptor object that marks a block complete.
pub const META_FILENAME: &str = "meta.json";

/// Label key carrying the owning tenant. The security anchor for
/// multi-tenant isolation: its value must always equal the authenticated
/// caller's tenant in a persisted descriptor.
pub const TENANT_LABEL: &str = "__tenant_id__";

/// Label key identifying the ingester that produced the block.
pub const INGESTER_LABEL: &str = "__ingester_id__";

/// Label key identifying the shard a split block belongs to.
pub const SHARD_LABEL: &str = "__shard_id__";

/// Unique identifier for a block.
///
/// A 26-character, lexically sortable ULID. The canonical string form doubles
/// as the storage key prefix for every object belonging to the block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Ulid);

impl BlockId {
    /// Parse from the canonical 26-character string form.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Ulid::from_string(s)
            .map(Self)
            .map_err(|e| crate::Error::InvalidBlockId(format!("{s:?}: {e}")))
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self(Ulid::nil())
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Block-level statistics, preserved verbatim through sanitization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStats {
    #[serde(default)]
    pub num_series: u64,
    #[serde(default)]
    pub num_samples: u64,
    #[serde(default)]
    pub num_chunks: u64,
}

/// Compaction lineage of a block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCompaction {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub sources: Vec<BlockId>,
}

/// One entry of the descriptor's file manifest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockFileMeta {
    pub rel_path: String,
    #[serde(default)]
    pub size_bytes: u64,
}

/// The block metadata descriptor.
///
/// Its presence at `<block>/meta.json` is the sole signal that a block is
/// complete and visible to downstream readers. Decoding is tolerant: every
/// field defaults when absent and unknown fields are ignored, so descriptors
/// produced by older or newer writers still parse.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMeta {
    /// Block identity. Must equal the path-derived block ID; corrected by
    /// sanitization when it does not.
    #[serde(default)]
    pub id: BlockId,
    #[serde(default)]
    pub min_time: i64,
    #[serde(default)]
    pub max_time: i64,
    /// Descriptor format version.
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub stats: BlockStats,
    #[serde(default)]
    pub compaction: BlockCompaction,
    /// Block labels, key to value, keys unique. Only allow-listed keys
    /// survive sanitization.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Declared file manifest. Not reconciled against uploaded objects.
    #[serde(default)]
    pub files: Vec<BlockFileMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
