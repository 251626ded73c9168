//! Tenant identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a tenant ID in bytes.
const MAX_TENANT_LEN: usize = 150;

/// Reserved tenant value used by operator tooling to address all tenants.
const ALL_TENANTS: &str = "__all__";

/// An authenticated tenant identity.
///
/// Validated at parse time so the value is always safe to embed as a storage
/// key prefix segment.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Parse and validate a tenant ID.
    pub fn parse(s: &str) -> crate::Result<Self> {
        if s.is_empty() {
            return Err(crate::Error::InvalidTenant("must not be empty".to_string()));
        }
        if s.len() > MAX_TENANT_LEN {
            return Err(crate::Error::InvalidTenant(format!(
                "{} bytes exceeds the {MAX_TENANT_LEN} byte limit",
                s.len()
            )));
        }
        if s == "." || s == ".." || s == ALL_TENANTS {
            return Err(crate::Error::InvalidTenant(format!(
                "{s:?} is a reserved value"
            )));
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(crate::Error::InvalidTenant(format!(
                "unsupported character {c:?}"
            )));
        }

        Ok(Self(s.to_string()))
    }

    /// Get the tenant ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TenantId({})", self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_tenants() {
        let max_len = "x".repeat(150);
        for tenant in ["tenant-a", "team_42", "org.example", "A", max_len.as_str()] {
            assert_eq!(TenantId::parse(tenant).unwrap().as_str(), tenant);
        }
    }

    #[test]
    fn rejects_unsafe_tenants() {
        let too_long = "x".repeat(151);
        let rejected = [
            "",
            ".",
            "..",
            "__all__",
            "a/b",
            "a\\b",
            "a b",
            "tenant\n",
            too_long.as_str(),
        ];
        for tenant in rejected {
            assert!(TenantId::parse(tenant).is_err(), "accepted {tenant:?}");
        }
    }
}
