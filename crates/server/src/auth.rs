//! Tenant identity extraction.

use crate::error::{ApiError, ApiResult};
use axum::http::HeaderMap;
use strata_core::TenantId;

/// Header carrying the authenticated tenant identity.
///
/// An authenticating proxy in front of this service is expected to set it;
/// the gateway itself only validates the value's shape.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Extract and validate the tenant identity from request headers.
pub fn tenant_from_headers(headers: &HeaderMap) -> ApiResult<TenantId> {
    let value = headers
        .get(TENANT_HEADER)
        .ok_or_else(|| ApiError::InvalidTenant(format!("missing {TENANT_HEADER} header")))?;
    let value = value
        .to_str()
        .map_err(|_| ApiError::InvalidTenant("header value is not valid UTF-8".to_string()))?;
    TenantId::parse(value).map_err(|e| ApiError::InvalidTenant(e.to_string()))
}
