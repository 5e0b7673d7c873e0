//! Origin admission check (C14 check 3). Supports exact matches and
//! `*.domain` wildcards; non-production deployments skip the check
//! entirely so local development never needs an `ALLOWED_ORIGINS` entry.

use crate::error::{ServiceError, ServiceResult};

fn origin_matches(origin: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("*.") {
        origin == suffix || origin.ends_with(&format!(".{}", suffix))
    } else {
        origin == pattern
    }
}

/// Validate the `Origin` header against the configured allow-list.
/// Passes unconditionally outside production. In production, a missing
/// `Origin` header or one matching no configured pattern is rejected.
pub fn check(origin: Option<&str>, allowed_origins: &[String], production: bool) -> ServiceResult<()> {
    if !production {
        return Ok(());
    }

    let origin = origin.ok_or(ServiceError::ForbiddenOrigin)?;
    if allowed_origins.iter().any(|pattern| origin_matches(origin, pattern)) {
        Ok(())
    } else {
        Err(ServiceError::ForbiddenOrigin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_production_skips_check() {
        assert!(check(None, &[], true).is_err());
        assert!(check(None, &[], false).is_ok());
    }

    #[test]
    fn exact_match_is_allowed() {
        let allowed = vec!["https://example.com".to_string()];
        assert!(check(Some("https://example.com"), &allowed, true).is_ok());
    }

    #[test]
    fn wildcard_subdomain_is_allowed() {
        let allowed = vec!["*.example.com".to_string()];
        assert!(check(Some("app.example.com"), &allowed, true).is_ok());
        assert!(check(Some("example.com"), &allowed, true).is_ok());
        assert!(check(Some("evilexample.com"), &allowed, true).is_err());
    }

    #[test]
    fn missing_origin_is_rejected_in_production() {
        let allowed = vec!["https://example.com".to_string()];
        let err = check(None, &allowed, true).unwrap_err();
        assert!(matches!(err, ServiceError::ForbiddenOrigin));
    }

    #[test]
    fn unmatched_origin_is_rejected() {
        let allowed = vec!["https://example.com".to_string()];
        let err = check(Some("https://evil.com"), &allowed, true).unwrap_err();
        assert!(matches!(err, ServiceError::ForbiddenOrigin));
    }
}
