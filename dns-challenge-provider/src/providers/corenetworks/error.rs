//! Core Networks error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{CoreNetworksProvider, PROVIDER_NAME};

/// Core Networks reports failures through the HTTP status; `raw.code` carries it.
impl ProviderErrorMapper for CoreNetworksProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // Session token rejected or expired server-side
            Some("401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Account may not touch this zone
            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Unknown zone
            Some("404") if context.zone.is_some() => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.zone.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // Rejected record payload
            Some("400" | "422") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.param.unwrap_or_else(|| "request".to_string()),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderOptions;

    fn provider() -> CoreNetworksProvider {
        CoreNetworksProvider::new(String::new(), String::new(), &ProviderOptions::default())
            .unwrap()
    }

    #[test]
    fn unauthorized_is_invalid_credentials() {
        let err = provider().map_error(
            RawApiError::with_code("401", "token expired"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    }

    #[test]
    fn forbidden_is_permission_denied() {
        let err = provider().map_error(
            RawApiError::with_code("403", "forbidden"),
            ErrorContext::zone("example.com"),
        );
        assert!(matches!(err, ProviderError::PermissionDenied { .. }));
    }

    #[test]
    fn zone_not_found() {
        let err = provider().map_error(
            RawApiError::with_code("404", "Unknown zone"),
            ErrorContext::zone("foo.example.com"),
        );
        match err {
            ProviderError::DomainNotFound { domain, .. } => assert_eq!(domain, "foo.example.com"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn not_found_without_zone_is_unknown() {
        let err = provider().map_error(
            RawApiError::with_code("404", "no route"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::Unknown { .. }));
    }

    #[test]
    fn bad_request_names_parameter() {
        let err = provider().map_error(
            RawApiError::with_code("400", "invalid ttl"),
            ErrorContext::zone("example.com").with_param("record"),
        );
        match err {
            ProviderError::InvalidParameter { param, detail, .. } => {
                assert_eq!(param, "record");
                assert_eq!(detail, "invalid ttl");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn server_error_keeps_status() {
        let err = provider().map_error(
            RawApiError::with_code("500", "boom"),
            ErrorContext::zone("example.com"),
        );
        match err {
            ProviderError::Unknown {
                raw_code,
                raw_message,
                ..
            } => {
                assert_eq!(raw_code.as_deref(), Some("500"));
                assert_eq!(raw_message, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
