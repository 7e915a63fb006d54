//! Conversions from external infrastructure errors into domain errors.

use dealflow_domain::CrmError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CrmError);

impl From<InfraError> for CrmError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CrmError> for InfraError {
    fn from(value: CrmError) -> Self {
        InfraError(value)
    }
}

trait IntoCrmError {
    fn into_crm(self) -> CrmError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CrmError */
/* -------------------------------------------------------------------------- */

impl IntoCrmError for HttpError {
    fn into_crm(self) -> CrmError {
        if self.is_timeout() {
            return CrmError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CrmError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return CrmError::Remote(format!("malformed response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => CrmError::Auth(message),
                404 => CrmError::NotFound(message),
                400..=499 => CrmError::InvalidInput(message),
                _ => CrmError::Remote(message),
            };
        }

        if self.is_builder() {
            return CrmError::Config(format!("invalid HTTP request: {self}"));
        }

        CrmError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_crm())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CrmError */
/* -------------------------------------------------------------------------- */

impl IntoCrmError for JsonError {
    fn into_crm(self) -> CrmError {
        CrmError::Remote(format!("unexpected response shape: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_crm())
    }
}
