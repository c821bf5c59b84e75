//! Validation transport
//!
//! A transport sends one check-only request carrying the whole form and
//! returns the server's [`ErrorMap`]. [`HttpTransport`] posts JSON over
//! reqwest; tests and non-HTTP backends implement [`ValidationTransport`]
//! directly.

mod http;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde_json::Value;

use crate::error::BuildError;
use crate::error::TransportError;
use crate::model::ErrorMap;
use crate::model::ValidationMethod;

pub use http::HttpTransport;

/// Header naming the method whose rules the server should apply.
pub const FOR_METHOD_HEADER: &str = "x-form-validations-for-method";

/// Header marking the request as a check, not a real submission.
pub const JUST_CHECKING_HEADER: &str = "x-form-validations-just-checking";

/// A single validation round as handed to a transport.
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    /// The full form data, not only the changed fields.
    pub body: Value,
    /// Method context for rule selection.
    pub method: ValidationMethod,
    /// Caller headers merged with the two validation headers.
    pub headers: HeaderMap,
}

impl ValidationRequest {
    /// Creates a request, layering the validation headers over `base`.
    ///
    /// The validation headers always win over caller headers of the same name.
    pub fn new(body: Value, method: ValidationMethod, base: &HeaderMap) -> Self {
        let mut headers = base.clone();
        headers.insert(
            FOR_METHOD_HEADER,
            HeaderValue::from_static(method.as_str()),
        );
        headers.insert(JUST_CHECKING_HEADER, HeaderValue::from_static("true"));
        Self {
            body,
            method,
            headers,
        }
    }
}

/// Sends validation requests to wherever the rules live.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use formcheck_lib::error::TransportError;
/// use formcheck_lib::model::ErrorMap;
/// use formcheck_lib::transport::{ValidationRequest, ValidationTransport};
///
/// struct AlwaysValid;
///
/// #[async_trait]
/// impl ValidationTransport for AlwaysValid {
///     async fn check(&self, _request: ValidationRequest) -> Result<ErrorMap, TransportError> {
///         Ok(ErrorMap::new())
///     }
/// }
/// ```
#[async_trait]
pub trait ValidationTransport: Send + Sync {
    /// Sends one check-only request and returns the reported field errors.
    async fn check(&self, request: ValidationRequest) -> Result<ErrorMap, TransportError>;
}

/// Converts caller-supplied header pairs into a [`HeaderMap`].
///
/// Later pairs replace earlier ones with the same name.
pub fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, BuildError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| BuildError::invalid_header(name, e.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| BuildError::invalid_header(name, e.to_string()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
