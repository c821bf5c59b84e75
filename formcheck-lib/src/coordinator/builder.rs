//! Typestate builder for [`ValidationCoordinator`]

use std::sync::Arc;
use std::time::Duration;

use super::MethodSource;
use super::ValidationCoordinator;
use crate::config::CoordinatorConfig;
use crate::error::BuildError;
use crate::form::FormData;
use crate::transport::HttpTransport;
use crate::transport::ValidationTransport;
use crate::transport::header_map;

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Where validation requests go.
pub enum TransportSource {
    /// Post to this URL with [`HttpTransport`].
    Endpoint(String),
    /// Use a custom transport.
    Custom(Arc<dyn ValidationTransport>),
}

/// Builder for constructing a [`ValidationCoordinator`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `endpoint` or `transport` - where validation requests are sent
/// - `data` - the [`FormData`] being validated
///
/// # Example
///
/// ```ignore
/// let coordinator = ValidationCoordinator::builder()
///     .endpoint("https://app.example.com/users/validate")
///     .data(form)
///     .group(["password", "password_confirmation"])
///     .immediate(["email"])
///     .method(ValidationMethod::Post)
///     .build()?;
/// ```
pub struct ValidationCoordinatorBuilder<T, D> {
    transport: T,
    data: D,
    config: CoordinatorConfig,
    method: MethodSource,
}

impl ValidationCoordinatorBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            transport: Missing,
            data: Missing,
            config: CoordinatorConfig::default(),
            method: MethodSource::default(),
        }
    }
}

impl Default for ValidationCoordinatorBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> ValidationCoordinatorBuilder<Missing, D> {
    /// Sends requests to this URL over HTTP.
    pub fn endpoint(
        self,
        url: impl Into<String>,
    ) -> ValidationCoordinatorBuilder<Set<TransportSource>, D> {
        self.with_transport(TransportSource::Endpoint(url.into()))
    }

    /// Sends requests through a custom transport.
    pub fn transport<X: ValidationTransport + 'static>(
        self,
        transport: X,
    ) -> ValidationCoordinatorBuilder<Set<TransportSource>, D> {
        self.with_transport(TransportSource::Custom(Arc::new(transport)))
    }

    fn with_transport(
        self,
        source: TransportSource,
    ) -> ValidationCoordinatorBuilder<Set<TransportSource>, D> {
        ValidationCoordinatorBuilder {
            transport: Set(source),
            data: self.data,
            config: self.config,
            method: self.method,
        }
    }
}

impl<T> ValidationCoordinatorBuilder<T, Missing> {
    /// Sets the form data to watch and send.
    pub fn data(self, data: FormData) -> ValidationCoordinatorBuilder<T, Set<FormData>> {
        ValidationCoordinatorBuilder {
            transport: self.transport,
            data: Set(data),
            config: self.config,
            method: self.method,
        }
    }
}

impl<T, D> ValidationCoordinatorBuilder<T, D> {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a group of fields validated together.
    pub fn group<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.with_group(fields);
        self
    }

    /// Adds fields excluded from tracking.
    pub fn skip<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.with_skip(fields);
        self
    }

    /// Adds fields that bypass the debounce window.
    pub fn immediate<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.with_immediate(fields);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_header(name, value);
        self
    }

    /// Sets the steady-state debounce window.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.config = self.config.with_debounce(debounce);
        self
    }

    /// Sets the method source. Defaults to a fixed [`ValidationMethod::All`](crate::model::ValidationMethod::All).
    pub fn method(mut self, method: impl Into<MethodSource>) -> Self {
        self.method = method.into();
        self
    }
}

impl ValidationCoordinatorBuilder<Set<TransportSource>, Set<FormData>> {
    /// Builds the [`ValidationCoordinator`].
    ///
    /// Fails if the endpoint is not an absolute URL or a header is invalid.
    pub fn build(self) -> Result<ValidationCoordinator, BuildError> {
        let headers = header_map(&self.config.headers)?;

        let transport: Arc<dyn ValidationTransport> = match self.transport.0 {
            TransportSource::Endpoint(url) => {
                let mut http = HttpTransport::new(&url)?;
                if let Some(timeout) = self.config.request_timeout {
                    http = http.timeout(timeout);
                }
                Arc::new(http)
            }
            TransportSource::Custom(transport) => transport,
        };

        Ok(ValidationCoordinator::from_parts(
            transport,
            self.data.0,
            self.config,
            headers,
            self.method,
        ))
    }
}
