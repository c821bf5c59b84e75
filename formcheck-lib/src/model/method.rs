//! Validation method context

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// The request method a validation round applies to.
///
/// The server uses this to pick which rule set to run, e.g. `POST` rules for
/// a create form and `PATCH` rules for an edit form. `All` asks for rules
/// shared by every method.
///
/// # Example
///
/// ```
/// use formcheck_lib::model::ValidationMethod;
///
/// let method: ValidationMethod = "PATCH".parse().unwrap();
/// assert_eq!(method, ValidationMethod::Patch);
/// assert_eq!(ValidationMethod::default().as_str(), "all");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationMethod {
    /// `GET`
    #[serde(rename = "GET")]
    Get,
    /// `PATCH`
    #[serde(rename = "PATCH")]
    Patch,
    /// `POST`
    #[serde(rename = "POST")]
    Post,
    /// `PUT`
    #[serde(rename = "PUT")]
    Put,
    /// `DELETE`
    #[serde(rename = "DELETE")]
    Delete,
    /// Rules shared by every method.
    #[default]
    #[serde(rename = "all")]
    All,
}

impl ValidationMethod {
    /// Returns the wire representation sent to the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::All => "all",
        }
    }
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown validation method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for ValidationMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "PATCH" => Ok(Self::Patch),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "ALL" => Ok(Self::All),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}
