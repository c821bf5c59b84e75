//! Where the current validation method comes from

use tokio::sync::watch;

use crate::model::ValidationMethod;

/// Source of the method sent with each round.
///
/// A watched source re-validates every tracked field when it changes, the
/// same way a data change does.
///
/// # Example
///
/// ```
/// use formcheck_lib::MethodSource;
/// use formcheck_lib::model::ValidationMethod;
/// use tokio::sync::watch;
///
/// let fixed = MethodSource::from(ValidationMethod::Post);
/// assert_eq!(fixed.current(), ValidationMethod::Post);
///
/// let (tx, rx) = watch::channel(ValidationMethod::Post);
/// let watched = MethodSource::from(rx);
/// tx.send(ValidationMethod::Patch).unwrap();
/// assert_eq!(watched.current(), ValidationMethod::Patch);
/// ```
#[derive(Debug, Clone)]
pub enum MethodSource {
    /// Never changes.
    Fixed(ValidationMethod),
    /// Follows a watch channel.
    Watched(watch::Receiver<ValidationMethod>),
}

impl MethodSource {
    /// Returns the method to use right now.
    pub fn current(&self) -> ValidationMethod {
        match self {
            Self::Fixed(method) => *method,
            Self::Watched(rx) => *rx.borrow(),
        }
    }

    /// A fresh receiver for change notifications, with the current value seen.
    pub(crate) fn changes(&self) -> Option<watch::Receiver<ValidationMethod>> {
        match self {
            Self::Fixed(_) => None,
            Self::Watched(rx) => {
                let mut rx = rx.clone();
                let _ = rx.borrow_and_update();
                Some(rx)
            }
        }
    }
}

impl Default for MethodSource {
    fn default() -> Self {
        Self::Fixed(ValidationMethod::All)
    }
}

impl From<ValidationMethod> for MethodSource {
    fn from(method: ValidationMethod) -> Self {
        Self::Fixed(method)
    }
}

impl From<watch::Receiver<ValidationMethod>> for MethodSource {
    fn from(rx: watch::Receiver<ValidationMethod>) -> Self {
        Self::Watched(rx)
    }
}
