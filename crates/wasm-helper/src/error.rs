use std::fmt;

use crate::host::HostError;
use crate::value::ValueKind;

/// Why a path operation did not complete.
///
/// None of these are fatal: the sentinel-returning methods log the error and
/// degrade, the `try_*` methods hand it back.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    EmptyPath,
    /// A segment resolved to undefined or null.
    MissingLink { segment: String, kind: ValueKind },
    /// A write targeted something that cannot hold properties.
    NotAnObject { segment: String, kind: ValueKind },
    /// An object was supplied directly (receiver, function, array) and it
    /// is undefined or null.
    NullishTarget { kind: ValueKind },
    NotCallable { name: String, kind: ValueKind },
    NotArrayLike { kind: ValueKind },
    Host(HostError),
}

impl PathError {
    /// The `undefined`/`null` a failed lookup hands back to the caller.
    pub(crate) fn sentinel<O, F>(&self) -> crate::Value<O, F> {
        match self {
            PathError::MissingLink { kind: ValueKind::Null, .. }
            | PathError::NullishTarget { kind: ValueKind::Null } => crate::Value::Null,
            _ => crate::Value::Undefined,
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::EmptyPath => write!(f, "given name is empty"),
            PathError::MissingLink { segment, kind } => write!(f, "'{segment}' is {kind}"),
            PathError::NotAnObject { segment, kind } => {
                write!(f, "'{segment}' is a {kind}, not an object")
            }
            PathError::NullishTarget { kind } => write!(f, "target is {kind}"),
            PathError::NotCallable { name, kind } => {
                write!(f, "'{name}' is a {kind}, not a function")
            }
            PathError::NotArrayLike { kind } => write!(f, "a {kind} without a length is not array-like"),
            PathError::Host(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for PathError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PathError::Host(error) => Some(error),
            _ => None,
        }
    }
}

impl From<HostError> for PathError {
    fn from(error: HostError) -> Self {
        PathError::Host(error)
    }
}
