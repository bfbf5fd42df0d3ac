//! The narrow interface every host object graph is accessed through.
//!
//! Dotted paths, callbacks and the rest of the helper are written against
//! [`Host`] only; the graph itself has no static schema.

use std::fmt;
use std::rc::Rc;

use crate::value::Value;

/// A value of host `H`.
pub type HostValue<H> = Value<<H as Host>::Object, <H as Host>::Function>;

/// A Rust function exposed to the host. Receives the invocation's arguments.
pub type Callback<H> = Rc<dyn Fn(&[HostValue<H>]) -> HostValue<H>>;

pub trait Host: Sized + 'static {
    /// Handle to a host object. Cloning clones the handle, not the object.
    type Object: Clone + fmt::Debug;
    /// Handle to a host function.
    type Function: Clone + fmt::Debug;

    /// The global scope, root of every path.
    fn global(&self) -> Self::Object;

    /// Reads one property. A missing property is `Value::Undefined`.
    fn get_property(&self, object: &Self::Object, name: &str) -> HostValue<Self>;

    fn set_property(
        &self,
        object: &Self::Object,
        name: &str,
        value: HostValue<Self>,
    ) -> Result<(), HostError>;

    /// Calls `function` with `this` bound to `receiver`. Pass
    /// `Value::Undefined` for a plain invocation.
    fn apply(
        &self,
        function: &Self::Function,
        receiver: &HostValue<Self>,
        args: &[HostValue<Self>],
    ) -> Result<HostValue<Self>, HostError>;

    /// Wraps a Rust callback into a host function.
    fn create_function(&self, name: &str, callback: Callback<Self>) -> Self::Function;

    /// Property lookup on any value. Functions are objects for lookup
    /// purposes. Primitives read as undefined unless the host boxes them
    /// the way JavaScript does (`"abc".length`).
    fn get_on_value(&self, value: &HostValue<Self>, name: &str) -> HostValue<Self> {
        match value {
            Value::Object(object) => self.get_property(object, name),
            Value::Function(function) => self.get_function_property(function, name),
            _ => Value::Undefined,
        }
    }

    /// Reads a property of a function object (`fn.length`, static members).
    fn get_function_property(&self, function: &Self::Function, name: &str) -> HostValue<Self> {
        let _ = (function, name);
        Value::Undefined
    }

    /// Assigns a property on a function object (`$.fx`, static members).
    /// Hosts whose functions cannot carry properties reject the write.
    fn set_function_property(
        &self,
        function: &Self::Function,
        name: &str,
        value: HostValue<Self>,
    ) -> Result<(), HostError> {
        let _ = (function, value);
        Err(HostError::Rejected {
            name: name.to_owned(),
        })
    }
}

/// Failure reported by the host itself.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The host refused the assignment (frozen object, read-only property).
    Rejected { name: String },
    /// The host raised an exception; carries its message.
    Thrown(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Rejected { name } => write!(f, "assignment to '{name}' was rejected"),
            HostError::Thrown(message) => write!(f, "host threw: {message}"),
        }
    }
}

impl std::error::Error for HostError {}
