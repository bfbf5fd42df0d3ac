//! Dotted-path access to the host graph, callback registration and the
//! blocking gate, bundled behind one cheaply clonable handle.

use std::rc::Rc;

use crate::config::HelperConfig;
use crate::error::PathError;
use crate::gate::{Gate, GateState};
use crate::host::{Callback, Host, HostValue};
use crate::logging::{error, trace, warning};
use crate::path::Path;
use crate::prettify::prettify;
use crate::value::Value;

/// Entry point of the crate.
///
/// Every operation degrades instead of failing: lookups hand back the
/// `undefined`/`null` they stopped at, writes return `false`, and one error
/// line is logged. The `try_*` variants return the [`PathError`] instead of
/// logging it.
///
/// Clones share the host, the configuration and the gate, so a registered
/// callback can capture a clone and call [`WasmHelper::stop`]. Such a
/// callback keeps the helper alive for as long as the host keeps the
/// callback.
pub struct WasmHelper<H: Host> {
    inner: Rc<Inner<H>>,
}

struct Inner<H> {
    host: H,
    config: HelperConfig,
    gate: Gate,
}

impl<H: Host> Clone for WasmHelper<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> WasmHelper<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, HelperConfig::default())
    }

    pub fn with_config(host: H, config: HelperConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                config,
                gate: Gate::new(),
            }),
        }
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn config(&self) -> HelperConfig {
        self.inner.config
    }

    pub fn is_verbose(&self) -> bool {
        self.inner.config.verbose
    }

    pub fn global(&self) -> HostValue<H> {
        Value::Object(self.host().global())
    }

    // ---------------------------------------------------------------------
    // Reading
    // ---------------------------------------------------------------------

    /// Value at `path` (eg. `document.someparent.somechild.value`), resolved
    /// from the global scope.
    pub fn get(&self, path: &str) -> HostValue<H> {
        trace!(self.is_verbose(), "Getting value for name: '{path}'");
        match self.try_get(path) {
            Ok(value) => {
                trace!(self.is_verbose(), "Got value: {value} for name: '{path}'");
                value
            }
            Err(e) => {
                error!("could not get value for '{path}', {e}");
                e.sentinel()
            }
        }
    }

    pub fn try_get(&self, path: &str) -> Result<HostValue<H>, PathError> {
        self.try_get_from(&self.global(), path)
    }

    /// Like [`WasmHelper::get`], resolved from `root` instead of the global scope.
    pub fn get_from(&self, root: &HostValue<H>, path: &str) -> HostValue<H> {
        trace!(self.is_verbose(), "Getting value for name: '{path}' on {root}");
        self.try_get_from(root, path).unwrap_or_else(|e| {
            error!("could not get value for '{path}' on {root}, {e}");
            e.sentinel()
        })
    }

    pub fn try_get_from(&self, root: &HostValue<H>, path: &str) -> Result<HostValue<H>, PathError> {
        let path = Path::parse(path)?;
        if root.is_nullish() {
            return Err(PathError::NullishTarget { kind: root.kind() });
        }
        self.resolve(root.clone(), path.segments())
    }

    /// Walks `segments` from `current`, stopping at the first hop that is
    /// undefined or null. No lookup happens past that hop.
    fn resolve(
        &self,
        mut current: HostValue<H>,
        segments: &[&str],
    ) -> Result<HostValue<H>, PathError> {
        for (index, segment) in segments.iter().enumerate() {
            let child = self.host().get_on_value(&current, segment);
            if child.is_nullish() {
                return Err(PathError::MissingLink {
                    segment: (*segment).to_owned(),
                    kind: child.kind(),
                });
            }
            trace!(
                self.is_verbose(),
                "Recursing on child: {child} with names: {}",
                prettify(&segments[index + 1..])
            );
            current = child;
        }
        Ok(current)
    }

    // ---------------------------------------------------------------------
    // Writing
    // ---------------------------------------------------------------------

    /// Assigns `value` at `path`. Every segment but the last has to exist
    /// already; nothing is created on the way and nothing is written when
    /// the parent chain is broken.
    pub fn set(&self, path: &str, value: impl Into<HostValue<H>>) -> bool {
        let value = value.into();
        trace!(self.is_verbose(), "Setting value: {value} for name: '{path}'");
        match self.try_set(path, value) {
            Ok(()) => true,
            Err(e) => {
                error!("could not set value for '{path}', {e}");
                false
            }
        }
    }

    pub fn try_set(&self, path: &str, value: impl Into<HostValue<H>>) -> Result<(), PathError> {
        let path = Path::parse(path)?;
        let (parent_segments, name) = path.split_last();
        let parent = self.resolve(self.global(), parent_segments)?;
        let parent_name = parent_segments.last().copied().unwrap_or_default();
        self.assign(&parent, parent_name, name, value.into())
    }

    /// Assigns `value` to `name` on an object already in hand.
    pub fn set_on(&self, object: &HostValue<H>, name: &str, value: impl Into<HostValue<H>>) -> bool {
        let value = value.into();
        trace!(self.is_verbose(), "Setting value: {value} on {object} for name: '{name}'");
        match self.try_set_on(object, name, value) {
            Ok(()) => true,
            Err(e) => {
                error!("could not set value for '{name}' on {object}, {e}");
                false
            }
        }
    }

    pub fn try_set_on(
        &self,
        object: &HostValue<H>,
        name: &str,
        value: impl Into<HostValue<H>>,
    ) -> Result<(), PathError> {
        if object.is_nullish() {
            return Err(PathError::NullishTarget { kind: object.kind() });
        }
        self.assign(object, "", name, value.into())
    }

    fn assign(
        &self,
        target: &HostValue<H>,
        target_name: &str,
        name: &str,
        value: HostValue<H>,
    ) -> Result<(), PathError> {
        match target {
            Value::Object(object) => self.host().set_property(object, name, value)?,
            Value::Function(function) => self.host().set_function_property(function, name, value)?,
            _ => {
                return Err(PathError::NotAnObject {
                    segment: target_name.to_owned(),
                    kind: target.kind(),
                });
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Calling
    // ---------------------------------------------------------------------

    /// Calls the function at `name` with its parent object as receiver, so
    /// `call("a.b.f", ..)` runs `f` with `this` bound to `a.b`.
    pub fn call(&self, name: &str, args: &[HostValue<H>]) -> HostValue<H> {
        trace!(self.is_verbose(), "Calling '{name}' with arguments: {}", prettify(args));
        self.try_call(name, args).unwrap_or_else(|e| {
            error!("could not call '{name}', {e}");
            e.sentinel()
        })
    }

    pub fn try_call(&self, name: &str, args: &[HostValue<H>]) -> Result<HostValue<H>, PathError> {
        let path = Path::parse(name)?;
        let (parent_segments, function_name) = path.split_last();
        let parent = self.resolve(self.global(), parent_segments)?;
        self.call_member(&parent, function_name, args)
    }

    /// Calls method `name` of `object`.
    pub fn call_on(&self, object: &HostValue<H>, name: &str, args: &[HostValue<H>]) -> HostValue<H> {
        trace!(
            self.is_verbose(),
            "Calling '{name}' on {object} with arguments: {}",
            prettify(args)
        );
        self.try_call_on(object, name, args).unwrap_or_else(|e| {
            error!("could not call '{name}' on {object}, {e}");
            e.sentinel()
        })
    }

    pub fn try_call_on(
        &self,
        object: &HostValue<H>,
        name: &str,
        args: &[HostValue<H>],
    ) -> Result<HostValue<H>, PathError> {
        if object.is_nullish() {
            return Err(PathError::NullishTarget { kind: object.kind() });
        }
        self.call_member(object, name, args)
    }

    fn call_member(
        &self,
        receiver: &HostValue<H>,
        name: &str,
        args: &[HostValue<H>],
    ) -> Result<HostValue<H>, PathError> {
        let member = self.host().get_on_value(receiver, name);
        let kind = member.kind();
        if member.is_nullish() {
            return Err(PathError::MissingLink {
                segment: name.to_owned(),
                kind,
            });
        }
        let Value::Function(function) = member else {
            return Err(PathError::NotCallable {
                name: name.to_owned(),
                kind,
            });
        };
        trace!(
            self.is_verbose(),
            "Calling '{name}' on {receiver} with arguments: {}",
            prettify(args)
        );
        Ok(self.host().apply(&function, receiver, args)?)
    }

    /// Calls a function value directly, without a receiver.
    pub fn invoke(&self, function: &HostValue<H>, args: &[HostValue<H>]) -> HostValue<H> {
        trace!(self.is_verbose(), "Invoking {function} with arguments: {}", prettify(args));
        self.try_invoke(function, args).unwrap_or_else(|e| {
            error!("could not invoke {function}, {e}");
            e.sentinel()
        })
    }

    pub fn try_invoke(
        &self,
        function: &HostValue<H>,
        args: &[HostValue<H>],
    ) -> Result<HostValue<H>, PathError> {
        match function {
            Value::Undefined | Value::Null => Err(PathError::NullishTarget {
                kind: function.kind(),
            }),
            Value::Function(callable) => Ok(self.host().apply(callable, &Value::Undefined, args)?),
            other => Err(PathError::NotCallable {
                name: other.to_string(),
                kind: other.kind(),
            }),
        }
    }

    // ---------------------------------------------------------------------
    // Callbacks
    // ---------------------------------------------------------------------

    /// Installs every callback as a global function under its name, callable
    /// from page scripts and from [`WasmHelper::call`]. Registering a name
    /// twice replaces the earlier callback. Installation order follows the
    /// iterator and nothing depends on it.
    ///
    /// Returns `false` if any of them could not be installed.
    pub fn register_callbacks<N, I>(&self, callbacks: I) -> bool
    where
        N: AsRef<str>,
        I: IntoIterator<Item = (N, Callback<H>)>,
    {
        let callbacks: Vec<(N, Callback<H>)> = callbacks.into_iter().collect();
        if self.is_verbose() {
            let names: Vec<&str> = callbacks.iter().map(|(name, _)| name.as_ref()).collect();
            trace!(true, "Registering callbacks: {}", prettify(&names));
        }

        let mut all_installed = true;
        for (name, callback) in callbacks {
            let name = name.as_ref();
            let function = self.host().create_function(name, callback);
            all_installed &= self.set(name, Value::Function(function));
        }
        all_installed
    }

    /// Installs a single callback. See [`WasmHelper::register_callbacks`].
    pub fn register_callback(
        &self,
        name: &str,
        callback: impl Fn(&[HostValue<H>]) -> HostValue<H> + 'static,
    ) -> bool {
        let callback: Callback<H> = Rc::new(callback);
        self.register_callbacks([(name, callback)])
    }

    // ---------------------------------------------------------------------
    // Blocking
    // ---------------------------------------------------------------------

    /// Parks the calling task until [`WasmHelper::stop`] is called, keeping
    /// the program alive while the page delivers callbacks. Returns at once
    /// if the helper was already stopped.
    pub async fn wait(&self) {
        trace!(self.is_verbose(), "Waiting...");
        self.inner.gate.wait().await;
        trace!(self.is_verbose(), "Stopped waiting");
    }

    /// Releases [`WasmHelper::wait`]. Only the first call has an effect;
    /// later calls log a warning and return `false`.
    pub fn stop(&self) -> bool {
        trace!(self.is_verbose(), "Stopping waiting...");
        let released = self.inner.gate.release();
        if !released {
            warning!("stop() called again, the helper is already stopped");
        }
        released
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.gate.state() == GateState::Released
    }

    // ---------------------------------------------------------------------
    // Conversion
    // ---------------------------------------------------------------------

    /// Items of an array-like value (anything with a numeric `length`),
    /// read through its index properties. `None` for undefined, null and
    /// values without a length.
    pub fn to_array(&self, value: &HostValue<H>) -> Option<Vec<HostValue<H>>> {
        match self.try_to_array(value) {
            Ok(items) => Some(items),
            Err(e) => {
                error!("could not convert {value} to array, {e}");
                None
            }
        }
    }

    pub fn try_to_array(&self, value: &HostValue<H>) -> Result<Vec<HostValue<H>>, PathError> {
        if value.is_nullish() {
            return Err(PathError::NullishTarget { kind: value.kind() });
        }
        let length = self
            .host()
            .get_on_value(value, "length")
            .as_number()
            .filter(|length| length.is_finite() && *length >= 0.0 && *length <= u32::MAX as f64)
            .ok_or(PathError::NotArrayLike { kind: value.kind() })?;

        Ok((0..length as u32)
            .map(|index| self.host().get_on_value(value, &index.to_string()))
            .collect())
    }
}
