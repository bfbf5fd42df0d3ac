//! In-process object graph.
//!
//! Behaves like a small subset of a browser global scope: reference-counted
//! objects with string keys, native functions that may observe their `this`,
//! frozen objects that reject writes and array-likes built from `length` plus
//! index keys. Used by the unit tests and by embedders without a browser.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::host::{Callback, Host, HostError};
use crate::value::Value;

pub type MemoryValue = Value<MemoryObject, MemoryFunction>;

#[derive(Default)]
struct ObjectData {
    properties: BTreeMap<String, MemoryValue>,
    frozen: bool,
}

/// Shared handle to an object. Clones point at the same properties.
#[derive(Clone, Default)]
pub struct MemoryObject(Rc<RefCell<ObjectData>>);

impl MemoryObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryObject::insert`].
    pub fn with(self, name: &str, value: impl Into<MemoryValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Array-like object: `length` plus `"0"`, `"1"`, ... keys.
    pub fn array(items: impl IntoIterator<Item = MemoryValue>) -> Self {
        let array = Self::new();
        let mut length = 0u32;
        for item in items {
            array.insert(&length.to_string(), item);
            length += 1;
        }
        array.with("length", length)
    }

    /// Writes bypassing the frozen flag, like host-internal initialisation.
    pub fn insert(&self, name: &str, value: impl Into<MemoryValue>) {
        self.0
            .borrow_mut()
            .properties
            .insert(name.to_owned(), value.into());
    }

    pub fn get(&self, name: &str) -> MemoryValue {
        self.0
            .borrow()
            .properties
            .get(name)
            .cloned()
            .unwrap_or(Value::Undefined)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().properties.contains_key(name)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().properties.keys().cloned().collect()
    }

    /// Later assignments through the host are rejected.
    pub fn freeze(&self) {
        self.0.borrow_mut().frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.0.borrow().frozen
    }
}

/// Identity, not structural equality.
impl PartialEq for MemoryObject {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Only keys: objects may reference each other in cycles.
impl fmt::Debug for MemoryObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.borrow().properties.keys()).finish()
    }
}

impl From<MemoryObject> for MemoryValue {
    fn from(object: MemoryObject) -> Self {
        Value::Object(object)
    }
}

type NativeFn = dyn Fn(&MemoryValue, &[MemoryValue]) -> Result<MemoryValue, HostError>;

/// Native function. Like in JavaScript it is also an object: static members
/// such as `$.fx` live in its own property table.
#[derive(Clone)]
pub struct MemoryFunction {
    name: Rc<str>,
    body: Rc<NativeFn>,
    statics: MemoryObject,
}

impl MemoryFunction {
    pub fn new(name: &str, body: impl Fn(&[MemoryValue]) -> MemoryValue + 'static) -> Self {
        Self::method(name, move |_, args| body(args))
    }

    /// A function that reads its receiver.
    pub fn method(
        name: &str,
        body: impl Fn(&MemoryValue, &[MemoryValue]) -> MemoryValue + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Rc::new(
                move |this: &MemoryValue, args: &[MemoryValue]| -> Result<MemoryValue, HostError> {
                    Ok(body(this, args))
                },
            ),
            statics: MemoryObject::new(),
        }
    }

    /// A function that always raises `message`.
    pub fn throwing(name: &str, message: &str) -> Self {
        let message = message.to_owned();
        Self {
            name: name.into(),
            body: Rc::new(
                move |_: &MemoryValue, _: &[MemoryValue]| -> Result<MemoryValue, HostError> {
                    Err(HostError::Thrown(message.clone()))
                },
            ),
            statics: MemoryObject::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The function's own properties.
    pub fn statics(&self) -> &MemoryObject {
        &self.statics
    }

    /// Builder form for static members.
    pub fn with(self, name: &str, value: impl Into<MemoryValue>) -> Self {
        self.statics.insert(name, value);
        self
    }
}

impl PartialEq for MemoryFunction {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for MemoryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function {}()", self.name)
    }
}

impl From<MemoryFunction> for MemoryValue {
    fn from(function: MemoryFunction) -> Self {
        Value::Function(function)
    }
}

pub struct MemoryHost {
    global: MemoryObject,
    lookups: Cell<usize>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::with_global(MemoryObject::new())
    }

    pub fn with_global(global: MemoryObject) -> Self {
        Self {
            global,
            lookups: Cell::new(0),
        }
    }

    /// Number of property reads served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    pub fn reset_lookups(&self) {
        self.lookups.set(0);
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MemoryHost {
    type Object = MemoryObject;
    type Function = MemoryFunction;

    fn global(&self) -> MemoryObject {
        self.global.clone()
    }

    fn get_property(&self, object: &MemoryObject, name: &str) -> MemoryValue {
        self.lookups.set(self.lookups.get() + 1);
        object.get(name)
    }

    fn set_property(
        &self,
        object: &MemoryObject,
        name: &str,
        value: MemoryValue,
    ) -> Result<(), HostError> {
        if object.is_frozen() {
            return Err(HostError::Rejected {
                name: name.to_owned(),
            });
        }
        object.insert(name, value);
        Ok(())
    }

    /// Strings expose `length` and index keys in UTF-16 code units, like
    /// JavaScript. Other primitive properties are not modelled.
    fn get_on_value(&self, value: &MemoryValue, name: &str) -> MemoryValue {
        match value {
            Value::Object(object) => self.get_property(object, name),
            Value::Function(function) => self.get_function_property(function, name),
            Value::Text(text) => {
                self.lookups.set(self.lookups.get() + 1);
                text_property(text, name)
            }
            _ => Value::Undefined,
        }
    }

    fn get_function_property(&self, function: &MemoryFunction, name: &str) -> MemoryValue {
        self.get_property(&function.statics, name)
    }

    fn set_function_property(
        &self,
        function: &MemoryFunction,
        name: &str,
        value: MemoryValue,
    ) -> Result<(), HostError> {
        self.set_property(&function.statics, name, value)
    }

    fn apply(
        &self,
        function: &MemoryFunction,
        receiver: &MemoryValue,
        args: &[MemoryValue],
    ) -> Result<MemoryValue, HostError> {
        (function.body)(receiver, args)
    }

    fn create_function(&self, name: &str, callback: Callback<Self>) -> MemoryFunction {
        MemoryFunction::new(name, move |args| callback(args))
    }
}

fn text_property(text: &str, name: &str) -> MemoryValue {
    if name == "length" {
        return Value::Number(text.encode_utf16().count() as f64);
    }
    // Canonical indices only: "01" and "+1" are ordinary keys.
    name.parse::<usize>()
        .ok()
        .filter(|index| index.to_string() == name)
        .and_then(|index| text.encode_utf16().nth(index))
        .map(|unit| Value::Text(String::from_utf16_lossy(&[unit])))
        .unwrap_or(Value::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_properties() {
        let object = MemoryObject::new();
        let alias = object.clone();
        alias.insert("x", 1);
        assert_eq!(object.get("x"), Value::Number(1.0));
        assert_eq!(object, alias);
        assert_ne!(object, MemoryObject::new());
    }

    #[test]
    fn array_has_length_and_index_keys() {
        let array = MemoryObject::array([Value::from("a"), Value::from("b")]);
        assert_eq!(array.get("length"), Value::Number(2.0));
        assert_eq!(array.get("1"), Value::from("b"));
        assert!(array.get("2").is_undefined());
    }

    #[test]
    fn frozen_object_rejects_host_writes() {
        let host = MemoryHost::new();
        let object = MemoryObject::new().with("x", 1);
        object.freeze();
        assert_eq!(
            host.set_property(&object, "x", Value::from(2)),
            Err(HostError::Rejected { name: "x".into() })
        );
        assert_eq!(object.get("x"), Value::Number(1.0));
    }

    #[test]
    fn method_sees_receiver() {
        let host = MemoryHost::new();
        let receiver = MemoryValue::from(MemoryObject::new().with("name", "parent"));
        let who = MemoryFunction::method("who", |this, _| {
            this.as_object()
                .map(|object| object.get("name"))
                .unwrap_or_default()
        });
        assert_eq!(host.apply(&who, &receiver, &[]), Ok(Value::from("parent")));
        assert_eq!(host.apply(&who, &Value::Undefined, &[]), Ok(Value::Undefined));
    }

    #[test]
    fn functions_carry_their_own_properties() {
        let host = MemoryHost::new();
        let jquery = MemoryFunction::new("jQuery", |_| Value::Undefined).with("version", "3.7");
        assert_eq!(host.get_function_property(&jquery, "version"), Value::from("3.7"));
        assert_eq!(host.set_function_property(&jquery, "fx", Value::from(1)), Ok(()));
        assert_eq!(jquery.statics().get("fx"), Value::Number(1.0));
        assert!(host.get_function_property(&jquery, "missing").is_undefined());
    }

    #[test]
    fn text_has_length_and_index_keys() {
        let host = MemoryHost::new();
        let title = Value::from("héllo");
        assert_eq!(host.get_on_value(&title, "length"), Value::Number(5.0));
        assert_eq!(host.get_on_value(&title, "1"), Value::from("é"));
        assert!(host.get_on_value(&title, "5").is_undefined());
        assert!(host.get_on_value(&title, "toUpperCase").is_undefined());
        assert!(host.get_on_value(&Value::from(3), "length").is_undefined());
    }

    #[test]
    fn lookups_are_counted() {
        let host = MemoryHost::with_global(MemoryObject::new().with("a", 1));
        host.get_property(&host.global(), "a");
        host.get_property(&host.global(), "b");
        assert_eq!(host.lookups(), 2);
        host.reset_lookups();
        assert_eq!(host.lookups(), 0);
    }
}
