//! The page's real global scope, reached through `js-sys`.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::config::HelperConfig;
use crate::helper::WasmHelper;
use crate::host::{Callback, Host, HostError};
use crate::logging::{error, warning};
use crate::value::Value;

pub type BrowserValue = Value<Object, Function>;

pub type BrowserHelper = WasmHelper<BrowserHost>;

/// Host backed by `globalThis`. Property access goes through `Reflect`, so
/// getters that throw are reported instead of aborting the program.
#[derive(Debug, Default)]
pub struct BrowserHost;

impl BrowserHost {
    pub fn new() -> Self {
        Self
    }

    /// Sorts a raw `JsValue` into the tagged variant.
    pub fn value_from_js(value: JsValue) -> BrowserValue {
        if value.is_undefined() {
            Value::Undefined
        } else if value.is_null() {
            Value::Null
        } else if let Some(b) = value.as_bool() {
            Value::Bool(b)
        } else if let Some(n) = value.as_f64() {
            Value::Number(n)
        } else if let Some(text) = value.as_string() {
            Value::Text(text)
        } else if value.is_function() {
            Value::Function(value.unchecked_into())
        } else {
            // Objects, plus symbols and bigints which only travel as handles.
            Value::Object(value.unchecked_into())
        }
    }

    pub fn value_to_js(value: &BrowserValue) -> JsValue {
        match value {
            Value::Undefined => JsValue::UNDEFINED,
            Value::Null => JsValue::NULL,
            Value::Bool(b) => JsValue::from_bool(*b),
            Value::Number(n) => JsValue::from_f64(*n),
            Value::Text(text) => JsValue::from_str(text),
            Value::Object(object) => JsValue::from(object.clone()),
            Value::Function(function) => JsValue::from(function.clone()),
        }
    }

    fn read(&self, target: &JsValue, name: &str) -> BrowserValue {
        match Reflect::get(target, &JsValue::from_str(name)) {
            Ok(value) => Self::value_from_js(value),
            Err(thrown) => {
                warning!("reading '{name}' threw {}", describe_exception(&thrown));
                Value::Undefined
            }
        }
    }

    fn write(&self, target: &JsValue, name: &str, value: &BrowserValue) -> Result<(), HostError> {
        let stored = Reflect::set(target, &JsValue::from_str(name), &Self::value_to_js(value))
            .map_err(|thrown| HostError::Thrown(describe_exception(&thrown)))?;
        if !stored {
            return Err(HostError::Rejected {
                name: name.to_owned(),
            });
        }
        Ok(())
    }
}

impl Host for BrowserHost {
    type Object = Object;
    type Function = Function;

    fn global(&self) -> Object {
        js_sys::global()
    }

    fn get_property(&self, object: &Object, name: &str) -> BrowserValue {
        self.read(object, name)
    }

    fn get_function_property(&self, function: &Function, name: &str) -> BrowserValue {
        self.read(function, name)
    }

    fn set_property(&self, object: &Object, name: &str, value: BrowserValue) -> Result<(), HostError> {
        self.write(object, name, &value)
    }

    fn set_function_property(
        &self,
        function: &Function,
        name: &str,
        value: BrowserValue,
    ) -> Result<(), HostError> {
        self.write(function, name, &value)
    }

    /// Primitives are boxed first, as `"abc".length` does, since
    /// `Reflect.get` refuses non-object targets.
    fn get_on_value(&self, value: &BrowserValue, name: &str) -> BrowserValue {
        match value {
            Value::Object(object) => self.read(object, name),
            Value::Function(function) => self.read(function, name),
            Value::Bool(_) | Value::Number(_) | Value::Text(_) => {
                match box_primitive(&Self::value_to_js(value)) {
                    Ok(boxed) => self.read(&boxed, name),
                    Err(thrown) => {
                        warning!("boxing {value} threw {}", describe_exception(&thrown));
                        Value::Undefined
                    }
                }
            }
            Value::Undefined | Value::Null => Value::Undefined,
        }
    }

    fn apply(
        &self,
        function: &Function,
        receiver: &BrowserValue,
        args: &[BrowserValue],
    ) -> Result<BrowserValue, HostError> {
        let args: Array = args.iter().map(Self::value_to_js).collect();
        function
            .apply(&Self::value_to_js(receiver), &args)
            .map(Self::value_from_js)
            .map_err(|thrown| HostError::Thrown(describe_exception(&thrown)))
    }

    fn create_function(&self, name: &str, callback: Callback<Self>) -> Function {
        let closure = Closure::<dyn Fn(Array) -> JsValue>::new(move |args: Array| {
            let args: Vec<BrowserValue> = args.iter().map(Self::value_from_js).collect();
            Self::value_to_js(&callback(&args))
        });

        // wasm-bindgen closures take a fixed argument list; a small shim
        // collects however many the page passes into one array.
        let shim = Function::new_with_args(
            "callback",
            "return function() { return callback(Array.prototype.slice.call(arguments)); };",
        );
        let function = match shim.call1(&JsValue::UNDEFINED, closure.as_ref()) {
            Ok(function) => function.unchecked_into::<Function>(),
            Err(thrown) => {
                error!("could not wrap callback '{name}', {}", describe_exception(&thrown));
                closure.as_ref().clone().unchecked_into::<Function>()
            }
        };
        // The page may call it at any time until unload.
        closure.forget();
        function
    }
}

impl WasmHelper<BrowserHost> {
    /// Helper over the page's global scope.
    pub fn browser() -> Self {
        Self::new(BrowserHost::new())
    }

    pub fn browser_with_config(config: HelperConfig) -> Self {
        Self::with_config(BrowserHost::new(), config)
    }
}

/// `Object(primitive)`: the wrapper object whose prototype carries the
/// primitive's properties.
fn box_primitive(primitive: &JsValue) -> Result<JsValue, JsValue> {
    let constructor = Reflect::get(&js_sys::global(), &JsValue::from_str("Object"))?;
    constructor
        .unchecked_into::<Function>()
        .call1(&JsValue::UNDEFINED, primitive)
}

/// `"Name: message"` for `Error` objects, the text itself for thrown strings.
fn describe_exception(thrown: &JsValue) -> String {
    if let Some(error) = thrown.dyn_ref::<js_sys::Error>() {
        return String::from(error.to_string());
    }
    thrown.as_string().unwrap_or_else(|| format!("{thrown:?}"))
}
