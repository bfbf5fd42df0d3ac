use std::fmt;

use serde::Serialize;

use crate::logging::warning;

/// JSON text of `value` for log lines. Shapes JSON cannot express (host
/// handles, non-string map keys) fall back to the `Debug` form.
pub fn prettify<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(error) => {
            warning!("Failed to marshal given value: {value:?} ({error})");
            format!("{value:?}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::{MemoryObject, MemoryValue};
    use std::collections::HashMap;

    #[test]
    fn serializable_values_become_json() {
        assert_eq!(prettify(&["a", "b"]), r#"["a","b"]"#);
        let args: Vec<MemoryValue> = vec![1.into(), "x".into(), MemoryValue::Null];
        assert_eq!(prettify(&args), r#"[1.0,"x",null]"#);
    }

    #[test]
    fn host_handles_fall_back_to_debug() {
        let args: Vec<MemoryValue> = vec![MemoryObject::new().with("k", 1).into()];
        assert_eq!(prettify(&args), r#"[Object({"k"})]"#);
    }

    #[test]
    fn non_string_keys_fall_back_to_debug() {
        let map = HashMap::from([((1, 2), "pair")]);
        assert_eq!(prettify(&map), r#"{(1, 2): "pair"}"#);
    }
}
