use crate::completion::Completion;
use crate::object::{JsObject, JsObjectData};
use crate::types::{JsString, JsValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Type,
    Reference,
    Range,
    Syntax,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Type => "TypeError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::Range => "RangeError",
            ErrorKind::Syntax => "SyntaxError",
        }
    }
}

/// Builds a plain error object carrying `name` and `message`. Wiring it
/// to the realm's Error prototypes is the job of the Error built-ins.
pub fn create_error(kind: ErrorKind, msg: &str) -> JsValue {
    let mut data = JsObjectData::with_class(kind.name());
    data.insert_value(
        "message".to_string(),
        JsValue::String(JsString::from_str(msg)),
    );
    data.insert_value(
        "name".to_string(),
        JsValue::String(JsString::from_str(kind.name())),
    );
    JsValue::Object(JsObject::new(data))
}

pub fn throw_error(kind: ErrorKind, msg: &str) -> Completion {
    Completion::Throw(create_error(kind, msg))
}

pub fn type_error(msg: &str) -> Completion {
    throw_error(ErrorKind::Type, msg)
}

pub fn reference_error(msg: &str) -> Completion {
    throw_error(ErrorKind::Reference, msg)
}

/// `true` when the value looks like an error object of the given kind.
/// Used by tests and by hosts reporting uncaught throws.
pub fn is_error(val: &JsValue, kind: ErrorKind) -> bool {
    match val {
        JsValue::Object(o) => o.class_name() == kind.name(),
        _ => false,
    }
}

pub fn error_message(val: &JsValue) -> Option<String> {
    let obj = val.as_object()?;
    match obj.get("message") {
        JsValue::String(s) => Some(s.to_rust_string()),
        _ => None,
    }
}
