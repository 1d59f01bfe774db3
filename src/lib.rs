//! ECMAScript core semantics: the value model, type coercion, the
//! completion-record result protocol, and the environment-record scope
//! system. Built-ins and the parser/evaluator sit on top of this crate
//! and drive it through the re-exported surface below.

mod completion;
mod environment;
mod error;
mod object;
mod types;

pub use completion::{Completion, JsResult};
pub use environment::{
    DeclarativeEnvironment, EnvRef, Environment, EnvironmentRecord, FunctionEnvironment,
    GlobalEnvironment, ObjectEnvironment, ThisBindingStatus, get_identifier_value,
    get_this_environment, resolve_binding, set_identifier_value,
};
pub use error::{
    ErrorKind, create_error, error_message, is_error, reference_error, throw_error, type_error,
};
pub use object::{JsObject, JsObjectData, PropertyDescriptor};
pub use types::{JsString, JsValue, conversions, number_ops};
