use super::*;
use crate::error::{reference_error, type_error};
use rustc_hash::FxHashMap;

/// One named storage slot. `value == None` means the binding exists but
/// is uninitialized (temporal dead zone). `strict` is captured at the
/// declaration site and forces a TypeError on illegal mutation even
/// when the call site is sloppy.
#[derive(Debug, Clone)]
pub struct Binding {
    pub(crate) value: Option<JsValue>,
    pub(crate) mutable: bool,
    pub(crate) deletable: bool,
    pub(crate) strict: bool,
}

/// Environment Record owning a binding table (spec §9.1.1.1). Function
/// and global records compose this for their declarative part.
#[derive(Debug, Default)]
pub struct DeclarativeEnvironment {
    bindings: FxHashMap<String, Binding>,
}

impl DeclarativeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Adds an uninitialized mutable binding. The evaluator must
    /// de-duplicate declarations first; a duplicate here is fatal.
    pub fn create_mutable_binding(&mut self, name: &str, deletable: bool) {
        let prev = self.bindings.insert(
            name.to_string(),
            Binding {
                value: None,
                mutable: true,
                deletable,
                strict: false,
            },
        );
        assert!(prev.is_none(), "binding {name} already exists");
    }

    pub fn create_immutable_binding(&mut self, name: &str, strict: bool) {
        let prev = self.bindings.insert(
            name.to_string(),
            Binding {
                value: None,
                mutable: false,
                deletable: false,
                strict,
            },
        );
        assert!(prev.is_none(), "binding {name} already exists");
    }

    /// Fires at most once per binding, after creation.
    pub fn initialize_binding(&mut self, name: &str, value: JsValue) {
        let binding = self
            .bindings
            .get_mut(name)
            .unwrap_or_else(|| panic!("no binding for {name}"));
        assert!(binding.value.is_none(), "binding {name} already initialized");
        binding.value = Some(value);
    }

    pub fn get_binding_value(&self, name: &str, _strict: bool) -> Completion {
        let binding = self
            .bindings
            .get(name)
            .unwrap_or_else(|| panic!("no binding for {name}"));
        match &binding.value {
            Some(v) => Completion::Normal(v.clone()),
            None => reference_error(&format!("{name} is not initialized")),
        }
    }

    pub fn set_mutable_binding(&mut self, name: &str, value: JsValue, strict: bool) -> Completion {
        let Some(binding) = self.bindings.get_mut(name) else {
            if strict {
                return reference_error(&format!("{name} is not defined"));
            }
            // Sloppy-mode auto-binding on an unresolved name: create a
            // mutable deletable binding and initialize it in place.
            self.bindings.insert(
                name.to_string(),
                Binding {
                    value: Some(value),
                    mutable: true,
                    deletable: true,
                    strict: false,
                },
            );
            return Completion::Normal(JsValue::Undefined);
        };
        if binding.value.is_none() {
            return reference_error(&format!("{name} is not initialized"));
        }
        if binding.mutable {
            binding.value = Some(value);
            return Completion::Normal(JsValue::Undefined);
        }
        if binding.strict || strict {
            return type_error("Assignment to constant variable.");
        }
        // Sloppy write to an immutable binding is silently ignored
        Completion::Normal(JsValue::Undefined)
    }

    pub fn delete_binding(&mut self, name: &str) -> JsResult<bool> {
        let binding = self
            .bindings
            .get(name)
            .unwrap_or_else(|| panic!("no binding for {name}"));
        if !binding.deletable {
            return Ok(false);
        }
        self.bindings.remove(name);
        Ok(true)
    }
}
