use crate::completion::{Completion, JsResult};
use crate::error::reference_error;
use crate::object::JsObject;
use crate::types::JsValue;
use std::cell::RefCell;
use std::rc::Rc;

mod declarative;
mod function;
mod global;

pub use declarative::*;
pub use function::*;
pub use global::*;

/// Shared handle to a scope. Closures and inner scopes alias the same
/// chain, so ownership is reference-counted, never exclusive.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope: a record plus the link to its creating scope.
#[derive(Debug)]
pub struct Environment {
    pub record: EnvironmentRecord,
    pub outer: Option<EnvRef>,
}

/// Closed set of record kinds sharing one capability contract. Each
/// operation dispatches by kind so the per-kind rules stay visible in
/// one place instead of an override chain.
#[derive(Debug)]
pub enum EnvironmentRecord {
    Declarative(DeclarativeEnvironment),
    Function(FunctionEnvironment),
    Global(GlobalEnvironment),
}

impl Environment {
    /// Block or catch scope.
    pub fn declarative(outer: Option<EnvRef>) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            record: EnvironmentRecord::Declarative(DeclarativeEnvironment::new()),
            outer,
        }))
    }

    /// Call scope. `lexical_this` marks arrow-like functions that
    /// inherit `this` from the enclosing scope.
    pub fn function(
        outer: EnvRef,
        lexical_this: bool,
        home_object: Option<JsObject>,
        new_target: JsValue,
    ) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            record: EnvironmentRecord::Function(FunctionEnvironment::new(
                lexical_this,
                home_object,
                new_target,
            )),
            outer: Some(outer),
        }))
    }

    /// Realm root scope; has no outer.
    pub fn global(global_object: JsObject, global_this: JsValue) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            record: EnvironmentRecord::Global(GlobalEnvironment::new(global_object, global_this)),
            outer: None,
        }))
    }
}

impl EnvironmentRecord {
    pub fn has_binding(&self, name: &str) -> bool {
        match self {
            EnvironmentRecord::Declarative(env) => env.has_binding(name),
            EnvironmentRecord::Function(env) => env.bindings.has_binding(name),
            EnvironmentRecord::Global(env) => env.has_binding(name),
        }
    }

    pub fn create_mutable_binding(&mut self, name: &str, deletable: bool) {
        match self {
            EnvironmentRecord::Declarative(env) => env.create_mutable_binding(name, deletable),
            EnvironmentRecord::Function(env) => env.bindings.create_mutable_binding(name, deletable),
            EnvironmentRecord::Global(env) => env.create_mutable_binding(name, deletable),
        }
    }

    pub fn create_immutable_binding(&mut self, name: &str, strict: bool) {
        match self {
            EnvironmentRecord::Declarative(env) => env.create_immutable_binding(name, strict),
            EnvironmentRecord::Function(env) => env.bindings.create_immutable_binding(name, strict),
            EnvironmentRecord::Global(env) => env.create_immutable_binding(name, strict),
        }
    }

    pub fn initialize_binding(&mut self, name: &str, value: JsValue) {
        match self {
            EnvironmentRecord::Declarative(env) => env.initialize_binding(name, value),
            EnvironmentRecord::Function(env) => env.bindings.initialize_binding(name, value),
            EnvironmentRecord::Global(env) => env.initialize_binding(name, value),
        }
    }

    pub fn get_binding_value(&self, name: &str, strict: bool) -> Completion {
        match self {
            EnvironmentRecord::Declarative(env) => env.get_binding_value(name, strict),
            EnvironmentRecord::Function(env) => env.bindings.get_binding_value(name, strict),
            EnvironmentRecord::Global(env) => env.get_binding_value(name, strict),
        }
    }

    pub fn set_mutable_binding(&mut self, name: &str, value: JsValue, strict: bool) -> Completion {
        match self {
            EnvironmentRecord::Declarative(env) => env.set_mutable_binding(name, value, strict),
            EnvironmentRecord::Function(env) => env.bindings.set_mutable_binding(name, value, strict),
            EnvironmentRecord::Global(env) => env.set_mutable_binding(name, value, strict),
        }
    }

    pub fn delete_binding(&mut self, name: &str) -> JsResult<bool> {
        match self {
            EnvironmentRecord::Declarative(env) => env.delete_binding(name),
            EnvironmentRecord::Function(env) => env.bindings.delete_binding(name),
            EnvironmentRecord::Global(env) => env.delete_binding(name),
        }
    }

    pub fn has_this_binding(&self) -> bool {
        match self {
            EnvironmentRecord::Declarative(_) => false,
            EnvironmentRecord::Function(env) => env.has_this_binding(),
            EnvironmentRecord::Global(_) => true,
        }
    }

    pub fn has_super_binding(&self) -> bool {
        match self {
            EnvironmentRecord::Declarative(_) | EnvironmentRecord::Global(_) => false,
            EnvironmentRecord::Function(env) => env.has_super_binding(),
        }
    }

    /// Callers must check `has_this_binding` first.
    pub fn get_this_binding(&self) -> Completion {
        match self {
            EnvironmentRecord::Declarative(_) => {
                panic!("get_this_binding on a declarative environment")
            }
            EnvironmentRecord::Function(env) => env.get_this_binding(),
            EnvironmentRecord::Global(env) => env.get_this_binding(),
        }
    }

    pub fn bind_this_value(&mut self, value: JsValue) -> Completion {
        match self {
            EnvironmentRecord::Function(env) => env.bind_this_value(value),
            _ => panic!("bind_this_value on a non-function environment"),
        }
    }

    pub fn get_super_base(&self) -> Completion {
        match self {
            EnvironmentRecord::Function(env) => env.get_super_base(),
            _ => panic!("get_super_base on a non-function environment"),
        }
    }

    pub fn as_global(&self) -> Option<&GlobalEnvironment> {
        match self {
            EnvironmentRecord::Global(env) => Some(env),
            _ => None,
        }
    }

    pub fn as_global_mut(&mut self) -> Option<&mut GlobalEnvironment> {
        match self {
            EnvironmentRecord::Global(env) => Some(env),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionEnvironment> {
        match self {
            EnvironmentRecord::Function(env) => Some(env),
            _ => None,
        }
    }
}

/// Walks the chain and returns the first scope whose record has the
/// binding (spec ResolveBinding, minus the reference wrapper).
pub fn resolve_binding(env: &EnvRef, name: &str) -> Option<EnvRef> {
    let mut current = Some(env.clone());
    while let Some(scope) = current {
        if scope.borrow().record.has_binding(name) {
            return Some(scope);
        }
        current = scope.borrow().outer.clone();
    }
    None
}

/// Identifier read through the chain; an unresolved name throws
/// ReferenceError regardless of mode.
pub fn get_identifier_value(env: &EnvRef, name: &str, strict: bool) -> Completion {
    match resolve_binding(env, name) {
        Some(scope) => scope.borrow().record.get_binding_value(name, strict),
        None => reference_error(&format!("{name} is not defined")),
    }
}

/// Identifier assignment through the chain. A strict unresolved name
/// throws; a sloppy one assigns through the terminal (global) record,
/// which materializes a global object property.
pub fn set_identifier_value(env: &EnvRef, name: &str, value: JsValue, strict: bool) -> Completion {
    match resolve_binding(env, name) {
        Some(scope) => scope
            .borrow_mut()
            .record
            .set_mutable_binding(name, value, strict),
        None => {
            if strict {
                return reference_error(&format!("{name} is not defined"));
            }
            let mut terminal = env.clone();
            loop {
                let outer = terminal.borrow().outer.clone();
                match outer {
                    Some(next) => terminal = next,
                    None => break,
                }
            }
            terminal
                .borrow_mut()
                .record
                .set_mutable_binding(name, value, false)
        }
    }
}

/// Innermost record that owns a `this` binding; skips arrow-style
/// function records. The global record terminates the walk, so this
/// never fails on a well-formed chain.
pub fn get_this_environment(env: &EnvRef) -> EnvRef {
    let mut current = env.clone();
    loop {
        if current.borrow().record.has_this_binding() {
            return current;
        }
        let outer = current.borrow().outer.clone();
        match outer {
            Some(next) => current = next,
            None => panic!("environment chain has no this binding"),
        }
    }
}
