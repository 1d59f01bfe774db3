use super::*;
use crate::error::{ErrorKind, create_error, reference_error, type_error};
use crate::object::{JsObject, PropertyDescriptor};
use rustc_hash::FxHashSet;

/// Object-backed Environment Record (spec §9.1.1.2) wrapping the realm's
/// global object. Bindings are the object's properties.
#[derive(Debug)]
pub struct ObjectEnvironment {
    binding_object: JsObject,
}

impl ObjectEnvironment {
    pub fn new(binding_object: JsObject) -> Self {
        Self { binding_object }
    }

    pub fn binding_object(&self) -> &JsObject {
        &self.binding_object
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.binding_object.has_property(name)
    }

    pub fn create_mutable_binding(&mut self, name: &str, deletable: bool) -> JsResult<()> {
        let desc = PropertyDescriptor::data(JsValue::Undefined, true, true, deletable);
        if !self.binding_object.define_own_property(name, desc) {
            return Err(create_error(
                ErrorKind::Type,
                &format!("Cannot define property '{name}'"),
            ));
        }
        Ok(())
    }

    pub fn initialize_binding(&mut self, name: &str, value: JsValue) {
        // The binding was just defined writable; this Set cannot be
        // rejected by the data-property contract.
        let _ = self.binding_object.set(name, value);
    }

    pub fn get_binding_value(&self, name: &str, strict: bool) -> Completion {
        if !self.binding_object.has_property(name) {
            if strict {
                return reference_error(&format!("{name} is not defined"));
            }
            return Completion::Normal(JsValue::Undefined);
        }
        Completion::Normal(self.binding_object.get(name))
    }

    pub fn set_mutable_binding(&mut self, name: &str, value: JsValue, strict: bool) -> Completion {
        if !self.binding_object.has_property(name) && strict {
            return reference_error(&format!("{name} is not defined"));
        }
        if !self.binding_object.set(name, value) && strict {
            return type_error(&format!("Cannot assign to read only property '{name}'"));
        }
        Completion::Normal(JsValue::Undefined)
    }

    pub fn delete_binding(&mut self, name: &str) -> JsResult<bool> {
        Ok(self.binding_object.delete(name))
    }
}

/// Global Environment Record (spec §9.1.1.4): a declarative sub-record
/// for `let`/`const`/class declarations layered over an object-backed
/// sub-record wrapping the global object, plus the set of names that
/// entered the global object through var/function declarations.
#[derive(Debug)]
pub struct GlobalEnvironment {
    decl: DeclarativeEnvironment,
    obj: ObjectEnvironment,
    global_this: JsValue,
    var_names: FxHashSet<String>,
}

impl GlobalEnvironment {
    pub fn new(global_object: JsObject, global_this: JsValue) -> Self {
        Self {
            decl: DeclarativeEnvironment::new(),
            obj: ObjectEnvironment::new(global_object),
            global_this,
            var_names: FxHashSet::default(),
        }
    }

    pub fn global_object(&self) -> &JsObject {
        self.obj.binding_object()
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.decl.has_binding(name) || self.obj.has_binding(name)
    }

    // Lexical declarations always land in the declarative sub-record;
    // var/function declarations go through create_global_var_binding and
    // create_global_function_binding below.
    pub fn create_mutable_binding(&mut self, name: &str, deletable: bool) {
        self.decl.create_mutable_binding(name, deletable);
    }

    pub fn create_immutable_binding(&mut self, name: &str, strict: bool) {
        self.decl.create_immutable_binding(name, strict);
    }

    pub fn initialize_binding(&mut self, name: &str, value: JsValue) {
        if self.decl.has_binding(name) {
            self.decl.initialize_binding(name, value);
        } else {
            self.obj.initialize_binding(name, value);
        }
    }

    pub fn get_binding_value(&self, name: &str, strict: bool) -> Completion {
        if self.decl.has_binding(name) {
            return self.decl.get_binding_value(name, strict);
        }
        self.obj.get_binding_value(name, strict)
    }

    pub fn set_mutable_binding(&mut self, name: &str, value: JsValue, strict: bool) -> Completion {
        if self.decl.has_binding(name) {
            return self.decl.set_mutable_binding(name, value, strict);
        }
        self.obj.set_mutable_binding(name, value, strict)
    }

    pub fn delete_binding(&mut self, name: &str) -> JsResult<bool> {
        if self.decl.has_binding(name) {
            return self.decl.delete_binding(name);
        }
        if self.obj.binding_object().has_own_property(name) {
            let status = self.obj.delete_binding(name)?;
            if status {
                // only drop the name once the property really went away
                self.var_names.remove(name);
            }
            return Ok(status);
        }
        Ok(true)
    }

    pub fn has_this_binding(&self) -> bool {
        true
    }

    pub fn has_super_binding(&self) -> bool {
        false
    }

    pub fn get_this_binding(&self) -> Completion {
        Completion::Normal(self.global_this.clone())
    }

    pub fn has_var_declaration(&self, name: &str) -> bool {
        self.var_names.contains(name)
    }

    pub fn has_lexical_declaration(&self, name: &str) -> bool {
        self.decl.has_binding(name)
    }

    /// A non-configurable own property of the global object cannot be
    /// shadowed by a global lexical declaration.
    pub fn has_restricted_global_property(&self, name: &str) -> bool {
        match self.obj.binding_object().get_own_property(name) {
            None => false,
            Some(desc) => desc.configurable == Some(false),
        }
    }

    pub fn can_declare_global_var(&self, name: &str) -> bool {
        let obj = self.obj.binding_object();
        obj.has_own_property(name) || obj.is_extensible()
    }

    pub fn can_declare_global_function(&self, name: &str) -> bool {
        let obj = self.obj.binding_object();
        match obj.get_own_property(name) {
            None => obj.is_extensible(),
            Some(desc) => {
                desc.configurable == Some(true)
                    || (desc.value.is_some()
                        && desc.writable == Some(true)
                        && desc.enumerable == Some(true))
            }
        }
    }

    pub fn create_global_var_binding(&mut self, name: &str, deletable: bool) -> Completion {
        let obj = self.obj.binding_object();
        if !obj.has_own_property(name) && obj.is_extensible() {
            if let Err(err) = self.obj.create_mutable_binding(name, deletable) {
                return Completion::Throw(err);
            }
            self.obj.initialize_binding(name, JsValue::Undefined);
        }
        self.var_names.insert(name.to_string());
        Completion::Normal(JsValue::Undefined)
    }

    pub fn create_global_function_binding(
        &mut self,
        name: &str,
        value: JsValue,
        deletable: bool,
    ) -> Completion {
        let obj = self.obj.binding_object();
        let existing = obj.get_own_property(name);
        let desc = match existing {
            None => PropertyDescriptor::data(value.clone(), true, true, deletable),
            Some(ref d) if d.configurable == Some(true) => {
                PropertyDescriptor::data(value.clone(), true, true, deletable)
            }
            Some(_) => PropertyDescriptor {
                value: Some(value.clone()),
                writable: None,
                enumerable: None,
                configurable: None,
            },
        };
        if !obj.define_own_property(name, desc) {
            return type_error(&format!("Cannot declare global function '{name}'"));
        }
        let _ = obj.set(name, value);
        self.var_names.insert(name.to_string());
        Completion::Normal(JsValue::Undefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, is_error};

    fn global_env() -> GlobalEnvironment {
        let global = JsObject::ordinary();
        let this_val = JsValue::Object(global.clone());
        GlobalEnvironment::new(global, this_val)
    }

    fn thrown(comp: Completion) -> JsValue {
        match comp {
            Completion::Throw(v) => v,
            other => panic!("expected throw, got {other:?}"),
        }
    }

    #[test]
    fn object_properties_are_visible_as_bindings() {
        let env = global_env();
        env.global_object()
            .borrow_mut()
            .insert_value("g".to_string(), JsValue::Number(10.0));

        assert!(env.has_binding("g"));
        let val = env.get_binding_value("g", false).normal_value();
        assert!(matches!(val, JsValue::Number(n) if n == 10.0));
    }

    #[test]
    fn lexical_binding_shadows_object_property() {
        let mut env = global_env();
        env.global_object()
            .borrow_mut()
            .insert_value("g".to_string(), JsValue::Number(10.0));

        env.create_mutable_binding("g", false);
        env.initialize_binding("g", JsValue::Number(99.0));

        let val = env.get_binding_value("g", false).normal_value();
        assert!(matches!(val, JsValue::Number(n) if n == 99.0));

        // the object property is untouched underneath
        let raw = env.global_object().get("g");
        assert!(matches!(raw, JsValue::Number(n) if n == 10.0));
    }

    #[test]
    fn lexical_tdz_applies_even_with_object_property() {
        let mut env = global_env();
        env.global_object()
            .borrow_mut()
            .insert_value("x".to_string(), JsValue::Number(1.0));
        env.create_mutable_binding("x", false);

        let err = thrown(env.get_binding_value("x", false));
        assert!(is_error(&err, ErrorKind::Reference));
    }

    #[test]
    fn this_binding_is_fixed() {
        let env = global_env();
        assert!(env.has_this_binding());
        assert!(!env.has_super_binding());
        let this_val = env.get_this_binding().normal_value();
        assert!(matches!(this_val, JsValue::Object(o) if o.ptr_eq(env.global_object())));
    }

    #[test]
    fn sloppy_set_creates_object_property() {
        let mut env = global_env();
        let comp = env.set_mutable_binding("implicit", JsValue::Number(5.0), false);
        assert!(!comp.is_abrupt());
        assert!(env.global_object().has_own_property("implicit"));
        // not a var declaration
        assert!(!env.has_var_declaration("implicit"));
    }

    #[test]
    fn strict_set_of_unresolved_throws() {
        let mut env = global_env();
        let err = thrown(env.set_mutable_binding("nope", JsValue::Null, true));
        assert!(is_error(&err, ErrorKind::Reference));
    }

    #[test]
    fn strict_read_of_unresolved_throws() {
        let env = global_env();
        let err = thrown(env.get_binding_value("nope", true));
        assert!(is_error(&err, ErrorKind::Reference));
        // sloppy read of an unresolved object binding is Undefined
        assert!(matches!(
            env.get_binding_value("nope", false),
            Completion::Normal(JsValue::Undefined)
        ));
    }

    #[test]
    fn global_var_binding_tracks_var_names() {
        let mut env = global_env();
        let comp = env.create_global_var_binding("v", true);
        assert!(!comp.is_abrupt());
        assert!(env.has_var_declaration("v"));
        assert!(env.global_object().has_own_property("v"));

        // deleting through the record consults the real deletion result
        assert!(matches!(env.delete_binding("v"), Ok(true)));
        assert!(!env.has_var_declaration("v"));
        assert!(!env.global_object().has_own_property("v"));
    }

    #[test]
    fn non_configurable_var_survives_delete() {
        let mut env = global_env();
        let comp = env.create_global_var_binding("v", false);
        assert!(!comp.is_abrupt());

        assert!(matches!(env.delete_binding("v"), Ok(false)));
        // the name stays in VarNames because the property stayed
        assert!(env.has_var_declaration("v"));
        assert!(env.global_object().has_own_property("v"));
    }

    #[test]
    fn delete_of_absent_binding_is_true() {
        let mut env = global_env();
        assert!(matches!(env.delete_binding("ghost"), Ok(true)));
    }

    #[test]
    fn restricted_global_property() {
        let env = global_env();
        assert!(env.global_object().define_own_property(
            "frozen",
            PropertyDescriptor::data(JsValue::Null, false, false, false)
        ));
        env.global_object()
            .borrow_mut()
            .insert_value("plain".to_string(), JsValue::Null);

        assert!(env.has_restricted_global_property("frozen"));
        assert!(!env.has_restricted_global_property("plain"));
        assert!(!env.has_restricted_global_property("absent"));
    }

    #[test]
    fn can_declare_global_var_on_frozen_global() {
        let mut env = global_env();
        env.global_object()
            .borrow_mut()
            .insert_value("existing".to_string(), JsValue::Null);
        env.global_object().prevent_extensions();

        assert!(env.can_declare_global_var("existing"));
        assert!(!env.can_declare_global_var("fresh"));

        // creating the var for an existing property still records it
        let comp = env.create_global_var_binding("existing", false);
        assert!(!comp.is_abrupt());
        assert!(env.has_var_declaration("existing"));
    }

    #[test]
    fn can_declare_global_function_rules() {
        let env = global_env();
        assert!(env.can_declare_global_function("fresh"));

        assert!(env.global_object().define_own_property(
            "writable_enumerable",
            PropertyDescriptor::data(JsValue::Null, true, true, false)
        ));
        assert!(env.can_declare_global_function("writable_enumerable"));

        assert!(env.global_object().define_own_property(
            "locked",
            PropertyDescriptor::data(JsValue::Null, false, false, false)
        ));
        assert!(!env.can_declare_global_function("locked"));
    }

    #[test]
    fn global_function_binding_overwrites() {
        let mut env = global_env();
        let comp = env.create_global_function_binding("f", JsValue::Number(1.0), false);
        assert!(!comp.is_abrupt());
        assert!(env.has_var_declaration("f"));

        // redeclaration replaces the value
        let comp = env.create_global_function_binding("f", JsValue::Number(2.0), false);
        assert!(!comp.is_abrupt());
        let val = env.get_binding_value("f", false).normal_value();
        assert!(matches!(val, JsValue::Number(n) if n == 2.0));
    }

    #[test]
    fn global_function_binding_over_non_configurable_writable_property() {
        let mut env = global_env();
        assert!(env.global_object().define_own_property(
            "f",
            PropertyDescriptor::data(JsValue::Null, true, true, false)
        ));
        assert!(env.can_declare_global_function("f"));

        let comp = env.create_global_function_binding("f", JsValue::Number(1.0), false);
        assert!(!comp.is_abrupt());
        let val = env.get_binding_value("f", false).normal_value();
        assert!(matches!(val, JsValue::Number(n) if n == 1.0));

        // the redefinition only touches the value; the property stays
        // non-configurable, so it remains restricted and undeletable
        assert!(env.has_restricted_global_property("f"));
        assert!(matches!(env.delete_binding("f"), Ok(false)));
        assert!(env.has_var_declaration("f"));
        let desc = env.global_object().get_own_property("f").unwrap();
        assert_eq!(desc.writable, Some(true));
        assert_eq!(desc.enumerable, Some(true));
        assert_eq!(desc.configurable, Some(false));
    }

    #[test]
    fn global_function_binding_rejected_on_locked_property() {
        let mut env = global_env();
        assert!(env.global_object().define_own_property(
            "locked",
            PropertyDescriptor::data(JsValue::Null, false, false, false)
        ));
        let err = thrown(env.create_global_function_binding("locked", JsValue::Number(1.0), false));
        assert!(is_error(&err, ErrorKind::Type));
        assert!(!env.has_var_declaration("locked"));
    }

    #[test]
    fn lexical_delete_goes_to_decl_record() {
        let mut env = global_env();
        env.create_mutable_binding("lex", false);
        env.initialize_binding("lex", JsValue::Null);
        // lexical bindings are not deletable
        assert!(matches!(env.delete_binding("lex"), Ok(false)));
        assert!(env.has_binding("lex"));
    }
}
