use super::*;
use crate::error::reference_error;
use crate::object::JsObject;

/// State of a function record's `this` slot. `Lexical` means the
/// function inherits `this` from its enclosing scope (arrow-like) and
/// never owns one; derived constructors start `Uninitialized` until
/// `super()` binds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisBindingStatus {
    Lexical,
    Uninitialized,
    Initialized,
}

/// Function Environment Record (spec §9.1.1.3): a declarative binding
/// table composed with the this/super capability.
#[derive(Debug)]
pub struct FunctionEnvironment {
    pub(crate) bindings: DeclarativeEnvironment,
    this_status: ThisBindingStatus,
    this_value: JsValue,
    home_object: Option<JsObject>,
    new_target: JsValue,
}

impl FunctionEnvironment {
    pub fn new(lexical_this: bool, home_object: Option<JsObject>, new_target: JsValue) -> Self {
        Self {
            bindings: DeclarativeEnvironment::new(),
            this_status: if lexical_this {
                ThisBindingStatus::Lexical
            } else {
                ThisBindingStatus::Uninitialized
            },
            this_value: JsValue::Undefined,
            home_object,
            new_target,
        }
    }

    pub fn this_status(&self) -> ThisBindingStatus {
        self.this_status
    }

    pub fn new_target(&self) -> &JsValue {
        &self.new_target
    }

    /// HomeObject is fixed at construction; it is a lookup reference,
    /// never an ownership edge.
    pub fn home_object(&self) -> Option<&JsObject> {
        self.home_object.as_ref()
    }

    /// Transitions Uninitialized -> Initialized exactly once. A second
    /// bind is reachable from script (repeated `super()` calls), so it
    /// throws rather than aborts.
    pub fn bind_this_value(&mut self, value: JsValue) -> Completion {
        match self.this_status {
            ThisBindingStatus::Lexical => {
                panic!("bind_this_value on a lexical-this environment")
            }
            ThisBindingStatus::Initialized => reference_error("'this' is already initialized"),
            ThisBindingStatus::Uninitialized => {
                self.this_value = value.clone();
                self.this_status = ThisBindingStatus::Initialized;
                Completion::Normal(value)
            }
        }
    }

    pub fn has_this_binding(&self) -> bool {
        self.this_status != ThisBindingStatus::Lexical
    }

    pub fn has_super_binding(&self) -> bool {
        self.this_status != ThisBindingStatus::Lexical && self.home_object.is_some()
    }

    /// Callers must check `has_this_binding` first; invoking this on a
    /// lexical-this record is an evaluator bug.
    pub fn get_this_binding(&self) -> Completion {
        match self.this_status {
            ThisBindingStatus::Lexical => {
                panic!("get_this_binding on a lexical-this environment")
            }
            ThisBindingStatus::Uninitialized => {
                reference_error("must call super constructor before accessing 'this'")
            }
            ThisBindingStatus::Initialized => Completion::Normal(self.this_value.clone()),
        }
    }

    /// Base object for `super` references: the HomeObject's prototype,
    /// or Undefined when there is no HomeObject.
    pub fn get_super_base(&self) -> Completion {
        match &self.home_object {
            None => Completion::Normal(JsValue::Undefined),
            Some(home) => match home.prototype() {
                Some(proto) => Completion::Normal(JsValue::Object(proto)),
                None => Completion::Normal(JsValue::Null),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, is_error};
    use crate::object::JsObject;

    fn thrown(comp: Completion) -> JsValue {
        match comp {
            Completion::Throw(v) => v,
            other => panic!("expected throw, got {other:?}"),
        }
    }

    #[test]
    fn lexical_record_has_no_this() {
        let env = FunctionEnvironment::new(true, None, JsValue::Undefined);
        assert!(!env.has_this_binding());
        assert!(!env.has_super_binding());
        assert_eq!(env.this_status(), ThisBindingStatus::Lexical);
    }

    #[test]
    #[should_panic(expected = "lexical-this")]
    fn get_this_on_lexical_record_is_fatal() {
        let env = FunctionEnvironment::new(true, None, JsValue::Undefined);
        let _ = env.get_this_binding();
    }

    #[test]
    #[should_panic(expected = "lexical-this")]
    fn bind_this_on_lexical_record_is_fatal() {
        let mut env = FunctionEnvironment::new(true, None, JsValue::Undefined);
        let _ = env.bind_this_value(JsValue::Null);
    }

    #[test]
    fn this_before_super_throws() {
        let env = FunctionEnvironment::new(false, None, JsValue::Undefined);
        assert!(env.has_this_binding());
        let err = thrown(env.get_this_binding());
        assert!(is_error(&err, ErrorKind::Reference));
    }

    #[test]
    fn bind_this_once_then_read() {
        let mut env = FunctionEnvironment::new(false, None, JsValue::Undefined);
        let this_obj = JsObject::ordinary();
        let comp = env.bind_this_value(JsValue::Object(this_obj.clone()));
        assert!(!comp.is_abrupt());
        assert_eq!(env.this_status(), ThisBindingStatus::Initialized);

        let val = env.get_this_binding().normal_value();
        assert!(matches!(val, JsValue::Object(o) if o.ptr_eq(&this_obj)));
    }

    #[test]
    fn double_bind_this_throws() {
        let mut env = FunctionEnvironment::new(false, None, JsValue::Undefined);
        let _ = env.bind_this_value(JsValue::Number(1.0)).normal_value();
        let err = thrown(env.bind_this_value(JsValue::Number(2.0)));
        assert!(is_error(&err, ErrorKind::Reference));
        // the first binding is untouched
        let val = env.get_this_binding().normal_value();
        assert!(matches!(val, JsValue::Number(n) if n == 1.0));
    }

    #[test]
    fn super_binding_requires_home_object() {
        let without = FunctionEnvironment::new(false, None, JsValue::Undefined);
        assert!(!without.has_super_binding());
        assert!(matches!(
            without.get_super_base(),
            Completion::Normal(JsValue::Undefined)
        ));

        let home = JsObject::ordinary();
        let with = FunctionEnvironment::new(false, Some(home), JsValue::Undefined);
        assert!(with.has_super_binding());
    }

    #[test]
    fn super_base_is_home_objects_prototype() {
        let proto = JsObject::ordinary();
        let home = JsObject::ordinary();
        home.set_prototype(Some(proto.clone()));
        let env = FunctionEnvironment::new(false, Some(home), JsValue::Undefined);

        let base = env.get_super_base().normal_value();
        assert!(matches!(base, JsValue::Object(o) if o.ptr_eq(&proto)));
    }

    #[test]
    fn super_base_null_prototype() {
        let home = JsObject::ordinary();
        let env = FunctionEnvironment::new(false, Some(home), JsValue::Undefined);
        assert!(matches!(
            env.get_super_base(),
            Completion::Normal(JsValue::Null)
        ));
    }

    #[test]
    fn new_target_is_carried() {
        let target = JsObject::ordinary();
        let env = FunctionEnvironment::new(false, None, JsValue::Object(target.clone()));
        assert!(matches!(env.new_target(), JsValue::Object(o) if o.ptr_eq(&target)));
    }
}
