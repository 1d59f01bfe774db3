use crate::types::JsValue;
use rustc_hash::FxHashMap;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Shared handle to an object. Cloning aliases the same object; the
/// object lives as long as its longest-surviving holder. Prototype links
/// may form cycles, so holders never assume exclusive ownership.
#[derive(Clone)]
pub struct JsObject(Rc<RefCell<JsObjectData>>);

#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub value: Option<JsValue>,
    pub writable: Option<bool>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn data(value: JsValue, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value),
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    pub fn data_default(value: JsValue) -> Self {
        Self::data(value, true, true, true)
    }
}

pub struct JsObjectData {
    pub properties: FxHashMap<String, PropertyDescriptor>,
    pub property_order: Vec<String>,
    pub prototype: Option<JsObject>,
    pub class_name: String,
    pub extensible: bool,
}

impl JsObjectData {
    pub fn new() -> Self {
        Self {
            properties: FxHashMap::default(),
            property_order: Vec::new(),
            prototype: None,
            class_name: "Object".to_string(),
            extensible: true,
        }
    }

    pub fn with_class(class_name: &str) -> Self {
        let mut data = Self::new();
        data.class_name = class_name.to_string();
        data
    }

    pub fn get_property(&self, key: &str) -> JsValue {
        if let Some(desc) = self.properties.get(key) {
            if let Some(ref val) = desc.value {
                return val.clone();
            }
            return JsValue::Undefined;
        }
        if let Some(proto) = &self.prototype {
            return proto.get(key);
        }
        JsValue::Undefined
    }

    pub fn get_own_property(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    pub fn has_own_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        if self.properties.contains_key(key) {
            return true;
        }
        if let Some(proto) = &self.prototype {
            return proto.has_property(key);
        }
        false
    }

    pub fn define_own_property(&mut self, key: String, desc: PropertyDescriptor) -> bool {
        let mut desc = desc;
        if let Some(current) = self.properties.get(&key) {
            if current.configurable == Some(false) {
                if desc.configurable == Some(true) {
                    return false;
                }
                if desc.enumerable.is_some() && desc.enumerable != current.enumerable {
                    return false;
                }
                if current.writable == Some(false) {
                    if desc.writable == Some(true) {
                        return false;
                    }
                    if let (Some(new_val), Some(cur_val)) = (&desc.value, &current.value) {
                        if !new_val.same_value(cur_val) {
                            return false;
                        }
                    }
                }
            }
            // fields absent from a partial descriptor keep the
            // property's current attributes
            if desc.value.is_none() {
                desc.value = current.value.clone();
            }
            if desc.writable.is_none() {
                desc.writable = current.writable;
            }
            if desc.enumerable.is_none() {
                desc.enumerable = current.enumerable;
            }
            if desc.configurable.is_none() {
                desc.configurable = current.configurable;
            }
        } else {
            if !self.extensible {
                return false;
            }
            // §6.2.6.6 CompletePropertyDescriptor defaults for new properties
            desc.value.get_or_insert(JsValue::Undefined);
            desc.writable.get_or_insert(false);
            desc.enumerable.get_or_insert(false);
            desc.configurable.get_or_insert(false);
            self.property_order.push(key.clone());
        }
        self.properties.insert(key, desc);
        true
    }

    pub fn set_property_value(&mut self, key: &str, value: JsValue) -> bool {
        if let Some(desc) = self.properties.get_mut(key) {
            if desc.writable == Some(false) {
                return false;
            }
            desc.value = Some(value);
            return true;
        }
        if !self.extensible {
            return false;
        }
        self.property_order.push(key.to_string());
        self.properties
            .insert(key.to_string(), PropertyDescriptor::data_default(value));
        true
    }

    pub fn delete_property(&mut self, key: &str) -> bool {
        match self.properties.get(key) {
            None => true,
            Some(desc) if desc.configurable == Some(false) => false,
            Some(_) => {
                self.properties.remove(key);
                self.property_order.retain(|k| k != key);
                true
            }
        }
    }

    pub fn insert_value(&mut self, key: String, value: JsValue) {
        if !self.properties.contains_key(&key) {
            self.property_order.push(key.clone());
        }
        self.properties
            .insert(key, PropertyDescriptor::data_default(value));
    }

    pub fn own_keys(&self) -> Vec<String> {
        self.property_order.clone()
    }
}

impl Default for JsObjectData {
    fn default() -> Self {
        Self::new()
    }
}

impl JsObject {
    pub fn new(data: JsObjectData) -> Self {
        JsObject(Rc::new(RefCell::new(data)))
    }

    pub fn ordinary() -> Self {
        Self::new(JsObjectData::new())
    }

    pub fn borrow(&self) -> Ref<'_, JsObjectData> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, JsObjectData> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &JsObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn class_name(&self) -> String {
        self.0.borrow().class_name.clone()
    }

    // [[Get]], walking the prototype chain
    pub fn get(&self, key: &str) -> JsValue {
        self.0.borrow().get_property(key)
    }

    // [[Set]]; false when the property is non-writable or the object
    // rejects the addition
    pub fn set(&self, key: &str, value: JsValue) -> bool {
        self.0.borrow_mut().set_property_value(key, value)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.0.borrow().has_property(key)
    }

    pub fn has_own_property(&self, key: &str) -> bool {
        self.0.borrow().has_own_property(key)
    }

    pub fn get_own_property(&self, key: &str) -> Option<PropertyDescriptor> {
        self.0.borrow().get_own_property(key).cloned()
    }

    pub fn define_own_property(&self, key: &str, desc: PropertyDescriptor) -> bool {
        self.0.borrow_mut().define_own_property(key.to_string(), desc)
    }

    pub fn delete(&self, key: &str) -> bool {
        self.0.borrow_mut().delete_property(key)
    }

    // [[GetPrototypeOf]]
    pub fn prototype(&self) -> Option<JsObject> {
        self.0.borrow().prototype.clone()
    }

    pub fn set_prototype(&self, proto: Option<JsObject>) {
        self.0.borrow_mut().prototype = proto;
    }

    pub fn is_extensible(&self) -> bool {
        self.0.borrow().extensible
    }

    pub fn prevent_extensions(&self) {
        self.0.borrow_mut().extensible = false;
    }
}

impl fmt::Debug for JsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Prototype chains can be cyclic; print identity only
        write!(f, "[object {}]", self.0.borrow().class_name)
    }
}
