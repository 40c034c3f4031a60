//! Composite instances.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{TypeError, TypeResult};
use crate::type_info::TypeInfo;
use crate::value::Value;

struct ObjectData {
    type_info: Arc<TypeInfo>,
    fields: RwLock<Vec<(String, Value)>>,
}

/// A shared, identity-bearing instance of a [`TypeInfo`].
///
/// Cloning an `Object` clones the handle, not the instance. Fields can be
/// assigned after construction, which is how graphs with back references
/// (`a.neighbour = b; b.neighbour = a`) are built.
#[derive(Clone)]
pub struct Object(Arc<ObjectData>);

impl Object {
    pub fn new(type_info: &Arc<TypeInfo>) -> Self {
        Self(Arc::new(ObjectData {
            type_info: Arc::clone(type_info),
            fields: RwLock::new(Vec::new()),
        }))
    }

    /// Builder-style field assignment.
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Assign a field, keeping its declaration position if it already exists.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        let mut fields = self.0.fields.write().unwrap_or_else(PoisonError::into_inner);
        match fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let fields = self.0.fields.read().unwrap_or_else(PoisonError::into_inner);
        fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.clone())
    }

    /// Like [`Object::get`] but reports a missing field as an error.
    pub fn field(&self, name: &str) -> TypeResult<Value> {
        self.get(name).ok_or_else(|| TypeError::FieldNotFound {
            type_name: self.type_name().to_string(),
            field: name.to_string(),
        })
    }

    pub fn has_field(&self, name: &str) -> bool {
        let fields = self.0.fields.read().unwrap_or_else(PoisonError::into_inner);
        fields.iter().any(|(n, _)| n == name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<String> {
        let fields = self.0.fields.read().unwrap_or_else(PoisonError::into_inner);
        fields.iter().map(|(n, _)| n.clone()).collect()
    }

    /// A snapshot of every field in declaration order.
    pub fn fields(&self) -> Vec<(String, Value)> {
        self.0
            .fields
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn type_info(&self) -> &Arc<TypeInfo> {
        &self.0.type_info
    }

    pub fn type_name(&self) -> &str {
        self.0.type_info.name()
    }

    /// Whether both handles point to the same instance.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// A stable identity for the lifetime of the instance.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    /// Identity, unless the type declares its own equality.
    pub fn equals(&self, other: &Object) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match self.0.type_info.overridden_equals() {
            Some(equals) => equals(self, other),
            None => false,
        }
    }
}

impl fmt::Debug for Object {
    // Field values are left out so cyclic graphs print finitely.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type", &self.type_name())
            .field("identity", &format_args!("{:#x}", self.identity()))
            .field("fields", &self.field_names())
            .finish()
    }
}
