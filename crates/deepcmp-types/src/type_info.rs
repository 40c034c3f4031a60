//! Type descriptors for composite values.
//!
//! A [`TypeInfo`] plays the role a class plays in a reflective runtime: it
//! names the type, links it to its supertype, declares which fields are
//! transient, exposes property accessors and may override equality.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::object::Object;
use crate::value::Value;

/// Custom equality between two instances.
pub type EqualsFn = Arc<dyn Fn(&Object, &Object) -> bool + Send + Sync>;

/// Reads a computed property from an instance.
pub type AccessorFn = Arc<dyn Fn(&Object) -> Value + Send + Sync>;

/// A named, read-only property of a type.
#[derive(Clone)]
pub struct Property {
    name: String,
    accessor: AccessorFn,
}

impl Property {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn read(&self, object: &Object) -> Value {
        (self.accessor)(object)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("name", &self.name).finish()
    }
}

/// Descriptor of a composite type.
pub struct TypeInfo {
    name: String,
    supertype: Option<Arc<TypeInfo>>,
    transient_fields: BTreeSet<String>,
    properties: Vec<Property>,
    equals: Option<EqualsFn>,
}

impl TypeInfo {
    /// A plain type with no supertype, transient fields, properties or equality.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> TypeInfoBuilder {
        TypeInfoBuilder {
            info: TypeInfo {
                name: name.into(),
                supertype: None,
                transient_fields: BTreeSet::new(),
                properties: Vec::new(),
                equals: None,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supertype(&self) -> Option<&Arc<TypeInfo>> {
        self.supertype.as_ref()
    }

    /// Whether this type is `other` or extends it, directly or not.
    pub fn is_same_or_subtype_of(&self, other: &TypeInfo) -> bool {
        let mut current = Some(self);
        while let Some(info) = current {
            if info.name == other.name {
                return true;
            }
            current = info.supertype.as_deref();
        }
        false
    }

    /// Whether `field` is transient on this type or one of its supertypes.
    pub fn is_transient(&self, field: &str) -> bool {
        self.transient_fields.contains(field)
            || self.supertype.as_ref().is_some_and(|s| s.is_transient(field))
    }

    /// Properties declared by this type and its supertypes, supertypes first.
    /// A property redeclared by a subtype shadows the inherited one.
    pub fn properties(&self) -> Vec<Property> {
        let mut properties = self
            .supertype
            .as_ref()
            .map(|s| s.properties())
            .unwrap_or_default();
        for property in &self.properties {
            match properties.iter_mut().find(|p| p.name == property.name) {
                Some(inherited) => *inherited = property.clone(),
                None => properties.push(property.clone()),
            }
        }
        properties
    }

    pub fn property(&self, name: &str) -> Option<Property> {
        self.properties.iter().find(|p| p.name == name).cloned().or_else(|| {
            self.supertype.as_ref().and_then(|s| s.property(name))
        })
    }

    /// The equality declared by this type or inherited from a supertype.
    pub fn overridden_equals(&self) -> Option<&EqualsFn> {
        self.equals
            .as_ref()
            .or_else(|| self.supertype.as_ref().and_then(|s| s.overridden_equals()))
    }

    pub fn has_overridden_equals(&self) -> bool {
        self.overridden_equals().is_some()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("supertype", &self.supertype.as_ref().map(|s| s.name.as_str()))
            .field("transient_fields", &self.transient_fields)
            .field("properties", &self.properties)
            .field("overrides_equals", &self.equals.is_some())
            .finish()
    }
}

/// Builder for [`TypeInfo`].
pub struct TypeInfoBuilder {
    info: TypeInfo,
}

impl TypeInfoBuilder {
    pub fn extends(mut self, supertype: &Arc<TypeInfo>) -> Self {
        self.info.supertype = Some(Arc::clone(supertype));
        self
    }

    pub fn transient_field(mut self, name: impl Into<String>) -> Self {
        self.info.transient_fields.insert(name.into());
        self
    }

    pub fn property<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Object) -> Value + Send + Sync + 'static,
    {
        self.info.properties.push(Property {
            name: name.into(),
            accessor: Arc::new(accessor),
        });
        self
    }

    pub fn equals<F>(mut self, equals: F) -> Self
    where
        F: Fn(&Object, &Object) -> bool + Send + Sync + 'static,
    {
        self.info.equals = Some(Arc::new(equals));
        self
    }

    pub fn build(self) -> Arc<TypeInfo> {
        Arc::new(self.info)
    }
}
