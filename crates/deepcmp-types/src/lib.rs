//! Value model for deep comparison.
//!
//! This crate provides the dynamic object graph the comparison engine walks,
//! together with the types used to address and print its nodes. Every other
//! deepcmp crate depends on `deepcmp-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- A node of a compared graph: scalar, container, atomic wrapper, enum or object
//! - [`ValueKind`] -- Closed classification of a value's runtime type
//! - [`Object`] / [`TypeInfo`] -- Identity-bearing composite instances and their type descriptors
//! - [`FieldLocation`] -- Path of a node from the root, with its index-free rule path
//! - [`PathPattern`] -- Full-match regex over rule paths and type names
//! - [`Representation`] -- Formatting service used for difference messages

pub mod error;
pub mod json;
pub mod location;
pub mod object;
pub mod representation;
pub mod type_info;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use json::JSON_OBJECT_TYPE;
pub use location::{FieldLocation, PathPattern};
pub use object::Object;
pub use representation::{Representation, StandardRepresentation};
pub use type_info::{AccessorFn, EqualsFn, Property, TypeInfo, TypeInfoBuilder};
pub use value::{Collection, CollectionKind, EnumValue, MapKind, MapValue, Value, ValueKind};
