//! Referenced instances.
//!
//! An argument never owns the instances it points at. It holds an
//! [`InstanceRef`], a borrowed handle whose lifetime is tied to the owner of
//! the instance graph.

use std::fmt;

use crate::value::ArgumentValue;

/// An object that an argument can reference.
///
/// Entities are written as `#id`. Anything else is a simple (inline) value
/// whose own type name and arguments are written in place of the reference.
/// Instances are shared with every thread that writes a value pointing at them.
pub trait Instance: Sync {
    /// True for separately identified records, false for inline values.
    fn is_entity(&self) -> bool;

    /// Instance id. Only meaningful when [`Instance::is_entity`] is true.
    fn id(&self) -> u64;

    /// Type keyword written in front of an inline value, e.g. `IFCLABEL`.
    fn type_name(&self) -> &str;

    /// Attribute values of an inline value.
    fn arguments(&self) -> &[ArgumentValue<'_>] {
        &[]
    }
}

/// Non-owning handle to an [`Instance`]. Two handles are equal when they
/// point at the same object.
#[derive(Clone, Copy)]
pub struct InstanceRef<'a>(&'a dyn Instance);

impl<'a> InstanceRef<'a> {
    pub fn new(instance: &'a dyn Instance) -> Self {
        Self(instance)
    }

    pub fn get(self) -> &'a dyn Instance {
        self.0
    }

    /// Address of the referenced object, used as its identity.
    pub(crate) fn addr(self) -> usize {
        std::ptr::from_ref(self.0).cast::<()>() as usize
    }
}

impl<'a, T: Instance> From<&'a T> for InstanceRef<'a> {
    fn from(instance: &'a T) -> Self {
        Self(instance)
    }
}

impl PartialEq for InstanceRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for InstanceRef<'_> {}

impl fmt::Debug for InstanceRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_entity() {
            write!(f, "#{}", self.0.id())
        } else {
            write!(f, "{}(..)", self.0.type_name())
        }
    }
}

/// A simple-type value such as `IFCLABEL('Wall')` that is written inline
/// wherever it is referenced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleValue<'a> {
    pub type_name: String,
    pub arguments: Vec<ArgumentValue<'a>>,
}

impl<'a> SimpleValue<'a> {
    pub fn new(type_name: impl Into<String>, arguments: Vec<ArgumentValue<'a>>) -> Self {
        Self {
            type_name: type_name.into(),
            arguments,
        }
    }
}

impl Instance for SimpleValue<'_> {
    fn is_entity(&self) -> bool {
        false
    }

    fn id(&self) -> u64 {
        0
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn arguments(&self) -> &[ArgumentValue<'_>] {
        &self.arguments
    }
}
