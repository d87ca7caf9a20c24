//! [`ArgumentValue`]: the in-memory value of one entity attribute.
//!
//! Exactly one variant is active at a time. Setters replace the active variant
//! as a whole and validate their input before anything is changed.

use tracing::debug;

use crate::bits::BitSequence;
use crate::error::ArgumentError;
use crate::instance::InstanceRef;
use crate::types::{EnumerationReference, Logical, TypeTag};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) enum Container<'a> {
    #[default]
    Null,
    Derived,
    Int(i64),
    Bool(bool),
    Logical(Logical),
    Double(f64),
    String(String),
    Binary(BitSequence),
    Enumeration(EnumerationReference),
    EntityInstance(InstanceRef<'a>),
    EmptyAggregate,
    AggregateOfEmptyAggregate,
    AggregateOfInt(Vec<i64>),
    AggregateOfDouble(Vec<f64>),
    AggregateOfString(Vec<String>),
    AggregateOfBinary(Vec<BitSequence>),
    AggregateOfAggregateOfInt(Vec<Vec<i64>>),
    AggregateOfAggregateOfDouble(Vec<Vec<f64>>),
    AggregateOfEntityInstance(Vec<InstanceRef<'a>>),
    AggregateOfAggregateOfEntityInstance(Vec<Vec<InstanceRef<'a>>>),
}

/// Value of a single attribute: a scalar, an enumeration, a reference, a
/// (nested) list, or one of the `$` / `*` markers.
///
/// ```
/// use step_write::{render, ArgumentValue, TypeTag};
///
/// let mut value = ArgumentValue::new();
/// assert!(value.is_null());
/// value.set_real_list(vec![0.0, 1.5, -2.0]).unwrap();
/// assert_eq!(value.type_tag(), TypeTag::AggregateOfDouble);
/// assert_eq!(value.size().unwrap(), 3);
/// assert_eq!(render(&value, false).unwrap(), "(0.,1.5,-2.)");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentValue<'a> {
    container: Container<'a>,
}

macro_rules! accessor {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(&self) -> Result<$ty, ArgumentError> {
            match &self.container {
                Container::$variant(v) => {
                    let out: $ty = v;
                    Ok(out)
                }
                _ => Err(self.cast_error(TypeTag::$variant)),
            }
        }
    };
}

impl<'a> ArgumentValue<'a> {
    /// A new value is `$`.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn container(&self) -> &Container<'a> {
        &self.container
    }

    pub fn type_tag(&self) -> TypeTag {
        match &self.container {
            Container::Null => TypeTag::Null,
            Container::Derived => TypeTag::Derived,
            Container::Int(_) => TypeTag::Int,
            Container::Bool(_) => TypeTag::Bool,
            Container::Logical(_) => TypeTag::Logical,
            Container::Double(_) => TypeTag::Double,
            Container::String(_) => TypeTag::String,
            Container::Binary(_) => TypeTag::Binary,
            Container::Enumeration(_) => TypeTag::Enumeration,
            Container::EntityInstance(_) => TypeTag::EntityInstance,
            Container::EmptyAggregate => TypeTag::EmptyAggregate,
            Container::AggregateOfEmptyAggregate => TypeTag::AggregateOfEmptyAggregate,
            Container::AggregateOfInt(_) => TypeTag::AggregateOfInt,
            Container::AggregateOfDouble(_) => TypeTag::AggregateOfDouble,
            Container::AggregateOfString(_) => TypeTag::AggregateOfString,
            Container::AggregateOfBinary(_) => TypeTag::AggregateOfBinary,
            Container::AggregateOfAggregateOfInt(_) => TypeTag::AggregateOfAggregateOfInt,
            Container::AggregateOfAggregateOfDouble(_) => TypeTag::AggregateOfAggregateOfDouble,
            Container::AggregateOfEntityInstance(_) => TypeTag::AggregateOfEntityInstance,
            Container::AggregateOfAggregateOfEntityInstance(_) => {
                TypeTag::AggregateOfAggregateOfEntityInstance
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.container, Container::Null)
    }

    /// Number of elements of an aggregate. Nested lists count as one element
    /// each. Fails for anything that is not an aggregate.
    pub fn size(&self) -> Result<usize, ArgumentError> {
        match &self.container {
            Container::EmptyAggregate | Container::AggregateOfEmptyAggregate => Ok(0),
            Container::AggregateOfInt(v) => Ok(v.len()),
            Container::AggregateOfDouble(v) => Ok(v.len()),
            Container::AggregateOfString(v) => Ok(v.len()),
            Container::AggregateOfBinary(v) => Ok(v.len()),
            Container::AggregateOfAggregateOfInt(v) => Ok(v.len()),
            Container::AggregateOfAggregateOfDouble(v) => Ok(v.len()),
            Container::AggregateOfEntityInstance(v) => Ok(v.len()),
            Container::AggregateOfAggregateOfEntityInstance(v) => Ok(v.len()),
            Container::Null
            | Container::Derived
            | Container::Int(_)
            | Container::Bool(_)
            | Container::Logical(_)
            | Container::Double(_)
            | Container::String(_)
            | Container::Binary(_)
            | Container::Enumeration(_)
            | Container::EntityInstance(_) => {
                Err(ArgumentError::invalid_cast("AGGREGATE", self.type_tag()))
            }
        }
    }

    /// Element access is not supported on written values; use the list
    /// accessors instead.
    pub fn get(&self, _index: usize) -> Result<&ArgumentValue<'a>, ArgumentError> {
        Err(ArgumentError::invalid_cast(
            "INDEXABLE_AGGREGATE",
            self.type_tag(),
        ))
    }

    fn cast_error(&self, expected: TypeTag) -> ArgumentError {
        ArgumentError::invalid_cast(expected.name(), self.type_tag())
    }

    // ---------------------------------------------------------------- read

    pub fn as_int(&self) -> Result<i64, ArgumentError> {
        match self.container {
            Container::Int(v) => Ok(v),
            _ => Err(self.cast_error(TypeTag::Int)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ArgumentError> {
        match self.container {
            Container::Bool(v) => Ok(v),
            _ => Err(self.cast_error(TypeTag::Bool)),
        }
    }

    pub fn as_logical(&self) -> Result<Logical, ArgumentError> {
        match self.container {
            Container::Logical(v) => Ok(v),
            _ => Err(self.cast_error(TypeTag::Logical)),
        }
    }

    pub fn as_real(&self) -> Result<f64, ArgumentError> {
        match self.container {
            Container::Double(v) => Ok(v),
            _ => Err(self.cast_error(TypeTag::Double)),
        }
    }

    /// String content, or the symbolic name when the value is an enumeration.
    pub fn as_str(&self) -> Result<&str, ArgumentError> {
        match &self.container {
            Container::String(s) => Ok(s.as_str()),
            Container::Enumeration(e) => Ok(e.value.as_str()),
            _ => Err(self.cast_error(TypeTag::String)),
        }
    }

    accessor!(as_binary, Binary, &BitSequence);
    accessor!(as_enumeration, Enumeration, &EnumerationReference);

    pub fn as_reference(&self) -> Result<InstanceRef<'a>, ArgumentError> {
        match self.container {
            Container::EntityInstance(r) => Ok(r),
            _ => Err(self.cast_error(TypeTag::EntityInstance)),
        }
    }

    accessor!(as_int_list, AggregateOfInt, &[i64]);
    accessor!(as_real_list, AggregateOfDouble, &[f64]);
    accessor!(as_str_list, AggregateOfString, &[String]);
    accessor!(as_binary_list, AggregateOfBinary, &[BitSequence]);
    accessor!(as_reference_list, AggregateOfEntityInstance, &[InstanceRef<'a>]);
    accessor!(as_int_list_list, AggregateOfAggregateOfInt, &[Vec<i64>]);
    accessor!(as_real_list_list, AggregateOfAggregateOfDouble, &[Vec<f64>]);
    accessor!(
        as_reference_list_list,
        AggregateOfAggregateOfEntityInstance,
        &[Vec<InstanceRef<'a>>]
    );

    // ---------------------------------------------------------------- write

    pub fn set_null(&mut self) {
        self.container = Container::Null;
    }

    pub fn set_derived(&mut self) {
        self.container = Container::Derived;
    }

    pub fn set_int(&mut self, v: i64) {
        self.container = Container::Int(v);
    }

    pub fn set_bool(&mut self, v: bool) {
        self.container = Container::Bool(v);
    }

    pub fn set_logical(&mut self, v: impl Into<Logical>) {
        self.container = Container::Logical(v.into());
    }

    /// Fails with [`ArgumentError::NonFiniteValue`] for NaN or infinity and
    /// leaves the current value untouched.
    pub fn set_real(&mut self, v: f64) -> Result<(), ArgumentError> {
        if !v.is_finite() {
            debug!(value = v, "rejecting non-finite real");
            return Err(ArgumentError::NonFiniteValue);
        }
        self.container = Container::Double(v);
        Ok(())
    }

    pub fn set_str(&mut self, v: impl Into<String>) {
        self.container = Container::String(v.into());
    }

    pub fn set_binary(&mut self, v: BitSequence) {
        self.container = Container::Binary(v);
    }

    pub fn set_enumeration(&mut self, v: impl Into<String>) {
        self.container = Container::Enumeration(EnumerationReference::new(v));
    }

    /// Assigning `None` makes the value `$`.
    pub fn set_reference(&mut self, v: Option<InstanceRef<'a>>) {
        self.container = match v {
            Some(r) => Container::EntityInstance(r),
            None => {
                debug!("null reference assigned, value becomes NULL");
                Container::Null
            }
        };
    }

    pub fn set_empty_aggregate(&mut self) {
        self.container = Container::EmptyAggregate;
    }

    pub fn set_empty_aggregate_of_aggregate(&mut self) {
        self.container = Container::AggregateOfEmptyAggregate;
    }

    pub fn set_int_list(&mut self, v: Vec<i64>) {
        self.container = Container::AggregateOfInt(v);
    }

    pub fn set_real_list(&mut self, v: Vec<f64>) -> Result<(), ArgumentError> {
        if v.iter().any(|x| !x.is_finite()) {
            debug!(len = v.len(), "rejecting real list with non-finite element");
            return Err(ArgumentError::NonFiniteValue);
        }
        self.container = Container::AggregateOfDouble(v);
        Ok(())
    }

    pub fn set_str_list(&mut self, v: Vec<String>) {
        self.container = Container::AggregateOfString(v);
    }

    pub fn set_binary_list(&mut self, v: Vec<BitSequence>) {
        self.container = Container::AggregateOfBinary(v);
    }

    /// Assigning `None` makes the value `$`.
    pub fn set_reference_list(&mut self, v: Option<Vec<InstanceRef<'a>>>) {
        self.container = match v {
            Some(list) => Container::AggregateOfEntityInstance(list),
            None => {
                debug!("null reference list assigned, value becomes NULL");
                Container::Null
            }
        };
    }

    pub fn set_int_list_list(&mut self, v: Vec<Vec<i64>>) {
        self.container = Container::AggregateOfAggregateOfInt(v);
    }

    pub fn set_real_list_list(&mut self, v: Vec<Vec<f64>>) -> Result<(), ArgumentError> {
        if v.iter().flatten().any(|x| !x.is_finite()) {
            debug!(
                len = v.len(),
                "rejecting nested real list with non-finite element"
            );
            return Err(ArgumentError::NonFiniteValue);
        }
        self.container = Container::AggregateOfAggregateOfDouble(v);
        Ok(())
    }

    /// Assigning `None` makes the value `$`.
    pub fn set_reference_list_list(&mut self, v: Option<Vec<Vec<InstanceRef<'a>>>>) {
        self.container = match v {
            Some(list) => Container::AggregateOfAggregateOfEntityInstance(list),
            None => {
                debug!("null nested reference list assigned, value becomes NULL");
                Container::Null
            }
        };
    }
}
