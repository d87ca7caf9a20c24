//! Discriminants and small scalar types carried by [`crate::ArgumentValue`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which variant of an [`crate::ArgumentValue`] is active.
///
/// The order follows the declaration order of the value variants, so the
/// numeric discriminant is stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeTag {
    Null,
    Derived,
    Int,
    Bool,
    Logical,
    Double,
    String,
    Binary,
    Enumeration,
    EntityInstance,
    EmptyAggregate,
    AggregateOfEmptyAggregate,
    AggregateOfInt,
    AggregateOfDouble,
    AggregateOfString,
    AggregateOfBinary,
    AggregateOfAggregateOfInt,
    AggregateOfAggregateOfDouble,
    AggregateOfEntityInstance,
    AggregateOfAggregateOfEntityInstance,
}

impl TypeTag {
    /// Stable upper-case name of the tag, as used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "NULL",
            TypeTag::Derived => "DERIVED",
            TypeTag::Int => "INT",
            TypeTag::Bool => "BOOL",
            TypeTag::Logical => "LOGICAL",
            TypeTag::Double => "DOUBLE",
            TypeTag::String => "STRING",
            TypeTag::Binary => "BINARY",
            TypeTag::Enumeration => "ENUMERATION",
            TypeTag::EntityInstance => "ENTITY_INSTANCE",
            TypeTag::EmptyAggregate => "EMPTY_AGGREGATE",
            TypeTag::AggregateOfEmptyAggregate => "AGGREGATE_OF_EMPTY_AGGREGATE",
            TypeTag::AggregateOfInt => "AGGREGATE_OF_INT",
            TypeTag::AggregateOfDouble => "AGGREGATE_OF_DOUBLE",
            TypeTag::AggregateOfString => "AGGREGATE_OF_STRING",
            TypeTag::AggregateOfBinary => "AGGREGATE_OF_BINARY",
            TypeTag::AggregateOfAggregateOfInt => "AGGREGATE_OF_AGGREGATE_OF_INT",
            TypeTag::AggregateOfAggregateOfDouble => "AGGREGATE_OF_AGGREGATE_OF_DOUBLE",
            TypeTag::AggregateOfEntityInstance => "AGGREGATE_OF_ENTITY_INSTANCE",
            TypeTag::AggregateOfAggregateOfEntityInstance => {
                "AGGREGATE_OF_AGGREGATE_OF_ENTITY_INSTANCE"
            }
        }
    }

    /// True for the empty-aggregate markers and every list variant, i.e. the
    /// tags for which `size()` is defined.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            TypeTag::EmptyAggregate
                | TypeTag::AggregateOfEmptyAggregate
                | TypeTag::AggregateOfInt
                | TypeTag::AggregateOfDouble
                | TypeTag::AggregateOfString
                | TypeTag::AggregateOfBinary
                | TypeTag::AggregateOfAggregateOfInt
                | TypeTag::AggregateOfAggregateOfDouble
                | TypeTag::AggregateOfEntityInstance
                | TypeTag::AggregateOfAggregateOfEntityInstance
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Three-state logical (`.T.`, `.F.`, `.U.`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Logical {
    True,
    False,
    Unknown,
}

impl From<bool> for Logical {
    fn from(b: bool) -> Self {
        if b {
            Logical::True
        } else {
            Logical::False
        }
    }
}

impl From<Option<bool>> for Logical {
    fn from(b: Option<bool>) -> Self {
        b.map_or(Logical::Unknown, Logical::from)
    }
}

/// Symbolic name of an enumeration member. Membership is not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumerationReference {
    pub value: String,
}

impl EnumerationReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_tags() {
        assert!(TypeTag::EmptyAggregate.is_aggregate());
        assert!(TypeTag::AggregateOfAggregateOfEntityInstance.is_aggregate());
        assert!(!TypeTag::Null.is_aggregate());
        assert!(!TypeTag::EntityInstance.is_aggregate());
        assert!(!TypeTag::Enumeration.is_aggregate());
    }

    #[test]
    fn logical_from_option() {
        assert_eq!(Logical::from(Some(true)), Logical::True);
        assert_eq!(Logical::from(Some(false)), Logical::False);
        assert_eq!(Logical::from(None), Logical::Unknown);
    }

    #[test]
    fn tag_names_serialize_as_screaming_snake() {
        let json = serde_json::to_string(&TypeTag::AggregateOfDouble).unwrap();
        assert_eq!(json, "\"AGGREGATE_OF_DOUBLE\"");
        assert_eq!(TypeTag::AggregateOfDouble.to_string(), "AGGREGATE_OF_DOUBLE");
    }
}
