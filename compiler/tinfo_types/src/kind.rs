//! Node kind discriminant.
//!
//! The discriminant doubles as the wire tag: a node is written as
//! `kind as u8` followed by the kind's payload. Tags are dense, `0..=18`.

use std::fmt;

/// The closed set of node kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TypeKind {
    /// Tagged union with named variants.
    Custom = 0,
    /// One variant of a `Custom`. Never a top-level node.
    CustomVariant = 1,
    /// Ordered parameter list; the last is conventionally the return type.
    Function = 2,
    /// Named reference to another type.
    Alias = 3,
    /// Ordered named fields.
    Record = 4,
    /// Fixed-size sequence.
    Array = 5,
    /// Growable sequence.
    List = 6,
    String = 7,
    Int = 8,
    Fixed = 9,
    Boolean = 10,
    Blob = 11,
    ResourceName = 12,
    Char = 13,
    /// Ordered positional fields.
    Tuple = 14,
    /// Reference to a named type, used to close self-referential types.
    TypeRefId = 15,
    /// Matches any type.
    Any = 16,
    /// Matches any type, provided all occurrences agree.
    AnyMatchingTypes = 17,
    /// Opaque foreign type.
    Unmanaged = 18,
}

impl TypeKind {
    /// Every kind, in tag order.
    pub const ALL: [Self; 19] = [
        Self::Custom,
        Self::CustomVariant,
        Self::Function,
        Self::Alias,
        Self::Record,
        Self::Array,
        Self::List,
        Self::String,
        Self::Int,
        Self::Fixed,
        Self::Boolean,
        Self::Blob,
        Self::ResourceName,
        Self::Char,
        Self::Tuple,
        Self::TypeRefId,
        Self::Any,
        Self::AnyMatchingTypes,
        Self::Unmanaged,
    ];

    /// Wire tag.
    #[inline]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Kind for a wire tag, or `None` for an unknown tag.
    #[inline]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        if (tag as usize) < Self::ALL.len() {
            Some(Self::ALL[tag as usize])
        } else {
            None
        }
    }

    /// Kinds with no payload and no children.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Int
                | Self::Fixed
                | Self::Boolean
                | Self::Blob
                | Self::ResourceName
                | Self::Char
                | Self::Any
                | Self::AnyMatchingTypes
        )
    }

    /// Name given to nodes of this kind when the caller supplies none.
    ///
    /// `Custom`, `Alias` and `Unmanaged` always carry a caller-chosen name;
    /// `CustomVariant` is not a node.
    pub const fn default_name(self) -> Option<&'static str> {
        match self {
            Self::String => Some("String"),
            Self::Int => Some("Int"),
            Self::Fixed => Some("Fixed"),
            Self::Boolean => Some("Bool"),
            Self::Blob => Some("Blob"),
            Self::ResourceName => Some("ResourceName"),
            Self::Char => Some("Char"),
            Self::Any => Some("Any"),
            Self::AnyMatchingTypes => Some("*"),
            Self::Array => Some("Array"),
            Self::List => Some("List"),
            Self::Function => Some("Function"),
            Self::Tuple => Some("Tuple"),
            Self::Record => Some("Record"),
            Self::TypeRefId => Some("TypeRefId"),
            Self::Custom | Self::CustomVariant | Self::Alias | Self::Unmanaged => None,
        }
    }

    /// Kind name as used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Custom => "Custom",
            Self::CustomVariant => "CustomVariant",
            Self::Function => "Function",
            Self::Alias => "Alias",
            Self::Record => "Record",
            Self::Array => "Array",
            Self::List => "List",
            Self::String => "String",
            Self::Int => "Int",
            Self::Fixed => "Fixed",
            Self::Boolean => "Boolean",
            Self::Blob => "Blob",
            Self::ResourceName => "ResourceName",
            Self::Char => "Char",
            Self::Tuple => "Tuple",
            Self::TypeRefId => "TypeRefId",
            Self::Any => "Any",
            Self::AnyMatchingTypes => "AnyMatchingTypes",
            Self::Unmanaged => "Unmanaged",
        }
    }
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKind::{}", self.name())
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const _: () = assert!(std::mem::size_of::<TypeKind>() == 1);
