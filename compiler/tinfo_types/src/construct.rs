//! Node constructors.
//!
//! Constructors build a detached node: its index is zero until it is appended
//! to a [`Chunk`](crate::Chunk) or [`RawChunk`](crate::RawChunk), which stamps
//! the real position. They are generic over the reference representation, so
//! the decoder and compiler-side builders share them.

use crate::layout::has_own_layout;
use crate::{
    AliasType, CustomType, ElementType, FunctionType, MemoryInfo, RecordField, RecordType,
    TupleField, TupleType, TypeData, TypeInfo, TypeKind, UnmanagedType, Variant,
};

impl<R> TypeInfo<R> {
    fn new(name: impl Into<Box<str>>, data: TypeData<R>) -> Self {
        Self {
            name: name.into(),
            hash: 0,
            index: 0,
            data,
        }
    }

    /// Node named after its kind's default name.
    fn unnamed(data: TypeData<R>) -> Self {
        let name = data.kind().default_name().unwrap_or_default();
        Self::new(name, data)
    }

    // === Scalars ===

    pub fn string() -> Self {
        Self::unnamed(TypeData::String)
    }

    pub fn int() -> Self {
        Self::unnamed(TypeData::Int)
    }

    pub fn fixed() -> Self {
        Self::unnamed(TypeData::Fixed)
    }

    pub fn boolean() -> Self {
        Self::unnamed(TypeData::Boolean)
    }

    pub fn blob() -> Self {
        Self::unnamed(TypeData::Blob)
    }

    pub fn resource_name() -> Self {
        Self::unnamed(TypeData::ResourceName)
    }

    pub fn char() -> Self {
        Self::unnamed(TypeData::Char)
    }

    pub fn any() -> Self {
        Self::unnamed(TypeData::Any)
    }

    pub fn any_matching_types() -> Self {
        Self::unnamed(TypeData::AnyMatchingTypes)
    }

    // === Element Containers ===

    pub fn array(element: R) -> Self {
        Self::unnamed(TypeData::Array(ElementType {
            element,
            layout: MemoryInfo::UNKNOWN,
        }))
    }

    pub fn list(element: R) -> Self {
        Self::unnamed(TypeData::List(ElementType {
            element,
            layout: MemoryInfo::UNKNOWN,
        }))
    }

    // === Composites ===

    /// Function over `params`; the last parameter is the return type by
    /// convention.
    pub fn function(params: Vec<R>) -> Self {
        Self::unnamed(TypeData::Function(FunctionType { params }))
    }

    pub fn tuple(fields: Vec<TupleField<R>>) -> Self {
        Self::unnamed(TypeData::Tuple(TupleType {
            fields,
            layout: MemoryInfo::UNKNOWN,
        }))
    }

    /// Tuple of unnamed fields.
    pub fn tuple_of(types: impl IntoIterator<Item = R>) -> Self {
        Self::tuple(types.into_iter().map(TupleField::new).collect())
    }

    pub fn record(fields: Vec<RecordField<R>>) -> Self {
        Self::unnamed(TypeData::Record(RecordType {
            generics: Vec::new(),
            fields,
            layout: MemoryInfo::UNKNOWN,
        }))
    }

    pub fn custom(name: impl Into<Box<str>>, variants: Vec<Variant<R>>) -> Self {
        Self::new(
            name,
            TypeData::Custom(CustomType {
                generics: Vec::new(),
                variants,
                layout: MemoryInfo::UNKNOWN,
            }),
        )
    }

    // === Named References ===

    pub fn alias(name: impl Into<Box<str>>, target: R) -> Self {
        Self::new(name, TypeData::Alias(AliasType { target }))
    }

    /// Nominal reference to `target`, used to close self-referential types.
    pub fn type_ref_id(target: R) -> Self {
        Self::unnamed(TypeData::TypeRefId(target))
    }

    pub fn unmanaged(id: u16, name: impl Into<Box<str>>) -> Self {
        Self::new(name, TypeData::Unmanaged(UnmanagedType { id }))
    }

    // === Adjusters ===

    /// Replace the generic parameter list of a record or custom node. Other
    /// kinds are returned unchanged.
    #[must_use]
    pub fn with_generics(mut self, params: Vec<R>) -> Self {
        match &mut self.data {
            TypeData::Record(record) => record.generics = params,
            TypeData::Custom(custom) => custom.generics = params,
            _ => {}
        }
        self
    }

    /// Set the node's own memory info. Only records, tuples, customs, arrays
    /// and lists carry one; other kinds are returned unchanged.
    #[must_use]
    pub fn with_layout(mut self, layout: MemoryInfo) -> Self {
        debug_assert!(
            has_own_layout(self.kind()) || !layout.is_known(),
            "{} carries no memory info",
            self.kind()
        );
        match &mut self.data {
            TypeData::Record(record) => record.layout = layout,
            TypeData::Tuple(tuple) => tuple.layout = layout,
            TypeData::Custom(custom) => custom.layout = layout,
            TypeData::Array(element) | TypeData::List(element) => element.layout = layout,
            _ => {}
        }
        self
    }

    /// Own memory info, for kinds that carry one.
    pub fn layout(&self) -> Option<MemoryInfo> {
        match &self.data {
            TypeData::Record(record) => Some(record.layout),
            TypeData::Tuple(tuple) => Some(tuple.layout),
            TypeData::Custom(custom) => Some(custom.layout),
            TypeData::Array(element) | TypeData::List(element) => Some(element.layout),
            _ => None,
        }
    }

    /// Kind-default node for a scalar kind.
    pub fn scalar(kind: TypeKind) -> Option<Self> {
        let data = match kind {
            TypeKind::String => TypeData::String,
            TypeKind::Int => TypeData::Int,
            TypeKind::Fixed => TypeData::Fixed,
            TypeKind::Boolean => TypeData::Boolean,
            TypeKind::Blob => TypeData::Blob,
            TypeKind::ResourceName => TypeData::ResourceName,
            TypeKind::Char => TypeData::Char,
            TypeKind::Any => TypeData::Any,
            TypeKind::AnyMatchingTypes => TypeData::AnyMatchingTypes,
            _ => return None,
        };
        Some(Self::unnamed(data))
    }
}
