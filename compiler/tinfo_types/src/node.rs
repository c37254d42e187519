//! Node model.
//!
//! [`TypeInfo`] is generic over its reference representation `R`:
//! `TypeInfo<Placeholder>` is what the decoder produces, `TypeInfo<TypeRef>`
//! (the default) is what a fixed-up [`Chunk`](crate::Chunk) holds. The
//! payload shapes are identical; only [`TypeData::try_map_refs`] moves a node
//! from one representation to the other.

use smallvec::SmallVec;

use crate::{MemoryInfo, MemoryOffsetInfo, TypeKind, TypeRef};

/// One node of a type graph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeInfo<R = TypeRef> {
    pub(crate) name: Box<str>,
    pub(crate) hash: u16,
    pub(crate) index: u16,
    pub(crate) data: TypeData<R>,
}

impl<R> TypeInfo<R> {
    /// Display name. Scalars and anonymous composites use their kind's
    /// default name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reserved; always zero.
    #[inline]
    pub fn hash(&self) -> u16 {
        self.hash
    }

    /// Position in the owning chunk. Zero until the node is appended.
    #[inline]
    pub fn index(&self) -> u16 {
        self.index
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.data.kind()
    }

    #[inline]
    pub fn data(&self) -> &TypeData<R> {
        &self.data
    }

    /// Convert every reference with `f`, keeping name, hash and index.
    pub fn try_map_refs<S, E>(
        self,
        f: &mut impl FnMut(R) -> Result<S, E>,
    ) -> Result<TypeInfo<S>, E> {
        Ok(TypeInfo {
            name: self.name,
            hash: self.hash,
            index: self.index,
            data: self.data.try_map_refs(f)?,
        })
    }

    /// Stamp the position and the variant owner back-references.
    pub(crate) fn assign_index(&mut self, index: u16) {
        self.index = index;
        if let TypeData::Custom(custom) = &mut self.data {
            for variant in &mut custom.variants {
                variant.owner = index;
            }
        }
    }
}

impl TypeInfo<TypeRef> {
    /// Handle of this node in its chunk.
    #[inline]
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.index)
    }

    /// Every outgoing reference with its edge kind, in payload order.
    pub fn children(&self) -> SmallVec<[(EdgeKind, TypeRef); 4]> {
        let mut out = SmallVec::new();
        self.data.for_each_ref(|edge, &target| out.push((edge, target)));
        out
    }
}

/// How a reference relates its node to the target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EdgeKind {
    /// Structural child: field, parameter, element, alias target.
    Child,
    /// Generic parameter of a record or custom type.
    Generic,
    /// Nominal back-reference from a `TypeRefId` node. The only edge that may
    /// close a cycle.
    TypeRefId,
}

/// Kind-specific payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeData<R> {
    Custom(CustomType<R>),
    Function(FunctionType<R>),
    Alias(AliasType<R>),
    Record(RecordType<R>),
    Array(ElementType<R>),
    List(ElementType<R>),
    Tuple(TupleType<R>),
    TypeRefId(R),
    Unmanaged(UnmanagedType),
    String,
    Int,
    Fixed,
    Boolean,
    Blob,
    ResourceName,
    Char,
    Any,
    AnyMatchingTypes,
}

impl<R> TypeData<R> {
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Custom(_) => TypeKind::Custom,
            Self::Function(_) => TypeKind::Function,
            Self::Alias(_) => TypeKind::Alias,
            Self::Record(_) => TypeKind::Record,
            Self::Array(_) => TypeKind::Array,
            Self::List(_) => TypeKind::List,
            Self::Tuple(_) => TypeKind::Tuple,
            Self::TypeRefId(_) => TypeKind::TypeRefId,
            Self::Unmanaged(_) => TypeKind::Unmanaged,
            Self::String => TypeKind::String,
            Self::Int => TypeKind::Int,
            Self::Fixed => TypeKind::Fixed,
            Self::Boolean => TypeKind::Boolean,
            Self::Blob => TypeKind::Blob,
            Self::ResourceName => TypeKind::ResourceName,
            Self::Char => TypeKind::Char,
            Self::Any => TypeKind::Any,
            Self::AnyMatchingTypes => TypeKind::AnyMatchingTypes,
        }
    }

    /// Visit every reference in payload order.
    pub fn for_each_ref(&self, mut f: impl FnMut(EdgeKind, &R)) {
        match self {
            Self::Custom(custom) => {
                for generic in &custom.generics {
                    f(EdgeKind::Generic, generic);
                }
                for field in custom.variants.iter().flat_map(|v| &v.fields) {
                    f(EdgeKind::Child, &field.ty);
                }
            }
            Self::Function(function) => {
                for param in &function.params {
                    f(EdgeKind::Child, param);
                }
            }
            Self::Alias(alias) => f(EdgeKind::Child, &alias.target),
            Self::Record(record) => {
                for generic in &record.generics {
                    f(EdgeKind::Generic, generic);
                }
                for field in &record.fields {
                    f(EdgeKind::Child, &field.ty);
                }
            }
            Self::Array(element) | Self::List(element) => f(EdgeKind::Child, &element.element),
            Self::Tuple(tuple) => {
                for field in &tuple.fields {
                    f(EdgeKind::Child, &field.ty);
                }
            }
            Self::TypeRefId(target) => f(EdgeKind::TypeRefId, target),
            Self::Unmanaged(_)
            | Self::String
            | Self::Int
            | Self::Fixed
            | Self::Boolean
            | Self::Blob
            | Self::ResourceName
            | Self::Char
            | Self::Any
            | Self::AnyMatchingTypes => {}
        }
    }

    /// Rebuild the payload with every reference converted by `f`. Stops at
    /// the first error.
    pub fn try_map_refs<S, E>(
        self,
        f: &mut impl FnMut(R) -> Result<S, E>,
    ) -> Result<TypeData<S>, E> {
        Ok(match self {
            Self::Custom(custom) => TypeData::Custom(CustomType {
                generics: map_all(custom.generics, f)?,
                variants: custom
                    .variants
                    .into_iter()
                    .map(|variant| variant.try_map_refs(f))
                    .collect::<Result<_, E>>()?,
                layout: custom.layout,
            }),
            Self::Function(function) => TypeData::Function(FunctionType {
                params: map_all(function.params, f)?,
            }),
            Self::Alias(alias) => TypeData::Alias(AliasType {
                target: f(alias.target)?,
            }),
            Self::Record(record) => TypeData::Record(RecordType {
                generics: map_all(record.generics, f)?,
                fields: record
                    .fields
                    .into_iter()
                    .map(|field| {
                        Ok(RecordField {
                            name: field.name,
                            ty: f(field.ty)?,
                            offset: field.offset,
                        })
                    })
                    .collect::<Result<_, E>>()?,
                layout: record.layout,
            }),
            Self::Array(element) => TypeData::Array(element.try_map_refs(f)?),
            Self::List(element) => TypeData::List(element.try_map_refs(f)?),
            Self::Tuple(tuple) => TypeData::Tuple(TupleType {
                fields: tuple
                    .fields
                    .into_iter()
                    .map(|field| {
                        Ok(TupleField {
                            name: field.name,
                            ty: f(field.ty)?,
                            offset: field.offset,
                        })
                    })
                    .collect::<Result<_, E>>()?,
                layout: tuple.layout,
            }),
            Self::TypeRefId(target) => TypeData::TypeRefId(f(target)?),
            Self::Unmanaged(unmanaged) => TypeData::Unmanaged(unmanaged),
            Self::String => TypeData::String,
            Self::Int => TypeData::Int,
            Self::Fixed => TypeData::Fixed,
            Self::Boolean => TypeData::Boolean,
            Self::Blob => TypeData::Blob,
            Self::ResourceName => TypeData::ResourceName,
            Self::Char => TypeData::Char,
            Self::Any => TypeData::Any,
            Self::AnyMatchingTypes => TypeData::AnyMatchingTypes,
        })
    }
}

fn map_all<R, S, E>(refs: Vec<R>, f: &mut impl FnMut(R) -> Result<S, E>) -> Result<Vec<S>, E> {
    refs.into_iter().map(&mut *f).collect()
}

/// Tagged union.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CustomType<R> {
    pub generics: Vec<R>,
    pub variants: Vec<Variant<R>>,
    pub layout: MemoryInfo,
}

/// One alternative of a [`CustomType`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Variant<R> {
    pub name: Box<str>,
    pub fields: Vec<VariantField<R>>,
    pub layout: MemoryInfo,
    /// Index of the owning custom node; stamped when the node is appended.
    pub(crate) owner: u16,
}

impl<R> Variant<R> {
    pub fn new(name: impl Into<Box<str>>, fields: Vec<VariantField<R>>) -> Self {
        Self {
            name: name.into(),
            fields,
            layout: MemoryInfo::UNKNOWN,
            owner: 0,
        }
    }

    /// Variant with unannotated fields of the given types.
    pub fn with_types(name: impl Into<Box<str>>, types: impl IntoIterator<Item = R>) -> Self {
        Self::new(name, types.into_iter().map(VariantField::new).collect())
    }

    #[must_use]
    pub fn with_layout(mut self, layout: MemoryInfo) -> Self {
        self.layout = layout;
        self
    }

    /// Handle of the custom node this variant belongs to.
    pub fn owner(&self) -> TypeRef {
        TypeRef::new(self.owner)
    }

    fn try_map_refs<S, E>(self, f: &mut impl FnMut(R) -> Result<S, E>) -> Result<Variant<S>, E> {
        Ok(Variant {
            name: self.name,
            fields: self
                .fields
                .into_iter()
                .map(|field| {
                    Ok(VariantField {
                        ty: f(field.ty)?,
                        offset: field.offset,
                    })
                })
                .collect::<Result<_, E>>()?,
            layout: self.layout,
            owner: self.owner,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariantField<R> {
    pub ty: R,
    pub offset: MemoryOffsetInfo,
}

impl<R> VariantField<R> {
    pub fn new(ty: R) -> Self {
        Self {
            ty,
            offset: MemoryOffsetInfo::default(),
        }
    }

    #[must_use]
    pub fn at(mut self, offset: MemoryOffsetInfo) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FunctionType<R> {
    pub params: Vec<R>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AliasType<R> {
    pub target: R,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordType<R> {
    pub generics: Vec<R>,
    pub fields: Vec<RecordField<R>>,
    pub layout: MemoryInfo,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordField<R> {
    pub name: Box<str>,
    pub ty: R,
    pub offset: MemoryOffsetInfo,
}

impl<R> RecordField<R> {
    pub fn new(name: impl Into<Box<str>>, ty: R) -> Self {
        Self {
            name: name.into(),
            ty,
            offset: MemoryOffsetInfo::default(),
        }
    }

    #[must_use]
    pub fn at(mut self, offset: MemoryOffsetInfo) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TupleType<R> {
    pub fields: Vec<TupleField<R>>,
    pub layout: MemoryInfo,
}

/// Tuple field. Names are optional and never compared; the wire form of a
/// tuple carries none.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TupleField<R> {
    pub name: Option<Box<str>>,
    pub ty: R,
    pub offset: MemoryOffsetInfo,
}

impl<R> TupleField<R> {
    pub fn new(ty: R) -> Self {
        Self {
            name: None,
            ty,
            offset: MemoryOffsetInfo::default(),
        }
    }

    pub fn named(name: impl Into<Box<str>>, ty: R) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(ty)
        }
    }

    #[must_use]
    pub fn at(mut self, offset: MemoryOffsetInfo) -> Self {
        self.offset = offset;
        self
    }
}

/// Payload of `Array` and `List`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElementType<R> {
    pub element: R,
    pub layout: MemoryInfo,
}

impl<R> ElementType<R> {
    fn try_map_refs<S, E>(
        self,
        f: &mut impl FnMut(R) -> Result<S, E>,
    ) -> Result<ElementType<S>, E> {
        Ok(ElementType {
            element: f(self.element)?,
            layout: self.layout,
        })
    }
}

/// Opaque foreign type; the node's name is the foreign type's name.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UnmanagedType {
    pub id: u16,
}
