//! Human-readable rendering of type nodes.
//!
//! ```text
//! Int                          scalar
//! List<Int>   Array<Bool>      element containers
//! (Int -> Bool)                function
//! (Int, Bool)                  tuple
//! {a : Int, b : String}        record
//! Maybe<Int>(Just(Int) | None) custom with generics and variants
//! Cool   or   Cool => Int      alias, collapsed or expanded
//! $Tree                        TypeRefId
//! Unmanaged<FILE>              foreign type
//! ```

#![allow(clippy::format_push_string)]

use std::fmt;

use bitflags::bitflags;

use crate::stack::ensure_sufficient_stack;
use crate::{Chunk, TypeData, TypeRef};

bitflags! {
    /// Rendering switches.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FormatFlags: u8 {
        /// Render aliases as `Name => target` instead of just `Name`.
        const EXPAND_ALIASES = 1 << 0;
    }
}

impl Chunk {
    /// Render `id` with default flags.
    pub fn format_type(&self, id: TypeRef) -> String {
        self.format_type_with(id, FormatFlags::empty())
    }

    pub fn format_type_with(&self, id: TypeRef, flags: FormatFlags) -> String {
        let mut buf = String::new();
        self.format_type_into(id, flags, &mut buf);
        buf
    }

    /// Render `id` into an existing buffer.
    pub fn format_type_into(&self, id: TypeRef, flags: FormatFlags, buf: &mut String) {
        ensure_sufficient_stack(|| self.format_node(id, flags, buf));
    }

    /// Lazily rendered form of `id`, for use in `format!` and friends.
    pub fn display(&self, id: TypeRef, flags: FormatFlags) -> TypeDisplay<'_> {
        TypeDisplay {
            chunk: self,
            id,
            flags,
        }
    }

    /// Every node, one `index: type` line each, under a count header.
    pub fn dump(&self, flags: FormatFlags) -> String {
        let mut buf = format!("type count: {}\n", self.len());
        for id in self.refs() {
            buf.push_str(&format!("{}: ", id.index()));
            self.format_type_into(id, flags, &mut buf);
            buf.push('\n');
        }
        buf
    }

    fn format_node(&self, id: TypeRef, flags: FormatFlags, buf: &mut String) {
        let info = self.get(id);
        match info.data() {
            TypeData::Custom(custom) => {
                buf.push_str(info.name());
                self.format_list(&custom.generics, "<", ", ", ">", flags, buf);
                buf.push('(');
                for (i, variant) in custom.variants.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(" | ");
                    }
                    buf.push_str(&variant.name);
                    if !variant.fields.is_empty() {
                        let fields: Vec<_> = variant.fields.iter().map(|field| field.ty).collect();
                        self.format_list(&fields, "(", ", ", ")", flags, buf);
                    }
                }
                buf.push(')');
            }
            TypeData::Function(function) => {
                self.format_list(&function.params, "(", " -> ", ")", flags, buf);
                if function.params.is_empty() {
                    buf.push_str("()");
                }
            }
            TypeData::Alias(alias) => {
                buf.push_str(info.name());
                if flags.contains(FormatFlags::EXPAND_ALIASES) {
                    buf.push_str(" => ");
                    self.format_type_into(alias.target, flags, buf);
                }
            }
            TypeData::Record(record) => {
                buf.push('{');
                for (i, field) in record.fields.iter().enumerate() {
                    if i > 0 {
                        buf.push_str(", ");
                    }
                    buf.push_str(&field.name);
                    buf.push_str(" : ");
                    self.format_type_into(field.ty, flags, buf);
                }
                buf.push('}');
            }
            TypeData::Tuple(tuple) => {
                let fields: Vec<_> = tuple.fields.iter().map(|field| field.ty).collect();
                self.format_list(&fields, "(", ", ", ")", flags, buf);
                if fields.is_empty() {
                    buf.push_str("()");
                }
            }
            TypeData::Array(element) => {
                buf.push_str("Array<");
                self.format_type_into(element.element, flags, buf);
                buf.push('>');
            }
            TypeData::List(element) => {
                buf.push_str("List<");
                self.format_type_into(element.element, flags, buf);
                buf.push('>');
            }
            TypeData::TypeRefId(target) => {
                buf.push('$');
                buf.push_str(self.get(*target).name());
            }
            TypeData::Unmanaged(_) => {
                buf.push_str("Unmanaged<");
                buf.push_str(info.name());
                buf.push('>');
            }
            TypeData::String
            | TypeData::Int
            | TypeData::Fixed
            | TypeData::Boolean
            | TypeData::Blob
            | TypeData::ResourceName
            | TypeData::Char
            | TypeData::Any
            | TypeData::AnyMatchingTypes => buf.push_str(info.name()),
        }
    }

    /// `open item sep item ... close`, or nothing for an empty list.
    fn format_list(
        &self,
        items: &[TypeRef],
        open: &str,
        sep: &str,
        close: &str,
        flags: FormatFlags,
        buf: &mut String,
    ) {
        if items.is_empty() {
            return;
        }
        buf.push_str(open);
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                buf.push_str(sep);
            }
            self.format_type_into(item, flags, buf);
        }
        buf.push_str(close);
    }
}

/// Result of [`Chunk::display`].
pub struct TypeDisplay<'a> {
    chunk: &'a Chunk,
    id: TypeRef,
    flags: FormatFlags,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chunk.format_type_with(self.id, self.flags))
    }
}

#[cfg(test)]
mod tests;
