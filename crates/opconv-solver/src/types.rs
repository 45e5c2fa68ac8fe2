//! Type representation.
//!
//! Types are interned into a `TypeInterner` and referred to by `TypeId`, so
//! type equality is an integer comparison. `TypeData` is the structural key.

use crate::def::DefId;
use opconv_common::Atom;
use serde::Serialize;
use smallvec::SmallVec;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Error recovery type. Relates to every other type.
    pub const ERROR: TypeId = TypeId(0);
    /// Top of the non-null hierarchy.
    pub const ANY: TypeId = TypeId(1);
    /// Bottom type.
    pub const NOTHING: TypeId = TypeId(2);
    pub const UNIT: TypeId = TypeId(3);
    pub const BOOLEAN: TypeId = TypeId(4);
    pub const INT: TypeId = TypeId(5);
    pub const LONG: TypeId = TypeId(6);
    pub const DOUBLE: TypeId = TypeId(7);
    pub const STRING: TypeId = TypeId(8);
    /// `Any?`, the top type.
    pub const NULLABLE_ANY: TypeId = TypeId(9);
    /// `Nothing?`, the type of the `null` literal.
    pub const NULL: TypeId = TypeId(10);

    /// First id handed out for non-builtin types.
    pub const FIRST_USER: u32 = 11;

    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

/// Builtin, class-less types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IntrinsicKind {
    Error,
    Any,
    Nothing,
    Unit,
    Boolean,
    Int,
    Long,
    Double,
    String,
}

impl IntrinsicKind {
    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Error => "<error>",
            IntrinsicKind::Any => "Any",
            IntrinsicKind::Nothing => "Nothing",
            IntrinsicKind::Unit => "Unit",
            IntrinsicKind::Boolean => "Boolean",
            IntrinsicKind::Int => "Int",
            IntrinsicKind::Long => "Long",
            IntrinsicKind::Double => "Double",
            IntrinsicKind::String => "String",
        }
    }
}

/// Identity of a declared type parameter.
///
/// Two parameters named `T` on different functions are distinct ids, which is
/// what lets a substitution bind them independently.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeParamId(pub u32);

/// Declaration-site variance of a class type parameter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Variance {
    #[default]
    Invariant,
    /// `out T`: covariant.
    Out,
    /// `in T`: contravariant.
    In,
}

/// Stored information about a type parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamInfo {
    pub name: Atom,
    /// `None` means the implicit `Any?` bound.
    pub upper_bound: Option<TypeId>,
    pub variance: Variance,
}

/// A generic class applied to type arguments: `Container<Int>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplication {
    pub class: DefId,
    pub args: SmallVec<[TypeId; 2]>,
}

/// Structural key of an interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Application(TypeApplication),
    TypeParameter(TypeParamId),
    /// `T?`. Never nested: the interner normalizes `T??` to `T?`.
    Nullable(TypeId),
}

/// Value parameter of a function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: Atom,
    pub type_id: TypeId,
}

impl ParamInfo {
    pub const fn new(name: Atom, type_id: TypeId) -> Self {
        Self { name, type_id }
    }
}

/// Nullability of a type as seen by convention matching.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Nullability {
    NotNull,
    Nullable,
    /// A type parameter that may or may not be instantiated with a nullable type.
    Unknown,
}
