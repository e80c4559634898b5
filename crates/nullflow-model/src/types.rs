//! The declared-type model: a structural description of a source type,
//! independent of nullability. Nullability is layered on top by
//! [`crate::TypeWithNode`]; `Type` only needs to know enough shape (arity,
//! element types, tuple members) to drive that layering and substitution.

use serde::{Deserialize, Serialize};

/// How a reference-type position was spelled in source, from the binder's
/// point of view (`Annotated` = `T?`, `NotAnnotated` = `T!` or a library
/// annotation asserting non-null, `None` = bare `T`, unknown).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Annotation {
    Annotated,
    NotAnnotated,
    None,
}

/// A named tuple element; unnamed elements carry `name: None` and alias to
/// their positional index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleElement {
    pub name: Option<String>,
    pub ty: Type,
}

/// Where a type-parameter occurrence is declared, used by substitution
/// lookup (see `nullflow_builder::substitution`).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TypeParamOwner {
    Class,
    Method,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// A value type (`int`, `bool`, an enum, a user struct, `void`). Always
    /// carries the oblivious node at its outer position.
    Value(String),
    /// `Nullable<T>` where `T` is a value type: oblivious outer, `T` recurses
    /// with ordinary rules.
    NullableValue(Box<Type>),
    /// A reference type, possibly generic: a class, interface, or delegate
    /// name together with its type arguments in declaration order.
    Named { name: String, type_args: Vec<Type> },
    /// An occurrence of a type parameter (class- or method-level).
    TypeParameter {
        name: String,
        ordinal: u32,
        owner: TypeParamOwner,
    },
    Tuple(Vec<TupleElement>),
    Array(Box<Type>),
    /// `IEnumerable<T>`/`IEnumerator<T>`-shaped iterator result.
    Sequence(Box<Type>),
    /// `Task<T>`/`ValueTask<T>`-shaped async result; transparent for
    /// nullability of `T`.
    TaskLike(Box<Type>),
    /// A lambda/local-function/delegate shape.
    Function { params: Vec<Type>, ret: Box<Type> },
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, type_args: Vec<Type>) -> Self {
        Type::Named {
            name: name.into(),
            type_args,
        }
    }

    /// Is this type spelled as a reference type at its outer position? Value
    /// types (including `Nullable<T>` and tuples, which are struct-shaped in
    /// the source language) are not.
    pub fn is_reference_shaped(&self) -> bool {
        matches!(
            self,
            Type::Named { .. }
                | Type::TypeParameter { .. }
                | Type::Array(_)
                | Type::Sequence(_)
                | Type::TaskLike(_)
                | Type::Function { .. }
        )
    }
}
