//! Resolved types attached to every expression and declaration.

use bitflags::bitflags;

use crate::ast::Expression;

/// Base kind of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseType {
    Void,
    Bool,
    Int,
    Int2,
    Int3,
    Int4,
    Uint,
    Uint2,
    Uint3,
    Uint4,
    Float,
    Float2,
    Float3,
    Float4,
    Float3x3,
    Float4x4,
    Half,
    Half2,
    Half3,
    Half4,
    Half3x3,
    Half4x4,
    Texture,
    Sampler2D,
    SamplerCube,
    Sampler2DShadow,
    Sampler3D,
    /// A struct declared in the tree; the name lives in [`Type::type_name`].
    UserDefined,
}

impl BaseType {
    /// Scalar numeric types (the only ones the target dialects cannot swizzle).
    pub fn is_numeric_scalar(self) -> bool {
        matches!(
            self,
            BaseType::Float | BaseType::Half | BaseType::Int | BaseType::Uint
        )
    }

    pub fn is_half(self) -> bool {
        matches!(
            self,
            BaseType::Half
                | BaseType::Half2
                | BaseType::Half3
                | BaseType::Half4
                | BaseType::Half3x3
                | BaseType::Half4x4
        )
    }

    pub fn is_sampler(self) -> bool {
        matches!(
            self,
            BaseType::Sampler2D
                | BaseType::SamplerCube
                | BaseType::Sampler2DShadow
                | BaseType::Sampler3D
        )
    }

    /// Number of vector components, or `None` for matrices and non-numeric kinds.
    pub fn components(self) -> Option<u32> {
        match self {
            BaseType::Bool
            | BaseType::Int
            | BaseType::Uint
            | BaseType::Float
            | BaseType::Half => Some(1),
            BaseType::Int2 | BaseType::Uint2 | BaseType::Float2 | BaseType::Half2 => Some(2),
            BaseType::Int3 | BaseType::Uint3 | BaseType::Float3 | BaseType::Half3 => Some(3),
            BaseType::Int4 | BaseType::Uint4 | BaseType::Float4 | BaseType::Half4 => Some(4),
            _ => None,
        }
    }
}

bitflags! {
    /// Declaration-level qualifiers carried by a [`Type`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        const CONST = 1 << 0;
        /// Material-exposed property whose value is resolved before generation.
        const PROPERTY = 1 << 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub base: BaseType,
    /// Struct name when `base == BaseType::UserDefined`.
    pub type_name: Option<String>,
    pub array: bool,
    pub array_size: Option<Box<Expression>>,
    pub flags: TypeFlags,
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Self {
            base,
            type_name: None,
            array: false,
            array_size: None,
            flags: TypeFlags::empty(),
        }
    }

    pub fn user(name: impl Into<String>) -> Self {
        Self {
            type_name: Some(name.into()),
            ..Self::new(BaseType::UserDefined)
        }
    }

    /// Turns this type into a fixed-size array type.
    pub fn array_of(mut self, size: Expression) -> Self {
        self.array = true;
        self.array_size = Some(Box::new(size));
        self
    }

    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is_const(&self) -> bool {
        self.flags.contains(TypeFlags::CONST)
    }

    pub fn is_property(&self) -> bool {
        self.flags.contains(TypeFlags::PROPERTY)
    }

    /// Struct name for user-defined types.
    pub fn struct_name(&self) -> Option<&str> {
        match self.base {
            BaseType::UserDefined => self.type_name.as_deref(),
            _ => None,
        }
    }
}

impl From<BaseType> for Type {
    fn from(base: BaseType) -> Self {
        Type::new(base)
    }
}
