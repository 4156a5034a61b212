use facet::Shape;

/// Errors raised while building or invoking a property accessor.
#[derive(Debug, Clone)]
pub enum AccessorError {
    /// Properties can only be looked up on structs.
    NotAStruct {
        /// The shape we tried to look a property up on.
        shape: &'static Shape,
    },

    /// The receiver has no field with that name.
    NoSuchProperty {
        /// The receiver's shape.
        owner: &'static Shape,
        /// The name that was looked up.
        property: String,
    },

    /// The value handed to the accessor doesn't have the field's type.
    PropertyType {
        /// The receiver's shape.
        owner: &'static Shape,
        /// The field being assigned.
        property: &'static str,
        /// The field's shape.
        expected: &'static Shape,
        /// The value's shape.
        actual: &'static Shape,
    },

    /// The accessor was compiled for a different receiver type.
    WrongTarget {
        /// The receiver type the accessor was compiled for.
        expected: &'static Shape,
        /// The receiver type it was called with.
        actual: &'static Shape,
    },

    /// Reading the field back through `Peek` failed.
    Inspect {
        /// The name that was read.
        property: String,
        /// What `Peek` reported.
        message: String,
    },
}

impl core::fmt::Display for AccessorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AccessorError::NotAStruct { shape } => {
                write!(f, "cannot look up a property on {shape}: not a struct")
            }
            AccessorError::NoSuchProperty { owner, property } => {
                write!(f, "{owner} has no property named `{property}`")
            }
            AccessorError::PropertyType {
                owner,
                property,
                expected,
                actual,
            } => write!(
                f,
                "cannot assign a {actual} to {owner}.{property}, which is a {expected}"
            ),
            AccessorError::WrongTarget { expected, actual } => write!(
                f,
                "accessor was compiled for {expected} but was called on {actual}"
            ),
            AccessorError::Inspect { property, message } => {
                write!(f, "failed to read property `{property}`: {message}")
            }
        }
    }
}

impl std::error::Error for AccessorError {}
