//! Reflective property lookup on top of facet shapes.
//!
//! A property is a named field of a struct. [`PropertyInfo::lookup`] resolves
//! the name against a [`Shape`] once; [`PropertyInfo::set_value`] then performs
//! a fully checked write, the way a reflective `SetValue` would.

use facet::{Facet, Field, Shape, Type, UserType};
use facet_reflect::Peek;

use crate::{AccessorError, Dynamic};

/// A resolved struct field: the owning shape plus the field's metadata.
#[derive(Debug, Clone, Copy)]
pub struct PropertyInfo {
    owner: &'static Shape,
    field: &'static Field,
}

impl PropertyInfo {
    /// Finds the field called `name` on `owner`.
    ///
    /// Names are matched exactly (case-sensitive), in declaration order.
    pub fn lookup(owner: &'static Shape, name: &str) -> Result<Self, AccessorError> {
        let fields: &'static [Field] = match &owner.ty {
            Type::User(UserType::Struct(st)) => st.fields,
            _ => return Err(AccessorError::NotAStruct { shape: owner }),
        };

        fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| Self { owner, field })
            .ok_or_else(|| AccessorError::NoSuchProperty {
                owner,
                property: name.to_owned(),
            })
    }

    /// Shape of the struct this property belongs to.
    #[inline(always)]
    pub fn owner(&self) -> &'static Shape {
        self.owner
    }

    /// The field's name.
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.field.name
    }

    /// Byte offset of the field inside its owner.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.field.offset
    }

    /// Shape of the field's type.
    #[inline(always)]
    pub fn value_shape(&self) -> &'static Shape {
        self.field.shape()
    }

    /// Checks that values of type `V` can be stored in this property.
    pub fn expect_value<V: Facet<'static>>(&self) -> Result<(), AccessorError> {
        let expected = self.value_shape();
        if expected != V::SHAPE {
            return Err(AccessorError::PropertyType {
                owner: self.owner,
                property: self.field.name,
                expected,
                actual: V::SHAPE,
            });
        }
        Ok(())
    }

    /// Checks that `target` is an instance of this property's owner.
    #[inline]
    pub fn expect_receiver(&self, target: &dyn Dynamic) -> Result<(), AccessorError> {
        let actual = target.shape();
        if actual != self.owner {
            return Err(AccessorError::WrongTarget {
                expected: self.owner,
                actual,
            });
        }
        Ok(())
    }

    /// Writes `value` into this property of `target`, checking both the
    /// receiver's runtime type and the value's type first.
    pub fn set_value<V: Facet<'static>>(
        &self,
        target: &mut dyn Dynamic,
        value: V,
    ) -> Result<(), AccessorError> {
        self.expect_receiver(target)?;
        self.expect_value::<V>()?;

        // SAFETY: `target` is an initialized instance of `self.owner`, whose
        // field at `self.offset()` has the shape of `V`.
        unsafe { assign(target.as_mut_ptr(), self.offset(), value) };
        Ok(())
    }
}

/// Assigns `value` to the slot at `base + offset`, dropping the previous value.
///
/// # Safety
///
/// `base + offset` must point to an initialized, properly aligned `V` that the
/// caller has exclusive access to.
#[inline(always)]
pub(crate) unsafe fn assign<V>(base: *mut u8, offset: usize, value: V) {
    unsafe {
        let slot = base.add(offset).cast::<V>();
        *slot = value;
    }
}

/// Reads the property `name` of `target` through [`Peek`].
pub fn peek_property<'mem, T, V>(target: &'mem T, name: &str) -> Result<&'mem V, AccessorError>
where
    T: Facet<'static>,
    V: Facet<'static>,
{
    let inspect = |message: String| AccessorError::Inspect {
        property: name.to_owned(),
        message,
    };

    let peek = Peek::new(target)
        .into_struct()
        .map_err(|e| inspect(e.to_string()))?;
    let field = peek
        .field_by_name(name)
        .map_err(|e| inspect(e.to_string()))?;
    field.get::<V>().map_err(|e| inspect(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dummy;

    #[derive(Facet)]
    struct Pair {
        left: u32,
        right: String,
    }

    #[test]
    fn lookup_finds_fields_in_declaration_order() {
        let left = PropertyInfo::lookup(Pair::SHAPE, "left").unwrap();
        let right = PropertyInfo::lookup(Pair::SHAPE, "right").unwrap();
        assert_eq!(left.name(), "left");
        assert_eq!(right.name(), "right");
        assert_eq!(left.value_shape(), u32::SHAPE);
        assert_eq!(right.value_shape(), String::SHAPE);
        assert_eq!(right.offset(), core::mem::offset_of!(Pair, right));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let err = PropertyInfo::lookup(Dummy::SHAPE, "Text").unwrap_err();
        assert!(matches!(
            err,
            AccessorError::NoSuchProperty { ref property, .. } if property == "Text"
        ));
    }

    #[test]
    fn lookup_rejects_non_structs() {
        let err = PropertyInfo::lookup(u32::SHAPE, "text").unwrap_err();
        assert!(matches!(err, AccessorError::NotAStruct { .. }));
    }

    #[test]
    fn set_value_checks_value_type() {
        let mut pair = Pair {
            left: 1,
            right: String::from("r"),
        };
        let left = PropertyInfo::lookup(Pair::SHAPE, "left").unwrap();
        let err = left
            .set_value(&mut pair, String::from("nope"))
            .unwrap_err();
        assert!(matches!(
            err,
            AccessorError::PropertyType {
                property: "left",
                ..
            }
        ));
        left.set_value(&mut pair, 7u32).unwrap();
        assert_eq!(pair.left, 7);
        assert_eq!(pair.right, "r");
    }

    #[test]
    fn peek_reads_back_by_name() {
        let dummy = Dummy {
            text: String::from("hello"),
        };
        let text: &String = peek_property(&dummy, "text").unwrap();
        assert_eq!(text, "hello");

        let err = peek_property::<_, String>(&dummy, "missing").unwrap_err();
        assert!(matches!(err, AccessorError::Inspect { .. }));
    }
}
