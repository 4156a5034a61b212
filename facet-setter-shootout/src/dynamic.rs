//! Late-bound member assignment.
//!
//! A [`CallSite`] is the moral equivalent of `receiver.member = value` where
//! `receiver` is only known as a `&mut dyn Dynamic`. The member is resolved the
//! first time the site sees a given receiver type, and the resulting rule is
//! cached until a receiver of another type comes along.

use core::marker::PhantomData;

use facet::{Facet, Shape};

use crate::property::{PropertyInfo, assign};
use crate::AccessorError;

/// An untyped receiver: anything that can report its shape and hand out a
/// pointer to itself.
///
/// # Safety
///
/// `shape` must describe the concrete type behind `as_mut_ptr`. This is
/// implemented for every [`Facet`] type and should not be implemented by hand.
pub unsafe trait Dynamic {
    /// Runtime shape of the receiver.
    fn shape(&self) -> &'static Shape;

    /// Pointer to the start of the receiver.
    fn as_mut_ptr(&mut self) -> *mut u8;
}

// SAFETY: `T::SHAPE` describes `T`.
unsafe impl<T: Facet<'static>> Dynamic for T {
    #[inline(always)]
    fn shape(&self) -> &'static Shape {
        T::SHAPE
    }

    #[inline(always)]
    fn as_mut_ptr(&mut self) -> *mut u8 {
        self as *mut T as *mut u8
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    receiver: &'static Shape,
    offset: usize,
}

/// A cached `receiver.<member> = value` site for values of type `V`.
#[derive(Debug)]
pub struct CallSite<V> {
    member: String,
    rule: Option<Rule>,
    binds: usize,
    _value: PhantomData<fn(V)>,
}

impl<V: Facet<'static>> CallSite<V> {
    /// Creates an unbound site assigning to `member`.
    pub fn new(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            rule: None,
            binds: 0,
            _value: PhantomData,
        }
    }

    /// The member this site assigns to.
    pub fn member(&self) -> &str {
        &self.member
    }

    /// How many times the site had to resolve the member.
    pub fn binds(&self) -> usize {
        self.binds
    }

    /// Assigns `value` to the member of `target`, binding first if this is a
    /// receiver type the site hasn't seen last.
    #[inline]
    pub fn set_member(
        &mut self,
        target: &mut dyn Dynamic,
        value: V,
    ) -> Result<(), AccessorError> {
        let receiver = target.shape();
        let offset = match self.rule {
            Some(rule) if rule.receiver == receiver => rule.offset,
            _ => self.bind(receiver)?,
        };

        // SAFETY: the rule was bound against `receiver`, which is the shape of
        // `target`, and checked that the member holds a `V`.
        unsafe { assign(target.as_mut_ptr(), offset, value) };
        Ok(())
    }

    #[cold]
    fn bind(&mut self, receiver: &'static Shape) -> Result<usize, AccessorError> {
        let info = PropertyInfo::lookup(receiver, &self.member)?;
        info.expect_value::<V>()?;

        tracing::trace!(
            member = %self.member,
            receiver = %receiver,
            offset = info.offset(),
            "binding call site"
        );

        self.rule = Some(Rule {
            receiver,
            offset: info.offset(),
        });
        self.binds += 1;
        Ok(info.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dummy;

    #[derive(Facet)]
    struct Label {
        id: u64,
        text: String,
    }

    #[test]
    fn rebinds_when_receiver_type_changes() {
        let mut site = CallSite::<String>::new("text");
        assert_eq!(site.member(), "text");
        let mut dummy = Dummy::new();
        let mut label = Label {
            id: 3,
            text: String::new(),
        };

        site.set_member(&mut dummy, String::from("a")).unwrap();
        site.set_member(&mut dummy, String::from("b")).unwrap();
        assert_eq!(site.binds(), 1);

        site.set_member(&mut label, String::from("c")).unwrap();
        assert_eq!(site.binds(), 2);

        assert_eq!(dummy.text, "b");
        assert_eq!(label.text, "c");
        assert_eq!(label.id, 3);
    }

    #[test]
    fn failed_bind_leaves_site_unbound() {
        let mut site = CallSite::<u64>::new("text");
        let mut dummy = Dummy::new();
        let err = site.set_member(&mut dummy, 1).unwrap_err();
        assert!(matches!(err, AccessorError::PropertyType { .. }));
        assert_eq!(site.binds(), 0);
    }
}
