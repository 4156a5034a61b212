//! Accessors assembled at runtime from reflected metadata.
//!
//! Each accessor resolves its member and performs its type checks once, when
//! it is compiled. What remains per call is at most a receiver cast check and a
//! single store:
//!
//! - [`CompiledSetter`]: `|target, value| (target as T).member = value`
//! - [`CompiledLambda`]: `|value| instance.member = value`
//! - [`CompiledFactory`]: `|target: &mut T| |value| target.member = value`

use core::fmt;
use core::marker::PhantomData;

use facet::{Facet, Shape};

use crate::property::{PropertyInfo, assign};
use crate::{AccessorError, Dynamic};

/// Which of the three compiled forms an accessor takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetterForm {
    /// Takes the receiver as an argument on every call.
    Setter,
    /// Closes over one receiver.
    Lambda,
    /// Takes a receiver once and returns a lambda bound to it.
    Factory,
}

/// Printable form of a compiled accessor.
#[derive(Debug, Clone, Copy)]
pub struct SetterExpr {
    /// The accessor's form.
    pub form: SetterForm,
    /// The receiver type.
    pub receiver: &'static Shape,
    /// The assigned member.
    pub member: &'static str,
    /// The assigned value's type.
    pub value: &'static Shape,
}

impl SetterExpr {
    fn new<V: Facet<'static>>(form: SetterForm, info: &PropertyInfo) -> Self {
        Self {
            form,
            receiver: info.owner(),
            member: info.name(),
            value: V::SHAPE,
        }
    }
}

impl fmt::Display for SetterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            receiver,
            member,
            value,
            ..
        } = self;
        match self.form {
            SetterForm::Setter => write!(
                f,
                "|target: &mut dyn Dynamic, value: {value}| (target as &mut {receiver}).{member} = value"
            ),
            SetterForm::Lambda => {
                write!(f, "|value: {value}| <&mut {receiver}>.{member} = value")
            }
            SetterForm::Factory => write!(
                f,
                "|target: &mut {receiver}| move |value: {value}| target.{member} = value"
            ),
        }
    }
}

/// A setter taking an untyped receiver on every call.
#[derive(Debug)]
pub struct CompiledSetter<V> {
    expr: SetterExpr,
    offset: usize,
    _value: PhantomData<fn(V)>,
}

impl<V: Facet<'static>> CompiledSetter<V> {
    /// Compiles `(receiver).name = value` for receivers of shape `receiver`.
    pub fn compile(receiver: &'static Shape, name: &str) -> Result<Self, AccessorError> {
        let info = PropertyInfo::lookup(receiver, name)?;
        info.expect_value::<V>()?;
        Ok(Self {
            expr: SetterExpr::new::<V>(SetterForm::Setter, &info),
            offset: info.offset(),
            _value: PhantomData,
        })
    }

    /// What this setter does.
    pub fn expr(&self) -> SetterExpr {
        self.expr
    }

    /// Casts `target` to the compiled receiver type and assigns `value`.
    #[inline]
    pub fn set(&self, target: &mut dyn Dynamic, value: V) -> Result<(), AccessorError> {
        let actual = target.shape();
        if actual != self.expr.receiver {
            return Err(AccessorError::WrongTarget {
                expected: self.expr.receiver,
                actual,
            });
        }

        // SAFETY: `target` has the receiver shape this setter was compiled
        // against, whose field at `offset` holds a `V`.
        unsafe { assign(target.as_mut_ptr(), self.offset, value) };
        Ok(())
    }
}

/// A setter bound to one instance for as long as `'a`.
pub struct CompiledLambda<'a, V> {
    expr: SetterExpr,
    slot: *mut V,
    _target: PhantomData<&'a mut ()>,
}

impl<V> fmt::Debug for CompiledLambda<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledLambda")
            .field("expr", &self.expr)
            .finish_non_exhaustive()
    }
}

impl<'a, V: Facet<'static>> CompiledLambda<'a, V> {
    /// Compiles `value => target.name = value` with `target` baked in.
    pub fn compile(target: &'a mut dyn Dynamic, name: &str) -> Result<Self, AccessorError> {
        let info = PropertyInfo::lookup(target.shape(), name)?;
        info.expect_value::<V>()?;
        // SAFETY: just looked up on `target`'s own shape.
        Ok(unsafe { Self::bind_unchecked(target, SetterForm::Lambda, &info) })
    }

    /// # Safety
    ///
    /// `info` must have been resolved against `target`'s shape and checked to
    /// hold a `V`.
    unsafe fn bind_unchecked(
        target: &'a mut dyn Dynamic,
        form: SetterForm,
        info: &PropertyInfo,
    ) -> Self {
        let base = target.as_mut_ptr();
        Self {
            expr: SetterExpr::new::<V>(form, info),
            // SAFETY: `offset` is within the receiver.
            slot: unsafe { base.add(info.offset()).cast::<V>() },
            _target: PhantomData,
        }
    }

    /// What this lambda does.
    pub fn expr(&self) -> SetterExpr {
        self.expr
    }

    /// Assigns `value` to the bound field.
    #[inline(always)]
    pub fn set(&mut self, value: V) {
        // SAFETY: `slot` points at a `V` inside a receiver we hold exclusively
        // for `'a`.
        unsafe { assign(self.slot.cast::<u8>(), 0, value) }
    }
}

/// Produces per-instance [`CompiledLambda`]s for one receiver type.
#[derive(Debug)]
pub struct CompiledFactory<V> {
    expr: SetterExpr,
    info: PropertyInfo,
    _value: PhantomData<fn(V)>,
}

impl<V: Facet<'static>> CompiledFactory<V> {
    /// Compiles `target => value => target.name = value` for receivers of
    /// shape `receiver`.
    pub fn compile(receiver: &'static Shape, name: &str) -> Result<Self, AccessorError> {
        let info = PropertyInfo::lookup(receiver, name)?;
        info.expect_value::<V>()?;
        Ok(Self {
            expr: SetterExpr::new::<V>(SetterForm::Factory, &info),
            info,
            _value: PhantomData,
        })
    }

    /// What this factory does.
    pub fn expr(&self) -> SetterExpr {
        self.expr
    }

    /// Invokes the factory with `target`, checking it is of the compiled
    /// receiver type.
    pub fn bind<'a>(
        &self,
        target: &'a mut dyn Dynamic,
    ) -> Result<CompiledLambda<'a, V>, AccessorError> {
        self.info.expect_receiver(target)?;
        // SAFETY: receiver checked above, value type checked at compile time.
        Ok(unsafe { CompiledLambda::bind_unchecked(target, SetterForm::Factory, &self.info) })
    }
}
