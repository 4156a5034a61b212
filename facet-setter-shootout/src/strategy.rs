//! The seven ways of setting `Dummy::text` being compared.

use core::fmt;
use core::str::FromStr;

use facet::Facet;

use crate::{
    AccessorError, CallSite, CompiledFactory, CompiledLambda, CompiledSetter, Dummy, Dynamic,
    PropertyInfo, SetterExpr,
};

/// A callable that writes a value into a specific object's named field.
pub type Action<'a, V> = Box<dyn FnMut(V) -> Result<(), AccessorError> + 'a>;

/// An accessor built by one [`Strategy`], ready to be timed.
pub struct Accessor<'a> {
    /// The callable itself.
    pub action: Action<'a, String>,
    /// Printable form, for the compiled strategies.
    pub expr: Option<SetterExpr>,
}

impl fmt::Debug for Accessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("expr", &self.expr)
            .finish_non_exhaustive()
    }
}

/// A way of setting a named property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    /// `value => d.text = value`, written out by hand.
    HardCoded,
    /// Look the property up by name on every call.
    Reflection,
    /// Look the property up once, write reflectively on every call.
    CachedReflection,
    /// Late-bound call site over an untyped receiver.
    Dynamic,
    /// Compiled `(target, value) => target.prop = value`.
    CompiledSetter,
    /// Compiled `value => obj.prop = value` with the instance baked in.
    CompiledLambda,
    /// Compiled `target => value => target.prop = value`, invoked once.
    CompiledFactory,
}

impl Strategy {
    /// Every strategy, in the order the harness runs them.
    pub const ALL: [Strategy; 7] = [
        Strategy::HardCoded,
        Strategy::Reflection,
        Strategy::CachedReflection,
        Strategy::Dynamic,
        Strategy::CompiledSetter,
        Strategy::CompiledLambda,
        Strategy::CompiledFactory,
    ];

    /// Kebab-case name, as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::HardCoded => "hard-coded",
            Strategy::Reflection => "reflection",
            Strategy::CachedReflection => "cached-reflection",
            Strategy::Dynamic => "dynamic",
            Strategy::CompiledSetter => "compiled-setter",
            Strategy::CompiledLambda => "compiled-lambda",
            Strategy::CompiledFactory => "compiled-factory",
        }
    }

    /// 1-based position in [`Strategy::ALL`].
    pub const fn ordinal(self) -> usize {
        self as usize + 1
    }

    /// Builds this strategy's accessor for `property` on `target`.
    ///
    /// [`Strategy::HardCoded`] always writes `text` and ignores `property`.
    pub fn build<'a>(
        self,
        target: &'a mut Dummy,
        property: &'a str,
    ) -> Result<Accessor<'a>, AccessorError> {
        match self {
            Strategy::HardCoded => Ok(Accessor {
                action: Box::new(move |value: String| {
                    target.text = value;
                    Ok(())
                }),
                expr: None,
            }),
            Strategy::Reflection => {
                let target: &'a mut dyn Dynamic = target;
                Ok(Accessor {
                    action: Box::new(move |value: String| {
                        PropertyInfo::lookup(target.shape(), property)?.set_value(target, value)
                    }),
                    expr: None,
                })
            }
            Strategy::CachedReflection => {
                let target: &'a mut dyn Dynamic = target;
                let info = PropertyInfo::lookup(target.shape(), property)?;
                Ok(Accessor {
                    action: Box::new(move |value: String| info.set_value(target, value)),
                    expr: None,
                })
            }
            Strategy::Dynamic => {
                let target: &'a mut dyn Dynamic = target;
                let mut site = CallSite::<String>::new(property);
                Ok(Accessor {
                    action: Box::new(move |value: String| site.set_member(target, value)),
                    expr: None,
                })
            }
            Strategy::CompiledSetter => {
                let target: &'a mut dyn Dynamic = target;
                let setter = CompiledSetter::<String>::compile(Dummy::SHAPE, property)?;
                let expr = setter.expr();
                Ok(Accessor {
                    action: Box::new(move |value: String| setter.set(target, value)),
                    expr: Some(expr),
                })
            }
            Strategy::CompiledLambda => {
                let mut lambda = CompiledLambda::<String>::compile(target, property)?;
                let expr = lambda.expr();
                Ok(Accessor {
                    action: Box::new(move |value: String| {
                        lambda.set(value);
                        Ok(())
                    }),
                    expr: Some(expr),
                })
            }
            Strategy::CompiledFactory => {
                let factory = CompiledFactory::<String>::compile(Dummy::SHAPE, property)?;
                let expr = factory.expr();
                let mut inner = factory.bind(target)?;
                Ok(Accessor {
                    action: Box::new(move |value: String| {
                        inner.set(value);
                        Ok(())
                    }),
                    expr: Some(expr),
                })
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a strategy name isn't recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strategy `{}`, expected one of: ", self.0)?;
        for (i, strategy) in Strategy::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(strategy.name())?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| UnknownStrategy(s.into()))
    }
}
