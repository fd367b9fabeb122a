use crate::capability::{Coercible, TypeSet};
use crate::coerce::{coerce, CoerceOptions, Coerced, Input};
use crate::error::{CoercionError, UsageError};
use std::marker::PhantomData;

/// A property setter wrapped with type coercion.
///
/// The wrapper coerces the assigned value to `T` under its options, using the property
/// name as error context, and hands the result to the wrapped setter. The
/// [`type_sensitive!`](crate::type_sensitive) macro generates setters built on it.
#[derive(Debug, Clone)]
pub struct TypeSensitive<T: Coercible> {
    name: String,
    types: TypeSet,
    options: CoerceOptions,
    _target: PhantomData<fn() -> T>,
}

impl<T: Coercible> TypeSensitive<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: TypeSet::of::<T>(),
            options: CoerceOptions::default(),
            _target: PhantomData,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn options(&self) -> CoerceOptions {
        self.options
    }

    /// Replaces the declared types. The first entry must still be `T`.
    #[must_use]
    pub fn with_types(mut self, types: TypeSet) -> Self {
        self.types = types;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: CoerceOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn allow_dict(mut self, allow: bool) -> Self {
        self.options.allow_dict = allow;
        self
    }

    #[must_use]
    pub fn allow_json(mut self, allow: bool) -> Self {
        self.options.allow_json = allow;
        self
    }

    #[must_use]
    pub fn allow_none(mut self, allow: bool) -> Self {
        self.options.allow_none = allow;
        self
    }

    #[must_use]
    pub fn allow_js_literal(mut self, allow: bool) -> Self {
        self.options.allow_js_literal = allow;
        self
    }

    #[must_use]
    pub fn force_iterable(mut self, force: bool) -> Self {
        self.options.force_iterable = force;
        self
    }

    /// Coerces `value` exactly as the wrapped setter would receive it.
    ///
    /// # Errors
    ///
    /// Any error [`coerce`] reports, with this setter's name as context.
    pub fn coerce(&self, value: Input<T>) -> Result<Coerced<T>, CoercionError> {
        coerce(value, &self.types, self.options, Some(&self.name))
    }

    /// Coerces `value` and forwards it to `setter` together with `receiver`.
    ///
    /// # Errors
    ///
    /// Coercion errors, or whatever `setter` itself returns.
    pub fn set<R, F>(
        &self,
        receiver: &mut R,
        value: Input<T>,
        setter: F,
    ) -> Result<(), CoercionError>
    where
        R: ?Sized,
        F: FnOnce(&mut R, Coerced<T>) -> Result<(), CoercionError>,
    {
        let coerced = self.coerce(value)?;
        setter(receiver, coerced)
    }

    /// [`set`](Self::set) for callers holding the setter's positional arguments after the
    /// receiver. The first argument is the value; any further ones are ignored.
    ///
    /// # Errors
    ///
    /// [`UsageError::MissingValueArgument`] when `args` is empty, otherwise as [`set`](Self::set).
    pub fn set_positional<R, F>(
        &self,
        receiver: &mut R,
        args: Vec<Input<T>>,
        setter: F,
    ) -> Result<(), CoercionError>
    where
        R: ?Sized,
        F: FnOnce(&mut R, Coerced<T>) -> Result<(), CoercionError>,
    {
        let value = args
            .into_iter()
            .next()
            .ok_or_else(|| UsageError::MissingValueArgument {
                setter: self.name.clone(),
            })?;
        self.set(receiver, value, setter)
    }
}

/// Generates a setter that coerces its argument before storing it in a `Coerced<T>` field.
///
/// The options block accepts any of `allow_dict`, `allow_json`, `allow_none`,
/// `allow_js_literal`, `force_iterable` and `with_types`.
///
/// ```
/// use chartopt_core::{coercible, type_sensitive, Coerced};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
/// coercible!(Point as "Point": dict, json);
///
/// #[derive(Default)]
/// struct Series {
///     data: Coerced<Point>,
/// }
///
/// impl Series {
///     type_sensitive! {
///         pub fn set_data(&mut self, value) -> data: Point { force_iterable: true }
///     }
/// }
///
/// let mut series = Series::default();
/// series.set_data(serde_json::json!([{ "x": 1, "y": 2 }])).unwrap();
/// assert_eq!(series.data.into_vec().len(), 1);
/// ```
#[macro_export]
macro_rules! type_sensitive {
    (
        $(#[$meta:meta])*
        $vis:vis fn $setter:ident(&mut self, value) -> $field:ident: $ty:ty
        $({ $($option:ident: $setting:expr),* $(,)? })?
    ) => {
        $(#[$meta])*
        $vis fn $setter(
            &mut self,
            value: impl ::core::convert::Into<$crate::Input<$ty>>,
        ) -> ::core::result::Result<(), $crate::CoercionError> {
            $crate::TypeSensitive::<$ty>::new(stringify!($field))
                $($( .$option($setting) )*)?
                .set(self, value.into(), |receiver, coerced| {
                    receiver.$field = coerced;
                    ::core::result::Result::Ok(())
                })
        }
    };
}
