#![forbid(unsafe_code)]

//! Dynamic argument values and same-value equality.
//!
//! Bound arguments are compared to decide whether a cached bound callback can
//! be reused. The comparison is *same-value* equality:
//!
//! - primitives (`bool`, integers, strings) compare by value;
//! - floats compare by value except that `NaN` equals `NaN` and `+0.0` does
//!   not equal `-0.0`;
//! - objects and functions compare by identity. Two objects with the same
//!   contents but different allocations are different arguments.
//!
//! Values of different variants are never equal, so `Int(1)` and
//! `Float(1.0)` produce distinct bound callbacks.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::callback::Callback;

/// Same-value equality.
///
/// Unlike [`PartialEq`] for floats this relation is reflexive for every
/// value, which makes it usable as a cache-key comparison.
pub trait SameValue {
    fn same_value(&self, other: &Self) -> bool;
}

impl SameValue for f64 {
    fn same_value(&self, other: &Self) -> bool {
        if self.is_nan() {
            return other.is_nan();
        }
        self.to_bits() == other.to_bits()
    }
}

impl SameValue for Arg {
    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.same_value(b),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (Self::Func(a), Self::Func(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<T: SameValue> SameValue for [T] {
    fn same_value(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same_value(b))
    }
}

/// An argument passed to, or bound into, a [`Callback`].
#[derive(Clone, Default)]
pub enum Arg {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// Opaque host value, compared by identity.
    Object(Rc<dyn Any>),
    /// A function value, compared by identity.
    Func(Callback),
}

impl Arg {
    /// Wrap a value in a fresh object identity.
    ///
    /// Every call allocates, so two calls with equal values yield arguments
    /// that are *not* same-value equal. Clone the returned `Arg` to reuse the
    /// identity.
    #[must_use]
    pub fn object<T: Any>(value: T) -> Self {
        Self::Object(Rc::new(value))
    }

    /// Variant name, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Object(_) => "object",
            Self::Func(_) => "function",
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as a float. Integers are widened.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(&**s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Self::Func(cb) => Some(cb),
            _ => None,
        }
    }

    /// Borrow an object argument as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(obj) => obj.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Whether the value can be invoked.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Func(_))
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(&&**s).finish(),
            Self::Object(obj) => write!(f, "Object({:p})", Rc::as_ptr(obj) as *const ()),
            Self::Func(cb) => f.debug_tuple("Func").field(cb).finish(),
        }
    }
}

/// `PartialEq` is same-value equality, so `Arg` can be used directly in
/// assertions and `Vec<Arg>` comparisons.
impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

impl Eq for Arg {}

macro_rules! arg_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

arg_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Self::Str(Rc::from(value))
    }
}

impl From<Rc<str>> for Arg {
    fn from(value: Rc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<Callback> for Arg {
    fn from(value: Callback) -> Self {
        Self::Func(value)
    }
}

impl From<&Callback> for Arg {
    fn from(value: &Callback) -> Self {
        Self::Func(value.clone())
    }
}

impl From<()> for Arg {
    fn from((): ()) -> Self {
        Self::Null
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

/// A fixed-length list of leading arguments.
///
/// Implemented for tuples of up to nine values convertible into [`Arg`], for
/// arrays and `Vec`s of `Arg`, and for `()` (no leading arguments).
pub trait IntoArgs {
    fn into_args(self) -> Vec<Arg>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

impl IntoArgs for Vec<Arg> {
    fn into_args(self) -> Vec<Arg> {
        self
    }
}

impl<const N: usize> IntoArgs for [Arg; N] {
    fn into_args(self) -> Vec<Arg> {
        self.into()
    }
}

macro_rules! tuple_into_args {
    ($($name:ident),+) => {
        impl<$($name: Into<Arg>),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Arg> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_into_args!(A0);
tuple_into_args!(A0, A1);
tuple_into_args!(A0, A1, A2);
tuple_into_args!(A0, A1, A2, A3);
tuple_into_args!(A0, A1, A2, A3, A4);
tuple_into_args!(A0, A1, A2, A3, A4, A5);
tuple_into_args!(A0, A1, A2, A3, A4, A5, A6);
tuple_into_args!(A0, A1, A2, A3, A4, A5, A6, A7);
tuple_into_args!(A0, A1, A2, A3, A4, A5, A6, A7, A8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_equals_itself() {
        assert!(f64::NAN.same_value(&f64::NAN));
        assert!(Arg::Float(f64::NAN).same_value(&Arg::Float(-f64::NAN)));
        assert_eq!(Arg::from(f64::NAN), Arg::from(f64::NAN));
    }

    #[test]
    fn signed_zeros_differ() {
        assert!(!0.0f64.same_value(&-0.0));
        assert_ne!(Arg::from(0.0), Arg::from(-0.0));
        assert_eq!(Arg::from(-0.0), Arg::from(-0.0));
    }

    #[test]
    fn variants_never_cross_compare() {
        assert_ne!(Arg::from(1), Arg::from(1.0));
        assert_ne!(Arg::Null, Arg::Undefined);
        assert_ne!(Arg::from("1"), Arg::from(1));
    }

    #[test]
    fn strings_compare_by_content() {
        let owned = String::from("hello");
        assert_eq!(Arg::from("hello"), Arg::from(owned));
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Arg::object(vec![1, 2, 3]);
        let b = Arg::object(vec![1, 2, 3]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.downcast_ref::<Vec<i32>>(), Some(&vec![1, 2, 3]));
        assert_eq!(a.downcast_ref::<String>(), None);
    }

    #[test]
    fn functions_compare_by_identity() {
        let cb = Callback::new(|_| {});
        let twin = Callback::new(|_| {});
        assert_eq!(Arg::from(&cb), Arg::from(cb.clone()));
        assert_ne!(Arg::from(&cb), Arg::from(&twin));
        assert!(Arg::from(&cb).is_callable());
    }

    #[test]
    fn slices_require_equal_length() {
        let a = [Arg::from(1), Arg::from(2)];
        let b = [Arg::from(1)];
        assert!(!a[..].same_value(&b[..]));
        assert!(a[..].same_value(&a.clone()[..]));
        assert!(<[Arg]>::same_value(&[], &[]));
    }

    #[test]
    fn option_and_unit_conversions() {
        assert_eq!(Arg::from(None::<i32>), Arg::Undefined);
        assert_eq!(Arg::from(Some(3)), Arg::Int(3));
        assert_eq!(Arg::from(()), Arg::Null);
    }

    #[test]
    fn accessors() {
        assert_eq!(Arg::from(true).as_bool(), Some(true));
        assert_eq!(Arg::from(7u8).as_int(), Some(7));
        assert_eq!(Arg::from(7).as_float(), Some(7.0));
        assert_eq!(Arg::from("x").as_str(), Some("x"));
        assert!(Arg::from(1).as_callback().is_none());
        assert_eq!(Arg::default().kind_name(), "undefined");
    }

    #[test]
    fn tuples_expand_in_order() {
        let args = ("x", 5, true).into_args();
        assert_eq!(args, vec![Arg::from("x"), Arg::from(5), Arg::from(true)]);
        assert!(().into_args().is_empty());
        let nine = (1, 2, 3, 4, 5, 6, 7, 8, 9).into_args();
        assert_eq!(nine.len(), 9);
        assert_eq!(nine[8], Arg::Int(9));
    }

    #[test]
    fn debug_is_readable() {
        assert_eq!(format!("{:?}", Arg::from("a")), "Str(\"a\")");
        assert_eq!(format!("{:?}", Arg::from(2)), "Int(2)");
        assert!(format!("{:?}", Arg::object(1u8)).starts_with("Object(0x"));
    }
}
