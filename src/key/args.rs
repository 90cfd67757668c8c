//! Call Arguments Module
//!
//! Collects the positional and keyword arguments of a call and renders each
//! one into a structural key component.

use std::any::type_name;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::key::value::{to_key_value, KeyValue};

// == Arg Component ==
/// One argument as it takes part in a call key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgComponent {
    /// Runtime type of the argument
    pub type_name: &'static str,
    /// Structural rendering of the value
    pub value: KeyValue,
}

/// A rendered argument, or the reason it could not be rendered.
pub(crate) type Rendered = std::result::Result<ArgComponent, String>;

fn render<T: Serialize + ?Sized>(value: &T) -> Rendered {
    to_key_value(value)
        .map(|value| ArgComponent {
            type_name: type_name::<T>(),
            value,
        })
        .map_err(|e| e.to_string())
}

// == Call Args ==
/// The arguments of a single call, built up one argument at a time.
///
/// Building never fails; rendering problems are kept and reported when the
/// key is derived, together with the argument they belong to.
///
/// # Example
/// ```
/// use memo_cache::CallArgs;
///
/// let args = CallArgs::new().arg(&1).arg("two").kwarg("scale", &3.5);
/// assert_eq!(args.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Rendered>,
    keyword: BTreeMap<String, Rendered>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    // == Positional ==
    /// Appends the next positional argument.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.positional.push(render(value));
        self
    }

    // == Keyword ==
    /// Sets a keyword argument. Passing the same name twice keeps the last value.
    pub fn kwarg<T: Serialize + ?Sized>(mut self, name: impl Into<String>, value: &T) -> Self {
        self.keyword.insert(name.into(), render(value));
        self
    }

    /// Total number of positional and keyword arguments.
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn positional(&self) -> &[Rendered] {
        &self.positional
    }

    /// Keyword arguments in ascending name order.
    pub(crate) fn keyword(&self) -> impl Iterator<Item = (&String, &Rendered)> {
        self.keyword.iter()
    }
}

// == To Call Args ==
/// Converts a typed argument bundle into [`CallArgs`].
///
/// Implemented for `()` and tuples of up to six `Serialize` elements, each
/// element becoming one positional argument. Parameter structs can implement
/// it by hand to pass their fields as keyword arguments.
pub trait ToCallArgs {
    fn to_call_args(&self) -> CallArgs;
}

impl ToCallArgs for () {
    fn to_call_args(&self) -> CallArgs {
        CallArgs::new()
    }
}

macro_rules! tuple_to_call_args {
    ($($T:ident . $idx:tt),+) => {
        impl<$($T: Serialize),+> ToCallArgs for ($($T,)+) {
            fn to_call_args(&self) -> CallArgs {
                CallArgs::new()$(.arg(&self.$idx))+
            }
        }
    };
}

tuple_to_call_args!(A.0);
tuple_to_call_args!(A.0, B.1);
tuple_to_call_args!(A.0, B.1, C.2);
tuple_to_call_args!(A.0, B.1, C.2, D.3);
tuple_to_call_args!(A.0, B.1, C.2, D.3, E.4);
tuple_to_call_args!(A.0, B.1, C.2, D.3, E.4, F.5);
