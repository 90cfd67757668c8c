//! Key Deriver Module
//!
//! Builds call keys from a function identity and its arguments.

use std::any::{type_name, TypeId};
use std::fmt;

use tracing::trace;

use crate::error::{MemoError, Result};
use crate::key::{ArgComponent, CallArgs};

// == Function Identity ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Origin {
    Type(TypeId),
    Named,
}

/// Stable identity of a memoized function.
///
/// Every fn item and every closure has its own type, so identifying a function
/// by its `TypeId` keeps same-named functions from different modules apart.
/// Function pointers (`fn(i32) -> i32`) all share one type; give those an
/// explicit name with [`FnId::named`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FnId {
    origin: Origin,
    name: &'static str,
}

impl FnId {
    /// Identity of the function type `F`.
    pub fn of<F: 'static>() -> Self {
        Self {
            origin: Origin::Type(TypeId::of::<F>()),
            name: type_name::<F>(),
        }
    }

    /// Identity of the type of `f`.
    pub fn of_val<F: 'static>(_f: &F) -> Self {
        Self::of::<F>()
    }

    /// Identity given by name alone. Equal names mean the same function.
    pub fn named(name: &'static str) -> Self {
        Self {
            origin: Origin::Named,
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for FnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// == Call Key ==
/// Opaque key identifying one call: function, positional arguments in order,
/// keyword arguments sorted by name.
///
/// Compared and hashed structurally; the [`Display`](fmt::Display) form is for
/// logs only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallKey {
    function: FnId,
    positional: Vec<ArgComponent>,
    keyword: Vec<(String, ArgComponent)>,
}

impl fmt::Display for CallKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.positional.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "#{}:{}={}", i, arg.type_name, arg.value)?;
        }
        if !self.keyword.is_empty() {
            f.write_str("; ")?;
        }
        for (i, (name, arg)) in self.keyword.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}:{}={}", name, arg.type_name, arg.value)?;
        }
        f.write_str(")")
    }
}

// == Key Deriver ==
/// Derives [`CallKey`]s. Pure: equal inputs always give equal keys.
pub struct KeyDeriver;

impl KeyDeriver {
    /// Derives the key for calling `function` with `args`.
    ///
    /// # Errors
    /// Returns `KeyDerivation` naming the first argument (`#<position>` or the
    /// keyword name) whose value could not be rendered.
    pub fn derive(function: &FnId, args: &CallArgs) -> Result<CallKey> {
        let positional = args
            .positional()
            .iter()
            .enumerate()
            .map(|(i, rendered)| {
                rendered.clone().map_err(|reason| MemoError::KeyDerivation {
                    argument: format!("#{}", i),
                    reason,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let keyword = args
            .keyword()
            .map(|(name, rendered)| {
                rendered
                    .clone()
                    .map(|component| (name.clone(), component))
                    .map_err(|reason| MemoError::KeyDerivation {
                        argument: name.clone(),
                        reason,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let key = CallKey {
            function: *function,
            positional,
            keyword,
        };
        trace!("Derived key {}", key);
        Ok(key)
    }
}
