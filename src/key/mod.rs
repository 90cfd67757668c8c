//! Key Module
//!
//! Turns a function identity plus its call arguments into a deterministic
//! cache key.
//!
//! Argument values are rendered through `serde` into a structural
//! [`KeyValue`] tree, so two calls share a key when their arguments serialize
//! identically. Values whose serialized form leaves out part of their
//! identity can produce false hits; pick argument types whose `Serialize`
//! output fully describes them.

mod args;
mod deriver;
mod value;

pub use args::{ArgComponent, CallArgs, ToCallArgs};
pub use deriver::{CallKey, FnId, KeyDeriver};
pub use value::{to_key_value, KeyValue, RenderError};
