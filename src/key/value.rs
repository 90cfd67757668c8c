//! Key Value Module
//!
//! Lossless structural rendering of `Serialize` values for use inside call
//! keys. Floats keep their bit pattern, 128-bit integers keep full range and
//! maps may have keys of any serializable type.

use std::fmt;

use serde::ser::{self, Serialize};
use thiserror::Error;

// == Key Value ==
/// Serde data-model tree with structural `Eq`, `Ord` and `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    Unit,
    Bool(bool),
    Int(i128),
    UInt(u128),
    /// `f64` bit pattern; every NaN is stored as the canonical NaN
    Float(u64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    Option(Option<Box<KeyValue>>),
    /// Sequences and tuples
    Seq(Vec<KeyValue>),
    /// Map entries sorted by key
    Map(Vec<(KeyValue, KeyValue)>),
    /// Struct fields in declaration order
    Fields(Vec<(&'static str, KeyValue)>),
    /// Named struct wrapping its unit, newtype, tuple or field content
    Named {
        name: &'static str,
        value: Box<KeyValue>,
    },
    Variant {
        name: &'static str,
        variant: &'static str,
        value: Box<KeyValue>,
    },
}

impl KeyValue {
    fn float(v: f64) -> Self {
        if v.is_nan() {
            KeyValue::Float(f64::NAN.to_bits())
        } else {
            KeyValue::Float(v.to_bits())
        }
    }
}

fn write_list<I, T>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Unit => f.write_str("()"),
            KeyValue::Bool(v) => write!(f, "{}", v),
            KeyValue::Int(v) => write!(f, "{}", v),
            KeyValue::UInt(v) => write!(f, "{}", v),
            KeyValue::Float(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
            KeyValue::Char(v) => write!(f, "{:?}", v),
            KeyValue::Str(v) => write!(f, "{:?}", v),
            KeyValue::Bytes(v) => write!(f, "b{:?}", v),
            KeyValue::Option(None) => f.write_str("None"),
            KeyValue::Option(Some(v)) => write!(f, "Some({})", v),
            KeyValue::Seq(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            KeyValue::Map(entries) => {
                f.write_str("{")?;
                write_list(f, entries.iter().map(|(k, v)| format!("{}: {}", k, v)))?;
                f.write_str("}")
            }
            KeyValue::Fields(fields) => {
                f.write_str("{ ")?;
                write_list(f, fields.iter().map(|(k, v)| format!("{}: {}", k, v)))?;
                f.write_str(" }")
            }
            KeyValue::Named { name, value } => write_wrapped(f, name, value),
            KeyValue::Variant {
                name,
                variant,
                value,
            } => write_wrapped(f, &format!("{}::{}", name, variant), value),
        }
    }
}

fn write_wrapped(f: &mut fmt::Formatter<'_>, label: &str, value: &KeyValue) -> fmt::Result {
    match value {
        KeyValue::Unit => f.write_str(label),
        KeyValue::Fields(_) => write!(f, "{} {}", label, value),
        _ => write!(f, "{}({})", label, value),
    }
}

// == Render Error ==
/// Raised by a `Serialize` impl that refuses to render.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct RenderError(String);

impl ser::Error for RenderError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        RenderError(msg.to_string())
    }
}

// == Render ==
/// Renders `value` into a [`KeyValue`].
pub fn to_key_value<T: Serialize + ?Sized>(value: &T) -> Result<KeyValue, RenderError> {
    value.serialize(ValueSerializer)
}

// == Serializer ==
struct ValueSerializer;

/// How a finished compound is wrapped.
enum Wrap {
    Plain,
    Named(&'static str),
    Variant(&'static str, &'static str),
}

impl Wrap {
    fn finish(self, value: KeyValue) -> KeyValue {
        match self {
            Wrap::Plain => value,
            Wrap::Named(name) => KeyValue::Named {
                name,
                value: Box::new(value),
            },
            Wrap::Variant(name, variant) => KeyValue::Variant {
                name,
                variant,
                value: Box::new(value),
            },
        }
    }
}

struct SeqBuilder {
    items: Vec<KeyValue>,
    wrap: Wrap,
}

impl SeqBuilder {
    fn new(len: Option<usize>, wrap: Wrap) -> Self {
        Self {
            items: Vec::with_capacity(len.unwrap_or(0)),
            wrap,
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RenderError> {
        self.items.push(to_key_value(value)?);
        Ok(())
    }

    fn finish(self) -> KeyValue {
        self.wrap.finish(KeyValue::Seq(self.items))
    }
}

struct MapBuilder {
    entries: Vec<(KeyValue, KeyValue)>,
    pending_key: Option<KeyValue>,
}

struct FieldsBuilder {
    fields: Vec<(&'static str, KeyValue)>,
    wrap: Wrap,
}

impl FieldsBuilder {
    fn push<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), RenderError> {
        self.fields.push((key, to_key_value(value)?));
        Ok(())
    }

    fn finish(self) -> KeyValue {
        self.wrap.finish(KeyValue::Fields(self.fields))
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = KeyValue;
    type Error = RenderError;
    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = SeqBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = FieldsBuilder;
    type SerializeStructVariant = FieldsBuilder;

    fn serialize_bool(self, v: bool) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Int(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::UInt(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::UInt(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::UInt(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::UInt(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::UInt(v))
    }

    fn serialize_f32(self, v: f32) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::float(v))
    }

    fn serialize_char(self, v: char) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Char(v))
    }

    fn serialize_str(self, v: &str) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Option(None))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Option(Some(Box::new(to_key_value(value)?))))
    }

    fn serialize_unit(self) -> Result<KeyValue, RenderError> {
        Ok(KeyValue::Unit)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<KeyValue, RenderError> {
        Ok(Wrap::Named(name).finish(KeyValue::Unit))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<KeyValue, RenderError> {
        Ok(Wrap::Variant(name, variant).finish(KeyValue::Unit))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<KeyValue, RenderError> {
        Ok(Wrap::Named(name).finish(to_key_value(value)?))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<KeyValue, RenderError> {
        Ok(Wrap::Variant(name, variant).finish(to_key_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, RenderError> {
        Ok(SeqBuilder::new(len, Wrap::Plain))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, RenderError> {
        Ok(SeqBuilder::new(Some(len), Wrap::Plain))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, RenderError> {
        Ok(SeqBuilder::new(Some(len), Wrap::Named(name)))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, RenderError> {
        Ok(SeqBuilder::new(Some(len), Wrap::Variant(name, variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, RenderError> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<FieldsBuilder, RenderError> {
        Ok(FieldsBuilder {
            fields: Vec::with_capacity(len),
            wrap: Wrap::Named(name),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<FieldsBuilder, RenderError> {
        Ok(FieldsBuilder {
            fields: Vec::with_capacity(len),
            wrap: Wrap::Variant(name, variant),
        })
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = KeyValue;
    type Error = RenderError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RenderError> {
        self.push(value)
    }

    fn end(self) -> Result<KeyValue, RenderError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = KeyValue;
    type Error = RenderError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RenderError> {
        self.push(value)
    }

    fn end(self) -> Result<KeyValue, RenderError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = KeyValue;
    type Error = RenderError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RenderError> {
        self.push(value)
    }

    fn end(self) -> Result<KeyValue, RenderError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqBuilder {
    type Ok = KeyValue;
    type Error = RenderError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RenderError> {
        self.push(value)
    }

    fn end(self) -> Result<KeyValue, RenderError> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for MapBuilder {
    type Ok = KeyValue;
    type Error = RenderError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), RenderError> {
        self.pending_key = Some(to_key_value(key)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), RenderError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| <RenderError as ser::Error>::custom("map value without a key"))?;
        self.entries.push((key, to_key_value(value)?));
        Ok(())
    }

    fn end(mut self) -> Result<KeyValue, RenderError> {
        // Hash maps iterate in arbitrary order
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(KeyValue::Map(self.entries))
    }
}

impl ser::SerializeStruct for FieldsBuilder {
    type Ok = KeyValue;
    type Error = RenderError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), RenderError> {
        self.push(key, value)
    }

    fn end(self) -> Result<KeyValue, RenderError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for FieldsBuilder {
    type Ok = KeyValue;
    type Error = RenderError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), RenderError> {
        self.push(key, value)
    }

    fn end(self) -> Result<KeyValue, RenderError> {
        Ok(self.finish())
    }
}
