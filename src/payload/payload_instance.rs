use super::{FieldSpec, PayloadError, PayloadSchema, Value, ValueTypeError, payload_codec};
use crate::constants::MAXIMUM_READ_DEPTH;
use crate::protocol::{InputProtocol, OutputProtocol, ProtocolError};
use std::collections::BTreeMap;
use std::fmt;

/// A mutable record conforming to a [`PayloadSchema`].
///
/// Fields that were never set are absent rather than zero-valued: absence
/// means "not sent" on the write side and "not received" on the read side.
/// Instances are built right before a write or right after a read and are
/// not reused across calls.
#[derive(Clone)]
pub struct Payload {
    schema: &'static PayloadSchema,
    values: BTreeMap<i16, Value>, // Keyed by field id, so iteration follows schema order
}

impl Payload {
    /// Creates an instance with every field absent.
    pub fn new(schema: &'static PayloadSchema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    pub fn schema(&self) -> &'static PayloadSchema {
        self.schema
    }

    fn spec(&self, name: &str) -> Result<&'static FieldSpec, PayloadError> {
        self.schema
            .field_by_name(name)
            .ok_or_else(|| PayloadError::UnknownField {
                schema: self.schema.name,
                field: name.to_string(),
            })
    }

    /// Sets a field by name, returning the value it replaced.
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, PayloadError> {
        let spec = self.spec(name)?;
        let value = value.into();

        if !spec.ty.accepts(&value) {
            return Err(PayloadError::TypeMismatch {
                schema: self.schema.name,
                field: spec.name,
                expected: format!("{:?}", spec.ty),
                found: value.ttype(),
            });
        }

        Ok(self.values.insert(spec.id, value))
    }

    /// Stores a value under a field id the caller knows to be declared with a
    /// matching type.
    pub(crate) fn insert(&mut self, id: i16, value: Value) {
        debug_assert!(
            self.schema
                .field(id)
                .is_some_and(|spec| spec.ty.accepts(&value))
        );
        self.values.insert(id, value);
    }

    /// Builder form of [`Payload::set`].
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, PayloadError> {
        self.set(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let spec = self.schema.field_by_name(name)?;
        self.values.get(&spec.id)
    }

    pub fn get_by_id(&self, id: i16) -> Option<&Value> {
        self.values.get(&id)
    }

    /// Reads a present field as a concrete Rust type.
    pub fn require<T>(&self, name: &str) -> Result<T, PayloadError>
    where
        T: TryFrom<Value, Error = ValueTypeError>,
    {
        let spec = self.spec(name)?;
        let value = self
            .values
            .get(&spec.id)
            .cloned()
            .ok_or(PayloadError::MissingField {
                schema: self.schema.name,
                field: spec.name,
            })?;

        T::try_from(value).map_err(|source| PayloadError::Value {
            schema: self.schema.name,
            field: spec.name,
            source,
        })
    }

    /// Removes a field and hands back its value.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let spec = self.schema.field_by_name(name)?;
        self.values.remove(&spec.id)
    }

    pub fn unset(&mut self, name: &str) -> bool {
        self.take(name).is_some()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Present fields in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &Value)> {
        let schema = self.schema;
        self.values
            .iter()
            .filter_map(move |(id, value)| schema.field(*id).map(|spec| (spec, value)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Populates this instance from the stream, guided by its own schema.
    ///
    /// Fields the schema does not know, and fields whose wire type disagrees
    /// with the schema, are skipped.
    ///
    /// Nesting deeper than [`MAXIMUM_READ_DEPTH`] fails with
    /// [`ProtocolError::DepthLimit`].
    pub fn read<P>(&mut self, iprot: &mut P) -> Result<(), ProtocolError>
    where
        P: InputProtocol + ?Sized,
    {
        self.read_till_depth(iprot, MAXIMUM_READ_DEPTH)
    }

    pub(super) fn read_till_depth<P>(
        &mut self,
        iprot: &mut P,
        depth: usize,
    ) -> Result<(), ProtocolError>
    where
        P: InputProtocol + ?Sized,
    {
        if depth == 0 {
            return Err(ProtocolError::DepthLimit);
        }

        iprot.read_struct_begin()?;

        loop {
            let field = iprot.read_field_begin()?;
            if field.is_stop() {
                break;
            }

            let spec = field
                .id
                .and_then(|id| self.schema.field(id))
                .filter(|spec| spec.ty.ttype() == field.field_type);

            match spec {
                Some(spec) => {
                    let value = payload_codec::read_value(iprot, &spec.ty, depth - 1)?;
                    self.values.insert(spec.id, value);
                }
                None => {
                    tracing::trace!(
                        "Skipping field {:?} ({}) not described by `{}`",
                        field.id,
                        field.field_type,
                        self.schema.name
                    );
                    iprot.skip(field.field_type)?;
                }
            }

            iprot.read_field_end()?;
        }

        iprot.read_struct_end()
    }

    /// Serializes the present fields only. Absent fields are omitted.
    pub fn write<P>(&self, oprot: &mut P) -> Result<(), ProtocolError>
    where
        P: OutputProtocol + ?Sized,
    {
        oprot.write_struct_begin(self.schema.name)?;

        for (spec, value) in self.iter() {
            oprot.write_field_begin(&crate::protocol::FieldIdentifier::new(
                spec.name,
                spec.ty.ttype(),
                spec.id,
            ))?;
            payload_codec::write_value(oprot, &spec.ty, value)?;
            oprot.write_field_end()?;
        }

        oprot.write_field_stop()?;
        oprot.write_struct_end()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.schema.is(other.schema) && self.values == other.values
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name)?;
        for (i, (spec, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", spec.name, value)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
