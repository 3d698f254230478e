use super::{FieldType, SchemaError};
use crate::constants::{SUCCESS_FIELD_ID, SUCCESS_FIELD_NAME};
use std::collections::HashSet;
use std::fmt;

/// One entry of a [`PayloadSchema`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub id: i16,
    pub name: &'static str,
    pub ty: FieldType,

    /// Set for the declared-exception slots of a result schema.
    pub exception: bool,
}

impl FieldSpec {
    pub const fn new(id: i16, name: &'static str, ty: FieldType) -> Self {
        Self {
            id,
            name,
            ty,
            exception: false,
        }
    }

    /// The value slot of a result schema.
    pub const fn success(ty: FieldType) -> Self {
        Self::new(SUCCESS_FIELD_ID, SUCCESS_FIELD_NAME, ty)
    }

    /// A declared-exception slot of a result schema, bound to the exception
    /// kind described by `kind`.
    pub const fn exception(id: i16, name: &'static str, kind: &'static PayloadSchema) -> Self {
        Self {
            id,
            name,
            ty: FieldType::Struct(kind),
            exception: true,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.exception && self.id == SUCCESS_FIELD_ID
    }

    /// The exception kind of an exception slot.
    pub fn exception_kind(&self) -> Option<&'static PayloadSchema> {
        match (self.exception, self.ty) {
            (true, FieldType::Struct(kind)) => Some(kind),
            _ => None,
        }
    }
}

/// Compiler-produced description of a payload's shape.
///
/// Fields are declared in strictly ascending id order, which is also the
/// order used for positional argument binding and for first-match exception
/// dispatch. Schemas live in `static`s and are compared by address: two
/// schemas with the same fields are still different kinds.
pub struct PayloadSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl PayloadSchema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    /// Identity comparison.
    #[inline]
    pub fn is(&self, other: &PayloadSchema) -> bool {
        std::ptr::eq(self, other)
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, id: i16) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn success_slot(&self) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.is_success())
    }

    /// Declared-exception slots in schema order.
    pub fn exception_slots(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|spec| spec.exception)
    }

    /// The first exception slot, in schema order, bound to `kind`.
    pub fn exception_slot_for(&self, kind: &PayloadSchema) -> Option<&'static FieldSpec> {
        self.exception_slots()
            .find(|spec| spec.exception_kind().is_some_and(|k| k.is(kind)))
    }

    /// Checks a request, exception or plain struct schema.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_layout()?;

        if let Some(spec) = self.fields.iter().find(|spec| spec.id == SUCCESS_FIELD_ID) {
            return Err(SchemaError::ReservedFieldId {
                schema: self.name,
                field: spec.name,
            });
        }

        Ok(())
    }

    /// Checks a result schema: an optional success slot at id 0 followed by
    /// declared-exception slots only.
    pub fn validate_result(&self) -> Result<(), SchemaError> {
        self.validate_layout()?;

        for spec in self.fields {
            if spec.exception {
                if spec.id == SUCCESS_FIELD_ID {
                    return Err(SchemaError::ReservedFieldId {
                        schema: self.name,
                        field: spec.name,
                    });
                }
                if spec.exception_kind().is_none() {
                    return Err(SchemaError::ExceptionNotStruct {
                        schema: self.name,
                        field: spec.name,
                    });
                }
            } else if spec.name == SUCCESS_FIELD_NAME {
                if spec.id != SUCCESS_FIELD_ID {
                    return Err(SchemaError::MisplacedSuccess { schema: self.name });
                }
            } else {
                return Err(SchemaError::PlainResultField {
                    schema: self.name,
                    field: spec.name,
                });
            }
        }

        Ok(())
    }

    fn validate_layout(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        let mut previous: Option<i16> = None;

        for spec in self.fields {
            if previous.is_some_and(|prev| spec.id <= prev) || spec.id < 0 {
                return Err(SchemaError::FieldOrder {
                    schema: self.name,
                    id: spec.id,
                });
            }
            if !names.insert(spec.name) {
                return Err(SchemaError::DuplicateFieldName {
                    schema: self.name,
                    field: spec.name,
                });
            }
            previous = Some(spec.id);
        }

        Ok(())
    }
}

impl PartialEq for PayloadSchema {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl fmt::Debug for PayloadSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}
