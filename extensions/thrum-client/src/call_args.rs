use crate::BindError;
use thrum::payload::{Payload, Value};
use thrum_service::MethodDescriptor;

/// Arguments of one call, before they are bound to a request schema.
///
/// Positional arguments fill the request fields in ascending id order;
/// named arguments fill the rest. Every field may be bound at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        values.into_iter().collect()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the request payload of `method` from these arguments.
    pub fn bind(self, method: &MethodDescriptor) -> Result<Payload, BindError> {
        let schema = method.args;
        let fields = schema.fields();

        if self.positional.len() > fields.len() {
            return Err(BindError::TooManyArguments {
                method: method.name,
                expected: fields.len(),
                given: self.positional.len(),
            });
        }

        let mut request = Payload::new(schema);

        for (spec, value) in fields.iter().zip(self.positional) {
            request.set(spec.name, value)?;
        }

        for (name, value) in self.named {
            if schema.field_by_name(&name).is_none() {
                return Err(BindError::UnknownArgument {
                    method: method.name,
                    name,
                });
            }
            if request.is_set(&name) {
                return Err(BindError::DuplicateArgument {
                    method: method.name,
                    name,
                });
            }
            request.set(&name, value)?;
        }

        Ok(request)
    }
}

impl<V: Into<Value>> FromIterator<V> for CallArgs {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }
}
