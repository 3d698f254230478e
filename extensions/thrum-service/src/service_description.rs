use crate::{MethodDescriptor, ServiceError, method_id_hash};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thrum::payload::Payload;

/// Immutable, load-time registry of a service's methods.
///
/// Built once from compiler-produced descriptors and then only read, by
/// clients to bind and interpret calls and by processors to decode them.
#[derive(Debug, Clone)]
pub struct ServiceDescription {
    name: String,
    methods: HashMap<u64, MethodDescriptor>,
    order: Vec<u64>, // Declaration order, for listings
}

impl ServiceDescription {
    /// Validates every schema and indexes the methods by id.
    pub fn new(
        name: impl Into<String>,
        methods: impl IntoIterator<Item = MethodDescriptor>,
    ) -> Result<Self, ServiceError> {
        let name = name.into();
        let mut table = HashMap::new();
        let mut order = Vec::new();

        for method in methods {
            let schema_error = |source| ServiceError::Schema {
                service: name.clone(),
                method: method.name,
                source,
            };
            method.args.validate().map_err(schema_error)?;
            method.result.validate_result().map_err(schema_error)?;

            let id = method.id();
            match table.entry(id) {
                Entry::Occupied(existing) => {
                    let existing: &MethodDescriptor = existing.get();
                    return Err(if existing.name == method.name {
                        ServiceError::DuplicateMethod {
                            service: name,
                            method: method.name,
                        }
                    } else {
                        ServiceError::MethodIdCollision {
                            service: name,
                            first: existing.name,
                            second: method.name,
                        }
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(method);
                    order.push(id);
                }
            }
        }

        tracing::debug!("Loaded service `{}` with {} methods", name, order.len());

        Ok(Self {
            name,
            methods: table,
            order,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods
            .get(&method_id_hash(name))
            .filter(|method| method.name == name)
    }

    pub fn method_by_id(&self, id: u64) -> Option<&MethodDescriptor> {
        self.methods.get(&id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Method names in declaration order.
    pub fn method_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().map(|id| self.methods[id].name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.order.iter().map(|id| &self.methods[id])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// A fresh, empty argument payload for `method`.
    pub fn new_args(&self, method: &str) -> Option<Payload> {
        self.method(method).map(MethodDescriptor::new_args)
    }

    /// A fresh, empty result payload for `method`.
    pub fn new_result(&self, method: &str) -> Option<Payload> {
        self.method(method).map(MethodDescriptor::new_result)
    }
}
