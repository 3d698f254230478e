use crate::method_id_hash;
use thrum::payload::{Payload, PayloadSchema};

/// Everything a dispatcher needs to know about one service method.
#[derive(Debug, Clone, Copy)]
pub struct MethodDescriptor {
    pub name: &'static str,

    /// Ordered parameter list of the call.
    pub args: &'static PayloadSchema,

    /// Success slot (absent for void methods) plus declared-exception slots.
    pub result: &'static PayloadSchema,
}

impl MethodDescriptor {
    pub const fn new(
        name: &'static str,
        args: &'static PayloadSchema,
        result: &'static PayloadSchema,
    ) -> Self {
        Self { name, args, result }
    }

    /// Hash of the method name, as produced by `thrum_method_id!`.
    pub const fn id(&self) -> u64 {
        method_id_hash(self.name)
    }

    /// Void methods have no success slot.
    pub fn is_void(&self) -> bool {
        self.result.success_slot().is_none()
    }

    pub fn new_args(&self) -> Payload {
        Payload::new(self.args)
    }

    pub fn new_result(&self) -> Payload {
        Payload::new(self.result)
    }
}
