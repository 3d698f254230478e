use xxhash_rust::const_xxh3::xxh3_64 as const_xxh3_64;

pub const fn method_id_hash(name: &str) -> u64 {
    const_xxh3_64(name.as_bytes())
}

/// Compile-time method id generator using xxHash3.
///
/// Computes the same `u64` that [`crate::MethodDescriptor::id`] and the
/// service lookup tables use for a method name, so generated code can embed
/// the id in `const` contexts.
///
/// ## Example
///
/// ```rust,no_run
/// use thrum_service::thrum_method_id;
/// let add = thrum_method_id!("add");
/// let div = thrum_method_id!("div");
/// assert_ne!(add, div);
/// ```
#[macro_export]
macro_rules! thrum_method_id {
    ($name:literal) => {{
        const ID: u64 = $crate::method_id_hash($name);
        ID
    }};
}
