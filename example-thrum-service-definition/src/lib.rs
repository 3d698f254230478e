//! Generated bindings for:
//!
//! ```thrift
//! exception DivByZero { 1: string message }
//! exception MemoryFull { 1: i32 capacity }
//!
//! service Calc {
//!     i32 add(1: i32 a, 2: i32 b),
//!     i32 div(1: i32 a, 2: i32 b) throws (1: DivByZero divByZero),
//!     void ping(),
//!     void remember(1: i32 value) throws (1: MemoryFull memoryFull),
//!     i32 recall(),
//!     i64 sum(1: list<i32> values),
//! }
//! ```

pub mod calc;
