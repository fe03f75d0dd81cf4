//! Command dispatch.
//!
//! Clients send one JSON object per command:
//!
//! ```json
//! {"type":"delete_object","params":{"id":"9c1f…"}}
//! ```
//!
//! The [`Dispatcher`] looks the `type` up in an [`OperationRegistry`], runs
//! the operation on the executor, and answers with exactly one envelope:
//!
//! ```json
//! {"status":"error","message":"Object with ID 9c1f… not found"}
//! ```

mod dispatcher;
mod errors;
mod registry;

pub use self::dispatcher::Dispatcher;
pub use self::errors::OperationError;
pub use self::registry::{Operation, OperationRegistry};

const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
