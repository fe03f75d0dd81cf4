//! Wire types shared by the sceneport server and its clients.
//!
//! A client sends one JSON object per command:
//!
//! ```json
//! {"type":"create_object","params":{"type":"SPHERE","params":{"radius":5}}}
//! ```
//!
//! and receives one envelope per command:
//!
//! ```json
//! {"status":"success","result":{"id":"…"}}
//! {"status":"error","message":"Unknown command type: bogus"}
//! ```
//!
//! There is no delimiter or length prefix between messages. The
//! [`MessageFramer`] recovers message boundaries by parsing the accumulated
//! bytes as a stream of JSON values.

mod command;
mod errors;
mod framer;
mod response;

pub use command::Command;
pub use errors::ProtocolError;
pub use framer::{MAX_PENDING_BYTES, MessageFramer};
pub use response::Response;
