//! Test suites for the command server.

mod lifecycle_behaviour;
mod support;
