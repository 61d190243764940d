//! autopub-cli - configuration surface and driver glue for the `autopub`
//! binary.

pub mod config;
