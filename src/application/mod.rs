//! Application layer - use cases orchestrating the domain through ports

pub mod deploy;
