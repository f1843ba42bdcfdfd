//! Driven adapters: storage and password hashing.

pub mod memory;
pub mod password;
pub mod persistence;
