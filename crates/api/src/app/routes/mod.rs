//! Endpoints that are not generated from the resource route table.

pub mod system;
