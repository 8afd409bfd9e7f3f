//! Database query functions, one module per table.

pub mod tasks;
