//! Pure business rules with no I/O.

pub mod codes;
pub mod guard;
