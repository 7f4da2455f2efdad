pub mod error;
pub mod file_io;
pub mod lattice;
pub mod polynomial;
