//! Outer surfaces feeding the encoder: CSV batch input and output.

pub mod csv;
