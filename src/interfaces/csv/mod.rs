pub mod identity_reader;
pub mod payload_writer;
