//! Data model module: the TRAPI wire shapes the core ingests and the
//! summary shapes it produces.

pub mod summary;
pub mod trapi;
