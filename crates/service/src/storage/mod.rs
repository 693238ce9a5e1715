//! Small file-backed stores used for durable client state.

pub mod json_map_store;
