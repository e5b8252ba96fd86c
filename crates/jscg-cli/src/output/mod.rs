//! Output writers for call graph and flow graph results

pub mod json;
pub mod pretty;
