//! nipdex library exports

pub mod catalog;
