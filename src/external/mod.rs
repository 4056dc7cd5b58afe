//! Wrappers around external developer tools

pub mod formatters;
