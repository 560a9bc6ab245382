//! Quote lookup for ShareSansar/NEPSE listed securities.

/// Stock quote module
pub mod quote;
