//! Feature series and result types

pub mod result;
