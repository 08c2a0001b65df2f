//! Driving adapters translating protocols into domain calls.

pub mod http;
