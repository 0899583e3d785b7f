#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Small building blocks shared by the Kessel client crates.

pub mod humantime_serde;
mod secret_string;

pub use secret_string::SecretString;
