pub mod access_keys;
pub mod error;
pub mod report;

pub use access_keys::{AccessKeyEntry, AccessKeysClient, Credentials};
pub use error::{Error, Result};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
