//! Name/value collection toolkit for protocol-style client metadata.
#![warn(missing_debug_implementations)]

mod log;

pub mod collection;
pub mod response;

pub use collection::{NameValueCollection, NameValueMap};
pub use response::{ClientError, StoreResponse};
