//! Token secrets and the pair returned by code exchanges.

pub mod pair;
pub mod secret;
