//! Auth-domain identifiers, token models, and the role check.

pub mod id;
pub mod introspection;
pub mod role;
pub mod token;
pub mod user;

pub use id::*;
pub use introspection::*;
pub use role::*;
pub use token::{pair::*, secret::*};
pub use user::*;
