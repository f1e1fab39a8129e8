//! Type definitions

pub mod messages;
pub mod order;
pub mod route;
pub mod stop;

pub use messages::*;
pub use order::*;
pub use route::*;
pub use stop::*;
