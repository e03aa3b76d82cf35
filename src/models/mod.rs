//! Data models

mod donor;
mod notification;
mod request;
mod user;

pub use donor::*;
pub use notification::*;
pub use request::*;
pub use user::*;
