pub mod activity;
pub mod case;
pub mod error;
pub mod evidence;
pub mod role;
pub mod user;

pub use activity::*;
pub use case::*;
pub use error::*;
pub use evidence::*;
pub use role::*;
pub use user::*;
