pub mod extractors;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use extractors::{AuthRequired, RoleRequired};
pub use jwt::Claims;
