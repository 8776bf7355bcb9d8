pub mod jwt;
pub mod middleware;

pub use middleware::AuthenticatedUser;
