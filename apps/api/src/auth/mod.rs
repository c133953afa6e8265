// Authentication: bcrypt password hashing, HS256 bearer tokens, and the
// `AuthUser` extractor that protects routes.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod token;
