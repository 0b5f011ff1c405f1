pub mod auth_token;
pub mod json_body;

pub use auth_token::BearerToken;
pub use json_body::JsonBody;
