pub mod claims;
pub mod errors;
pub mod issuer;

pub use claims::Assertion;
pub use claims::Claims;
pub use errors::TokenError;
pub use issuer::TokenIssuer;
