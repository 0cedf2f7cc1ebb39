pub mod hashing;
pub mod password;
pub mod token;

pub use hashing::{hash_verification_code, verification_code_matches};
pub use token::{Claims, TokenError, TokenIssuer};
