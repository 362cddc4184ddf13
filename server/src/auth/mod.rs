mod crypto;
mod db;
mod extractor;

pub use crypto::{generate_token, hash_password, hash_token, verify_password};
pub use db::{create_session, delete_session, get_user_from_token};
pub use extractor::{bearer_token, AuthUser};
