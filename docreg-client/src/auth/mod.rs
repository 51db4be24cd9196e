//! Authentication

mod store;
mod token;

pub use store::MemoryTokenStore;
pub use store::TokenStore;
pub use token::AccessToken;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
