//! Authentication: session tokens, refresh and the login redirect

mod redirect;
mod refresh;
mod session;
mod token;

pub use redirect::LOGIN_ROUTE;
pub use redirect::LoginRedirect;
pub use redirect::NoRedirect;
pub use refresh::REFRESH_PATH;
pub use refresh::RefreshEndpoint;
pub use session::Session;
pub use token::IssuedTokens;
pub use token::SessionTokens;
pub use token::TokenRefresher;
