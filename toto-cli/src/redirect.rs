//! Terminal stand-in for the login redirect.

use toto_lib::auth::LoginRedirect;

/// Prints a sign-in hint instead of navigating.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRedirect;

impl LoginRedirect for TerminalRedirect {
    fn redirect_to_login(&self, route: &str) {
        log::info!("session ended, redirecting to {}", route);
        eprintln!("Your session has ended. Sign in again with `toto-admin login --access <TOKEN> --refresh <TOKEN>`.");
    }
}
