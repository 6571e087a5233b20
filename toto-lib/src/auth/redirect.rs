//! Login redirect on unrecoverable authentication failure.

use std::sync::Arc;

/// Route the user is sent to when the session ends.
pub const LOGIN_ROUTE: &str = "/login";

/// Navigation side effect fired when the session cannot be recovered.
///
/// A web front end would hard-redirect to the route; a terminal front end
/// prints a sign-in hint. The client fires it at most once per signed-in
/// session.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self, route: &str);
}

/// A redirect that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedirect;

impl LoginRedirect for NoRedirect {
    fn redirect_to_login(&self, _route: &str) {}
}

impl<T: LoginRedirect + ?Sized> LoginRedirect for Arc<T> {
    fn redirect_to_login(&self, route: &str) {
        (**self).redirect_to_login(route)
    }
}
