//! Session commands

use dealflow_core::ResourceKey;
use tracing::info;

use crate::context::AppContext;

/// Store the bearer token for subsequent requests.
pub fn sign_in(ctx: &AppContext, token: &str) {
    ctx.session.sign_in(token);
    info!(authenticated = ctx.session.is_authenticated(), "session updated");
}

/// Forget the token and mark every cached snapshot stale.
pub fn sign_out(ctx: &AppContext) {
    ctx.session.sign_out();
    ctx.cache.invalidate_many(&ResourceKey::ALL);
    info!("signed out");
}

pub fn is_authenticated(ctx: &AppContext) -> bool {
    ctx.session.is_authenticated()
}
