//! Request dispatch: route selection plus the five behaviors behind it.

pub mod files;
pub mod router;

use crate::config::Config;
use crate::http::request::Request;
use crate::http::response::Response;

pub use router::{Route, route};

/// Runs the handler selected for `req`.
///
/// Only uploads touch external state; every other route is read-only.
pub async fn handle(req: &Request, cfg: &Config) -> Response {
    let route = route(&req.method, &req.path);
    tracing::debug!(method = req.method.as_str(), path = %req.path, ?route, "dispatching");

    match route {
        Route::Root => Response::ok(""),
        Route::Echo(text) => Response::ok(text),
        Route::UserAgent => Response::ok(req.user_agent().unwrap_or_default()),
        Route::Download(name) => files::download(cfg, name).await,
        Route::Upload(name) => files::upload(cfg, name, &req.body).await,
        Route::NotFound => Response::not_found(),
    }
}
