use crate::http::request::Method;

/// The handler selected for a request, borrowing any path remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Echo(&'a str),
    UserAgent,
    Download(&'a str),
    Upload(&'a str),
    NotFound,
}

const ECHO_PREFIX: &str = "/echo/";
const FILES_PREFIX: &str = "/files/";

/// Maps a method and path to a route. Rules are tried in order and
/// matching is case-sensitive.
pub fn route<'a>(method: &Method, path: &'a str) -> Route<'a> {
    if path == "/" {
        return Route::Root;
    }

    if let Some(text) = path.strip_prefix(ECHO_PREFIX) {
        return Route::Echo(text);
    }

    if path == "/user-agent" {
        return Route::UserAgent;
    }

    if let Some(name) = path.strip_prefix(FILES_PREFIX) {
        return match method {
            Method::POST => Route::Upload(name),
            _ => Route::Download(name),
        };
    }

    Route::NotFound
}
