mod http_server;

pub use http_server::{router, serve, AppState, HttpServer, REQUEST_TIMEOUT};
