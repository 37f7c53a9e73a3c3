//! Edge request interceptor for a multi-locale web application.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod locale;
pub mod observability;
pub mod pipeline;
pub mod routing;
pub mod session;

pub use config::schema::GateConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{Interception, Interceptor, ResponseIntent};
