//! HTTP API for mhrd-daemon

pub mod rest;

pub use rest::router::create_router;
