// ML proxy API: validates requests, delegates to ml_client, wraps results.
// No handler talks to the ML service directly.

pub mod handlers;
pub mod requests;
