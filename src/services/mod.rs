// Good News client services
// Services talk to the backend and to client-local storage: transport, typed API, theme, settings, read marking.

pub mod feed_api;
pub mod http_client;
pub mod local_store;
pub mod read_tracker;
pub mod settings_engine;
pub mod theme_store;
