// Library interface for logsift
// Log processing and windowing engine for very large CI log streams,
// consumed by a rendering layer that supplies raw lines and configuration

pub mod display;
pub mod error;
pub mod event;
pub mod filter;
pub mod lines;
pub mod search;
pub mod session;
pub mod window;
