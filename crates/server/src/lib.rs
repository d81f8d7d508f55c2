//! HTTP server for the vidshelf media gallery.

pub mod api;
pub mod metrics;
pub mod state;
