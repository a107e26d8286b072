//! The FerryMail API server.
//!
//! Library surface used by the `fm_server` binary and by the integration
//! tests: the [`api`] router and state, [`config`] loading, [`logging`]
//! setup, and [`metrics`] export.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
