#![forbid(unsafe_code)]

//! Asset Hunter terminal dashboard.
//!
//! An Elm-style [`app::AppModel`] drives a single dashboard screen on top of
//! [`asset_hunter_core::DashboardState`]. Scans run as background tasks and
//! report back through [`app::AppMsg::ScanFinished`].

pub mod app;
pub mod chrome;
pub mod cli;
pub mod logging;
pub mod screens;
pub mod theme;
pub mod widgets;
