//! Regdesk - Terminal client for an event registrations REST collection
//!
//! This library exports the core modules for testing and potential reuse.

pub mod api;
pub mod app;
pub mod config;
pub mod form;
pub mod logging;
pub mod models;
pub mod report;
pub mod ui;
pub mod view;
pub mod worker;
