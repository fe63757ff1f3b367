//! # sumo-export - Sumo Logic search job exporter
//!
//! sumo-export pulls every log record in a date range out of Sumo Logic
//! through the asynchronous Search Job API and writes one gzip-compressed
//! NDJSON file per day.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Planning** a date range into contiguous day windows
//! - **Submitting** one search job per window and waiting for its count
//! - **Paging** through the job's results lazily
//! - **Writing** each window to a `YYYY-MM-DD` gzip file
//!
//! Every remote call is retried by an explicit [`core::retry::RetryPolicy`];
//! a shutdown signal interrupts any pending wait.
//!
//! ## Architecture
//!
//! sumo-export follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (planning, export engine, retry, sinks)
//! - [`adapters`] - External integrations (Sumo Logic Search Job API)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration and credentials
//! - [`logging`] - Structured logging and observability
//!
//! ## Error Handling
//!
//! All fallible library functions return [`domain::Result`], built on
//! [`domain::SumoError`]. Command handlers use `anyhow` and map errors to
//! process exit codes.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
