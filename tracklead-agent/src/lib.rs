//! # tracklead-agent: Tracking Agent Service
//!
//! Receives per-frame detections from the vision pipeline over TCP,
//! hands them to the `tracklead-core` tracking loop through a
//! latest-wins slot, and keeps the loop's settings in sync with the
//! config file on disk.
//!
//! ## Tasks
//!
//! - **Ingest**: one producer connection at a time (`ingest`).
//! - **Worker**: the tracking loop itself, spawned by `service`.
//! - **Watcher**: polls the config file and publishes snapshots.

pub mod config;
pub mod ingest;
pub mod service;
pub mod watcher;
