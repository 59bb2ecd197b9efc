//! Retires aged, date-addressed storage directories according to per-tenant
//! retention policies.
//!
//! A storage tree follows the layout
//! `<root>/<tenant>/<device-name>/<device-number>/<YYYY>/<MM>/<DD>`. A sweep
//! walks the tree depth-first under a wall-clock budget, skipping dated
//! directories that are still inside their retention window and deleting the
//! ones whose window has passed. A timed-out sweep ends cleanly and leaves
//! the unvisited remainder for the next scheduled run.

pub mod config;
pub mod retention;
pub mod seed;
pub mod storage;
pub mod sweep;
