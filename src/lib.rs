//! Core library for the `llmsweep` CLI.
//!
//! `llmsweep` measures how a streaming completion endpoint behaves as
//! concurrency grows. For each configured level it fires bursts of
//! simultaneous streamed requests, records time to first chunk, total time
//! and chunk throughput per request, and reports per-trial spreads and
//! pooled p50/p95 per level. The primary user-facing interface is the
//! `llmsweep` command-line application; library APIs may evolve as the CLI
//! grows.
pub mod args;
pub mod bench;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod metrics;
pub mod report;
pub mod sweep;
pub(crate) mod system;

#[cfg(test)]
pub(crate) mod test_support;
