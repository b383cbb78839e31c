//! Orchestration for the pettrail CLI.
//!
//! One invocation performs one export pass: authenticate, resolve the
//! household's pets, fetch and normalize each pet's aggregate report, walk
//! the notification feed, normalize the water alerts, then write the
//! combined ledger as a single CSV file. Everything is strictly sequential;
//! the run either produces a complete file or fails before writing anything.

pub mod config;
pub mod export;
pub mod output;
