//! Read-only analyses over a finished network

pub mod stats;

pub use stats::NetworkStats;
