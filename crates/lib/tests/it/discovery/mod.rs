//! Discovery operation integration tests
//!
//! Exercises UserDiscoveryOperation in both modes against scripted and
//! in-memory transports, including its lifecycle and cancellation.

mod email_tests;
