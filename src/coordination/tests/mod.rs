//! Unit tests for the completion primitives.

mod barrier_tests;
