//! Unit tests for the session context.

mod support;
