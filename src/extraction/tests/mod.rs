//! Unit tests for task extraction.
