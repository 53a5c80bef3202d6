//! Cross-crate tests for Namview, see `tests/`.

#![forbid(unsafe_code)]
