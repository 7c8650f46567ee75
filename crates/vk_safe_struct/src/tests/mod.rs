//! End-to-end copy scenarios
