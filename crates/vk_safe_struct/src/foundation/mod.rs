//! Foundation utilities shared by the copy engine

pub mod logging;
