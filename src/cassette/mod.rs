//! YAML cassettes for recording and replaying generator calls.

pub mod format;
pub mod recorder;
pub mod replayer;
