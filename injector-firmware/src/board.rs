//! Board wiring and timing, generated from `board.toml` by `build.rs`

use injector_core::config::{NoticeTimings, RunTimings, TesterConfig, UiTimings};

include!(concat!(env!("OUT_DIR"), "/board.rs"));
