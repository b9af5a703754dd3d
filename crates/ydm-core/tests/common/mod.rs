#![allow(dead_code)]

pub mod fake_extractor;

use std::time::{Duration, Instant};

/// Polls `cond` every 10 ms until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

pub const AUDIO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
pub const VIDEO_URL: &str = "https://youtu.be/9bZkp7q19f0";
