use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::Mutex;

// Keeps the dump readable while still covering a few dozen instructions.
const RING_BUFFER_SIZE: usize = 60;

lazy_static::lazy_static! {
    static ref LOG_BUFFER: Mutex<VecDeque<String>> = Mutex::new(VecDeque::with_capacity(RING_BUFFER_SIZE));
}

struct RingLogger;

impl log::Log for RingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Doctor lines are logged at info; per-instruction traces would
        // push them out of the ring.
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut buffer = LOG_BUFFER.lock().unwrap();
            if buffer.len() >= RING_BUFFER_SIZE {
                buffer.pop_front();
            }
            buffer.push_back(format!("{}", record.args()));
        }
    }

    fn flush(&self) {}
}

/// Installs the ring logger. Only the first call in a test binary succeeds.
pub fn init_logger() -> Result<(), SetLoggerError> {
    log::set_logger(&RingLogger).map(|()| log::set_max_level(LevelFilter::Info))
}

/// Copy of the buffered lines, oldest first.
pub fn log_lines() -> Vec<String> {
    LOG_BUFFER.lock().unwrap().iter().cloned().collect()
}

pub fn dump_log() {
    let buffer = LOG_BUFFER.lock().unwrap();
    let len = buffer.len();
    if len == 0 {
        println!("Log buffer is empty.");
        return;
    }

    println!("--- LAST {} LOG LINES ---", len);
    for (i, line) in buffer.iter().enumerate() {
        // Relative index, the newest line is 0.
        let idx = (i as i32) - (len as i32) + 1;
        println!("{:>3}. {}", idx, line);
    }
}
