use log::info;

use crate::gameboy::{GameBoy, StepControl, StepObserver, StepReport};
use crate::serial::SerialOutput;

const PASSED_STR: &str = "Passed";
const FAILED_STR: &str = "Failed";

/// How a bounded session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Running,
    LimitReached,
    Passed,
    Failed,
}

/// Observer used by the binary and by the ROM harness: optional Doctor
/// trace, an optional instruction limit and an optional stop on the
/// "Passed"/"Failed" verdict test ROMs print over serial.
#[derive(Debug)]
pub struct Session {
    trace: bool,
    limit: Option<u64>,
    executed: u64,
    serial: Option<SerialOutput>,
    outcome: SessionOutcome,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            trace: false,
            limit: None,
            executed: 0,
            serial: None,
            outcome: SessionOutcome::Running,
        }
    }

    /// Log every pre-instruction state in Gameboy Doctor format.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn stop_on_serial_verdict(mut self, serial: SerialOutput) -> Self {
        self.serial = Some(serial);
        self
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    fn verdict(&self) -> Option<SessionOutcome> {
        let serial = self.serial.as_ref()?;
        if serial.contains(PASSED_STR) {
            Some(SessionOutcome::Passed)
        } else if serial.contains(FAILED_STR) {
            Some(SessionOutcome::Failed)
        } else {
            None
        }
    }
}

impl StepObserver for Session {
    fn before_step(&mut self, gameboy: &mut GameBoy) {
        if self.trace {
            info!("{}", gameboy.snapshot().to_doctor_string());
        }
    }

    fn after_step(&mut self, _gameboy: &mut GameBoy, report: &StepReport) -> StepControl {
        self.executed += 1;

        // Scanning the serial buffer once per frame is plenty.
        if report.frame_completed {
            if let Some(verdict) = self.verdict() {
                self.outcome = verdict;
                return StepControl::Stop;
            }
        }

        if self.limit.is_some_and(|limit| self.executed >= limit) {
            self.outcome = SessionOutcome::LimitReached;
            return StepControl::Stop;
        }

        StepControl::Continue
    }
}
