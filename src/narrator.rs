//! Conductor's calls at phase changes.

use serde::Serialize;

/// The three calls made during a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Call {
    /// Rounds are over, start ringing the method.
    Go,
    /// The course has come round, ring rounds to finish.
    ThatsAll,
    /// Ringing is over.
    Stand,
}

impl Call {
    pub fn phrase(self) -> &'static str {
        match self {
            Call::Go => "Go Plain Bob Doubles",
            Call::ThatsAll => "That's all",
            Call::Stand => "Stand",
        }
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.phrase())
    }
}

/// Receives calls from the scheduler. Must return immediately.
pub trait Narrator {
    fn announce(&mut self, call: Call);
}

/// Writes calls to the log.
#[derive(Debug, Default)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn announce(&mut self, call: Call) {
        log::info!("Conductor: \"{}\"", call);
    }
}

/// Collects calls in order; used by the wasm bridge and tests.
#[derive(Debug, Default)]
pub struct CallLog {
    pub calls: Vec<Call>,
}

impl Narrator for CallLog {
    fn announce(&mut self, call: Call) {
        self.calls.push(call);
    }
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn announce(&mut self, call: Call) {
        (**self).announce(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases() {
        assert_eq!(Call::Go.to_string(), "Go Plain Bob Doubles");
        assert_eq!(Call::ThatsAll.to_string(), "That's all");
        assert_eq!(Call::Stand.to_string(), "Stand");
    }

    #[test]
    fn test_call_log_keeps_order() {
        let mut log = CallLog::default();
        log.announce(Call::Go);
        log.announce(Call::Stand);
        assert_eq!(log.calls, vec![Call::Go, Call::Stand]);
    }
}
