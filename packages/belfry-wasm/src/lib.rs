use belfry::{Bell, BelfryError, Call, CallLog, SimConfig, Simulator, Snapshot, StrikeLog, PLAIN_BOB_DOUBLES};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct TowerError {
    message: String,
    kind: &'static str,
}

fn error_to_tower_error(e: BelfryError) -> TowerError {
    let kind = match e {
        BelfryError::TempoOutOfRange { .. } => "tempo",
        BelfryError::BellOutOfRange { .. } => "bell",
        BelfryError::AlreadyRunning => "running",
        _ => "internal",
    };
    TowerError {
        message: e.to_string(),
        kind,
    }
}

fn to_js_error(e: BelfryError) -> JsValue {
    let error = error_to_tower_error(e);
    let json = serde_json::to_string(&error).unwrap_or_else(|_| error.message.clone());
    JsValue::from_str(&json)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// Everything that happened since the page last asked.
///
/// The page owns the audio context and the speech synthesizer, so bells to
/// sound and calls to speak are queued here and drained after each tick or
/// strike.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerEvents {
    pub bells: Vec<Bell>,
    pub calls: Vec<&'static str>,
    pub snapshot: Option<Snapshot>,
}

/// A practice tower for the browser, driven by `setInterval` and key presses.
#[wasm_bindgen]
pub struct Tower {
    sim: Simulator<StrikeLog, CallLog>,
}

impl Tower {
    pub fn try_new(user_bell: Bell, tempo_ms: u32) -> Result<Self, BelfryError> {
        let config = SimConfig::new(user_bell, tempo_ms)?;
        Ok(Self {
            sim: Simulator::new(&config, StrikeLog::default(), CallLog::default()),
        })
    }

    /// Take the queued bells and calls along with a fresh snapshot.
    pub fn drain(&mut self) -> TowerEvents {
        let bells = std::mem::take(&mut self.sim.bells_mut().struck);
        let calls = std::mem::take(&mut self.sim.narrator_mut().calls)
            .into_iter()
            .map(Call::phrase)
            .collect();
        TowerEvents {
            bells,
            calls,
            snapshot: Some(self.sim.snapshot()),
        }
    }
}

#[wasm_bindgen]
impl Tower {
    #[wasm_bindgen(constructor)]
    pub fn new(user_bell: u8, tempo_ms: u32) -> Result<Tower, JsValue> {
        Self::try_new(user_bell, tempo_ms).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setUserBell)]
    pub fn set_user_bell(&mut self, bell: u8) -> Result<(), JsValue> {
        self.sim.set_user_bell(bell).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setTempo)]
    pub fn set_tempo(&mut self, tempo_ms: u32) -> Result<(), JsValue> {
        self.sim.set_tempo(tempo_ms).map_err(to_js_error)
    }

    #[wasm_bindgen(getter, js_name = tempoMs)]
    pub fn tempo_ms(&self) -> u32 {
        self.sim.state().tempo_ms
    }

    pub fn start(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        self.sim.start(now_ms).map_err(to_js_error)?;
        to_js(&self.drain())
    }

    pub fn stop(&mut self) -> Result<JsValue, JsValue> {
        self.sim.stop();
        to_js(&self.drain())
    }

    /// Advance one blow. Call every `tempoMs` milliseconds.
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        self.sim.tick(now_ms);
        to_js(&self.drain())
    }

    /// The user pulled their rope. Resolves to the judgment, or `null` when
    /// the bells are not ringing.
    pub fn strike(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let judgment = self.sim.strike(now_ms);
        let label = judgment.map(|j| j.label());
        to_js(&(judgment, label, self.drain()))
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.sim.snapshot())
    }
}

/// The rows of the plain course, for drawing the blue line.
#[wasm_bindgen(js_name = methodRows)]
pub fn method_rows() -> String {
    let rows: Vec<String> = PLAIN_BOB_DOUBLES.iter().map(|row| row.to_string()).collect();
    serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_bell() {
        assert!(matches!(Tower::try_new(1, 600), Err(BelfryError::BellOutOfRange { .. })));
        assert!(matches!(Tower::try_new(3, 50), Err(BelfryError::TempoOutOfRange { .. })));
    }

    #[test]
    fn test_drain_takes_queued_events() {
        let mut tower = Tower::try_new(2, 300).unwrap();
        tower.sim.start(0.0).unwrap();
        tower.sim.tick(300.0);
        tower.sim.tick(600.0);

        // Bell 2 belongs to the user so only the treble was rung
        let events = tower.drain();
        assert_eq!(events.bells, vec![1]);
        assert!(events.calls.is_empty());
        assert!(events.snapshot.unwrap().is_running);

        assert!(tower.drain().bells.is_empty());
    }

    #[test]
    fn test_drain_reports_calls() {
        let mut tower = Tower::try_new(2, 300).unwrap();
        tower.sim.start(0.0).unwrap();
        for n in 1..=40 {
            tower.sim.tick(n as f64 * 300.0);
        }
        assert_eq!(tower.drain().calls, vec!["Go Plain Bob Doubles"]);
    }

    #[test]
    fn test_method_rows_json() {
        let rows: Vec<String> = serde_json::from_str(&method_rows()).unwrap();
        assert_eq!(rows.len(), PLAIN_BOB_DOUBLES.len());
        assert_eq!(rows[0], "12345");
    }

    #[test]
    fn test_error_kind() {
        let error = error_to_tower_error(BelfryError::AlreadyRunning);
        assert_eq!(error.kind, "running");
    }
}
