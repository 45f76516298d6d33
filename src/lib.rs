use js_sys::Function;
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;

pub mod card;
pub mod config;
pub mod counter;
pub mod drill;
pub mod error;
pub mod feedback;
pub mod hand;
pub mod logging;
pub mod round;
pub mod session;
pub mod shoe;
pub mod spot;
pub mod stats;
pub mod strategy;

pub use error::EngineError;

use crate::{
    config::SessionConfig,
    round::{RoundController, RoundPhase},
    session::Session,
    spot::parse_action,
    stats::StatsReport,
};

fn from_js<T: DeserializeOwned>(params: &JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(params.clone())
        .map_err(|err| JsValue::from_str(&format!("Invalid input: {err}")))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}

fn engine_error(context: &str, err: EngineError) -> JsValue {
    JsValue::from_str(&format!("{context}: {err}"))
}

fn init() {
    console_error_panic_hook::set_once();
    logging::init_logging(logging::parse_level(None));
}

/// Routes engine logs to the browser console at `level` ("error", "warn",
/// "info", "debug" or "trace"). Call before anything else to take effect.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    console_error_panic_hook::set_once();
    logging::init_logging(logging::parse_level(level.as_deref()));
}

#[wasm_bindgen]
pub fn recommend_action(params: &JsValue) -> Result<JsValue, JsValue> {
    init();
    let input: spot::SpotInput = from_js(params)?;
    let recommendation =
        spot::recommend_spot(input).map_err(|err| engine_error("Recommendation failed", err))?;
    to_js(&recommendation)
}

#[wasm_bindgen]
pub fn grade_action(params: &JsValue) -> Result<JsValue, JsValue> {
    init();
    let answer: spot::SpotAnswer = from_js(params)?;
    let feedback = spot::grade_spot(answer).map_err(|err| engine_error("Grading failed", err))?;
    to_js(&feedback)
}

#[wasm_bindgen]
pub fn evaluate_hand(cards: &JsValue) -> Result<JsValue, JsValue> {
    init();
    let labels: Vec<String> = from_js(cards)?;
    let cards = card::parse_cards(&labels).map_err(|err| engine_error("Invalid hand", err))?;
    to_js(&hand::evaluate(&cards))
}

#[wasm_bindgen]
pub fn generate_drill(params: &JsValue) -> Result<JsValue, JsValue> {
    init();
    let request: drill::DrillRequest = from_js(params)?;
    let questions = drill::generate(request).map_err(|err| engine_error("Drill failed", err))?;
    to_js(&questions)
}

#[wasm_bindgen]
pub fn grade_drill(params: &JsValue) -> Result<JsValue, JsValue> {
    init();
    let answer: drill::DrillAnswer = from_js(params)?;
    let feedback = drill::grade_answer(answer).map_err(|err| engine_error("Grading failed", err))?;
    to_js(&feedback)
}

/// One browser tab's training session.
#[wasm_bindgen]
pub struct TrainerSession {
    round: RoundController,
    on_round_complete: Option<Function>,
}

#[wasm_bindgen]
impl TrainerSession {
    #[wasm_bindgen(constructor)]
    pub fn new(params: &JsValue) -> Result<TrainerSession, JsValue> {
        init();
        let config: SessionConfig = if params.is_undefined() || params.is_null() {
            SessionConfig::default()
        } else {
            from_js(params)?
        };
        let session = Session::new(config).map_err(|err| engine_error("Invalid session", err))?;
        Ok(TrainerSession {
            round: RoundController::new(session),
            on_round_complete: None,
        })
    }

    #[wasm_bindgen(js_name = startRound)]
    pub fn start_round(&mut self, wager: f64) -> Result<JsValue, JsValue> {
        self.round
            .start(wager)
            .map_err(|err| engine_error("Cannot start round", err))?;
        self.after_step();
        to_js(&self.round.view())
    }

    #[wasm_bindgen(js_name = legalActions)]
    pub fn legal_actions(&self) -> Result<JsValue, JsValue> {
        to_js(&self.round.legal_actions())
    }

    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&self.round.view())
    }

    pub fn recommend(&self) -> Result<JsValue, JsValue> {
        let recommendation = self
            .round
            .recommend()
            .map_err(|err| engine_error("Recommendation failed", err))?;
        to_js(&recommendation)
    }

    /// Applies `action` (a code such as `"H"` or `"double"`) and returns the
    /// feedback card for it.
    pub fn act(&mut self, action: &str) -> Result<JsValue, JsValue> {
        let action = parse_action(action).map_err(|err| engine_error("Invalid action", err))?;
        let feedback = self
            .round
            .act(action)
            .map_err(|err| engine_error("Action rejected", err))?;
        self.after_step();
        to_js(&feedback)
    }

    #[wasm_bindgen(js_name = nextRound)]
    pub fn next_round(&mut self) -> Result<(), JsValue> {
        self.round
            .next_round()
            .map_err(|err| engine_error("Cannot start next round", err))
    }

    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.round.summary())
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_js(&StatsReport::from(self.round.session().stats()))
    }

    /// Null while counting is switched off.
    #[wasm_bindgen(js_name = countState)]
    pub fn count_state(&self) -> Result<JsValue, JsValue> {
        let session = self.round.session();
        to_js(&session.counting_enabled().then(|| session.count_state()))
    }

    pub fn bankroll(&self) -> f64 {
        self.round.session().bankroll()
    }

    #[wasm_bindgen(js_name = onRoundComplete)]
    pub fn on_round_complete(&mut self, callback: Function) {
        self.on_round_complete = Some(callback);
    }
}

impl TrainerSession {
    /// Hands a finished round's summary to the registered callback.
    fn after_step(&self) {
        if self.round.phase() != RoundPhase::Complete {
            return;
        }
        let Some(summary) = self.round.summary() else {
            return;
        };
        if let Some(callback) = &self.on_round_complete {
            if let Ok(value) = serde_wasm_bindgen::to_value(summary) {
                let _ = callback.call1(&JsValue::NULL, &value);
            }
        }
    }
}
