use thiserror::Error;

use crate::round::RoundPhase;
use crate::strategy::{Action, ChartKey};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{action} is not a legal action right now")]
    InvalidAction { action: Action },
    #[error("invalid wager {wager}: bankroll is {bankroll}")]
    InvalidWager { wager: f64, bankroll: f64 },
    #[error("operation not allowed during {0:?}")]
    InvalidPhase(RoundPhase),
    #[error("shoe exhausted")]
    ShoeExhausted,
    #[error("malformed hand: {0}")]
    MalformedHand(String),
    #[error("strategy chart has no entry for {0}")]
    InternalInconsistency(ChartKey),
    #[error("invalid strategy chart: {0}")]
    InvalidChart(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid card label: {0}")]
    InvalidCard(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
