use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    card::{Card, Rank},
    config::TableRules,
    error::{EngineError, Result},
    hand::Hand,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Hit,
        Action::Stand,
        Action::Double,
        Action::Split,
        Action::Surrender,
    ];

    pub fn from_code(code: &str) -> Option<Action> {
        match code.trim().to_ascii_uppercase().as_str() {
            "H" | "HIT" => Some(Action::Hit),
            "S" | "STAND" => Some(Action::Stand),
            "D" | "DOUBLE" => Some(Action::Double),
            "P" | "SPLIT" => Some(Action::Split),
            "R" | "SURRENDER" => Some(Action::Surrender),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Action::Hit => "H",
            Action::Stand => "S",
            Action::Double => "D",
            Action::Split => "P",
            Action::Surrender => "R",
        }
    }

    fn gerund(&self) -> &'static str {
        match self {
            Action::Hit => "hitting",
            Action::Stand => "standing",
            Action::Double => "doubling",
            Action::Split => "splitting",
            Action::Surrender => "surrendering",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Hit => "Hit",
            Action::Stand => "Stand",
            Action::Double => "Double",
            Action::Split => "Split",
            Action::Surrender => "Surrender",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DealerUp {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Ace,
}

impl DealerUp {
    /// Column order of every chart row.
    pub const ALL: [DealerUp; 10] = [
        DealerUp::Two,
        DealerUp::Three,
        DealerUp::Four,
        DealerUp::Five,
        DealerUp::Six,
        DealerUp::Seven,
        DealerUp::Eight,
        DealerUp::Nine,
        DealerUp::Ten,
        DealerUp::Ace,
    ];

    pub fn from_card(card: &Card) -> DealerUp {
        match card.rank {
            Rank::Ace => DealerUp::Ace,
            Rank::Two => DealerUp::Two,
            Rank::Three => DealerUp::Three,
            Rank::Four => DealerUp::Four,
            Rank::Five => DealerUp::Five,
            Rank::Six => DealerUp::Six,
            Rank::Seven => DealerUp::Seven,
            Rank::Eight => DealerUp::Eight,
            Rank::Nine => DealerUp::Nine,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => DealerUp::Ten,
        }
    }

    pub fn from_label(label: &str) -> Result<DealerUp> {
        let rank = Rank::from_label(label)?;
        Ok(DealerUp::from_card(&Card::new(rank, crate::card::Suit::Spades)))
    }

    /// 2 through 6: the cards that bust the dealer most often.
    pub fn is_weak(&self) -> bool {
        matches!(
            self,
            DealerUp::Two | DealerUp::Three | DealerUp::Four | DealerUp::Five | DealerUp::Six
        )
    }

    fn name(&self) -> &'static str {
        match self {
            DealerUp::Two => "2",
            DealerUp::Three => "3",
            DealerUp::Four => "4",
            DealerUp::Five => "5",
            DealerUp::Six => "6",
            DealerUp::Seven => "7",
            DealerUp::Eight => "8",
            DealerUp::Nine => "9",
            DealerUp::Ten => "10",
            DealerUp::Ace => "ace",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HandCategory {
    Hard(u8),
    Soft(u8),
    /// Pair identified by card value, 1 for aces.
    Pair(u8),
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::Hard(total) => write!(f, "hard {total}"),
            HandCategory::Soft(total) => write!(f, "soft {total}"),
            HandCategory::Pair(1) => f.write_str("a pair of aces"),
            HandCategory::Pair(10) => f.write_str("a pair of tens"),
            HandCategory::Pair(value) => write!(f, "a pair of {value}s"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ChartKey {
    pub category: HandCategory,
    pub dealer: DealerUp,
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.category, self.dealer.name())
    }
}

/// A chart cell. Compound codes carry the fallback used when the preferred
/// action is not available.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ChartCode {
    Hit,
    Stand,
    DoubleOrHit,
    DoubleOrStand,
    Split,
    SplitIfDoubleAfterSplit,
    SurrenderOrHit,
    SurrenderOrStand,
    SurrenderOrSplit,
}

impl ChartCode {
    pub fn from_code(code: &str) -> Option<ChartCode> {
        let code = match code.trim() {
            "H" => ChartCode::Hit,
            "S" => ChartCode::Stand,
            "D" | "Dh" => ChartCode::DoubleOrHit,
            "Ds" => ChartCode::DoubleOrStand,
            "P" => ChartCode::Split,
            "Ph" => ChartCode::SplitIfDoubleAfterSplit,
            "R" | "Rh" => ChartCode::SurrenderOrHit,
            "Rs" => ChartCode::SurrenderOrStand,
            "Rp" => ChartCode::SurrenderOrSplit,
            _ => return None,
        };
        Some(code)
    }

    /// Codes that can only be played from a pair row.
    fn splits(&self) -> bool {
        matches!(
            self,
            ChartCode::Split | ChartCode::SplitIfDoubleAfterSplit | ChartCode::SurrenderOrSplit
        )
    }

    /// Best action under the table rules, ignoring what the current hand allows.
    fn ideal(&self, rules: &ChartRules) -> Action {
        match self {
            ChartCode::Hit => Action::Hit,
            ChartCode::Stand => Action::Stand,
            ChartCode::DoubleOrHit | ChartCode::DoubleOrStand => Action::Double,
            ChartCode::Split => Action::Split,
            ChartCode::SplitIfDoubleAfterSplit if rules.double_after_split => Action::Split,
            ChartCode::SplitIfDoubleAfterSplit => Action::Hit,
            ChartCode::SurrenderOrHit if !rules.surrender_allowed => Action::Hit,
            ChartCode::SurrenderOrStand if !rules.surrender_allowed => Action::Stand,
            ChartCode::SurrenderOrSplit if !rules.surrender_allowed => Action::Split,
            ChartCode::SurrenderOrHit
            | ChartCode::SurrenderOrStand
            | ChartCode::SurrenderOrSplit => Action::Surrender,
        }
    }

    /// Ideal action downgraded to what `legal` allows. `None` when the cell
    /// demands a split that is not available; callers re-key the hand by total.
    fn resolve(&self, rules: &ChartRules, legal: &[Action]) -> Option<Action> {
        let ideal = self.ideal(rules);
        if legal.contains(&ideal) {
            return Some(ideal);
        }
        let fallback = match self {
            ChartCode::DoubleOrHit
            | ChartCode::SurrenderOrHit
            | ChartCode::SplitIfDoubleAfterSplit => Action::Hit,
            ChartCode::DoubleOrStand | ChartCode::SurrenderOrStand => Action::Stand,
            ChartCode::SurrenderOrSplit if legal.contains(&Action::Split) => Action::Split,
            ChartCode::Split | ChartCode::SurrenderOrSplit => return None,
            ChartCode::Hit => Action::Hit,
            ChartCode::Stand => Action::Stand,
        };
        if legal.contains(&fallback) {
            Some(fallback)
        } else {
            Some(Action::Stand)
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Threshold {
    AtOrAbove(f64),
    Below(f64),
}

impl Threshold {
    fn crossed(&self, true_count: f64) -> bool {
        match *self {
            Threshold::AtOrAbove(t) => true_count >= t,
            Threshold::Below(t) => true_count < t,
        }
    }
}

/// A count-conditioned override of the basic chart.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Deviation {
    pub key: ChartKey,
    pub threshold: Threshold,
    pub code: ChartCode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleSource {
    Basic { key: ChartKey },
    Deviation { key: ChartKey, threshold: Threshold },
}

impl RuleSource {
    pub fn key(&self) -> ChartKey {
        match self {
            RuleSource::Basic { key } | RuleSource::Deviation { key, .. } => *key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecommendation {
    /// Always one of the legal actions passed in.
    pub action: Action,
    pub ideal_action: Action,
    /// False when the ideal action was unavailable and `action` is its fallback.
    pub is_ideal: bool,
    pub source: RuleSource,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyInput {
    #[serde(default)]
    pub count_based: Option<bool>,
    #[serde(default)]
    pub hard: serde_json::Value,
    #[serde(default)]
    pub soft: serde_json::Value,
    #[serde(default)]
    pub pairs: serde_json::Value,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct ChartRules {
    double_after_split: bool,
    surrender_allowed: bool,
}

type StrategyTable = HashMap<String, HashMap<String, String>>;

pub struct StrategyChart {
    rules: ChartRules,
    count_based: bool,
    cells: HashMap<ChartKey, ChartCode>,
    deviations: Vec<Deviation>,
}

impl StrategyChart {
    /// Multi-deck basic strategy for the given table rules, with Hi-Lo
    /// index plays enabled.
    pub fn basic(rules: &TableRules) -> Self {
        let mut cells = HashMap::new();
        fill(&mut cells, HARD_ROWS, HandCategory::Hard);
        fill(&mut cells, SOFT_ROWS, HandCategory::Soft);
        fill(&mut cells, PAIR_ROWS, HandCategory::Pair);
        if rules.dealer_hits_soft_17 {
            for &(category, dealer, code) in H17_CELLS {
                cells.insert(ChartKey { category, dealer }, code);
            }
        }
        StrategyChart {
            rules: ChartRules {
                double_after_split: rules.double_after_split,
                surrender_allowed: rules.surrender_allowed,
            },
            count_based: true,
            cells,
            deviations: index_plays(),
        }
    }

    /// Overlays the cells supplied in `input` on the basic chart. Cells the
    /// input leaves out keep their basic-strategy entry.
    pub fn from_input(input: StrategyInput, rules: &TableRules) -> Result<Self> {
        let mut chart = StrategyChart::basic(rules);
        if let Some(count_based) = input.count_based {
            chart.count_based = count_based;
        }
        for (key, row) in value_to_table(input.hard)? {
            let total = parse_total(&key, 4..=21)?;
            chart.overlay_row(HandCategory::Hard(total), &row)?;
        }
        for (key, row) in value_to_table(input.soft)? {
            let total = parse_total(soft_table_key(&key), 12..=21)?;
            chart.overlay_row(HandCategory::Soft(total), &row)?;
        }
        for (key, row) in value_to_table(input.pairs)? {
            let value = pair_value_from_label(&key)?;
            chart.overlay_row(HandCategory::Pair(value), &row)?;
        }
        Ok(chart)
    }

    fn overlay_row(&mut self, category: HandCategory, row: &HashMap<String, String>) -> Result<()> {
        for (dealer, label) in row {
            let dealer = DealerUp::from_label(dealer)
                .map_err(|_| EngineError::InvalidChart(format!("unknown dealer card {dealer:?}")))?;
            let code = ChartCode::from_code(label).ok_or_else(|| {
                EngineError::InvalidChart(format!("unknown action code {label:?}"))
            })?;
            if code.splits() && !matches!(category, HandCategory::Pair(_)) {
                return Err(EngineError::InvalidChart(format!(
                    "{category} cannot be split, got {label:?}"
                )));
            }
            self.cells.insert(ChartKey { category, dealer }, code);
        }
        Ok(())
    }

    pub fn count_based(&self) -> bool {
        self.count_based
    }

    pub fn deviations(&self) -> &[Deviation] {
        &self.deviations
    }

    /// Chart key for `hand`. Pairs use the pair rows only while a split is legal.
    pub fn key_for(hand: &Hand, dealer_up: &Card, legal: &[Action]) -> ChartKey {
        let value = hand.value();
        let category = if hand.is_pair() && legal.contains(&Action::Split) {
            HandCategory::Pair(hand.cards[0].hard_value())
        } else if value.is_soft {
            HandCategory::Soft(value.soft_total)
        } else {
            HandCategory::Hard(value.hard_total)
        };
        ChartKey {
            category,
            dealer: DealerUp::from_card(dealer_up),
        }
    }

    /// Optimal legal action for `hand` against `dealer_up`. `true_count` is
    /// `None` when counting is disabled.
    pub fn recommend(
        &self,
        hand: &Hand,
        dealer_up: &Card,
        legal: &[Action],
        true_count: Option<f64>,
    ) -> Result<ActionRecommendation> {
        let value = hand.value();
        if hand.len() < 2 || value.is_bust {
            return Err(EngineError::MalformedHand(format!(
                "cannot advise on {} card(s) totalling {}",
                hand.len(),
                value.hard_total
            )));
        }

        if !(legal.contains(&Action::Hit) && legal.contains(&Action::Stand)) {
            return Err(EngineError::InvalidConfig(format!(
                "legal actions must include hit and stand, got {legal:?}"
            )));
        }

        let key = Self::key_for(hand, dealer_up, legal);
        if let Some(rec) = self.resolve_key(key, legal, true_count)? {
            return Ok(rec);
        }

        // A split cell with no legal split: advise on the total instead.
        let without_split: Vec<Action> = legal
            .iter()
            .copied()
            .filter(|a| *a != Action::Split)
            .collect();
        let key = Self::key_for(hand, dealer_up, &without_split);
        self.resolve_key(key, &without_split, true_count)?
            .ok_or(EngineError::InternalInconsistency(key))
    }

    fn resolve_key(
        &self,
        key: ChartKey,
        legal: &[Action],
        true_count: Option<f64>,
    ) -> Result<Option<ActionRecommendation>> {
        if let Some(deviation) = self.matching_deviation(key, true_count) {
            if let Some(action) = deviation.code.resolve(&self.rules, legal) {
                let ideal = deviation.code.ideal(&self.rules);
                let tc = true_count.unwrap_or_default();
                return Ok(Some(ActionRecommendation {
                    action,
                    ideal_action: ideal,
                    is_ideal: action == ideal,
                    source: RuleSource::Deviation {
                        key,
                        threshold: deviation.threshold,
                    },
                    rationale: deviation_rationale(key, ideal, action, tc),
                }));
            }
        }

        let Some(code) = self.cells.get(&key) else {
            tracing::error!(%key, "strategy chart is missing a cell");
            return Err(EngineError::InternalInconsistency(key));
        };
        Ok(code.resolve(&self.rules, legal).map(|action| {
            let ideal = code.ideal(&self.rules);
            ActionRecommendation {
                action,
                ideal_action: ideal,
                is_ideal: action == ideal,
                source: RuleSource::Basic { key },
                rationale: basic_rationale(key, ideal, action),
            }
        }))
    }

    fn matching_deviation(&self, key: ChartKey, true_count: Option<f64>) -> Option<&Deviation> {
        if !self.count_based {
            return None;
        }
        let tc = true_count?;
        self.deviations
            .iter()
            .find(|d| d.key == key && d.threshold.crossed(tc))
    }
}

fn fill(
    cells: &mut HashMap<ChartKey, ChartCode>,
    rows: &[(u8, [ChartCode; 10])],
    category: fn(u8) -> HandCategory,
) {
    for (total, row) in rows {
        for (dealer, code) in DealerUp::ALL.iter().zip(row) {
            cells.insert(
                ChartKey {
                    category: category(*total),
                    dealer: *dealer,
                },
                *code,
            );
        }
    }
}

fn basic_rationale(key: ChartKey, ideal: Action, action: Action) -> String {
    let hand = key.category;
    let up = key.dealer.name();
    let mut text = match ideal {
        Action::Stand if key.dealer.is_weak() => format!(
            "Dealer shows a weak {up}; standing on {hand} preserves your hand and lets the dealer risk busting."
        ),
        Action::Stand => format!(
            "{} is strong enough to stand against the dealer's {up}.",
            capitalize(&hand.to_string())
        ),
        Action::Hit if !key.dealer.is_weak() => format!(
            "Dealer shows a strong {up}; {hand} is unlikely to win without improving, so hit."
        ),
        Action::Hit => match hand {
            HandCategory::Hard(total) if total <= 11 => format!(
                "{} cannot bust on the next card, so take the free hit.",
                capitalize(&hand.to_string())
            ),
            _ => format!("Even against the dealer's {up}, {hand} is too weak to stand; hit."),
        },
        Action::Double => format!(
            "{} against the dealer's {up} is a favourable spot; double to get more money on the table.",
            capitalize(&hand.to_string())
        ),
        Action::Split => match hand {
            HandCategory::Pair(1) | HandCategory::Pair(8) => {
                format!("Always split aces and eights; {hand} plays far better as two hands.")
            }
            _ => format!(
                "Splitting {hand} against the dealer's {up} turns one weak hand into two better starts."
            ),
        },
        Action::Surrender => format!(
            "{} against the dealer's {up} loses well over half the time; surrender to save half your bet.",
            capitalize(&hand.to_string())
        ),
    };
    if action != ideal {
        text.push_str(&format!(
            " {ideal} is not available here, so {} is the best remaining play.",
            action.to_string().to_lowercase()
        ));
    }
    text
}

fn deviation_rationale(key: ChartKey, ideal: Action, action: Action, true_count: f64) -> String {
    let strength = if true_count > 0.0 { "positive" } else { "negative" };
    let mut text = format!(
        "True count is {strength} ({true_count:+.1}); deviate to {} on {} against the dealer's {}.",
        ideal.gerund(),
        key.category,
        key.dealer.name()
    );
    if action != ideal {
        text.push_str(&format!(
            " {ideal} is not available here, so {} instead.",
            action.to_string().to_lowercase()
        ));
    }
    text
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn value_to_table(value: serde_json::Value) -> Result<StrategyTable> {
    if value.is_null() {
        return Ok(HashMap::new());
    }
    let mut table = HashMap::new();
    let obj = value
        .as_object()
        .ok_or_else(|| EngineError::InvalidChart("strategy table must be an object".into()))?;
    for (key, row_value) in obj {
        let row_obj = row_value.as_object().ok_or_else(|| {
            EngineError::InvalidChart(format!("strategy row {key:?} must be an object"))
        })?;
        let mut row = HashMap::new();
        for (dealer, action) in row_obj {
            let action_str = action.as_str().ok_or_else(|| {
                EngineError::InvalidChart(format!("cell {key}/{dealer} must be a string"))
            })?;
            row.insert(dealer.clone(), action_str.to_string());
        }
        table.insert(key.clone(), row);
    }
    Ok(table)
}

fn soft_table_key(label: &str) -> &str {
    label.strip_prefix('S').unwrap_or(label)
}

fn parse_total(label: &str, range: std::ops::RangeInclusive<u8>) -> Result<u8> {
    label
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|total| range.contains(total))
        .ok_or_else(|| EngineError::InvalidChart(format!("bad row label {label:?}")))
}

fn pair_value_from_label(label: &str) -> Result<u8> {
    let first = label.split(',').next().unwrap_or(label);
    Rank::from_label(first)
        .map(Rank::hard_value)
        .map_err(|_| EngineError::InvalidChart(format!("bad pair label {label:?}")))
}

const H: ChartCode = ChartCode::Hit;
const S: ChartCode = ChartCode::Stand;
const D: ChartCode = ChartCode::DoubleOrHit;
const DS: ChartCode = ChartCode::DoubleOrStand;
const P: ChartCode = ChartCode::Split;
const PH: ChartCode = ChartCode::SplitIfDoubleAfterSplit;
const RH: ChartCode = ChartCode::SurrenderOrHit;
const RS: ChartCode = ChartCode::SurrenderOrStand;
const RP: ChartCode = ChartCode::SurrenderOrSplit;

// 4-8 decks, dealer stands on soft 17, double after split, late surrender.
// Columns: 2 3 4 5 6 7 8 9 10 A
const HARD_ROWS: &[(u8, [ChartCode; 10])] = &[
    (4, [H, H, H, H, H, H, H, H, H, H]),
    (5, [H, H, H, H, H, H, H, H, H, H]),
    (6, [H, H, H, H, H, H, H, H, H, H]),
    (7, [H, H, H, H, H, H, H, H, H, H]),
    (8, [H, H, H, H, H, H, H, H, H, H]),
    (9, [H, D, D, D, D, H, H, H, H, H]),
    (10, [D, D, D, D, D, D, D, D, H, H]),
    (11, [D, D, D, D, D, D, D, D, D, H]),
    (12, [H, H, S, S, S, H, H, H, H, H]),
    (13, [S, S, S, S, S, H, H, H, H, H]),
    (14, [S, S, S, S, S, H, H, H, H, H]),
    (15, [S, S, S, S, S, H, H, H, RH, H]),
    (16, [S, S, S, S, S, H, H, RH, RH, RH]),
    (17, [S, S, S, S, S, S, S, S, S, S]),
    (18, [S, S, S, S, S, S, S, S, S, S]),
    (19, [S, S, S, S, S, S, S, S, S, S]),
    (20, [S, S, S, S, S, S, S, S, S, S]),
    (21, [S, S, S, S, S, S, S, S, S, S]),
];

const SOFT_ROWS: &[(u8, [ChartCode; 10])] = &[
    (12, [H, H, H, H, H, H, H, H, H, H]),
    (13, [H, H, H, D, D, H, H, H, H, H]),
    (14, [H, H, H, D, D, H, H, H, H, H]),
    (15, [H, H, D, D, D, H, H, H, H, H]),
    (16, [H, H, D, D, D, H, H, H, H, H]),
    (17, [H, D, D, D, D, H, H, H, H, H]),
    (18, [S, DS, DS, DS, DS, S, S, H, H, H]),
    (19, [S, S, S, S, S, S, S, S, S, S]),
    (20, [S, S, S, S, S, S, S, S, S, S]),
    (21, [S, S, S, S, S, S, S, S, S, S]),
];

const PAIR_ROWS: &[(u8, [ChartCode; 10])] = &[
    (1, [P, P, P, P, P, P, P, P, P, P]),
    (2, [PH, PH, P, P, P, P, H, H, H, H]),
    (3, [PH, PH, P, P, P, P, H, H, H, H]),
    (4, [H, H, H, PH, PH, H, H, H, H, H]),
    (5, [D, D, D, D, D, D, D, D, H, H]),
    (6, [PH, P, P, P, P, H, H, H, H, H]),
    (7, [P, P, P, P, P, P, H, H, H, H]),
    (8, [P, P, P, P, P, P, P, P, P, P]),
    (9, [P, P, P, P, P, S, P, P, S, S]),
    (10, [S, S, S, S, S, S, S, S, S, S]),
];

// Cells that change when the dealer hits soft 17.
const H17_CELLS: &[(HandCategory, DealerUp, ChartCode)] = &[
    (HandCategory::Hard(11), DealerUp::Ace, D),
    (HandCategory::Hard(15), DealerUp::Ace, RH),
    (HandCategory::Hard(17), DealerUp::Ace, RS),
    (HandCategory::Soft(18), DealerUp::Two, DS),
    (HandCategory::Soft(19), DealerUp::Six, DS),
    (HandCategory::Pair(8), DealerUp::Ace, RP),
];

/// Hi-Lo index plays for multi-deck shoes.
fn index_plays() -> Vec<Deviation> {
    use DealerUp::*;
    use HandCategory::*;
    use Threshold::*;

    let plays = [
        (Hard(16), Ten, AtOrAbove(4.0), S),
        (Hard(15), Ten, AtOrAbove(4.0), S),
        (Pair(10), Five, AtOrAbove(5.0), P),
        (Pair(10), Six, AtOrAbove(4.0), P),
        (Hard(10), Ten, AtOrAbove(4.0), D),
        (Hard(12), Three, AtOrAbove(2.0), S),
        (Hard(12), Two, AtOrAbove(3.0), S),
        (Hard(11), Ace, AtOrAbove(1.0), D),
        (Hard(9), Two, AtOrAbove(1.0), D),
        (Hard(10), Ace, AtOrAbove(4.0), D),
        (Hard(9), Seven, AtOrAbove(3.0), D),
        (Hard(16), Nine, AtOrAbove(5.0), S),
        (Hard(13), Two, Below(-1.0), H),
        (Hard(12), Four, Below(0.0), H),
        (Hard(12), Five, Below(-2.0), H),
        (Hard(12), Six, Below(-1.0), H),
        (Hard(13), Three, Below(-2.0), H),
    ];
    plays
        .into_iter()
        .map(|(category, dealer, threshold, code)| Deviation {
            key: ChartKey { category, dealer },
            threshold,
            code,
        })
        .collect()
}
