use crate::currency::{ConversionState, CurrencyPair, RateSource};
use crate::store::Document;
use serde::{Deserialize, Serialize};

/// Selections that carry over between invocations: the active trip and
/// the converter's pair and manual-rate settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub version: String,
    pub selected_trip_id: Option<String>,
    #[serde(default)]
    pub selected_pair: CurrencyPair,
    #[serde(default)]
    pub manual_rate: String,
    #[serde(default)]
    pub use_manual_rate: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            selected_trip_id: None,
            selected_pair: CurrencyPair::default(),
            manual_rate: String::new(),
            use_manual_rate: false,
        }
    }
}

impl Document for Session {
    const FILE_NAME: &'static str = "session.json";
}

impl Session {
    /// The remembered converter, switched to `pair` when one is given.
    /// Amounts start empty; manual-rate settings carry over.
    pub fn converter(&self, pair: Option<CurrencyPair>, rates: &dyn RateSource) -> ConversionState {
        let mut state = ConversionState::from_source(self.selected_pair, rates);
        state.set_manual_rate(&self.manual_rate);
        state.set_use_manual_rate(self.use_manual_rate);
        if let Some(pair) = pair.filter(|p| *p != state.pair()) {
            state.select_pair(pair, rates.rate(pair));
        }
        state
    }

    /// Keep the converter's pair and manual-rate settings for next time.
    pub fn remember(&mut self, state: &ConversionState) {
        self.selected_pair = state.pair();
        self.manual_rate = state.manual_rate().to_string();
        self.use_manual_rate = state.use_manual_rate();
    }
}
