//! Reward counter model.

use serde::{Deserialize, Serialize};

/// Stored counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RewardState {
    pub carrots: u64,
    pub resets: u64,
}

/// Counters plus the derived meter fill shown by the UI.
#[derive(Debug, Clone, Serialize)]
pub struct RewardView {
    pub carrots: u64,
    pub resets: u64,
    pub percentage: u8,
}

impl From<RewardState> for RewardView {
    fn from(state: RewardState) -> Self {
        Self {
            carrots: state.carrots,
            resets: state.resets,
            percentage: meter_percentage(state.carrots),
        }
    }
}

/// The only amounts a carrot award can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrotDelta {
    One,
    Five,
}

impl CarrotDelta {
    pub fn amount(self) -> u64 {
        match self {
            CarrotDelta::One => 1,
            CarrotDelta::Five => 5,
        }
    }

    pub fn from_amount(amount: u64) -> Option<Self> {
        match amount {
            1 => Some(CarrotDelta::One),
            5 => Some(CarrotDelta::Five),
            _ => None,
        }
    }
}

/// Request body for awarding carrots.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCarrotsRequest {
    pub amount: u64,
}

/// Meter fill: `carrots mod 100`, clamped to 0..=100.
pub fn meter_percentage(carrots: u64) -> u8 {
    (carrots % 100).min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_percentage() {
        assert_eq!(meter_percentage(0), 0);
        assert_eq!(meter_percentage(25), 25);
        assert_eq!(meter_percentage(99), 99);
        assert_eq!(meter_percentage(100), 0);
        assert_eq!(meter_percentage(103), 3);
    }

    #[test]
    fn test_carrot_delta_amounts() {
        assert_eq!(CarrotDelta::from_amount(1), Some(CarrotDelta::One));
        assert_eq!(CarrotDelta::from_amount(5), Some(CarrotDelta::Five));
        assert_eq!(CarrotDelta::from_amount(0), None);
        assert_eq!(CarrotDelta::from_amount(2), None);
        assert_eq!(CarrotDelta::Five.amount(), 5);
    }
}
