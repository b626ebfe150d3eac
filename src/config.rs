// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::time::PositiveDuration;

pub const DEFAULT_BOARD_SLACK: &str = "00:00:00";
pub const DEFAULT_ALIGHT_SLACK: &str = "00:00:00";
pub const DEFAULT_TRANSFER_SLACK: &str = "00:01:00";

pub const DEFAULT_BOARD_COST: &str = "00:01:00";
pub const DEFAULT_TRANSFER_COST: &str = "00:02:00";
pub const DEFAULT_WAIT_RELUCTANCE: f64 = 1.0;
pub const DEFAULT_WALK_RELUCTANCE: f64 = 2.0;
pub const DEFAULT_TRANSIT_RELUCTANCE: f64 = 1.0;

pub const DEFAULT_MIN_SAFE_WAIT_TIME_FACTOR: f64 = 5.0;
pub const DEFAULT_WAIT_TIME_BACKOFF_RATIO: f64 = 4.0;

/// Minimum times a traveller needs around each boarding and alighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlackParams {
    /// added before each boarding
    #[serde(default = "default_board_slack")]
    pub board_slack: PositiveDuration,

    /// added after each alighting
    #[serde(default = "default_alight_slack")]
    pub alight_slack: PositiveDuration,

    /// added before each boarding that is not the first ride of the journey
    #[serde(default = "default_transfer_slack")]
    pub transfer_slack: PositiveDuration,
}

pub fn default_board_slack() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_BOARD_SLACK).unwrap()
}

pub fn default_alight_slack() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_ALIGHT_SLACK).unwrap()
}

pub fn default_transfer_slack() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_TRANSFER_SLACK).unwrap()
}

impl Default for SlackParams {
    fn default() -> Self {
        Self {
            board_slack: default_board_slack(),
            alight_slack: default_alight_slack(),
            transfer_slack: default_transfer_slack(),
        }
    }
}

/// Parameters of the generalized cost (`c1`).
///
/// Durations are given in seconds and reluctances are multipliers applied to
/// the time spent in each activity. Internally every cost is an integer number
/// of hundredths of a second, so that a reluctance of `1.0` turns one second
/// into `100` cost units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostParams {
    /// fixed cost of each boarding
    #[serde(default = "default_board_cost")]
    pub board_cost: PositiveDuration,

    /// fixed cost added to every boarding but the first one
    #[serde(default = "default_transfer_cost")]
    pub transfer_cost: PositiveDuration,

    #[serde(default = "default_wait_reluctance")]
    pub wait_reluctance: f64,

    #[serde(default = "default_walk_reluctance")]
    pub walk_reluctance: f64,

    #[serde(default = "default_transit_reluctance")]
    pub transit_reluctance: f64,

    /// Extra cost, in seconds, of boarding or alighting at each stop.
    /// Indexed by stop, must cover every stop of the network when present.
    #[serde(default)]
    pub stop_costs: Option<Vec<u32>>,
}

pub fn default_board_cost() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_BOARD_COST).unwrap()
}

pub fn default_transfer_cost() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_TRANSFER_COST).unwrap()
}

pub fn default_wait_reluctance() -> f64 {
    DEFAULT_WAIT_RELUCTANCE
}

pub fn default_walk_reluctance() -> f64 {
    DEFAULT_WALK_RELUCTANCE
}

pub fn default_transit_reluctance() -> f64 {
    DEFAULT_TRANSIT_RELUCTANCE
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            board_cost: default_board_cost(),
            transfer_cost: default_transfer_cost(),
            wait_reluctance: default_wait_reluctance(),
            walk_reluctance: default_walk_reluctance(),
            transit_reluctance: default_transit_reluctance(),
            stop_costs: None,
        }
    }
}

impl CostParams {
    pub(crate) fn reluctances_are_valid(&self) -> bool {
        [
            self.wait_reluctance,
            self.walk_reluctance,
            self.transit_reluctance,
        ]
        .iter()
        .all(|reluctance| reluctance.is_finite() && *reluctance >= 0.0 && *reluctance < 1000.0)
    }
}

/// Post-processing of multi-criteria paths, see [`crate::transfer_optimization`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransferOptimizationParams {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// prefer transfers that leave more time to the traveller
    #[serde(default = "default_enabled")]
    pub optimize_wait_time: bool,

    /// percentage of the in-vehicle time of a journey considered a safe wait at a transfer
    #[serde(default = "default_min_safe_wait_time_factor")]
    pub min_safe_wait_time_factor: f64,

    /// ratio between the cost of a zero wait and the cost of a safe wait
    #[serde(default = "default_wait_time_backoff_ratio")]
    pub wait_time_backoff_ratio: f64,
}

pub fn default_enabled() -> bool {
    true
}

pub fn default_min_safe_wait_time_factor() -> f64 {
    DEFAULT_MIN_SAFE_WAIT_TIME_FACTOR
}

pub fn default_wait_time_backoff_ratio() -> f64 {
    DEFAULT_WAIT_TIME_BACKOFF_RATIO
}

impl Default for TransferOptimizationParams {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            optimize_wait_time: default_enabled(),
            min_safe_wait_time_factor: default_min_safe_wait_time_factor(),
            wait_time_backoff_ratio: default_wait_time_backoff_ratio(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    field: &'static str,
    value: String,
}

impl ConfigError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bad {} : `{}`", self.field, self.value)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let slack = SlackParams::default();
        assert_eq!(slack.transfer_slack.as_secs(), 60);
        assert!(slack.board_slack.is_zero());
        let cost = CostParams::default();
        assert_eq!(cost.board_cost.as_secs(), 60);
        assert_eq!(cost.transfer_cost.as_secs(), 120);
        assert!(cost.reluctances_are_valid());
    }

    #[test]
    fn invalid_reluctance() {
        let cost = CostParams {
            walk_reluctance: -1.0,
            ..CostParams::default()
        };
        assert!(!cost.reluctances_are_valid());
        let cost = CostParams {
            wait_reluctance: f64::NAN,
            ..CostParams::default()
        };
        assert!(!cost.reluctances_are_valid());
    }
}
