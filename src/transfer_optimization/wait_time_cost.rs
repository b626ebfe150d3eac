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

use crate::{config::TransferOptimizationParams, engine::cost_calculator::COST_UNITS_PER_SECOND};

pub const MIN_SAFE_WAIT_TIME_LOWER_BOUND: i32 = 60;
pub const MIN_SAFE_WAIT_TIME_UPPER_BOUND: i32 = 40 * 60;

/// Cost of the wait at a transfer, decreasing with the wait.
///
/// With `t0` the minimum safe wait time and `n` the backoff ratio, a wait of
/// `t` seconds costs `n * t0 / (1 + (n - 1) * t / t0)` : a transfer without
/// any wait costs `n` times a transfer with a safe wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitTimeCostCalculator {
    min_safe_wait_time: f64,
    backoff_ratio: f64,
}

impl WaitTimeCostCalculator {
    /// The safe wait is a share of the time spent in vehicles.
    pub fn new(params: &TransferOptimizationParams, in_vehicle_duration: i32) -> Self {
        let min_safe_wait_time = (in_vehicle_duration as f64 * params.min_safe_wait_time_factor
            / 100.0)
            .round() as i32;
        Self {
            min_safe_wait_time: min_safe_wait_time
                .clamp(MIN_SAFE_WAIT_TIME_LOWER_BOUND, MIN_SAFE_WAIT_TIME_UPPER_BOUND)
                as f64,
            backoff_ratio: params.wait_time_backoff_ratio.max(1.0),
        }
    }

    pub fn min_safe_wait_time(&self) -> i32 {
        self.min_safe_wait_time as i32
    }

    pub fn cost(&self, wait: i32) -> i32 {
        let t0 = self.min_safe_wait_time;
        let n = self.backoff_ratio;
        let seconds = n * t0 / (1.0 + (n - 1.0) * wait.max(0) as f64 / t0);
        (seconds * COST_UNITS_PER_SECOND as f64).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_waits_cost_less() {
        let params = TransferOptimizationParams::default();
        // 5% of one hour and 40 minutes
        let calculator = WaitTimeCostCalculator::new(&params, 100 * 60);
        assert_eq!(calculator.min_safe_wait_time(), 300);
        assert_eq!(calculator.cost(0), 4 * 300 * COST_UNITS_PER_SECOND);
        assert_eq!(calculator.cost(300), 300 * COST_UNITS_PER_SECOND);
        assert!(calculator.cost(600) < calculator.cost(300));
    }

    #[test]
    fn safe_wait_is_bounded() {
        let params = TransferOptimizationParams::default();
        let short = WaitTimeCostCalculator::new(&params, 10 * 60);
        assert_eq!(short.min_safe_wait_time(), MIN_SAFE_WAIT_TIME_LOWER_BOUND);
        let long = WaitTimeCostCalculator::new(&params, 48 * 3600);
        assert_eq!(long.min_safe_wait_time(), MIN_SAFE_WAIT_TIME_UPPER_BOUND);
    }
}
