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

use super::time_calculator::TimeCalculator;
use crate::{config::CostParams, time::Time, transit_data::StopIdx};

/// One second of a reluctance of `1.0` costs this many units.
pub const COST_UNITS_PER_SECOND: i32 = 100;

pub fn to_cost_factor(reluctance: f64) -> i32 {
    (reluctance * COST_UNITS_PER_SECOND as f64).round() as i32
}

pub fn seconds_to_cost(seconds: i32) -> i32 {
    seconds * COST_UNITS_PER_SECOND
}

/// Cost of walking `duration` seconds with the given reluctance.
pub fn walk_cost(walk_reluctance: f64, duration: i32) -> i32 {
    to_cost_factor(walk_reluctance) * duration
}

/// Generalized cost (`c1`) of the legs of a journey.
///
/// The cost of a path does not depend on the direction of the search that
/// found it : a reverse search adds the same amounts, in the opposite order.
#[derive(Debug, Clone)]
pub struct CostCalculator {
    board_cost: i32,
    transfer_cost: i32,
    wait_factor: i32,
    walk_factor: i32,
    transit_factor: i32,
    stop_costs: Option<Vec<i32>>,
}

impl CostCalculator {
    pub fn new(params: &CostParams) -> Self {
        Self {
            board_cost: seconds_to_cost(params.board_cost.as_secs()),
            transfer_cost: seconds_to_cost(params.transfer_cost.as_secs()),
            wait_factor: to_cost_factor(params.wait_reluctance),
            walk_factor: to_cost_factor(params.walk_reluctance),
            transit_factor: to_cost_factor(params.transit_reluctance),
            stop_costs: params
                .stop_costs
                .as_ref()
                .map(|costs| costs.iter().map(|cost| seconds_to_cost(*cost as i32)).collect()),
        }
    }

    pub fn transfer_cost(&self) -> i32 {
        self.transfer_cost
    }

    pub fn stop_cost(&self, stop: StopIdx) -> i32 {
        self.stop_costs
            .as_ref()
            .and_then(|costs| costs.get(stop).copied())
            .unwrap_or(0)
    }

    pub fn waiting_cost(&self, duration: i32) -> i32 {
        self.wait_factor * duration
    }

    pub fn walk_cost(&self, duration: i32) -> i32 {
        self.walk_factor * duration
    }

    pub fn riding_cost(&self, duration: i32) -> i32 {
        self.transit_factor * duration
    }

    /// Cost of boarding at `stop` after waiting `wait_time` seconds.
    pub fn boarding_cost(&self, first_ride: bool, wait_time: i32, stop: StopIdx) -> i32 {
        let transfer_cost = if first_ride { 0 } else { self.transfer_cost };
        self.board_cost + transfer_cost + self.waiting_cost(wait_time) + self.stop_cost(stop)
    }

    /// Cost of a ride, relative to its boarding time.
    ///
    /// Rides on the same trip with different boardings compare on this value :
    /// adding the riding cost up to the alight time gives the full cost.
    pub fn on_trip_relative_cost(
        &self,
        calculator: &TimeCalculator,
        board_cost: i32,
        board_time: Time,
    ) -> i32 {
        board_cost - self.transit_factor * calculator.sign() * board_time
    }

    pub fn transit_arrival_cost(
        &self,
        calculator: &TimeCalculator,
        relative_cost: i32,
        alight_slack: i32,
        alight_time: Time,
        alight_stop: StopIdx,
    ) -> i32 {
        relative_cost
            + self.transit_factor * calculator.sign() * alight_time
            + self.waiting_cost(alight_slack)
            + self.stop_cost(alight_stop)
    }

    /// Lower bound of the cost of reaching the destination with at least
    /// `min_rides` rides in `min_travel_duration` seconds.
    pub fn min_cost(
        &self,
        min_travel_duration: i32,
        min_rides: usize,
        max_egress_duration: i32,
        min_egress_cost: i32,
    ) -> i32 {
        let rides = min_rides as i32;
        let rides_cost = self.board_cost * rides + self.transfer_cost * (rides - 1).max(0);
        let min_factor = self
            .wait_factor
            .min(self.walk_factor)
            .min(self.transit_factor);
        let travelling = (min_travel_duration - max_egress_duration).max(0);
        rides_cost + min_factor * travelling + min_egress_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SearchDirection;

    #[test]
    fn ride_cost_is_the_same_in_both_directions() {
        let cost = CostCalculator::new(&CostParams::default());
        let forward = TimeCalculator::new(SearchDirection::Forward);
        let reverse = TimeCalculator::new(SearchDirection::Reverse);

        // board at 1000, alight at 1600
        let board = cost.boarding_cost(true, 30, 0);
        let relative = cost.on_trip_relative_cost(&forward, board, 1000);
        let forward_cost = cost.transit_arrival_cost(&forward, relative, 10, 1600, 1);

        // reverse : "board" at 1600, "alight" at 1000
        let board = cost.boarding_cost(true, 10, 1);
        let relative = cost.on_trip_relative_cost(&reverse, board, 1600);
        let reverse_cost = cost.transit_arrival_cost(&reverse, relative, 30, 1000, 0);

        assert_eq!(forward_cost, reverse_cost);
        assert_eq!(forward_cost, 6000 + 40 * 100 + 600 * 100);
    }

    #[test]
    fn min_cost() {
        let cost = CostCalculator::new(&CostParams::default());
        assert_eq!(cost.min_cost(100, 0, 100, 5), 5);
        assert_eq!(
            cost.min_cost(700, 2, 100, 0),
            2 * 6000 + 12000 + 600 * 100
        );
        assert_eq!(walk_cost(2.0, 60), 12000);
    }
}
