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
use crate::{config::SlackParams, time::Time};

/// Board, alight and transfer slacks, seen from the search.
///
/// A reverse search boards where the traveller alights, so the roles of
/// the board and alight slacks are swapped.
#[derive(Debug, Clone, Copy)]
pub struct SlackProvider {
    board_slack: i32,
    alight_slack: i32,
    transfer_slack: i32,
    calculator: TimeCalculator,
}

impl SlackProvider {
    pub fn new(params: &SlackParams, calculator: TimeCalculator) -> Self {
        Self {
            board_slack: params.board_slack.as_secs(),
            alight_slack: params.alight_slack.as_secs(),
            transfer_slack: params.transfer_slack.as_secs(),
            calculator,
        }
    }

    pub fn board_slack(&self) -> i32 {
        self.board_slack
    }

    pub fn alight_slack(&self) -> i32 {
        self.alight_slack
    }

    pub fn transfer_slack(&self) -> i32 {
        self.transfer_slack
    }

    pub fn search_board_slack(&self) -> i32 {
        if self.calculator.search_forward() {
            self.board_slack
        } else {
            self.alight_slack
        }
    }

    pub fn search_alight_slack(&self) -> i32 {
        if self.calculator.search_forward() {
            self.alight_slack
        } else {
            self.board_slack
        }
    }

    /// Slack needed between an arrival at a stop and the next boarding.
    ///
    /// The first ride of a journey only needs the board slack, a boarding
    /// following a facilitated transfer needs none.
    pub fn boarding_slack(&self, first_ride: bool, facilitated: bool) -> i32 {
        if facilitated {
            0
        } else if first_ride {
            self.search_board_slack()
        } else {
            self.search_board_slack() + self.transfer_slack
        }
    }

    pub fn earliest_board_time(&self, previous_time: Time, first_ride: bool, facilitated: bool) -> Time {
        self.calculator
            .plus_duration(previous_time, self.boarding_slack(first_ride, facilitated))
    }

    /// Time at which the traveller is free at the stop after leaving the vehicle.
    pub fn stop_arrival_time(&self, alight_time: Time) -> Time {
        self.calculator
            .plus_duration(alight_time, self.search_alight_slack())
    }

    /// Inverse of [`Self::stop_arrival_time`].
    pub fn alight_time(&self, stop_arrival_time: Time) -> Time {
        self.calculator
            .minus_duration(stop_arrival_time, self.search_alight_slack())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{request::SearchDirection, time::PositiveDuration};

    fn params() -> SlackParams {
        SlackParams {
            board_slack: PositiveDuration::from_seconds(30),
            alight_slack: PositiveDuration::from_seconds(10),
            transfer_slack: PositiveDuration::from_seconds(60),
        }
    }

    #[test]
    fn forward_slacks() {
        let slack = SlackProvider::new(&params(), TimeCalculator::new(SearchDirection::Forward));
        assert_eq!(slack.earliest_board_time(1000, true, false), 1030);
        assert_eq!(slack.earliest_board_time(1000, false, false), 1090);
        assert_eq!(slack.earliest_board_time(1000, false, true), 1000);
        assert_eq!(slack.stop_arrival_time(2000), 2010);
        assert_eq!(slack.alight_time(2010), 2000);
    }

    #[test]
    fn reverse_slacks_are_swapped() {
        let slack = SlackProvider::new(&params(), TimeCalculator::new(SearchDirection::Reverse));
        assert_eq!(slack.earliest_board_time(1000, true, false), 990);
        assert_eq!(slack.earliest_board_time(1000, false, false), 930);
        assert_eq!(slack.stop_arrival_time(2000), 1970);
    }
}
