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

use crate::{
    request::{SearchDirection, SearchParams},
    time::{Time, UNREACHED_FORWARD, UNREACHED_REVERSE},
    transit_data::{
        trip_search::{self, TripBoarding},
        Pattern, StopIdx, Transfer, TransitDataProvider, TripSchedule,
    },
};

/// Step between two iterations of a range search.
pub const ITERATION_STEP: i32 = 60;

/// Hides the direction of the search from the routing strategies.
///
/// A forward search moves forward in time along the patterns, from the
/// origin to the destination. A reverse search moves backward in time,
/// from the destination to the origin : it "boards" a trip where the
/// traveller alights, and "alights" where the traveller boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeCalculator {
    direction: SearchDirection,
}

impl TimeCalculator {
    pub fn new(direction: SearchDirection) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn search_forward(&self) -> bool {
        self.direction.is_forward()
    }

    pub fn plus_duration(&self, time: Time, duration: i32) -> Time {
        if self.search_forward() {
            time + duration
        } else {
            time - duration
        }
    }

    pub fn minus_duration(&self, time: Time, duration: i32) -> Time {
        if self.search_forward() {
            time - duration
        } else {
            time + duration
        }
    }

    /// Elapsed time from `from` to `to`, following the search.
    pub fn duration(&self, from: Time, to: Time) -> i32 {
        if self.search_forward() {
            to - from
        } else {
            from - to
        }
    }

    /// `left` is strictly better than `right` : earlier in a forward search,
    /// later in a reverse one.
    pub fn is_better(&self, left: Time, right: Time) -> bool {
        if self.search_forward() {
            left < right
        } else {
            left > right
        }
    }

    pub fn is_better_or_equal(&self, left: Time, right: Time) -> bool {
        left == right || self.is_better(left, right)
    }

    pub fn unreached(&self) -> Time {
        if self.search_forward() {
            UNREACHED_FORWARD
        } else {
            UNREACHED_REVERSE
        }
    }

    pub fn is_unreached(&self, time: Time) -> bool {
        time == self.unreached()
    }

    /// `time` lies beyond the latest arrival (forward) or before the earliest
    /// departure (reverse) allowed by the request.
    pub fn exceeds_time_limit(&self, time: Time, limit: Option<Time>) -> bool {
        limit.map_or(false, |limit| self.is_better(limit, time))
    }

    /// Departure times of the iterations of a range search, in the order they
    /// are run : from the end of the window back to its start, so that the
    /// results of an iteration can be reused by the next one.
    pub fn iteration_times(&self, params: &SearchParams) -> Vec<Time> {
        let window = params.search_window.max(0);
        let nb_of_steps = window / ITERATION_STEP;
        if self.search_forward() {
            let start = params.earliest_departure_time.unwrap_or(0);
            (0..=nb_of_steps)
                .rev()
                .map(|step| start + step * ITERATION_STEP)
                .collect()
        } else {
            let end = params.latest_arrival_time.unwrap_or(0);
            (0..=nb_of_steps)
                .rev()
                .map(|step| end - step * ITERATION_STEP)
                .collect()
        }
    }

    /// The end of the search "opposite" to its iteration times, used to bound
    /// the arrivals.
    pub fn time_limit(&self, params: &SearchParams) -> Option<Time> {
        if self.search_forward() {
            params.latest_arrival_time
        } else {
            params.earliest_departure_time
        }
    }

    /// Positions of the pattern from `first` onwards, in search order.
    pub fn positions_from(&self, first: usize, nb_of_positions: usize) -> Positions {
        if self.search_forward() {
            Positions {
                next: first as isize,
                end: nb_of_positions as isize,
                step: 1,
            }
        } else {
            Positions {
                next: first as isize,
                end: -1,
                step: -1,
            }
        }
    }

    /// First position of a pattern in search order.
    pub fn first_position(&self, nb_of_positions: usize) -> usize {
        if self.search_forward() {
            0
        } else {
            nb_of_positions - 1
        }
    }

    /// `left` is visited before `right` when scanning a pattern.
    pub fn is_before(&self, left: usize, right: usize) -> bool {
        if self.search_forward() {
            left < right
        } else {
            left > right
        }
    }

    pub fn boarding_possible_at(&self, pattern: &Pattern, position: usize) -> bool {
        if self.search_forward() {
            pattern.can_board(position)
        } else {
            pattern.can_alight(position)
        }
    }

    pub fn alighting_possible_at(&self, pattern: &Pattern, position: usize) -> bool {
        if self.search_forward() {
            pattern.can_alight(position)
        } else {
            pattern.can_board(position)
        }
    }

    pub fn board_time(&self, trip: &TripSchedule, position: usize) -> Time {
        if self.search_forward() {
            trip.departure(position)
        } else {
            trip.arrival(position)
        }
    }

    pub fn alight_time(&self, trip: &TripSchedule, position: usize) -> Time {
        if self.search_forward() {
            trip.arrival(position)
        } else {
            trip.departure(position)
        }
    }

    /// Best trip boardable at `position` given the earliest (or latest) board time.
    /// When already riding `on_trip`, only better trips are searched.
    pub fn search_trip(
        &self,
        pattern: &Pattern,
        position: usize,
        time: Time,
        on_trip: Option<usize>,
    ) -> Option<TripBoarding> {
        if self.search_forward() {
            trip_search::earliest_trip_departing_after(pattern, position, time, on_trip)
        } else {
            trip_search::latest_trip_arriving_before(pattern, position, time, on_trip)
        }
    }

    /// Trip `left` departs before trip `right` in a forward search,
    /// after it in a reverse search.
    pub fn is_better_trip(&self, left: usize, right: usize) -> bool {
        if self.search_forward() {
            left < right
        } else {
            left > right
        }
    }

    pub fn transfers<'data, Data: TransitDataProvider>(
        &self,
        data: &'data Data,
        stop: StopIdx,
    ) -> &'data [Transfer] {
        if self.search_forward() {
            data.transfers_from(stop)
        } else {
            data.transfers_to(stop)
        }
    }

    /// Stop reached by following `transfer` in the search direction.
    pub fn transfer_target(&self, transfer: &Transfer) -> StopIdx {
        if self.search_forward() {
            transfer.to_stop
        } else {
            transfer.from_stop
        }
    }

    /// `+1` forward, `-1` reverse : turns a time into a quantity that grows
    /// as the search progresses.
    pub fn sign(&self) -> i32 {
        if self.search_forward() {
            1
        } else {
            -1
        }
    }
}

pub struct Positions {
    next: isize,
    end: isize,
    step: isize,
}

impl Iterator for Positions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next == self.end {
            return None;
        }
        let current = self.next as usize;
        self.next += self.step;
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_reverse_arithmetic() {
        let forward = TimeCalculator::new(SearchDirection::Forward);
        let reverse = TimeCalculator::new(SearchDirection::Reverse);
        assert_eq!(forward.plus_duration(100, 10), 110);
        assert_eq!(reverse.plus_duration(100, 10), 90);
        assert_eq!(forward.duration(100, 110), 10);
        assert_eq!(reverse.duration(110, 100), 10);
        assert!(forward.is_better(10, 20));
        assert!(reverse.is_better(20, 10));
        assert!(!forward.is_better(10, 10));
        assert!(forward.exceeds_time_limit(30, Some(20)));
        assert!(!forward.exceeds_time_limit(20, Some(20)));
        assert!(reverse.exceeds_time_limit(10, Some(20)));
        assert!(!reverse.exceeds_time_limit(30, None));
    }

    #[test]
    fn iterations_run_from_the_end_of_the_window() {
        let params = SearchParams {
            earliest_departure_time: Some(1000),
            latest_arrival_time: Some(5000),
            search_window: 150,
            ..Default::default()
        };
        let forward = TimeCalculator::new(SearchDirection::Forward);
        assert_eq!(forward.iteration_times(&params), vec![1120, 1060, 1000]);
        let reverse = TimeCalculator::new(SearchDirection::Reverse);
        assert_eq!(reverse.iteration_times(&params), vec![4880, 4940, 5000]);
        let single = SearchParams {
            search_window: 0,
            ..params
        };
        assert_eq!(forward.iteration_times(&single), vec![1000]);
    }

    #[test]
    fn positions() {
        let forward = TimeCalculator::new(SearchDirection::Forward);
        let reverse = TimeCalculator::new(SearchDirection::Reverse);
        assert_eq!(forward.positions_from(1, 4).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(reverse.positions_from(2, 4).collect::<Vec<_>>(), vec![2, 1, 0]);
        assert_eq!(reverse.first_position(4), 3);
    }
}
