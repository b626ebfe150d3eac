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

//! Searching trips in the schedules of a pattern.
//!
//! Trips of a pattern never overtake each other, so at any position their
//! departures (and arrivals) are sorted and a binary search finds the
//! boardable trip.

use super::pattern::{Pattern, StopIdx, TripSchedule};
use crate::time::Time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripBoarding {
    pub trip_idx: usize,
    /// departure of the trip at the boarding position (forward search)
    /// or its arrival at the alighting position (reverse search)
    pub time: Time,
}

/// Earliest trip departing from `position` at or after `earliest_board_time`.
///
/// When `on_trip` is given, only trips strictly earlier than it are considered.
pub fn earliest_trip_departing_after(
    pattern: &Pattern,
    position: usize,
    earliest_board_time: Time,
    on_trip: Option<usize>,
) -> Option<TripBoarding> {
    let upper_bound = on_trip.unwrap_or_else(|| pattern.trips().len());
    let candidates = &pattern.trips()[..upper_bound];
    let found =
        candidates.partition_point(|trip| trip.departure(position) < earliest_board_time);
    candidates.get(found).map(|trip| TripBoarding {
        trip_idx: found,
        time: trip.departure(position),
    })
}

/// Latest trip arriving at `position` at or before `latest_alight_time`.
///
/// When `on_trip` is given, only trips strictly later than it are considered.
pub fn latest_trip_arriving_before(
    pattern: &Pattern,
    position: usize,
    latest_alight_time: Time,
    on_trip: Option<usize>,
) -> Option<TripBoarding> {
    let lower_bound = on_trip.map_or(0, |trip_idx| trip_idx + 1);
    let trips = pattern.trips();
    if lower_bound >= trips.len() {
        return None;
    }
    let candidates = &trips[lower_bound..];
    let found = candidates.partition_point(|trip| trip.arrival(position) <= latest_alight_time);
    if found == 0 {
        return None;
    }
    let trip_idx = lower_bound + found - 1;
    Some(TripBoarding {
        trip_idx,
        time: trips[trip_idx].arrival(position),
    })
}

/// Positions of a ride on a known trip, when the search only recorded
/// the trip and the stops.
///
/// Returns `(board_position, alight_position)` for the ride that alights at
/// `alight_stop` at exactly `alight_time`, boarding as late as possible at
/// `board_stop` no earlier than `earliest_board_time`.
pub fn find_positions_forward(
    pattern: &Pattern,
    trip: &TripSchedule,
    board_stop: StopIdx,
    earliest_board_time: Time,
    alight_stop: StopIdx,
    alight_time: Time,
) -> Option<(usize, usize)> {
    let nb_of_positions = pattern.nb_of_positions();
    (1..nb_of_positions)
        .filter(|position| {
            pattern.stop_at(*position) == alight_stop
                && pattern.can_alight(*position)
                && trip.arrival(*position) == alight_time
        })
        .find_map(|alight_position| {
            (0..alight_position)
                .rev()
                .find(|position| {
                    pattern.stop_at(*position) == board_stop
                        && pattern.can_board(*position)
                        && trip.departure(*position) >= earliest_board_time
                })
                .map(|board_position| (board_position, alight_position))
        })
}

/// Mirror of [`find_positions_forward`] for a reverse search : the boarding
/// is known exactly and the alighting is the earliest one at `alight_stop`
/// no later than `latest_alight_time`.
pub fn find_positions_reverse(
    pattern: &Pattern,
    trip: &TripSchedule,
    board_stop: StopIdx,
    board_time: Time,
    alight_stop: StopIdx,
    latest_alight_time: Time,
) -> Option<(usize, usize)> {
    let nb_of_positions = pattern.nb_of_positions();
    (0..nb_of_positions)
        .rev()
        .filter(|position| {
            pattern.stop_at(*position) == board_stop
                && pattern.can_board(*position)
                && trip.departure(*position) == board_time
        })
        .find_map(|board_position| {
            (board_position + 1..nb_of_positions)
                .find(|position| {
                    pattern.stop_at(*position) == alight_stop
                        && pattern.can_alight(*position)
                        && trip.arrival(*position) <= latest_alight_time
                })
                .map(|alight_position| (board_position, alight_position))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transit_data::{TransitDataBuilder, TransitDataProvider};

    fn data() -> crate::transit_data::TransitData {
        TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "B", "C"])
                    .trip("P1", &["08:00", "08:10", "08:20"])
                    .trip("P2", &["08:30", "08:40", "08:50"])
                    .trip("P3", &["09:00", "09:10", "09:20"]);
            })
            .build()
            .unwrap()
    }

    #[test]
    fn forward_search() {
        let data = data();
        let pattern = data.pattern(0);
        let found = earliest_trip_departing_after(pattern, 1, 8 * 3600 + 10 * 60, None);
        assert_eq!(found.map(|b| b.trip_idx), Some(0));
        let found = earliest_trip_departing_after(pattern, 1, 8 * 3600 + 11 * 60, None);
        assert_eq!(found.map(|b| b.trip_idx), Some(1));
        // already on P2 : only an earlier trip is of interest
        let found = earliest_trip_departing_after(pattern, 1, 8 * 3600 + 11 * 60, Some(1));
        assert_eq!(found, None);
        assert_eq!(
            earliest_trip_departing_after(pattern, 0, 10 * 3600, None),
            None
        );
    }

    #[test]
    fn reverse_search() {
        let data = data();
        let pattern = data.pattern(0);
        let found = latest_trip_arriving_before(pattern, 2, 8 * 3600 + 55 * 60, None);
        assert_eq!(found.map(|b| b.trip_idx), Some(1));
        let found = latest_trip_arriving_before(pattern, 2, 8 * 3600 + 55 * 60, Some(1));
        assert_eq!(found, None);
        let found = latest_trip_arriving_before(pattern, 2, 9 * 3600 + 30 * 60, Some(0));
        assert_eq!(found.map(|b| b.trip_idx), Some(2));
        assert_eq!(latest_trip_arriving_before(pattern, 2, 8 * 3600, None), None);
    }

    #[test]
    fn positions_on_a_loop() {
        let data = TransitDataBuilder::new()
            .pattern("loop", |p| {
                p.stops(&["A", "B", "A", "C"])
                    .trip("L", &["08:00", "08:05", "08:10", "08:15"]);
            })
            .build()
            .unwrap();
        let pattern = data.pattern(0);
        let trip = pattern.trip(0);
        let a = data.stop_idx("A").unwrap();
        let c = data.stop_idx("C").unwrap();
        // the latest boarding at A is the shortest ride
        assert_eq!(
            find_positions_forward(pattern, trip, a, 8 * 3600, c, 8 * 3600 + 15 * 60),
            Some((2, 3))
        );
        assert_eq!(
            find_positions_reverse(pattern, trip, a, 8 * 3600, c, 9 * 3600),
            Some((0, 3))
        );
    }
}
