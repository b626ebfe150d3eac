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

use crate::time::Time;

pub type StopIdx = usize;

/// Identifies a trip inside the network : the pattern it belongs to,
/// and its rank among the (sorted) trips of this pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripRef {
    pub pattern_idx: usize,
    pub trip_idx: usize,
}

#[derive(Debug, Clone)]
pub struct TripSchedule {
    pub(super) id: String,
    pub(super) pattern_idx: usize,
    pub(super) sort_index: usize,
    pub(super) arrivals: Vec<Time>,
    pub(super) departures: Vec<Time>,
}

impl TripSchedule {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern_idx(&self) -> usize {
        self.pattern_idx
    }

    /// Rank of the trip in its pattern. Trips of a pattern never overtake each
    /// other, so a lower index means an earlier trip at every position.
    pub fn trip_sort_index(&self) -> usize {
        self.sort_index
    }

    pub fn trip_ref(&self) -> TripRef {
        TripRef {
            pattern_idx: self.pattern_idx,
            trip_idx: self.sort_index,
        }
    }

    pub fn arrival(&self, position: usize) -> Time {
        self.arrivals[position]
    }

    pub fn departure(&self, position: usize) -> Time {
        self.departures[position]
    }

    pub fn nb_of_positions(&self) -> usize {
        self.departures.len()
    }
}

/// An ordered sequence of stops served by a set of trips.
///
/// A stop may appear several times in the same pattern (loops).
#[derive(Debug, Clone)]
pub struct Pattern {
    pub(super) idx: usize,
    pub(super) name: String,
    pub(super) stops: Vec<StopIdx>,
    pub(super) can_board: Vec<bool>,
    pub(super) can_alight: Vec<bool>,
    pub(super) trips: Vec<TripSchedule>,
    /// lower bounds over all trips of the time from the first departure
    pub(super) min_arrival_offsets: Vec<i32>,
    pub(super) min_departure_offsets: Vec<i32>,
}

impl Pattern {
    pub fn idx(&self) -> usize {
        self.idx
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nb_of_positions(&self) -> usize {
        self.stops.len()
    }

    pub fn stop_at(&self, position: usize) -> StopIdx {
        self.stops[position]
    }

    pub fn stops(&self) -> &[StopIdx] {
        &self.stops
    }

    pub fn can_board(&self, position: usize) -> bool {
        self.can_board[position]
    }

    pub fn can_alight(&self, position: usize) -> bool {
        self.can_alight[position]
    }

    /// Trips sorted by departure at the first position.
    pub fn trips(&self) -> &[TripSchedule] {
        &self.trips
    }

    pub fn trip(&self, trip_idx: usize) -> &TripSchedule {
        &self.trips[trip_idx]
    }

    pub fn has_trips(&self) -> bool {
        !self.trips.is_empty()
    }

    /// Lower bound, over every trip, of a ride between two positions.
    /// The positions may be given in either order.
    pub fn min_ride_duration(&self, board_position: usize, alight_position: usize) -> i32 {
        let (from, to) = if board_position <= alight_position {
            (board_position, alight_position)
        } else {
            (alight_position, board_position)
        };
        (self.min_arrival_offsets[to] - self.min_departure_offsets[from]).max(0)
    }

    /// Lower bound, over every trip, of the time between the boardings of the
    /// same trip at `from` and at `to`. Boarding at a position means
    /// departing from it when `from < to`, arriving at it otherwise.
    pub fn min_duration_between_boardings(&self, from: usize, to: usize) -> i32 {
        if from <= to {
            self.min_departure_offsets[to] - self.min_departure_offsets[from]
        } else {
            self.min_arrival_offsets[from] - self.min_arrival_offsets[to]
        }
    }

    pub fn positions_of(&self, stop: StopIdx) -> impl Iterator<Item = usize> + '_ {
        self.stops
            .iter()
            .enumerate()
            .filter(move |(_, s)| **s == stop)
            .map(|(position, _)| position)
    }
}
