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
    engine::{pareto_set::ParetoComparator, stop_arrival::ArrivalId},
    time::Time,
    transit_data::StopIdx,
};

/// A boarding on a trip of the pattern being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRide {
    pub previous: ArrivalId,
    pub board_stop: StopIdx,
    pub board_position: usize,
    pub board_time: Time,
    pub trip_idx: usize,
    /// cost at boarding minus the riding cost up to the boarding time,
    /// so that rides boarded at different stops compare on the same basis
    pub relative_c1: i32,
    pub c2: u8,
    pub travel_duration_at_board: i32,
}

/// Rides on better trips, or cheaper, or with more pass-through points
/// visited, are kept.
#[derive(Debug, Clone, Copy)]
pub struct PatternRideComparator {
    search_forward: bool,
    with_c2: bool,
}

impl PatternRideComparator {
    pub fn new(search_forward: bool, with_c2: bool) -> Self {
        Self {
            search_forward,
            with_c2,
        }
    }
}

impl ParetoComparator<PatternRide> for PatternRideComparator {
    fn left_dominance_exist(&self, left: &PatternRide, right: &PatternRide) -> bool {
        let better_trip = if self.search_forward {
            left.trip_idx < right.trip_idx
        } else {
            left.trip_idx > right.trip_idx
        };
        better_trip || left.relative_c1 < right.relative_c1 || (self.with_c2 && left.c2 > right.c2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pareto_set::ParetoSet;

    fn ride(trip_idx: usize, relative_c1: i32) -> PatternRide {
        PatternRide {
            previous: ArrivalId::PENDING,
            board_stop: 0,
            board_position: 0,
            board_time: 0,
            trip_idx,
            relative_c1,
            c2: 0,
            travel_duration_at_board: 0,
        }
    }

    #[test]
    fn one_ride_per_trip_and_cost() {
        let mut rides = ParetoSet::new(PatternRideComparator::new(true, false));
        assert!(rides.add(ride(2, 100)));
        assert!(!rides.add(ride(2, 100)));
        assert!(rides.add(ride(1, 200)));
        assert!(rides.add(ride(1, 50)));
        assert_eq!(rides.len(), 1);

        let mut reverse = ParetoSet::new(PatternRideComparator::new(false, false));
        assert!(reverse.add(ride(1, 100)));
        assert!(reverse.add(ride(2, 100)));
        assert_eq!(reverse.len(), 1);
    }
}
