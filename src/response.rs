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

use std::fmt::Display;

use crate::{
    path::Path,
    request::SearchDirection,
    time::{format_time, Time, UNREACHED_FORWARD, UNREACHED_REVERSE},
    transit_data::{StopIdx, TransitDataProvider},
};

/// Best values reached at each stop by a search, over all its iterations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopArrivalsSummary {
    pub direction: SearchDirection,
    pub best_times: Vec<Time>,
    /// best times of the arrivals made on board
    pub best_transit_times: Vec<Time>,
    /// `u8::MAX` when the stop is not reached
    pub min_rides: Vec<u8>,
}

impl StopArrivalsSummary {
    pub fn new(
        direction: SearchDirection,
        best_times: Vec<Time>,
        best_transit_times: Vec<Time>,
        min_rides: Vec<u8>,
    ) -> Self {
        Self {
            direction,
            best_times,
            best_transit_times,
            min_rides,
        }
    }

    /// Nothing reached, as returned when there is no access or no egress.
    pub fn unreached(direction: SearchDirection, nb_of_stops: usize) -> Self {
        let unreached = unreached_time(direction);
        Self::new(
            direction,
            vec![unreached; nb_of_stops],
            vec![unreached; nb_of_stops],
            vec![u8::MAX; nb_of_stops],
        )
    }

    pub fn is_reached(&self, stop: StopIdx) -> bool {
        self.best_times[stop] != unreached_time(self.direction)
    }

    pub fn best_time(&self, stop: StopIdx) -> Option<Time> {
        self.is_reached(stop).then(|| self.best_times[stop])
    }

    pub fn best_transit_time(&self, stop: StopIdx) -> Option<Time> {
        let time = self.best_transit_times[stop];
        (time != unreached_time(self.direction)).then(|| time)
    }

    pub fn min_rides(&self, stop: StopIdx) -> Option<u8> {
        let rides = self.min_rides[stop];
        (rides != u8::MAX).then(|| rides)
    }

    pub fn nb_of_reached_stops(&self) -> usize {
        (0..self.best_times.len())
            .filter(|stop| self.is_reached(*stop))
            .count()
    }
}

fn unreached_time(direction: SearchDirection) -> Time {
    if direction.is_forward() {
        UNREACHED_FORWARD
    } else {
        UNREACHED_REVERSE
    }
}

#[derive(Debug, Clone)]
pub struct RaptorResponse {
    pub paths: Vec<Path>,
    pub stop_arrivals: StopArrivalsSummary,
    pub nb_of_iterations: usize,
    pub nb_of_rounds: usize,
    /// the search was interrupted by its time limit, `paths` may be incomplete
    pub timed_out: bool,
}

impl RaptorResponse {
    pub fn empty(direction: SearchDirection, nb_of_stops: usize) -> Self {
        Self {
            paths: Vec::new(),
            stop_arrivals: StopArrivalsSummary::unreached(direction, nb_of_stops),
            nb_of_iterations: 0,
            nb_of_rounds: 0,
            timed_out: false,
        }
    }

    pub fn display<'a, Data: TransitDataProvider>(
        &'a self,
        data: &'a Data,
    ) -> ResponseDisplay<'a, Data> {
        ResponseDisplay {
            response: self,
            data,
        }
    }
}

pub struct ResponseDisplay<'a, Data> {
    response: &'a RaptorResponse,
    data: &'a Data,
}

impl<'a, Data: TransitDataProvider> Display for ResponseDisplay<'a, Data> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} paths, {} iterations, {} rounds{}",
            self.response.paths.len(),
            self.response.nb_of_iterations,
            self.response.nb_of_rounds,
            if self.response.timed_out { ", timed out" } else { "" }
        )?;
        for path in self.response.paths.iter() {
            writeln!(
                f,
                "  {} (iteration {})",
                path.display(self.data),
                format_time(path.iteration_departure_time)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreached_stops() {
        let summary = StopArrivalsSummary::new(
            SearchDirection::Reverse,
            vec![100, UNREACHED_REVERSE],
            vec![UNREACHED_REVERSE, UNREACHED_REVERSE],
            vec![1, u8::MAX],
        );
        assert_eq!(summary.best_time(0), Some(100));
        assert_eq!(summary.best_time(1), None);
        assert_eq!(summary.best_transit_time(0), None);
        assert_eq!(summary.min_rides(1), None);
        assert_eq!(summary.nb_of_reached_stops(), 1);
    }
}
