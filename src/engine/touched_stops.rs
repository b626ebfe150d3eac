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

use crate::transit_data::StopIdx;

/// A set of stops which can be cleared in time proportional to its size.
#[derive(Debug, Clone)]
pub struct TouchedStops {
    is_touched: Vec<bool>,
    stops: Vec<StopIdx>,
}

impl TouchedStops {
    pub fn new(nb_of_stops: usize) -> Self {
        Self {
            is_touched: vec![false; nb_of_stops],
            stops: Vec::new(),
        }
    }

    pub fn insert(&mut self, stop: StopIdx) {
        if !self.is_touched[stop] {
            self.is_touched[stop] = true;
            self.stops.push(stop);
        }
    }

    pub fn contains(&self, stop: StopIdx) -> bool {
        self.is_touched[stop]
    }

    pub fn clear(&mut self) {
        for stop in self.stops.drain(..) {
            self.is_touched[stop] = false;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Touched stops, in the order they were inserted.
    pub fn stops(&self) -> &[StopIdx] {
        &self.stops
    }
}
