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

use std::time::{Duration, Instant};

/// Wall-clock budget of a search, checked between iterations and rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    time_limit: Option<Duration>,
    start_time: Instant,
}

impl Deadline {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            time_limit,
            start_time: Instant::now(),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.time_limit
            .map_or(false, |limit| self.start_time.elapsed() >= limit)
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_is_expired_immediately() {
        assert!(Deadline::new(Some(Duration::from_secs(0))).is_expired());
        assert!(!Deadline::new(Some(Duration::from_secs(3600))).is_expired());
        assert!(!Deadline::unlimited().is_expired());
    }
}
