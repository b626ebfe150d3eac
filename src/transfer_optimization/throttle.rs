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

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

/// Lets a log message through at most once per interval.
///
/// Shared by every thread of the process when used as a `static`.
pub struct LogThrottle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl LogThrottle {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Calls `log` unless it was already called less than an interval ago.
    /// Returns `true` if `log` was called.
    pub fn throttle<F: FnOnce()>(&self, log: F) -> bool {
        let now = Instant::now();
        let mut last = match self.last.lock() {
            Ok(last) => last,
            Err(poisoned) => poisoned.into_inner(),
        };
        let pass = match *last {
            Some(previous) => now.duration_since(previous) >= self.interval,
            None => true,
        };
        if pass {
            *last = Some(now);
            drop(last);
            log();
        }
        pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_message_is_dropped() {
        let throttle = LogThrottle::new(Duration::from_secs(3600));
        let mut nb_of_logs = 0;
        assert!(throttle.throttle(|| nb_of_logs += 1));
        assert!(!throttle.throttle(|| nb_of_logs += 1));
        assert_eq!(nb_of_logs, 1);
    }

    #[test]
    fn zero_interval_lets_everything_through() {
        let throttle = LogThrottle::new(Duration::from_secs(0));
        assert!(throttle.throttle(|| ()));
        assert!(throttle.throttle(|| ()));
    }
}
