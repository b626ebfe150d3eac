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

mod builder;
mod pattern;
mod transfer;
pub mod trip_search;

pub use builder::{PatternBuilder, TransitDataBuilder};
pub use pattern::{Pattern, StopIdx, TripRef, TripSchedule};
pub use transfer::{
    transfer_priority_cost, Transfer, TransferConstraint, TransferPriority,
    DEFAULT_PRIORITY_COST, GUARANTEED_PRIORITY_COST, STAY_SEATED_PRIORITY_COST,
};

use std::collections::HashMap;

/// Read-only view of the network consumed by the search.
///
/// The engine never mutates the data it is given, so one provider can be
/// shared between several concurrent searches.
pub trait TransitDataProvider {
    /// Stops are identified by an index in `0..nb_of_stops()`.
    fn nb_of_stops(&self) -> usize;

    fn nb_of_patterns(&self) -> usize;

    fn stop_name(&self, stop: StopIdx) -> &str;

    fn pattern(&self, pattern_idx: usize) -> &Pattern;

    /// All `(pattern_idx, position)` such that the pattern serves `stop`
    /// at `position`.
    fn patterns_at(&self, stop: StopIdx) -> &[(usize, usize)];

    /// Transfers leaving `stop`, used by a forward search.
    fn transfers_from(&self, stop: StopIdx) -> &[Transfer];

    /// Transfers reaching `stop`, used by a reverse search.
    fn transfers_to(&self, stop: StopIdx) -> &[Transfer];

    fn trip(&self, trip: TripRef) -> &TripSchedule {
        self.pattern(trip.pattern_idx).trip(trip.trip_idx)
    }

    fn find_transfer(&self, from_stop: StopIdx, to_stop: StopIdx) -> Option<&Transfer> {
        self.transfers_from(from_stop)
            .iter()
            .find(|transfer| transfer.to_stop == to_stop)
    }
}

/// In-memory network, built with a [`TransitDataBuilder`].
#[derive(Debug, Clone)]
pub struct TransitData {
    pub(crate) stop_names: Vec<String>,
    pub(crate) stop_by_name: HashMap<String, StopIdx>,
    pub(crate) patterns: Vec<Pattern>,
    pub(crate) patterns_at_stop: Vec<Vec<(usize, usize)>>,
    pub(crate) transfers_from: Vec<Vec<Transfer>>,
    pub(crate) transfers_to: Vec<Vec<Transfer>>,
}

impl TransitData {
    pub fn stop_idx(&self, name: &str) -> Option<StopIdx> {
        self.stop_by_name.get(name).copied()
    }

    pub fn pattern_by_name(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.name() == name)
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn nb_of_trips(&self) -> usize {
        self.patterns.iter().map(|pattern| pattern.trips().len()).sum()
    }

    pub fn nb_of_transfers(&self) -> usize {
        self.transfers_from.iter().map(Vec::len).sum()
    }
}

impl TransitDataProvider for TransitData {
    fn nb_of_stops(&self) -> usize {
        self.stop_names.len()
    }

    fn nb_of_patterns(&self) -> usize {
        self.patterns.len()
    }

    fn stop_name(&self, stop: StopIdx) -> &str {
        &self.stop_names[stop]
    }

    fn pattern(&self, pattern_idx: usize) -> &Pattern {
        &self.patterns[pattern_idx]
    }

    fn patterns_at(&self, stop: StopIdx) -> &[(usize, usize)] {
        &self.patterns_at_stop[stop]
    }

    fn transfers_from(&self, stop: StopIdx) -> &[Transfer] {
        &self.transfers_from[stop]
    }

    fn transfers_to(&self, stop: StopIdx) -> &[Transfer] {
        &self.transfers_to[stop]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    PatternTooShort {
        pattern: String,
    },
    WrongNumberOfTimes {
        pattern: String,
        trip: String,
        expected: usize,
        given: usize,
    },
    InvalidTime {
        pattern: String,
        trip: String,
        time: String,
    },
    NegativeDwellTime {
        trip: String,
        position: usize,
    },
    NegativeHopTime {
        trip: String,
        position: usize,
    },
    OvertakingTrips {
        pattern: String,
        trip: String,
        overtaken: String,
    },
    DuplicateTrip {
        trip: String,
    },
    BoardAlightFlagOutOfRange {
        pattern: String,
        position: usize,
    },
    NegativeTransferDuration {
        from: String,
        to: String,
    },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::PatternTooShort { pattern } => {
                write!(f, "Pattern {} must serve at least two stops.", pattern)
            }
            DataError::WrongNumberOfTimes {
                pattern,
                trip,
                expected,
                given,
            } => write!(
                f,
                "Trip {} of pattern {} has {} stop times, but the pattern has {} stops.",
                trip, pattern, given, expected
            ),
            DataError::InvalidTime {
                pattern,
                trip,
                time,
            } => write!(
                f,
                "Trip {} of pattern {} has an invalid time `{}`.",
                trip, pattern, time
            ),
            DataError::NegativeDwellTime { trip, position } => write!(
                f,
                "Trip {} departs before it arrives at position {}.",
                trip, position
            ),
            DataError::NegativeHopTime { trip, position } => write!(
                f,
                "Trip {} arrives at position {} before leaving the previous stop.",
                trip, position
            ),
            DataError::OvertakingTrips {
                pattern,
                trip,
                overtaken,
            } => write!(
                f,
                "In pattern {}, trip {} overtakes trip {}.",
                pattern, trip, overtaken
            ),
            DataError::DuplicateTrip { trip } => write!(f, "Trip {} is defined twice.", trip),
            DataError::BoardAlightFlagOutOfRange { pattern, position } => write!(
                f,
                "Pattern {} has no position {} to restrict boarding or alighting.",
                pattern, position
            ),
            DataError::NegativeTransferDuration { from, to } => write!(
                f,
                "Transfer from {} to {} has a negative duration.",
                from, to
            ),
        }
    }
}
