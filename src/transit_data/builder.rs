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

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{
    pattern::{Pattern, StopIdx, TripSchedule},
    transfer::Transfer,
    DataError, TransitData,
};
use crate::time::parse_time;

/// Builder used to easily create a [`TransitData`].
///
/// Stops are created on first use, from their name.
///
/// ```
/// # use rangeraptor::transit_data::TransitDataBuilder;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = TransitDataBuilder::new()
///     .pattern("P", |p| {
///         p.stops(&["A", "B", "C"])
///             .trip("P1", &["08:00", "08:10", "08:20"])
///             .trip("P2", &["09:00", "09:10", "09:20"]);
///     })
///     .transfer("B", "D", 120)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TransitDataBuilder {
    stop_names: Vec<String>,
    stop_by_name: HashMap<String, StopIdx>,
    patterns: Vec<PatternDraft>,
    transfers: Vec<Transfer>,
}

#[derive(Debug, Default)]
struct PatternDraft {
    name: String,
    stops: Vec<StopIdx>,
    no_boarding: Vec<usize>,
    no_alighting: Vec<usize>,
    trips: Vec<TripDraft>,
}

#[derive(Debug)]
struct TripDraft {
    id: String,
    // (arrival, departure)
    times: Vec<(String, String)>,
}

/// Builder used to fill one pattern, see [`TransitDataBuilder::pattern`].
pub struct PatternBuilder<'a> {
    builder: &'a mut TransitDataBuilder,
    draft_idx: usize,
}

impl TransitDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn stop_idx_or_create(&mut self, name: &str) -> StopIdx {
        if let Some(idx) = self.stop_by_name.get(name) {
            return *idx;
        }
        let idx = self.stop_names.len();
        self.stop_names.push(name.to_string());
        self.stop_by_name.insert(name.to_string(), idx);
        idx
    }

    /// Declare a stop, even if no pattern serves it.
    pub fn stop(mut self, name: &str) -> Self {
        self.stop_idx_or_create(name);
        self
    }

    /// Add a new pattern to the network
    ///
    /// ```
    /// # use rangeraptor::transit_data::TransitDataBuilder;
    /// # fn main() {
    /// let data = TransitDataBuilder::new()
    ///     .pattern("loop", |p| {
    ///         p.stops(&["A", "B", "A"])
    ///             .no_boarding_at(1)
    ///             .trip_with_dwell("L1", &[("10:00", "10:00"), ("10:05", "10:06"), ("10:10", "10:10")]);
    ///     })
    ///     .build();
    /// # assert!(data.is_ok());
    /// # }
    /// ```
    pub fn pattern<F>(mut self, name: &str, mut pattern_initer: F) -> Self
    where
        F: FnMut(PatternBuilder),
    {
        let draft_idx = self.patterns.len();
        self.patterns.push(PatternDraft {
            name: name.to_string(),
            ..Default::default()
        });
        let pattern_builder = PatternBuilder {
            builder: &mut self,
            draft_idx,
        };
        pattern_initer(pattern_builder);
        self
    }

    /// Add a walking transfer of `duration` seconds.
    pub fn transfer(self, from: &str, to: &str, duration: i32) -> Self {
        self.transfer_with(from, to, duration, |_| {})
    }

    /// Add a transfer and set its constraint or priority.
    ///
    /// ```
    /// # use rangeraptor::transit_data::{TransitDataBuilder, TransferConstraint};
    /// # fn main() {
    /// let data = TransitDataBuilder::new()
    ///     .transfer_with("A", "B", 60, |transfer| {
    ///         transfer.constraint = Some(TransferConstraint::Guaranteed);
    ///     })
    ///     .build();
    /// # assert!(data.is_ok());
    /// # }
    /// ```
    pub fn transfer_with<F>(mut self, from: &str, to: &str, duration: i32, transfer_initer: F) -> Self
    where
        F: FnOnce(&mut Transfer),
    {
        let from_stop = self.stop_idx_or_create(from);
        let to_stop = self.stop_idx_or_create(to);
        let mut transfer = Transfer::new(from_stop, to_stop, duration);
        transfer_initer(&mut transfer);
        self.transfers.push(transfer);
        self
    }

    pub fn build(self) -> Result<TransitData, DataError> {
        let nb_of_stops = self.stop_names.len();
        let mut patterns = Vec::with_capacity(self.patterns.len());
        let mut trip_ids = HashSet::new();
        for (idx, draft) in self.patterns.into_iter().enumerate() {
            let pattern = build_pattern(idx, draft, &mut trip_ids)?;
            patterns.push(pattern);
        }

        let mut patterns_at_stop = vec![Vec::new(); nb_of_stops];
        for pattern in &patterns {
            for (position, stop) in pattern.stops.iter().enumerate() {
                patterns_at_stop[*stop].push((pattern.idx, position));
            }
        }

        let mut transfers_from = vec![Vec::new(); nb_of_stops];
        let mut transfers_to = vec![Vec::new(); nb_of_stops];
        for transfer in self.transfers {
            if transfer.duration < 0 {
                return Err(DataError::NegativeTransferDuration {
                    from: self.stop_names[transfer.from_stop].clone(),
                    to: self.stop_names[transfer.to_stop].clone(),
                });
            }
            transfers_to[transfer.to_stop].push(transfer.clone());
            transfers_from[transfer.from_stop].push(transfer);
        }

        let data = TransitData {
            stop_names: self.stop_names,
            stop_by_name: self.stop_by_name,
            patterns,
            patterns_at_stop,
            transfers_from,
            transfers_to,
        };
        debug!(
            "Transit data built : {} stops, {} patterns, {} trips, {} transfers",
            data.stop_names.len(),
            data.patterns.len(),
            data.nb_of_trips(),
            data.nb_of_transfers()
        );
        Ok(data)
    }
}

impl<'a> PatternBuilder<'a> {
    fn draft(&mut self) -> &mut PatternDraft {
        &mut self.builder.patterns[self.draft_idx]
    }

    /// Set the stops served by the pattern, in order.
    pub fn stops(mut self, names: &[&str]) -> Self {
        let stops: Vec<StopIdx> = names
            .iter()
            .map(|name| self.builder.stop_idx_or_create(name))
            .collect();
        self.draft().stops = stops;
        self
    }

    /// Add a trip which arrives and departs at the same time at each stop.
    pub fn trip(mut self, id: &str, times: &[&str]) -> Self {
        let times = times
            .iter()
            .map(|time| (time.to_string(), time.to_string()))
            .collect();
        self.draft().trips.push(TripDraft {
            id: id.to_string(),
            times,
        });
        self
    }

    /// Add a trip given by its `(arrival, departure)` at each stop.
    pub fn trip_with_dwell(mut self, id: &str, times: &[(&str, &str)]) -> Self {
        let times = times
            .iter()
            .map(|(arrival, departure)| (arrival.to_string(), departure.to_string()))
            .collect();
        self.draft().trips.push(TripDraft {
            id: id.to_string(),
            times,
        });
        self
    }

    pub fn no_boarding_at(mut self, position: usize) -> Self {
        self.draft().no_boarding.push(position);
        self
    }

    pub fn no_alighting_at(mut self, position: usize) -> Self {
        self.draft().no_alighting.push(position);
        self
    }
}

fn build_pattern(
    idx: usize,
    draft: PatternDraft,
    trip_ids: &mut HashSet<String>,
) -> Result<Pattern, DataError> {
    let nb_of_positions = draft.stops.len();
    if nb_of_positions < 2 {
        return Err(DataError::PatternTooShort {
            pattern: draft.name,
        });
    }

    // boarding at the last stop and alighting at the first one are never possible
    let mut can_board: Vec<bool> = (0..nb_of_positions)
        .map(|position| position + 1 < nb_of_positions)
        .collect();
    let mut can_alight: Vec<bool> = (0..nb_of_positions).map(|position| position > 0).collect();
    for (restricted, flags) in [
        (&draft.no_boarding, &mut can_board),
        (&draft.no_alighting, &mut can_alight),
    ] {
        for position in restricted {
            let flag = flags
                .get_mut(*position)
                .ok_or_else(|| DataError::BoardAlightFlagOutOfRange {
                    pattern: draft.name.clone(),
                    position: *position,
                })?;
            *flag = false;
        }
    }

    let mut trips = Vec::with_capacity(draft.trips.len());
    for trip_draft in draft.trips {
        if !trip_ids.insert(trip_draft.id.clone()) {
            return Err(DataError::DuplicateTrip { trip: trip_draft.id });
        }
        if trip_draft.times.len() != nb_of_positions {
            return Err(DataError::WrongNumberOfTimes {
                pattern: draft.name,
                trip: trip_draft.id,
                expected: nb_of_positions,
                given: trip_draft.times.len(),
            });
        }
        let mut arrivals = Vec::with_capacity(nb_of_positions);
        let mut departures = Vec::with_capacity(nb_of_positions);
        for (arrival, departure) in &trip_draft.times {
            for (time, target) in [(arrival, &mut arrivals), (departure, &mut departures)] {
                let parsed = parse_time(time).map_err(|_| DataError::InvalidTime {
                    pattern: draft.name.clone(),
                    trip: trip_draft.id.clone(),
                    time: time.clone(),
                })?;
                target.push(parsed);
            }
        }
        for position in 0..nb_of_positions {
            if departures[position] < arrivals[position] {
                return Err(DataError::NegativeDwellTime {
                    trip: trip_draft.id,
                    position,
                });
            }
            if position > 0 && arrivals[position] < departures[position - 1] {
                return Err(DataError::NegativeHopTime {
                    trip: trip_draft.id,
                    position,
                });
            }
        }
        trips.push(TripSchedule {
            id: trip_draft.id,
            pattern_idx: idx,
            sort_index: 0,
            arrivals,
            departures,
        });
    }

    trips.sort_by_key(|trip| (trip.departures[0], trip.arrivals[nb_of_positions - 1]));
    for pair in trips.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        let overtakes = (0..nb_of_positions).any(|position| {
            later.departures[position] < earlier.departures[position]
                || later.arrivals[position] < earlier.arrivals[position]
        });
        if overtakes {
            return Err(DataError::OvertakingTrips {
                pattern: draft.name,
                trip: later.id.clone(),
                overtaken: earlier.id.clone(),
            });
        }
    }
    for (sort_index, trip) in trips.iter_mut().enumerate() {
        trip.sort_index = sort_index;
    }

    let (min_arrival_offsets, min_departure_offsets) = min_offsets(&trips, nb_of_positions);
    Ok(Pattern {
        idx,
        name: draft.name,
        stops: draft.stops,
        can_board,
        can_alight,
        trips,
        min_arrival_offsets,
        min_departure_offsets,
    })
}

/// Sums of the shortest hop and dwell times found among `trips`.
fn min_offsets(trips: &[TripSchedule], nb_of_positions: usize) -> (Vec<i32>, Vec<i32>) {
    let mut arrival_offsets = vec![0; nb_of_positions];
    let mut departure_offsets = vec![0; nb_of_positions];
    for position in 0..nb_of_positions {
        if position > 0 {
            let min_hop = trips
                .iter()
                .map(|trip| trip.arrivals[position] - trip.departures[position - 1])
                .min()
                .unwrap_or(0);
            arrival_offsets[position] = departure_offsets[position - 1] + min_hop;
        }
        let min_dwell = trips
            .iter()
            .map(|trip| trip.departures[position] - trip.arrivals[position])
            .min()
            .unwrap_or(0);
        departure_offsets[position] = arrival_offsets[position] + min_dwell;
    }
    (arrival_offsets, departure_offsets)
}
