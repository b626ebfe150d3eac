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

//! Moves the transfers of the paths found by a multi-criteria search.
//!
//! The search keeps, for a given pair of trips, the first transfer point it
//! finds. Another point may be preferable : a guaranteed transfer, a longer
//! wait that is less likely to be missed, or a cheaper walk. For each path,
//! every feasible way to connect its consecutive trips is enumerated and
//! the best combination is kept, the trips themselves are unchanged.

pub mod throttle;
mod transfer_generator;
mod wait_time_cost;

pub use throttle::LogThrottle;
pub use transfer_generator::{TransferGenerator, TripToTripTransfer};
pub use wait_time_cost::WaitTimeCostCalculator;

use std::{cmp::Ordering, collections::BTreeMap, fmt::Display, time::Duration};

use tracing::{debug, warn};

use crate::{
    config::TransferOptimizationParams,
    engine::{
        cost_calculator::CostCalculator, pass_through::PassThroughPoints, slack::SlackProvider,
        time_calculator::TimeCalculator,
    },
    path::{Path, PathBuilder, PathError, PathLeg, RawLeg},
    request::{RaptorRequest, SearchDirection},
    transit_data::{StopIdx, TransitDataProvider, TripRef},
};

static OPTIMIZATION_FAILURE_LOG: LogThrottle = LogThrottle::new(Duration::from_secs(1));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizeTransferError {
    Path(PathError),
    NoFeasibleTransfer { transit_leg: usize },
    PassThroughPointMissed,
}

impl From<PathError> for OptimizeTransferError {
    fn from(err: PathError) -> Self {
        OptimizeTransferError::Path(err)
    }
}

impl Display for OptimizeTransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizeTransferError::Path(err) => write!(f, "Cannot rebuild the path : {}", err),
            OptimizeTransferError::NoFeasibleTransfer { transit_leg } => write!(
                f,
                "No feasible transfer after transit leg {}",
                transit_leg
            ),
            OptimizeTransferError::PassThroughPointMissed => {
                write!(f, "Every alternative misses a pass-through point")
            }
        }
    }
}

impl std::error::Error for OptimizeTransferError {}

/// The legs of a path from the boarding of one of its rides to its end.
#[derive(Debug, Clone)]
struct Tail {
    legs: Vec<RawLeg>,
    /// pass-through points visited, counted from the end of the path
    progress: u8,
    priority_cost: i32,
    c1: i32,
    wait_time_optimized_cost: i32,
    /// positions of its first connection, earlier is better
    first_transfer: Option<(usize, usize)>,
}

struct Ride {
    trip: TripRef,
    board_position: usize,
    alight_position: usize,
}

pub struct OptimizeTransferService<'a, Data> {
    data: &'a Data,
    params: TransferOptimizationParams,
    generator: TransferGenerator<'a, Data>,
    slack: SlackProvider,
    cost: CostCalculator,
    /// points in reverse order, tails are built from the end of the path
    pass_through: PassThroughPoints,
    request: &'a RaptorRequest,
}

impl<'a, Data: TransitDataProvider> OptimizeTransferService<'a, Data> {
    pub fn new(data: &'a Data, request: &'a RaptorRequest) -> Self {
        let slack = SlackProvider::new(
            &request.slack,
            TimeCalculator::new(SearchDirection::Forward),
        );
        Self {
            data,
            params: request.transfer_optimization,
            generator: TransferGenerator::new(data, slack),
            slack,
            cost: CostCalculator::new(&request.cost),
            pass_through: PassThroughPoints::new(
                request.search_params.pass_through_points.clone(),
                false,
            ),
            request,
        }
    }

    /// Paths without transfer are returned unchanged, as is any path whose
    /// optimization fails. Paths ending up identical are kept once.
    pub fn optimize(&self, paths: Vec<Path>) -> Vec<Path> {
        let nb_of_paths = paths.len();
        let mut optimized: Vec<Path> = Vec::with_capacity(nb_of_paths);
        for path in paths {
            let path = if path.nb_of_transit_legs() < 2 {
                path
            } else {
                match self.optimize_path(&path) {
                    Ok(optimized_path) => optimized_path,
                    Err(err) => {
                        OPTIMIZATION_FAILURE_LOG.throttle(|| {
                            warn!(
                                "Transfer optimization failed, the path is kept as found : {}",
                                err
                            )
                        });
                        path
                    }
                }
            };
            if !optimized
                .iter()
                .any(|other| other.same_itinerary(&path) && other.start_time == path.start_time)
            {
                optimized.push(path);
            }
        }
        debug!(
            "Transfers optimized, {} paths out of {}",
            optimized.len(),
            nb_of_paths
        );
        optimized
    }

    pub fn optimize_path(&self, path: &Path) -> Result<Path, OptimizeTransferError> {
        let legs = path.raw_legs();
        let transit_indexes: Vec<usize> = legs
            .iter()
            .enumerate()
            .filter(|(_, leg)| matches!(leg, RawLeg::Transit { .. }))
            .map(|(idx, _)| idx)
            .collect();
        let (first, last) = match (transit_indexes.first(), transit_indexes.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(path.clone()),
        };
        let rides: Vec<Ride> = transit_indexes
            .iter()
            .filter_map(|idx| match &legs[*idx] {
                RawLeg::Transit {
                    trip,
                    board_position,
                    alight_position,
                } => Some(Ride {
                    trip: *trip,
                    board_position: *board_position,
                    alight_position: *alight_position,
                }),
                _ => None,
            })
            .collect();
        let prefix = &legs[..first];
        let suffix = &legs[last + 1..];
        let wait_cost = WaitTimeCostCalculator::new(&self.params, in_vehicle_duration(path));

        let connections: Vec<Vec<TripToTripTransfer>> = rides
            .windows(2)
            .map(|pair| self.generator.find_transfers(pair[0].trip, pair[1].trip))
            .collect();
        if let Some(transit_leg) = connections.iter().position(Vec::is_empty) {
            return Err(OptimizeTransferError::NoFeasibleTransfer { transit_leg });
        }

        let last_ride = rides.len() - 1;
        let suffix_progress = self
            .pass_through
            .update_along(0, transfer_targets(suffix).into_iter().rev());
        let mut tails = BTreeMap::new();
        for board_position in self.board_positions(&rides, &connections, last_ride) {
            if let Some(tail) = self.last_tail(&rides[last_ride], board_position, suffix, suffix_progress) {
                keep_best(&mut tails, board_position, tail, self.params.optimize_wait_time);
            }
        }
        for ride_idx in (0..last_ride).rev() {
            let mut new_tails = BTreeMap::new();
            for board_position in self.board_positions(&rides, &connections, ride_idx) {
                for connection in connections[ride_idx].iter() {
                    if connection.from_position <= board_position {
                        continue;
                    }
                    let next_tails = tails
                        .range((connection.to_position, 0)..=(connection.to_position, u8::MAX))
                        .map(|(_, tail)| tail);
                    for next_tail in next_tails {
                        let tail = self.extend_tail(
                            &rides[ride_idx],
                            board_position,
                            connection,
                            &rides[ride_idx + 1],
                            next_tail,
                            &wait_cost,
                        );
                        keep_best(&mut new_tails, board_position, tail, self.params.optimize_wait_time);
                    }
                }
            }
            if new_tails.is_empty() {
                return Err(OptimizeTransferError::NoFeasibleTransfer {
                    transit_leg: ride_idx,
                });
            }
            tails = new_tails;
        }

        let prefix_stops = prefix_stops(prefix);
        let best = tails
            .into_iter()
            .map(|(_, tail)| tail)
            .filter(|tail| {
                let progress = self
                    .pass_through
                    .update_along(tail.progress, prefix_stops.iter().rev().copied());
                self.pass_through.is_complete(progress)
            })
            .min_by(|left, right| compare_tails(left, right, self.params.optimize_wait_time))
            .ok_or(OptimizeTransferError::PassThroughPointMissed)?;

        let mut new_legs = prefix.to_vec();
        new_legs.extend(best.legs);
        let mut optimized = PathBuilder::new(self.data, &self.request.slack, &self.cost).build(
            new_legs,
            path.start_time,
            path.iteration_departure_time,
            path.c2,
        )?;
        optimized.wait_time_optimized_cost = if self.params.optimize_wait_time {
            self.wait_time_optimized_cost(&optimized, &wait_cost)
        } else {
            optimized.c1
        };
        Ok(optimized)
    }

    /// Positions at which the ride `ride_idx` may be boarded.
    fn board_positions(
        &self,
        rides: &[Ride],
        connections: &[Vec<TripToTripTransfer>],
        ride_idx: usize,
    ) -> Vec<usize> {
        if ride_idx == 0 {
            return vec![rides[0].board_position];
        }
        let mut positions: Vec<usize> = connections[ride_idx - 1]
            .iter()
            .map(|connection| connection.to_position)
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
    }

    fn last_tail(
        &self,
        ride: &Ride,
        board_position: usize,
        suffix: &[RawLeg],
        suffix_progress: u8,
    ) -> Option<Tail> {
        if board_position >= ride.alight_position {
            return None;
        }
        let pattern = self.data.pattern(ride.trip.pattern_idx);
        let trip = pattern.trip(ride.trip.trip_idx);
        let riding = trip.arrival(ride.alight_position) - trip.departure(board_position);
        let c1 = self.cost.riding_cost(riding);
        let mut legs = vec![RawLeg::Transit {
            trip: ride.trip,
            board_position,
            alight_position: ride.alight_position,
        }];
        legs.extend_from_slice(suffix);
        Some(Tail {
            legs,
            progress: self.pass_through.update_along(
                suffix_progress,
                (board_position + 1..=ride.alight_position)
                    .rev()
                    .map(|position| pattern.stop_at(position)),
            ),
            priority_cost: 0,
            c1,
            wait_time_optimized_cost: c1,
            first_transfer: None,
        })
    }

    /// Boards `ride` at `board_position` then connects to `next_tail`.
    fn extend_tail(
        &self,
        ride: &Ride,
        board_position: usize,
        connection: &TripToTripTransfer,
        next_ride: &Ride,
        next_tail: &Tail,
        wait_cost: &WaitTimeCostCalculator,
    ) -> Tail {
        let pattern = self.data.pattern(ride.trip.pattern_idx);
        let trip = pattern.trip(ride.trip.trip_idx);
        let next_pattern = self.data.pattern(next_ride.trip.pattern_idx);
        let next_trip = next_pattern.trip(next_ride.trip.trip_idx);

        let alight_time = trip.arrival(connection.from_position);
        let walk = connection.walk_duration();
        let ready_time = alight_time + self.slack.alight_slack() + walk;
        let wait = next_trip.departure(connection.to_position) - ready_time;
        let next_board_stop = next_pattern.stop_at(connection.to_position);

        let common_c1 = self
            .cost
            .riding_cost(alight_time - trip.departure(board_position))
            + self.cost.waiting_cost(self.slack.alight_slack())
            + self.cost.stop_cost(pattern.stop_at(connection.from_position))
            + self.cost.walk_cost(walk);
        let boarding_c1 = self.cost.boarding_cost(false, wait, next_board_stop);
        let c1 = common_c1 + boarding_c1 + next_tail.c1;
        let wait_time_optimized_cost = common_c1 + boarding_c1 - self.cost.waiting_cost(wait)
            + wait_cost.cost(wait)
            + next_tail.wait_time_optimized_cost;

        let mut legs = Vec::with_capacity(next_tail.legs.len() + 2);
        legs.push(RawLeg::Transit {
            trip: ride.trip,
            board_position,
            alight_position: connection.from_position,
        });
        let mut progress = next_tail.progress;
        if let Some(transfer) = &connection.transfer {
            progress = self.pass_through.update(progress, transfer.to_stop);
            legs.push(RawLeg::Transfer(transfer.clone()));
        }
        legs.extend_from_slice(&next_tail.legs);
        progress = self.pass_through.update_along(
            progress,
            (board_position + 1..=connection.from_position)
                .rev()
                .map(|position| pattern.stop_at(position)),
        );

        Tail {
            legs,
            progress,
            priority_cost: connection.priority_cost() + next_tail.priority_cost,
            c1,
            wait_time_optimized_cost,
            first_transfer: Some((connection.from_position, connection.to_position)),
        }
    }

    fn wait_time_optimized_cost(&self, path: &Path, wait_cost: &WaitTimeCostCalculator) -> i32 {
        connection_waits(path, self.slack.alight_slack())
            .into_iter()
            .fold(path.c1, |cost, wait| {
                cost - self.cost.waiting_cost(wait) + wait_cost.cost(wait)
            })
    }
}

fn compare_tails(left: &Tail, right: &Tail, optimize_wait_time: bool) -> Ordering {
    let primary = |tail: &Tail| {
        if optimize_wait_time {
            tail.wait_time_optimized_cost
        } else {
            tail.c1
        }
    };
    left.priority_cost
        .cmp(&right.priority_cost)
        .then_with(|| primary(left).cmp(&primary(right)))
        .then_with(|| left.c1.cmp(&right.c1))
        .then_with(|| left.first_transfer.cmp(&right.first_transfer))
}

/// Keeps one tail per board position and pass-through progress.
fn keep_best(
    tails: &mut BTreeMap<(usize, u8), Tail>,
    board_position: usize,
    tail: Tail,
    optimize_wait_time: bool,
) {
    let key = (board_position, tail.progress);
    let better = tails.get(&key).map_or(true, |current| {
        compare_tails(&tail, current, optimize_wait_time) == Ordering::Less
    });
    if better {
        tails.insert(key, tail);
    }
}

fn transfer_targets(legs: &[RawLeg]) -> Vec<StopIdx> {
    legs.iter()
        .filter_map(|leg| match leg {
            RawLeg::Transfer(transfer) => Some(transfer.to_stop),
            _ => None,
        })
        .collect()
}

/// Stops visited before the first ride, in travel order.
fn prefix_stops(prefix: &[RawLeg]) -> Vec<StopIdx> {
    let mut stops = Vec::with_capacity(prefix.len());
    for leg in prefix {
        match leg {
            RawLeg::Access(access) => stops.push(access.stop),
            RawLeg::Transfer(transfer) => stops.push(transfer.to_stop),
            _ => (),
        }
    }
    stops
}

fn in_vehicle_duration(path: &Path) -> i32 {
    path.transit_legs()
        .map(|leg| leg.alight_time - leg.board_time)
        .sum()
}

/// Wait before each boarding but the first one.
fn connection_waits(path: &Path, alight_slack: i32) -> Vec<i32> {
    let mut waits = Vec::new();
    let mut ready_time = None;
    for leg in path.legs.iter() {
        match leg {
            PathLeg::Transit(transit) => {
                if let Some(ready_time) = ready_time {
                    waits.push(transit.board_time - ready_time);
                }
                ready_time = Some(transit.alight_time + alight_slack);
            }
            PathLeg::Transfer(transfer) if ready_time.is_some() => {
                ready_time = Some(transfer.to_time);
            }
            _ => (),
        }
    }
    waits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{deadline::Deadline, search_context::SearchContext, worker::RangeRaptorWorker},
        engine::multicriteria::McRoutingStrategy,
        request::Profile,
        time::{parse_time, Time},
        transit_data::{TransferConstraint, TransitData, TransitDataBuilder},
    };

    // P and Q share B and C : the search transfers at B, the first stop
    // where Q can be caught, while C leaves more time.
    fn data() -> TransitData {
        TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "B", "C"])
                    .trip("P1", &["08:00", "08:10", "08:20"]);
            })
            .pattern("Q", |p| {
                p.stops(&["B", "C", "D"])
                    .trip("Q1", &["08:15", "08:30", "08:40"]);
            })
            .build()
            .unwrap()
    }

    fn t(time: &str) -> Time {
        parse_time(time).unwrap()
    }

    fn search(data: &TransitData, request: &RaptorRequest) -> Vec<Path> {
        let ctx = SearchContext::new(data, request, Deadline::unlimited());
        RangeRaptorWorker::new(&ctx, McRoutingStrategy::new(&ctx, None))
            .route()
            .paths
    }

    fn request(data: &TransitData) -> RaptorRequest {
        RaptorRequest::builder()
            .profile(Profile::MultiCriteria)
            .earliest_departure_time(t("08:00"))
            .add_access(data.stop_idx("A").unwrap(), 0)
            .add_egress(data.stop_idx("D").unwrap(), 0)
            .build()
    }

    fn transfer_stop(data: &TransitData, path: &Path) -> String {
        let first = path.transit_legs().next().unwrap();
        data.stop_name(first.alight_stop).to_string()
    }

    #[test]
    fn longer_wait_is_preferred() {
        let data = data();
        let request = request(&data);
        let paths = search(&data, &request);
        assert_eq!(paths.len(), 1);
        assert_eq!(transfer_stop(&data, &paths[0]), "B");

        let optimized = OptimizeTransferService::new(&data, &request).optimize(paths.clone());
        assert_eq!(optimized.len(), 1);
        assert_eq!(transfer_stop(&data, &optimized[0]), "C");
        assert_eq!(optimized[0].end_time, paths[0].end_time);
        // the ten minutes wait at C are worth less than their waiting cost
        assert!(optimized[0].wait_time_optimized_cost < optimized[0].c1);
    }

    #[test]
    fn guaranteed_transfer_comes_first() {
        let data = TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "B", "C"])
                    .trip("P1", &["08:00", "08:10", "08:20"]);
            })
            .pattern("Q", |p| {
                p.stops(&["B", "C", "D"])
                    .trip("Q1", &["08:15", "08:30", "08:40"]);
            })
            .transfer_with("B", "B", 0, |transfer| {
                transfer.constraint = Some(TransferConstraint::Guaranteed);
            })
            .build()
            .unwrap();
        let request = request(&data);
        let paths = search(&data, &request);
        let optimized = OptimizeTransferService::new(&data, &request).optimize(paths);
        assert_eq!(optimized.len(), 1);
        assert_eq!(transfer_stop(&data, &optimized[0]), "B");
        assert_eq!(optimized[0].transfer_priority_cost, 20);
    }

    #[test]
    fn paths_without_transfer_are_unchanged() {
        let data = data();
        let request = RaptorRequest::builder()
            .profile(Profile::MultiCriteria)
            .earliest_departure_time(t("08:00"))
            .add_access(data.stop_idx("A").unwrap(), 0)
            .add_egress(data.stop_idx("C").unwrap(), 0)
            .build();
        let paths = search(&data, &request);
        let optimized = OptimizeTransferService::new(&data, &request).optimize(paths.clone());
        assert_eq!(optimized, paths);
    }
}
