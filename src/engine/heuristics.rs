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

//! Lower bounds of the remaining travel from each stop to the destination.
//!
//! They come from a [`Profile::MinTravelDuration`] search run in the
//! opposite direction, from the destination, at a single departure time.
//! Rides of this search never wait and run at the fastest hop and dwell
//! times found among the trips of their pattern, so its best times never
//! exceed the travel duration of any path from a stop.

use std::cell::OnceCell;

use tracing::debug;

use super::{
    cost_calculator::CostCalculator,
    deadline::Deadline,
    search_context::SearchContext,
    standard::StandardRoutingStrategy,
    worker::RangeRaptorWorker,
};
use crate::{
    request::{Profile, RaptorRequest, SearchParams},
    response::StopArrivalsSummary,
    time::Time,
    transit_data::{StopIdx, TransitDataProvider},
};

/// Horizon of the heuristic search when the request gives no time limit.
pub const HEURISTIC_HORIZON: i32 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicAtStop {
    pub min_travel_duration: i32,
    pub min_rides: usize,
    pub min_cost: i32,
}

pub struct Heuristics {
    stop_arrivals: StopArrivalsSummary,
    origin_time: Time,
    cost: CostCalculator,
    max_egress_duration: i32,
    min_egress_c1: i32,
    at_stops: Vec<OnceCell<Option<HeuristicAtStop>>>,
    timed_out: bool,
}

impl Heuristics {
    /// Runs the heuristic search for `request`, whose results are meant to
    /// prune the search of `request` itself.
    pub fn compute<Data: TransitDataProvider>(
        data: &Data,
        request: &RaptorRequest,
        deadline: Deadline,
    ) -> Self {
        let heuristic_request = heuristic_request(request);
        let ctx = SearchContext::new(data, &heuristic_request, deadline);
        let origin_time = ctx
            .calculator
            .iteration_times(&heuristic_request.search_params)
            .first()
            .copied()
            .unwrap_or(0);
        let results = RangeRaptorWorker::new(&ctx, StandardRoutingStrategy::new(&ctx)).route();

        // egress of the main search, seen from the destination
        let (max_egress_duration, min_egress_c1) = ctx
            .access
            .iter()
            .fold((0, i32::MAX), |(max_duration, min_c1), leg| {
                (max_duration.max(leg.duration), min_c1.min(leg.c1))
            });
        let min_egress_c1 = if ctx.access.is_empty() { 0 } else { min_egress_c1 };
        let nb_of_stops = data.nb_of_stops();
        let heuristics = Self {
            stop_arrivals: results.stop_arrivals,
            origin_time,
            cost: CostCalculator::new(&request.cost),
            max_egress_duration,
            min_egress_c1,
            at_stops: (0..nb_of_stops).map(|_| OnceCell::new()).collect(),
            timed_out: results.timed_out,
        };
        debug!(
            "Heuristics computed, {} stops reached in {} rounds",
            heuristics.nb_of_reached_stops(),
            results.nb_of_rounds
        );
        heuristics
    }

    /// `None` when the destination cannot be reached from `stop`.
    pub fn at_stop(&self, stop: StopIdx) -> Option<HeuristicAtStop> {
        *self.at_stops[stop].get_or_init(|| self.compute_at_stop(stop))
    }

    fn compute_at_stop(&self, stop: StopIdx) -> Option<HeuristicAtStop> {
        let best_time = self.stop_arrivals.best_time(stop)?;
        let min_travel_duration = (best_time - self.origin_time).abs();
        let min_rides = self.stop_arrivals.min_rides(stop)? as usize;
        Some(HeuristicAtStop {
            min_travel_duration,
            min_rides,
            min_cost: self.cost.min_cost(
                min_travel_duration,
                min_rides,
                self.max_egress_duration,
                self.min_egress_c1,
            ),
        })
    }

    pub fn nb_of_reached_stops(&self) -> usize {
        self.stop_arrivals.nb_of_reached_stops()
    }

    /// The heuristic search did not complete : its bounds are not valid.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

fn heuristic_request(request: &RaptorRequest) -> RaptorRequest {
    let params = &request.search_params;
    let direction = request.direction.opposite();
    let (earliest_departure_time, latest_arrival_time) = if request.direction.is_forward() {
        let latest_arrival_time = params.latest_arrival_time.unwrap_or_else(|| {
            params.earliest_departure_time.unwrap_or(0) + params.search_window + HEURISTIC_HORIZON
        });
        (None, Some(latest_arrival_time))
    } else {
        let earliest_departure_time = params.earliest_departure_time.unwrap_or_else(|| {
            params.latest_arrival_time.unwrap_or(0) - params.search_window - HEURISTIC_HORIZON
        });
        (Some(earliest_departure_time), None)
    };
    RaptorRequest {
        profile: Profile::MinTravelDuration,
        direction,
        optimizations: Vec::new(),
        search_params: SearchParams {
            earliest_departure_time,
            latest_arrival_time,
            search_window: 0,
            max_number_of_transfers: params.max_number_of_transfers,
            access: params.access.clone(),
            egress: params.egress.clone(),
            time_shifting_allowed: false,
            pass_through_points: Vec::new(),
            time_limit: None,
        },
        slack: request.slack,
        cost: request.cost.clone(),
        transfer_optimization: request.transfer_optimization,
        debug: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        request::SearchDirection,
        time::parse_time,
        transit_data::{TransitData, TransitDataBuilder},
    };

    fn data() -> TransitData {
        TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "B", "C"])
                    .trip("P1", &["08:00", "08:10", "08:20"])
                    .trip("P2", &["09:00", "09:10", "09:20"]);
            })
            .stop("Z")
            .build()
            .unwrap()
    }

    #[test]
    fn minimum_durations_to_the_destination() {
        let data = data();
        let a = data.stop_idx("A").unwrap();
        let b = data.stop_idx("B").unwrap();
        let c = data.stop_idx("C").unwrap();
        let z = data.stop_idx("Z").unwrap();
        let request = RaptorRequest::builder()
            .profile(Profile::MultiCriteria)
            .direction(SearchDirection::Forward)
            .earliest_departure_time(parse_time("07:00").unwrap())
            .add_access(a, 0)
            .add_egress(c, 120)
            .build();
        let heuristics = Heuristics::compute(&data, &request, Deadline::unlimited());
        assert!(!heuristics.timed_out());

        let at_a = heuristics.at_stop(a).unwrap();
        assert_eq!(at_a.min_travel_duration, 20 * 60 + 120);
        assert_eq!(at_a.min_rides, 1);
        let at_b = heuristics.at_stop(b).unwrap();
        assert_eq!(at_b.min_travel_duration, 10 * 60 + 120);
        let at_c = heuristics.at_stop(c).unwrap();
        assert_eq!(at_c.min_rides, 0);
        assert!(at_a.min_cost > at_b.min_cost);
        assert_eq!(heuristics.at_stop(z), None);
    }
}
