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

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr, time::Duration};

use crate::{
    config::{ConfigError, CostParams, SlackParams, TransferOptimizationParams},
    engine::debug::DebugRequest,
    time::{format_time, Time, MAX_TIME_OF_DAY},
    transit_data::StopIdx,
};

pub const DEFAULT_MAX_NB_OF_TRANSFERS: usize = 12;
/// Rounds are stored on a byte, with room for the access round.
pub const MAX_NB_OF_TRANSFERS: usize = 100;

/// The progress along the pass-through points is stored on a `u8`.
pub const MAX_NB_OF_PASS_THROUGH_POINTS: usize = u8::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirection {
    /// depart after the earliest departure time
    Forward,
    /// arrive before the latest arrival time
    Reverse,
}

impl SearchDirection {
    pub fn is_forward(&self) -> bool {
        matches!(self, SearchDirection::Forward)
    }

    pub fn opposite(&self) -> Self {
        match self {
            SearchDirection::Forward => SearchDirection::Reverse,
            SearchDirection::Reverse => SearchDirection::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// best arrival time and number of transfers, with paths
    Standard,
    /// best arrival time at each stop, no paths
    BestTime,
    /// shortest travel time at each stop with waiting removed, no paths
    MinTravelDuration,
    /// pareto-optimal paths on arrival time, transfers, travel duration and cost
    MultiCriteria,
}

impl Profile {
    pub fn produces_paths(&self) -> bool {
        matches!(self, Profile::Standard | Profile::MultiCriteria)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Optimization {
    /// prune stop arrivals that cannot lead to a new destination arrival,
    /// using heuristics computed by a search in the opposite direction
    ParetoCheckAgainstDestination,
    /// do not record trip positions during the search, recover them when
    /// building the paths
    ApproximateTripSearch,
}

macro_rules! impl_config_enum {
    ($name:ident, $field:expr, { $($variant:ident => $text:literal),* $(,)? }) => {
        impl FromStr for $name {
            type Err = ConfigError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)*
                    _ => Err(ConfigError::new($field, s)),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($name::$variant => write!(f, $text),)*
                }
            }
        }
    };
}

impl_config_enum!(SearchDirection, "search direction", {
    Forward => "forward",
    Reverse => "reverse",
});

impl_config_enum!(Profile, "profile", {
    Standard => "standard",
    BestTime => "best_time",
    MinTravelDuration => "min_travel_duration",
    MultiCriteria => "multi_criteria",
});

impl_config_enum!(Optimization, "optimization", {
    ParetoCheckAgainstDestination => "pareto_check_against_destination",
    ApproximateTripSearch => "approximate_trip_search",
});

/// A leg between the origin (or destination) and a stop of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEgress {
    pub stop: StopIdx,
    /// in seconds
    pub duration: i32,
    pub c1: i32,
    /// the leg contains a ride, for example a flexible on-demand service
    pub on_board: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub earliest_departure_time: Option<Time>,
    pub latest_arrival_time: Option<Time>,
    /// in seconds, the search is repeated every minute over the window
    pub search_window: i32,
    pub max_number_of_transfers: usize,
    pub access: Vec<AccessEgress>,
    pub egress: Vec<AccessEgress>,
    /// keep access arrivals that do not improve the best time of their stop
    pub time_shifting_allowed: bool,
    /// each point is a set of stops, the paths must visit one stop of each point, in order
    pub pass_through_points: Vec<Vec<StopIdx>>,
    /// wall-clock budget of the search
    pub time_limit: Option<Duration>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            earliest_departure_time: None,
            latest_arrival_time: None,
            search_window: 0,
            max_number_of_transfers: DEFAULT_MAX_NB_OF_TRANSFERS,
            access: Vec::new(),
            egress: Vec::new(),
            time_shifting_allowed: false,
            pass_through_points: Vec::new(),
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RaptorRequest {
    pub profile: Profile,
    pub direction: SearchDirection,
    pub optimizations: Vec<Optimization>,
    pub search_params: SearchParams,
    pub slack: SlackParams,
    pub cost: CostParams,
    pub transfer_optimization: TransferOptimizationParams,
    pub debug: Option<DebugRequest>,
}

impl RaptorRequest {
    pub fn builder() -> RaptorRequestBuilder {
        RaptorRequestBuilder::new()
    }

    pub fn is_enabled(&self, optimization: Optimization) -> bool {
        self.optimizations.contains(&optimization)
    }

    pub fn max_rounds(&self) -> usize {
        self.search_params.max_number_of_transfers + 1
    }

    pub fn validate(&self, nb_of_stops: usize) -> Result<(), BadRequest> {
        let params = &self.search_params;
        match self.direction {
            SearchDirection::Forward if params.earliest_departure_time.is_none() => {
                return Err(BadRequest::NoDepartureTime)
            }
            SearchDirection::Reverse if params.latest_arrival_time.is_none() => {
                return Err(BadRequest::NoArrivalTime)
            }
            _ => (),
        }
        for time in params
            .earliest_departure_time
            .iter()
            .chain(params.latest_arrival_time.iter())
        {
            if *time < 0 || *time > MAX_TIME_OF_DAY {
                return Err(BadRequest::InvalidTime { time: *time });
            }
        }
        if params.search_window < 0 || params.search_window > MAX_TIME_OF_DAY {
            return Err(BadRequest::NegativeSearchWindow {
                window: params.search_window,
            });
        }
        if params.max_number_of_transfers > MAX_NB_OF_TRANSFERS {
            return Err(BadRequest::TooManyTransfers {
                max: MAX_NB_OF_TRANSFERS,
                given: params.max_number_of_transfers,
            });
        }
        let check_stop = |stop: StopIdx| {
            if stop >= nb_of_stops {
                Err(BadRequest::InvalidStop { stop, nb_of_stops })
            } else {
                Ok(())
            }
        };
        for leg in params.access.iter().chain(params.egress.iter()) {
            check_stop(leg.stop)?;
            if leg.duration < 0 || leg.duration > MAX_TIME_OF_DAY || leg.c1 < 0 {
                return Err(BadRequest::InvalidAccessEgress { stop: leg.stop });
            }
        }
        if params.pass_through_points.len() > MAX_NB_OF_PASS_THROUGH_POINTS {
            return Err(BadRequest::TooManyPassThroughPoints {
                max: MAX_NB_OF_PASS_THROUGH_POINTS,
                given: params.pass_through_points.len(),
            });
        }
        for (index, point) in params.pass_through_points.iter().enumerate() {
            if point.is_empty() {
                return Err(BadRequest::EmptyPassThroughPoint { index });
            }
            for stop in point {
                check_stop(*stop)?;
            }
        }
        if !params.pass_through_points.is_empty() && self.profile != Profile::MultiCriteria {
            return Err(BadRequest::PassThroughRequiresMultiCriteria);
        }
        if let Some(debug) = &self.debug {
            for stop in &debug.stops {
                check_stop(*stop)?;
            }
        }
        let stop_costs_mismatch = self
            .cost
            .stop_costs
            .as_ref()
            .map_or(false, |costs| costs.len() != nb_of_stops);
        if !self.cost.reluctances_are_valid() || stop_costs_mismatch {
            return Err(BadRequest::InvalidCostParams);
        }
        Ok(())
    }

    /// One line summary, for logs.
    pub fn summary(&self) -> String {
        let params = &self.search_params;
        let time = match self.direction {
            SearchDirection::Forward => params.earliest_departure_time,
            SearchDirection::Reverse => params.latest_arrival_time,
        };
        format!(
            "{} {} search at {} (window {}s, {} access, {} egress, max {} transfers)",
            self.profile,
            self.direction,
            time.map_or_else(|| "-".to_string(), format_time),
            params.search_window,
            params.access.len(),
            params.egress.len(),
            params.max_number_of_transfers
        )
    }
}

/// Builder of a [`RaptorRequest`].
///
/// Walking access and egress legs get a cost computed from the walk reluctance
/// of the request, unless one is given explicitly.
///
/// ```
/// # use rangeraptor::request::{RaptorRequestBuilder, Profile};
/// # fn main() {
/// let request = RaptorRequestBuilder::new()
///     .profile(Profile::MultiCriteria)
///     .earliest_departure_time(8 * 3600)
///     .search_window(3600)
///     .add_access(0, 120)
///     .add_egress(4, 0)
///     .build();
/// # assert_eq!(request.search_params.access[0].c1, 120 * 200);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RaptorRequestBuilder {
    request: RaptorRequest,
    access: Vec<(AccessEgress, bool)>,
    egress: Vec<(AccessEgress, bool)>,
}

impl Default for RaptorRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RaptorRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: RaptorRequest {
                profile: Profile::MultiCriteria,
                direction: SearchDirection::Forward,
                optimizations: Vec::new(),
                search_params: SearchParams::default(),
                slack: SlackParams::default(),
                cost: CostParams::default(),
                transfer_optimization: TransferOptimizationParams::default(),
                debug: None,
            },
            access: Vec::new(),
            egress: Vec::new(),
        }
    }

    pub fn profile(mut self, profile: Profile) -> Self {
        self.request.profile = profile;
        self
    }

    pub fn direction(mut self, direction: SearchDirection) -> Self {
        self.request.direction = direction;
        self
    }

    pub fn optimization(mut self, optimization: Optimization) -> Self {
        if !self.request.optimizations.contains(&optimization) {
            self.request.optimizations.push(optimization);
        }
        self
    }

    pub fn earliest_departure_time(mut self, time: Time) -> Self {
        self.request.search_params.earliest_departure_time = Some(time);
        self
    }

    pub fn latest_arrival_time(mut self, time: Time) -> Self {
        self.request.search_params.latest_arrival_time = Some(time);
        self
    }

    pub fn search_window(mut self, seconds: i32) -> Self {
        self.request.search_params.search_window = seconds;
        self
    }

    pub fn max_number_of_transfers(mut self, max: usize) -> Self {
        self.request.search_params.max_number_of_transfers = max;
        self
    }

    pub fn time_shifting_allowed(mut self, allowed: bool) -> Self {
        self.request.search_params.time_shifting_allowed = allowed;
        self
    }

    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.request.search_params.time_limit = Some(limit);
        self
    }

    /// Walking access to `stop` in `duration` seconds.
    pub fn add_access(mut self, stop: StopIdx, duration: i32) -> Self {
        self.access.push((
            AccessEgress {
                stop,
                duration,
                c1: 0,
                on_board: false,
            },
            false,
        ));
        self
    }

    /// Access leg with an explicit cost.
    pub fn add_access_leg(mut self, leg: AccessEgress) -> Self {
        self.access.push((leg, true));
        self
    }

    /// Walking egress from `stop` in `duration` seconds.
    pub fn add_egress(mut self, stop: StopIdx, duration: i32) -> Self {
        self.egress.push((
            AccessEgress {
                stop,
                duration,
                c1: 0,
                on_board: false,
            },
            false,
        ));
        self
    }

    pub fn add_egress_leg(mut self, leg: AccessEgress) -> Self {
        self.egress.push((leg, true));
        self
    }

    pub fn add_pass_through_point(mut self, stops: Vec<StopIdx>) -> Self {
        self.request.search_params.pass_through_points.push(stops);
        self
    }

    pub fn slack(mut self, slack: SlackParams) -> Self {
        self.request.slack = slack;
        self
    }

    pub fn cost(mut self, cost: CostParams) -> Self {
        self.request.cost = cost;
        self
    }

    pub fn transfer_optimization(mut self, params: TransferOptimizationParams) -> Self {
        self.request.transfer_optimization = params;
        self
    }

    pub fn debug(mut self, debug: DebugRequest) -> Self {
        self.request.debug = Some(debug);
        self
    }

    pub fn build(self) -> RaptorRequest {
        let mut request = self.request;
        let walk_reluctance = request.cost.walk_reluctance;
        let resolve = |(mut leg, has_cost): (AccessEgress, bool)| {
            if !has_cost {
                leg.c1 = crate::engine::cost_calculator::walk_cost(walk_reluctance, leg.duration);
            }
            leg
        };
        request.search_params.access = self.access.into_iter().map(resolve).collect();
        request.search_params.egress = self.egress.into_iter().map(resolve).collect();
        request
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadRequest {
    NoDepartureTime,
    NoArrivalTime,
    InvalidTime { time: Time },
    TooManyTransfers { max: usize, given: usize },
    InvalidStop { stop: StopIdx, nb_of_stops: usize },
    InvalidAccessEgress { stop: StopIdx },
    EmptyPassThroughPoint { index: usize },
    TooManyPassThroughPoints { max: usize, given: usize },
    PassThroughRequiresMultiCriteria,
    NegativeSearchWindow { window: i32 },
    InvalidCostParams,
}

impl std::error::Error for BadRequest {}

impl Display for BadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BadRequest::NoDepartureTime => {
                write!(f, "A forward search needs an earliest departure time.")
            }
            BadRequest::NoArrivalTime => {
                write!(f, "A reverse search needs a latest arrival time.")
            }
            BadRequest::InvalidTime { time } => {
                write!(f, "The requested time {} is out of range.", time)
            }
            BadRequest::TooManyTransfers { max, given } => write!(
                f,
                "At most {} transfers can be requested, got {}.",
                max, given
            ),
            BadRequest::InvalidStop { stop, nb_of_stops } => write!(
                f,
                "Stop {} does not exist, the network has {} stops.",
                stop, nb_of_stops
            ),
            BadRequest::InvalidAccessEgress { stop } => write!(
                f,
                "The access or egress leg at stop {} has a negative or too large duration or cost.",
                stop
            ),
            BadRequest::EmptyPassThroughPoint { index } => {
                write!(f, "Pass-through point {} has no stop.", index)
            }
            BadRequest::TooManyPassThroughPoints { max, given } => write!(
                f,
                "At most {} pass-through points are allowed, {} were given.",
                max, given
            ),
            BadRequest::PassThroughRequiresMultiCriteria => write!(
                f,
                "Pass-through points are only supported by the multi-criteria profile."
            ),
            BadRequest::NegativeSearchWindow { window } => {
                write!(f, "Invalid search window of {} seconds.", window)
            }
            BadRequest::InvalidCostParams => write!(
                f,
                "Reluctances must be finite and non negative, and stop costs must cover every stop."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RaptorRequestBuilder {
        RaptorRequestBuilder::new()
            .earliest_departure_time(8 * 3600)
            .add_access(0, 60)
            .add_egress(1, 0)
    }

    #[test]
    fn validation() {
        assert_eq!(request().build().validate(2), Ok(()));
        assert_eq!(
            request().build().validate(1),
            Err(BadRequest::InvalidStop {
                stop: 1,
                nb_of_stops: 1
            })
        );
        assert_eq!(
            request()
                .direction(SearchDirection::Reverse)
                .build()
                .validate(2),
            Err(BadRequest::NoArrivalTime)
        );
        assert_eq!(
            request().max_number_of_transfers(1000).build().validate(2),
            Err(BadRequest::TooManyTransfers {
                max: MAX_NB_OF_TRANSFERS,
                given: 1000
            })
        );
        assert_eq!(
            request()
                .profile(Profile::Standard)
                .add_pass_through_point(vec![0])
                .build()
                .validate(2),
            Err(BadRequest::PassThroughRequiresMultiCriteria)
        );
        assert_eq!(
            request().add_pass_through_point(vec![]).build().validate(2),
            Err(BadRequest::EmptyPassThroughPoint { index: 0 })
        );
        assert_eq!(
            request().search_window(-60).build().validate(2),
            Err(BadRequest::NegativeSearchWindow { window: -60 })
        );
    }

    #[test]
    fn pass_through_points_fit_their_counter() {
        let with_points = |nb_of_points: usize| {
            (0..nb_of_points).fold(request(), |builder, _| {
                builder.add_pass_through_point(vec![0])
            })
        };
        assert_eq!(
            with_points(MAX_NB_OF_PASS_THROUGH_POINTS)
                .build()
                .validate(2),
            Ok(())
        );
        assert_eq!(
            with_points(256).build().validate(2),
            Err(BadRequest::TooManyPassThroughPoints {
                max: MAX_NB_OF_PASS_THROUGH_POINTS,
                given: 256
            })
        );
    }

    #[test]
    fn walking_legs_get_a_cost() {
        let request = request()
            .add_access_leg(AccessEgress {
                stop: 1,
                duration: 600,
                c1: 7,
                on_board: true,
            })
            .build();
        assert_eq!(request.search_params.access[0].c1, 60 * 200);
        assert_eq!(request.search_params.access[1].c1, 7);
    }

    #[test]
    fn enums_from_config() {
        assert_eq!(
            Profile::from_str("multi_criteria").unwrap(),
            Profile::MultiCriteria
        );
        assert_eq!(Profile::BestTime.to_string(), "best_time");
        assert_eq!(
            SearchDirection::from_str("reverse").unwrap(),
            SearchDirection::Reverse
        );
        assert!(Optimization::from_str("fast").is_err());
    }
}
