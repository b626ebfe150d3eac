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

use super::{
    cost_calculator::CostCalculator, deadline::Deadline, debug::DebugRequest,
    pass_through::PassThroughPoints, slack::SlackProvider, time_calculator::TimeCalculator,
};
use crate::{
    request::{AccessEgress, Optimization, Profile, RaptorRequest},
    time::Time,
    transit_data::{StopIdx, TransitDataProvider},
};

/// Everything a search needs that does not change during the search.
///
/// Access and egress are given in the search direction : a reverse search
/// starts from the egress legs of the request.
pub struct SearchContext<'a, Data: TransitDataProvider> {
    pub data: &'a Data,
    pub request: &'a RaptorRequest,
    pub profile: Profile,
    pub calculator: TimeCalculator,
    pub slack: SlackProvider,
    pub cost: CostCalculator,
    pub access: Vec<AccessEgress>,
    pub egress: Vec<AccessEgress>,
    /// for each stop, the indexes in `egress` of the legs starting there
    pub egress_by_stop: Vec<Vec<usize>>,
    pub egress_stops: Vec<StopIdx>,
    pub pass_through: PassThroughPoints,
    pub time_limit: Option<Time>,
    pub max_rounds: usize,
    pub approximate_trip_search: bool,
    pub deadline: Deadline,
}

impl<'a, Data: TransitDataProvider> SearchContext<'a, Data> {
    pub fn new(data: &'a Data, request: &'a RaptorRequest, deadline: Deadline) -> Self {
        let calculator = TimeCalculator::new(request.direction);
        let params = &request.search_params;
        let (access, egress) = if calculator.search_forward() {
            (params.access.clone(), params.egress.clone())
        } else {
            (params.egress.clone(), params.access.clone())
        };
        let mut egress_by_stop = vec![Vec::new(); data.nb_of_stops()];
        let mut egress_stops = Vec::new();
        for (idx, leg) in egress.iter().enumerate() {
            if egress_by_stop[leg.stop].is_empty() {
                egress_stops.push(leg.stop);
            }
            egress_by_stop[leg.stop].push(idx);
        }
        Self {
            data,
            request,
            profile: request.profile,
            calculator,
            slack: SlackProvider::new(&request.slack, calculator),
            cost: CostCalculator::new(&request.cost),
            access,
            egress,
            egress_by_stop,
            egress_stops,
            pass_through: PassThroughPoints::new(
                params.pass_through_points.clone(),
                calculator.search_forward(),
            ),
            time_limit: calculator.time_limit(params),
            max_rounds: request.max_rounds(),
            approximate_trip_search: request.is_enabled(Optimization::ApproximateTripSearch),
            deadline,
        }
    }

    pub fn nb_of_stops(&self) -> usize {
        self.data.nb_of_stops()
    }

    pub fn debug(&self) -> Option<&DebugRequest> {
        self.request.debug.as_ref()
    }

    pub fn has_on_board_access(&self) -> bool {
        self.access.iter().any(|leg| leg.on_board)
    }

    pub fn exceeds_time_limit(&self, time: Time) -> bool {
        self.calculator.exceeds_time_limit(time, self.time_limit)
    }
}
