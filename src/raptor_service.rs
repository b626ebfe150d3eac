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

use tracing::{debug, trace};

use crate::{
    engine::{
        deadline::Deadline, heuristics::Heuristics, multicriteria::McRoutingStrategy,
        search_context::SearchContext, standard::StandardRoutingStrategy,
        worker::{RangeRaptorWorker, WorkerResults},
    },
    request::{BadRequest, Optimization, Profile, RaptorRequest},
    response::RaptorResponse,
    transfer_optimization::OptimizeTransferService,
    transit_data::TransitDataProvider,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaptorError {
    BadRequest(BadRequest),
    /// the time limit was reached before any path was found
    TimedOutNoneFound,
}

impl From<BadRequest> for RaptorError {
    fn from(err: BadRequest) -> Self {
        RaptorError::BadRequest(err)
    }
}

impl Display for RaptorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaptorError::BadRequest(err) => write!(f, "Bad request : {}", err),
            RaptorError::TimedOutNoneFound => {
                write!(f, "The search timed out before finding any path.")
            }
        }
    }
}

impl std::error::Error for RaptorError {}

/// Entry point of the routing : one service per network, one call per request.
///
/// The service only reads the data, several requests may be routed
/// concurrently on the same network.
pub struct RaptorService<'data, Data> {
    data: &'data Data,
}

impl<'data, Data: TransitDataProvider> RaptorService<'data, Data> {
    pub fn new(data: &'data Data) -> Self {
        Self { data }
    }

    pub fn route(&self, request: &RaptorRequest) -> Result<RaptorResponse, RaptorError> {
        request.validate(self.data.nb_of_stops())?;
        debug!("Routing {}", request.summary());
        let deadline = Deadline::new(request.search_params.time_limit);

        let params = &request.search_params;
        if params.access.is_empty() || params.egress.is_empty() {
            debug!("No access or no egress, nothing to route");
            return Ok(RaptorResponse::empty(
                request.direction,
                self.data.nb_of_stops(),
            ));
        }

        let heuristics = self.heuristics(request, deadline);
        let ctx = SearchContext::new(self.data, request, deadline);
        let results = match request.profile {
            Profile::MultiCriteria => {
                RangeRaptorWorker::new(&ctx, McRoutingStrategy::new(&ctx, heuristics)).route()
            }
            Profile::Standard | Profile::BestTime | Profile::MinTravelDuration => {
                RangeRaptorWorker::new(&ctx, StandardRoutingStrategy::new(&ctx)).route()
            }
        };
        let WorkerResults {
            paths,
            stop_arrivals,
            nb_of_iterations,
            nb_of_rounds,
            timed_out,
        } = results;
        debug!(
            "Search done in {} ms : {} iterations, {} rounds, {} paths{}",
            deadline.elapsed().as_millis(),
            nb_of_iterations,
            nb_of_rounds,
            paths.len(),
            if timed_out { ", timed out" } else { "" }
        );

        if timed_out && paths.is_empty() && request.profile.produces_paths() {
            return Err(RaptorError::TimedOutNoneFound);
        }

        let mut paths = if request.profile == Profile::MultiCriteria
            && request.transfer_optimization.enabled
        {
            OptimizeTransferService::new(self.data, request).optimize(paths)
        } else {
            paths
        };
        paths.sort_by_key(|path| {
            (
                path.end_time,
                path.nb_of_transfers,
                path.c1,
                path.start_time,
            )
        });
        for path in paths.iter() {
            trace!("{}", path.display(self.data));
        }

        Ok(RaptorResponse {
            paths,
            stop_arrivals,
            nb_of_iterations,
            nb_of_rounds,
            timed_out,
        })
    }

    /// Bounds used to prune a multi-criteria search, `None` when the pruning
    /// is not requested or when the bounds could not be computed in time.
    fn heuristics(&self, request: &RaptorRequest, deadline: Deadline) -> Option<Heuristics> {
        if request.profile != Profile::MultiCriteria
            || !request.is_enabled(Optimization::ParetoCheckAgainstDestination)
        {
            return None;
        }
        let heuristics = Heuristics::compute(self.data, request, deadline);
        if heuristics.timed_out() {
            debug!("Heuristics timed out, the search runs without pruning");
            return None;
        }
        Some(heuristics)
    }
}
