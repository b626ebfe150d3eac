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

use std::time::Instant;

use rangeraptor::{
    time::Time,
    tracing::{debug, info, trace},
    RaptorError, RaptorRequest, RaptorResponse, RaptorService, StopIdx, TransitDataProvider,
};

use crate::{config::RequestParams, timer};

/// Routes requests built from [`RequestParams`] on one network.
pub struct Solver<'data, Data> {
    data: &'data Data,
    service: RaptorService<'data, Data>,
}

impl<'data, Data: TransitDataProvider> Solver<'data, Data> {
    pub fn new(data: &'data Data) -> Self {
        Self {
            data,
            service: RaptorService::new(data),
        }
    }

    pub fn data(&self) -> &'data Data {
        self.data
    }

    /// `time` is the departure time, or the arrival time when
    /// `params.arrive_by` is set.
    /// `access` and `egress` are `(stop, walking duration)` pairs.
    pub fn build_request(
        &self,
        params: &RequestParams,
        time: Time,
        access: &[(StopIdx, i32)],
        egress: &[(StopIdx, i32)],
    ) -> RaptorRequest {
        let mut builder = params.request_builder();
        builder = if params.arrive_by {
            builder.latest_arrival_time(time)
        } else {
            builder.earliest_departure_time(time)
        };
        for (stop, duration) in access {
            builder = builder.add_access(*stop, *duration);
        }
        for (stop, duration) in egress {
            builder = builder.add_egress(*stop, *duration);
        }
        builder.build()
    }

    pub fn solve(&self, request: &RaptorRequest) -> Result<RaptorResponse, RaptorError> {
        let start = Instant::now();
        let result = self.service.route(request);
        match &result {
            Ok(response) => {
                info!(
                    "{} paths found in {} ms ({} rounds)",
                    response.paths.len(),
                    timer::duration_since(start),
                    response.nb_of_rounds
                );
                for path in response.paths.iter() {
                    trace!("{}", path.display(self.data));
                }
            }
            Err(err) => {
                debug!(
                    "Request failed after {} ms : {}",
                    timer::duration_since(start),
                    err
                );
            }
        }
        result
    }
}
