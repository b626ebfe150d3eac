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

use anyhow::{bail, Context, Error};
use chrono::{NaiveTime, Timelike};
use launch::{
    config::RequestParams,
    random_network::{build_grid, random_stop_pair, GridParams},
    timer, Solver,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rangeraptor::{
    time::Time,
    tracing::{info, trace, warn},
    RaptorError, TransitDataProvider,
};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "random",
    about = "Run random requests on a synthetic grid network.",
    rename_all = "snake_case"
)]
pub struct Options {
    #[structopt(flatten)]
    pub request_params: RequestParams,

    /// number of requests to run
    #[structopt(long, default_value = "10")]
    pub nb_queries: usize,

    /// the grid has nb_stops_per_side * nb_stops_per_side stops
    #[structopt(long, default_value = "20")]
    pub nb_stops_per_side: usize,

    /// departure time (or arrival time with --arrive_by) of the requests,
    /// formatted like 08:00:00
    #[structopt(long, default_value = "08:00:00")]
    pub time: String,

    /// seed of the random generator, for both the network and the requests
    #[structopt(long, default_value = "1")]
    pub seed: u64,
}

fn parse_time_of_day(time: &str) -> Result<Time, Error> {
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .with_context(|| format!("Invalid time {}, expected HH:MM:SS", time))?;
    Ok(time.num_seconds_from_midnight() as Time)
}

pub fn launch(options: Options) -> Result<(), Error> {
    if options.nb_stops_per_side < 2 {
        bail!(
            "The grid needs at least 2 stops per side, got {}",
            options.nb_stops_per_side
        );
    }
    let time = parse_time_of_day(&options.time)?;
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);

    let data_timer = Instant::now();
    let grid_params = GridParams {
        nb_of_stops_per_side: options.nb_stops_per_side,
        ..GridParams::from_env()
    };
    let data = build_grid(&grid_params, &mut rng)?;
    info!(
        "Grid network built in {} ms : {} stops, {} patterns, {} trips",
        timer::duration_since(data_timer),
        data.nb_of_stops(),
        data.nb_of_patterns(),
        data.nb_of_trips()
    );

    let solver = Solver::new(&data);
    let mut total_duration = Duration::ZERO;
    let mut total_nb_of_rounds = 0;
    let mut total_nb_of_paths = 0;
    let mut nb_of_failures = 0;
    for request_id in 0..options.nb_queries {
        let (origin, destination) = match random_stop_pair(&data, &mut rng) {
            Some(pair) => pair,
            None => bail!("Not enough stops to draw a request"),
        };
        let request = solver.build_request(
            &options.request_params,
            time,
            &[(origin, 0)],
            &[(destination, 0)],
        );
        let start = Instant::now();
        let result = solver.solve(&request);
        total_duration += start.elapsed();
        match result {
            Ok(response) => {
                total_nb_of_rounds += response.nb_of_rounds;
                total_nb_of_paths += response.paths.len();
                trace!("{}", response.display(&data));
            }
            Err(RaptorError::TimedOutNoneFound) => {
                nb_of_failures += 1;
                warn!(
                    "Request {} between {} and {} timed out",
                    request_id,
                    data.stop_name(origin),
                    data.stop_name(destination)
                );
            }
            Err(err) => {
                nb_of_failures += 1;
                warn!(
                    "Error while solving request {} between {} and {} : {}",
                    request_id,
                    data.stop_name(origin),
                    data.stop_name(destination),
                    err
                );
            }
        }
    }

    let nb_queries = options.nb_queries.max(1);
    info!(
        "Average duration per request : {} ms",
        timer::average_millis(total_duration, options.nb_queries)
    );
    info!(
        "Average nb of rounds : {:.2}",
        total_nb_of_rounds as f64 / nb_queries as f64
    );
    info!(
        "Average nb of paths : {:.2}",
        total_nb_of_paths as f64 / nb_queries as f64
    );
    info!(
        "Nb of requests : {}, failed : {}",
        options.nb_queries, nb_of_failures
    );
    Ok(())
}
