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

mod utils;

use anyhow::Error;
use launch::{
    config::RequestParams,
    logger::init_test_logger,
    random_network::{build_grid, random_stop_pair, GridParams},
    Solver,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rangeraptor::{
    engine::{Deadline, Heuristics},
    time::parse_time,
    transit_data::TransitDataBuilder,
    Path, Profile, TransitData, TransitDataProvider,
};
use rstest::{fixture, rstest};
use utils::{build_and_solve, t, Config};

/// Without walking transfers the cost of a path only depends on its
/// duration and number of rides.
#[fixture]
fn grid() -> TransitData {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let params = GridParams {
        nb_of_stops_per_side: 4,
        diagonal_walk: None,
        ..GridParams::default()
    };
    build_grid(&params, &mut rng).unwrap()
}

fn criteria(paths: &[Path]) -> Vec<(i32, i32, usize, i32)> {
    let mut criteria: Vec<_> = paths
        .iter()
        .map(|path| (path.start_time, path.end_time, path.nb_of_transfers, path.c1))
        .collect();
    criteria.sort_unstable();
    criteria
}

#[rstest]
fn heuristic_durations_are_lower_bounds(grid: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let solver = Solver::new(&grid);
    let mut params = RequestParams::default();
    params.profile = Profile::MultiCriteria;
    let departure = parse_time("07:00")?;
    let destination = grid.stop_idx("S3_3").unwrap();

    let request = solver.build_request(&params, departure, &[(0, 0)], &[(destination, 0)]);
    let heuristics = Heuristics::compute(&grid, &request, Deadline::unlimited());
    assert!(!heuristics.timed_out());

    let mut standard = params.clone();
    standard.profile = Profile::Standard;
    for origin in 0..grid.nb_of_stops() {
        if origin == destination {
            continue;
        }
        let at_stop = heuristics
            .at_stop(origin)
            .expect("every stop of the grid leads to the destination");
        let request =
            solver.build_request(&standard, departure, &[(origin, 0)], &[(destination, 0)]);
        let response = solver.solve(&request)?;
        for path in response.paths.iter() {
            assert!(
                at_stop.min_travel_duration <= path.duration(),
                "{} : heuristic {} exceeds the travel duration {}",
                grid.stop_name(origin),
                at_stop.min_travel_duration,
                path.duration()
            );
            assert!(at_stop.min_rides <= path.nb_of_transfers + 1);
        }
    }
    Ok(())
}

#[rstest]
fn pruning_keeps_the_same_paths(grid: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let solver = Solver::new(&grid);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut params = RequestParams::default();
    params.no_transfer_optimization = true;
    let mut pruned_params = params.clone();
    pruned_params.pareto_check = true;
    let departure = parse_time("08:00")?;

    for _ in 0..10 {
        let (origin, destination) = random_stop_pair(&grid, &mut rng).unwrap();
        let access = [(origin, 0)];
        let egress = [(destination, 0)];
        let plain = solver.solve(&solver.build_request(&params, departure, &access, &egress))?;
        let pruned =
            solver.solve(&solver.build_request(&pruned_params, departure, &access, &egress))?;
        assert_eq!(criteria(&plain.paths), criteria(&pruned.paths));
        assert!(!plain.paths.is_empty());
    }
    Ok(())
}

#[test]
fn pruning_keeps_a_fast_early_trip() -> Result<(), Error> {
    let _log_guard = init_test_logger();
    // P1 runs in 5 minutes, P2 in an hour
    let data = TransitDataBuilder::new()
        .pattern("R", |p| {
            p.stops(&["A", "C"]).trip("R1", &["08:00", "08:30"]);
        })
        .pattern("X", |p| {
            p.stops(&["A", "D"]).trip("X1", &["08:00", "08:02"]);
        })
        .pattern("Y", |p| {
            p.stops(&["D", "B"]).trip("Y1", &["08:04", "08:05"]);
        })
        .pattern("P", |p| {
            p.stops(&["B", "C"])
                .trip("P1", &["08:07", "08:12"])
                .trip("P2", &["08:30", "09:30"]);
        })
        .build()?;
    let b = data.stop_idx("B").unwrap();

    let mut config = Config::new("08:00", "A", "C");
    config.params.no_transfer_optimization = true;
    let request = utils::build_request(&data, &config)?;
    let heuristics = Heuristics::compute(&data, &request, Deadline::unlimited());
    assert_eq!(heuristics.at_stop(b).unwrap().min_travel_duration, 5 * 60);

    let plain = build_and_solve(&data, &config)?;
    config.params.pareto_check = true;
    let pruned = build_and_solve(&data, &config)?;
    let arrivals = |paths: &[Path]| -> Vec<(i32, usize)> {
        paths
            .iter()
            .map(|path| (path.end_time, path.nb_of_transfers))
            .collect()
    };
    assert_eq!(arrivals(&plain.paths), vec![(t("08:12"), 2), (t("08:30"), 0)]);
    assert_eq!(arrivals(&pruned.paths), arrivals(&plain.paths));
    Ok(())
}
