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
use launch::logger::init_test_logger;
use rangeraptor::{
    request::BadRequest, transit_data::TransitDataBuilder, Profile, RaptorError, TransitData,
};
use rstest::{fixture, rstest};
use utils::{build_and_solve, stop, trip_ids, visited_stops, Config};

/// A fast direct ride from A to C, a slow one through B, and a line
/// serving B in the middle of its route.
#[fixture]
fn data() -> TransitData {
    TransitDataBuilder::new()
        .pattern("Direct", |p| {
            p.stops(&["A", "C"]).trip("D1", &["08:00", "08:20"]);
        })
        .pattern("ToB", |p| {
            p.stops(&["A", "B"]).trip("B1", &["08:00", "08:10"]);
        })
        .pattern("FromB", |p| {
            p.stops(&["B", "C"]).trip("B2", &["08:15", "08:40"]);
        })
        .pattern("Through", |p| {
            p.stops(&["A", "E", "C"])
                .trip("E1", &["08:05", "08:20", "08:50"]);
        })
        .build()
        .unwrap()
}

#[rstest]
fn without_pass_through_the_direct_ride_wins(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let config = Config::new("08:00", "A", "C");
    let response = build_and_solve(&data, &config)?;
    let trips: Vec<Vec<&str>> = response.paths.iter().map(trip_ids).collect();
    assert_eq!(trips, vec![vec!["D1"]]);
    Ok(())
}

#[rstest]
#[case(vec!["B"], vec![vec!["B1", "B2"]])]
#[case(vec!["E"], vec![vec!["E1"]])]
#[case(vec!["B", "E"], vec![vec!["B1", "B2"], vec!["E1"]])]
fn every_path_visits_the_pass_through_point(
    data: TransitData,
    #[case] point: Vec<&str>,
    #[case] expected_trips: Vec<Vec<&str>>,
) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:00", "A", "C");
    config.pass_through = vec![point.clone()];

    let response = build_and_solve(&data, &config)?;
    let trips: Vec<Vec<&str>> = response.paths.iter().map(trip_ids).collect();
    assert_eq!(trips, expected_trips);

    let point_stops = point
        .iter()
        .map(|name| stop(&data, name))
        .collect::<Result<Vec<_>, _>>()?;
    for path in response.paths.iter() {
        let visited = visited_stops(&data, path);
        assert!(point_stops.iter().any(|stop| visited.contains(stop)));
        assert_eq!(path.c2, Some(1));
    }
    Ok(())
}

#[rstest]
fn points_are_visited_in_order(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:00", "A", "C");
    // no path goes through E then B
    config.pass_through = vec![vec!["E"], vec!["B"]];

    let response = build_and_solve(&data, &config)?;
    assert!(response.paths.is_empty());
    Ok(())
}

#[rstest]
fn pass_through_needs_the_multi_criteria_profile(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:00", "A", "C");
    config.params.profile = Profile::Standard;
    config.pass_through = vec![vec!["B"]];

    let result = build_and_solve(&data, &config);
    let err = result.unwrap_err();
    assert_eq!(
        err.downcast_ref::<RaptorError>(),
        Some(&RaptorError::BadRequest(
            BadRequest::PassThroughRequiresMultiCriteria
        ))
    );
    Ok(())
}
