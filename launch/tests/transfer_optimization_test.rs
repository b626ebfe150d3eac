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
    transit_data::{
        TransferConstraint, TransitDataBuilder, DEFAULT_PRIORITY_COST, GUARANTEED_PRIORITY_COST,
    },
    PathLeg, TransitData,
};
use rstest::{fixture, rstest};
use utils::{build_and_solve, stop, t, trip_ids, Config};

/// P and Q share B and C, with a guaranteed connection at C.
#[fixture]
fn data() -> TransitData {
    TransitDataBuilder::new()
        .pattern("P", |p| {
            p.stops(&["A", "B", "C"])
                .trip("P1", &["08:00", "08:10", "08:20"]);
        })
        .pattern("Q", |p| {
            p.stops(&["B", "C", "E"])
                .trip("Q1", &["08:25", "08:30", "08:40"]);
        })
        .transfer_with("C", "C", 0, |transfer| {
            transfer.constraint = Some(TransferConstraint::Guaranteed);
        })
        .build()
        .unwrap()
}

#[rstest]
#[case(false, "C", GUARANTEED_PRIORITY_COST)]
#[case(true, "B", DEFAULT_PRIORITY_COST)]
fn guaranteed_connection_is_preferred(
    data: TransitData,
    #[case] no_transfer_optimization: bool,
    #[case] expected_transfer_stop: &str,
    #[case] expected_priority_cost: i32,
) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:00", "A", "E");
    config.params.no_transfer_optimization = no_transfer_optimization;

    let response = build_and_solve(&data, &config)?;
    assert_eq!(response.paths.len(), 1);
    let path = &response.paths[0];
    assert_eq!(trip_ids(path), vec!["P1", "Q1"]);
    assert_eq!(path.start_time, t("08:00"));
    assert_eq!(path.end_time, t("08:40"));
    assert_eq!(path.transfer_priority_cost, expected_priority_cost);

    let second_ride = path.transit_legs().nth(1).unwrap();
    assert_eq!(second_ride.board_stop, stop(&data, expected_transfer_stop)?);
    Ok(())
}

#[rstest]
fn optimized_path_keeps_its_legs_consistent(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let config = Config::new("08:00", "A", "E");

    let response = build_and_solve(&data, &config)?;
    let path = &response.paths[0];
    for window in path.legs.windows(2) {
        assert!(window[0].to_time() <= window[1].from_time());
    }
    let c1: i32 = path.legs.iter().map(PathLeg::c1).sum();
    assert_eq!(c1, path.c1);
    assert!(path.wait_time_optimized_cost > 0);
    Ok(())
}

#[rstest]
fn single_ride_paths_are_not_changed(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let config = Config::new("08:00", "A", "C");
    let mut without_optimization = Config::new("08:00", "A", "C");
    without_optimization.params.no_transfer_optimization = true;

    let optimized = build_and_solve(&data, &config)?;
    let plain = build_and_solve(&data, &without_optimization)?;
    assert_eq!(optimized.paths.len(), 1);
    assert_eq!(optimized.paths[0].legs, plain.paths[0].legs);
    assert_eq!(optimized.paths[0].c1, plain.paths[0].c1);
    Ok(())
}
