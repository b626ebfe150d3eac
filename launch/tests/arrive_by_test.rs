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
use rangeraptor::{transit_data::TransitDataBuilder, Profile, TransitData};
use rstest::{fixture, rstest};
use utils::{build_and_solve, summary, t, trip_ids, Config};

#[fixture]
fn data() -> TransitData {
    TransitDataBuilder::new()
        .pattern("P", |p| {
            p.stops(&["A", "B", "C"])
                .trip("P1", &["08:00", "08:10", "08:20"]);
        })
        .pattern("Q", |p| {
            p.stops(&["B'", "C"]).trip("Q1", &["08:15", "08:25"]);
        })
        .transfer("B", "B'", 120)
        .build()
        .unwrap()
}

#[rstest]
#[case(Profile::Standard)]
#[case(Profile::MultiCriteria)]
fn arrive_by_finds_the_depart_after_paths(
    data: TransitData,
    #[case] profile: Profile,
) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut depart_after = Config::new("08:00", "A", "C");
    depart_after.params.profile = profile;
    depart_after.params.max_nb_of_transfers = 1;

    let mut arrive_by = Config::new("08:30", "A", "C");
    arrive_by.params.profile = profile;
    arrive_by.params.max_nb_of_transfers = 1;
    arrive_by.params.arrive_by = true;

    let forward = build_and_solve(&data, &depart_after)?;
    let reverse = build_and_solve(&data, &arrive_by)?;

    let forward_paths: Vec<_> = forward.paths.iter().map(summary).collect();
    let reverse_paths: Vec<_> = reverse.paths.iter().map(summary).collect();
    assert_eq!(forward_paths, reverse_paths);
    assert_eq!(forward_paths.len(), 1);
    // the cost of a path does not depend on the direction of the search
    assert_eq!(forward.paths[0].c1, reverse.paths[0].c1);
    Ok(())
}

#[rstest]
fn arrive_by_keeps_the_latest_departure(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:30", "B", "C");
    config.params.arrive_by = true;

    let response = build_and_solve(&data, &config)?;
    let trips: Vec<Vec<&str>> = response.paths.iter().map(trip_ids).collect();
    assert_eq!(trips, vec![vec!["P1"], vec!["Q1"]]);

    // P1 is shorter and cheaper, Q1 leaves later : a 2 minutes walk to B'
    // then the transfer slack before 08:15
    let later = &response.paths[1];
    assert_eq!(later.start_time, t("08:12"));
    assert_eq!(later.end_time, t("08:25"));
    assert_eq!(later.nb_of_transfers, 0);
    Ok(())
}

#[rstest]
fn arrive_by_respects_the_arrival_time(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:19", "A", "C");
    config.params.arrive_by = true;

    let response = build_and_solve(&data, &config)?;
    assert!(response.paths.is_empty());
    Ok(())
}
