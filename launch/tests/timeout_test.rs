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
use rangeraptor::{transit_data::TransitDataBuilder, Profile, RaptorError, TransitData};
use rstest::{fixture, rstest};
use utils::{build_and_solve, Config};

#[fixture]
fn data() -> TransitData {
    TransitDataBuilder::new()
        .pattern("P", |p| {
            p.stops(&["A", "B", "C"])
                .trip("P1", &["08:00", "08:10", "08:20"]);
        })
        .build()
        .unwrap()
}

#[rstest]
#[case(Profile::Standard)]
#[case(Profile::MultiCriteria)]
fn expired_search_without_path_is_an_error(
    data: TransitData,
    #[case] profile: Profile,
) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:00", "A", "C");
    config.params.profile = profile;
    config.params.timeout_ms = Some(0);

    let err = build_and_solve(&data, &config).unwrap_err();
    assert_eq!(
        err.downcast_ref::<RaptorError>(),
        Some(&RaptorError::TimedOutNoneFound)
    );
    Ok(())
}

#[rstest]
fn expired_search_without_paths_to_produce(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:00", "A", "C");
    config.params.profile = Profile::BestTime;
    config.params.timeout_ms = Some(0);

    let response = build_and_solve(&data, &config)?;
    assert!(response.timed_out);
    assert_eq!(response.nb_of_iterations, 0);
    Ok(())
}

#[rstest]
fn generous_time_limit_is_not_reached(data: TransitData) -> Result<(), Error> {
    let _log_guard = init_test_logger();
    let mut config = Config::new("08:00", "A", "C");
    config.params.timeout_ms = Some(60_000);

    let response = build_and_solve(&data, &config)?;
    assert!(!response.timed_out);
    assert_eq!(response.paths.len(), 1);
    Ok(())
}
