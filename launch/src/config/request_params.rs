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
use std::{str::FromStr, time::Duration};
use structopt::StructOpt;

use rangeraptor::{
    config::{default_alight_slack, default_board_slack, default_transfer_slack},
    config::{default_board_cost, default_transfer_cost},
    config::{DEFAULT_ALIGHT_SLACK, DEFAULT_BOARD_SLACK, DEFAULT_TRANSFER_SLACK},
    config::{DEFAULT_BOARD_COST, DEFAULT_TRANSFER_COST},
    CostParams, Optimization, PositiveDuration, Profile, RaptorRequestBuilder, SearchDirection,
    SlackParams, TransferOptimizationParams,
};

#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
#[structopt(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct RequestParams {
    /// standard, best_time, min_travel_duration or multi_criteria
    #[structopt(long, default_value = DEFAULT_PROFILE)]
    #[serde(default = "default_profile")]
    pub profile: Profile,

    /// search backward from the latest arrival time
    #[structopt(long)]
    #[serde(default)]
    pub arrive_by: bool,

    /// maximum number of transfers in a path
    #[structopt(long, default_value = DEFAULT_MAX_NB_OF_TRANSFERS)]
    #[serde(default = "default_max_nb_of_transfers")]
    pub max_nb_of_transfers: usize,

    /// departure (or arrival) times tried after the requested one
    #[structopt(long, default_value = DEFAULT_SEARCH_WINDOW)]
    #[serde(default = "default_search_window")]
    pub search_window: PositiveDuration,

    #[structopt(long, default_value = DEFAULT_BOARD_SLACK)]
    #[serde(default = "default_board_slack")]
    pub board_slack: PositiveDuration,

    #[structopt(long, default_value = DEFAULT_ALIGHT_SLACK)]
    #[serde(default = "default_alight_slack")]
    pub alight_slack: PositiveDuration,

    #[structopt(long, default_value = DEFAULT_TRANSFER_SLACK)]
    #[serde(default = "default_transfer_slack")]
    pub transfer_slack: PositiveDuration,

    #[structopt(long, default_value = DEFAULT_BOARD_COST)]
    #[serde(default = "default_board_cost")]
    pub board_cost: PositiveDuration,

    #[structopt(long, default_value = DEFAULT_TRANSFER_COST)]
    #[serde(default = "default_transfer_cost")]
    pub transfer_cost: PositiveDuration,

    /// prune the stops that cannot lead to a better path, multi_criteria only
    #[structopt(long)]
    #[serde(default)]
    pub pareto_check: bool,

    /// recover the trip positions after the search only
    #[structopt(long)]
    #[serde(default)]
    pub approximate_trip_search: bool,

    /// keep the transfers found by the search
    #[structopt(long)]
    #[serde(default)]
    pub no_transfer_optimization: bool,

    /// wall-clock budget of a request, in milliseconds
    #[structopt(long)]
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub const DEFAULT_PROFILE: &str = "multi_criteria";
pub const DEFAULT_MAX_NB_OF_TRANSFERS: &str = "5";
pub const DEFAULT_SEARCH_WINDOW: &str = "00:00:00";

pub fn default_profile() -> Profile {
    Profile::from_str(DEFAULT_PROFILE).unwrap()
}

pub fn default_max_nb_of_transfers() -> usize {
    usize::from_str(DEFAULT_MAX_NB_OF_TRANSFERS).unwrap()
}

pub fn default_search_window() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_SEARCH_WINDOW).unwrap()
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            arrive_by: false,
            max_nb_of_transfers: default_max_nb_of_transfers(),
            search_window: default_search_window(),
            board_slack: default_board_slack(),
            alight_slack: default_alight_slack(),
            transfer_slack: default_transfer_slack(),
            board_cost: default_board_cost(),
            transfer_cost: default_transfer_cost(),
            pareto_check: false,
            approximate_trip_search: false,
            no_transfer_optimization: false,
            timeout_ms: None,
        }
    }
}

impl RequestParams {
    pub fn direction(&self) -> SearchDirection {
        if self.arrive_by {
            SearchDirection::Reverse
        } else {
            SearchDirection::Forward
        }
    }

    /// A builder carrying every parameter but the times and the legs.
    pub fn request_builder(&self) -> RaptorRequestBuilder {
        let mut builder = RaptorRequestBuilder::new()
            .profile(self.profile)
            .direction(self.direction())
            .max_number_of_transfers(self.max_nb_of_transfers)
            .search_window(self.search_window.as_secs())
            .slack(SlackParams {
                board_slack: self.board_slack,
                alight_slack: self.alight_slack,
                transfer_slack: self.transfer_slack,
            })
            .cost(CostParams {
                board_cost: self.board_cost,
                transfer_cost: self.transfer_cost,
                ..CostParams::default()
            })
            .transfer_optimization(TransferOptimizationParams {
                enabled: !self.no_transfer_optimization,
                ..TransferOptimizationParams::default()
            });
        if self.pareto_check {
            builder = builder.optimization(Optimization::ParetoCheckAgainstDestination);
        }
        if self.approximate_trip_search {
            builder = builder.optimization(Optimization::ApproximateTripSearch);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            builder = builder.time_limit(Duration::from_millis(timeout_ms));
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_defaults_match_default() {
        let from_args = RequestParams::from_iter(vec!["test"]);
        let default = RequestParams::default();
        assert_eq!(from_args.profile, default.profile);
        assert_eq!(from_args.max_nb_of_transfers, default.max_nb_of_transfers);
        assert_eq!(from_args.search_window, default.search_window);
        assert_eq!(from_args.transfer_slack, PositiveDuration::from_hms(0, 1, 0));
        assert!(!from_args.arrive_by);
    }

    #[test]
    fn arrive_by_searches_backward() {
        let params = RequestParams::from_iter(vec![
            "test",
            "--arrive_by",
            "--profile",
            "standard",
            "--search_window",
            "01:00:00",
        ]);
        let request = params
            .request_builder()
            .latest_arrival_time(9 * 3600)
            .build();
        assert_eq!(request.direction, SearchDirection::Reverse);
        assert_eq!(request.profile, Profile::Standard);
        assert_eq!(request.search_params.search_window, 3600);
    }
}
