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

//! Synthetic networks used to benchmark and test the search.
//!
//! The network is a square grid of stops `S{row}_{col}`. Every row and every
//! column is served by a line in both directions, so any two stops are
//! connected with at most one transfer. Each line gets a random offset
//! so that the trips of crossing lines are not all synchronized.

use std::num::ParseIntError;

use rand::Rng;
use crate::config::parse_env_var;
use rangeraptor::{
    time::{format_time, Time},
    transit_data::DataError,
    StopIdx, TransitData, TransitDataBuilder, TransitDataProvider,
};

#[derive(Debug, Clone)]
pub struct GridParams {
    pub nb_of_stops_per_side: usize,
    /// seconds between two consecutive stops of a line
    pub hop_duration: i32,
    /// seconds between two consecutive trips of a line
    pub headway: i32,
    pub first_departure: Time,
    pub last_departure: Time,
    /// duration of the walking transfers between diagonal neighbours,
    /// no such transfer when `None`
    pub diagonal_walk: Option<i32>,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            nb_of_stops_per_side: 10,
            hop_duration: 120,
            headway: 600,
            first_departure: 6 * 3600,
            last_departure: 22 * 3600,
            diagonal_walk: Some(300),
        }
    }
}

impl GridParams {
    /// The default grid, with its timetable read from the environment :
    ///  - `RANGERAPTOR_GRID_HOP_DURATION` and `RANGERAPTOR_GRID_HEADWAY` in seconds
    ///  - `RANGERAPTOR_GRID_DIAGONAL_WALK` in seconds, or `none`
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            hop_duration: parse_env_var(
                "RANGERAPTOR_GRID_HOP_DURATION",
                default.hop_duration,
                parse_positive_seconds,
            ),
            headway: parse_env_var(
                "RANGERAPTOR_GRID_HEADWAY",
                default.headway,
                parse_positive_seconds,
            ),
            diagonal_walk: parse_env_var(
                "RANGERAPTOR_GRID_DIAGONAL_WALK",
                default.diagonal_walk,
                parse_walk,
            ),
            ..default
        }
    }
}

fn parse_positive_seconds(value: &str) -> Result<i32, String> {
    let seconds: i32 = value.parse().map_err(|err: ParseIntError| err.to_string())?;
    if seconds <= 0 {
        return Err(format!("{} is not a positive number of seconds", seconds));
    }
    Ok(seconds)
}

fn parse_walk(value: &str) -> Result<Option<i32>, ParseIntError> {
    if value == "none" {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

pub fn stop_name(row: usize, col: usize) -> String {
    format!("S{}_{}", row, col)
}

pub fn build_grid<R: Rng>(params: &GridParams, rng: &mut R) -> Result<TransitData, DataError> {
    let side = params.nb_of_stops_per_side;
    let mut builder = TransitDataBuilder::new();
    for line in 0..side {
        let row: Vec<String> = (0..side).map(|col| stop_name(line, col)).collect();
        let col: Vec<String> = (0..side).map(|row| stop_name(row, line)).collect();
        for (name, stops) in [
            (format!("R{}E", line), row.clone()),
            (format!("R{}W", line), reversed(&row)),
            (format!("C{}S", line), col.clone()),
            (format!("C{}N", line), reversed(&col)),
        ] {
            let offset = rng.gen_range(0..params.headway.max(1));
            builder = add_line(builder, params, &name, &stops, offset);
        }
    }
    if let Some(walk) = params.diagonal_walk {
        for row in 0..side.saturating_sub(1) {
            for col in 0..side.saturating_sub(1) {
                let here = stop_name(row, col);
                let there = stop_name(row + 1, col + 1);
                builder = builder
                    .transfer(&here, &there, walk)
                    .transfer(&there, &here, walk);
            }
        }
    }
    builder.build()
}

fn reversed(stops: &[String]) -> Vec<String> {
    stops.iter().rev().cloned().collect()
}

fn add_line(
    builder: TransitDataBuilder,
    params: &GridParams,
    name: &str,
    stops: &[String],
    offset: i32,
) -> TransitDataBuilder {
    let stop_refs: Vec<&str> = stops.iter().map(String::as_str).collect();
    let mut trips = Vec::new();
    let mut departure = params.first_departure + offset;
    while departure <= params.last_departure {
        let times: Vec<String> = (0..stops.len())
            .map(|position| format_time(departure + position as i32 * params.hop_duration))
            .collect();
        trips.push((format!("{}_{}", name, trips.len()), times));
        departure += params.headway.max(1);
    }
    builder.pattern(name, |pattern| {
        let mut pattern = pattern.stops(&stop_refs);
        for (id, times) in trips.iter() {
            let time_refs: Vec<&str> = times.iter().map(String::as_str).collect();
            pattern = pattern.trip(id, &time_refs);
        }
    })
}

/// Two distinct stops drawn uniformly, `None` on a network with less than
/// two stops.
pub fn random_stop_pair<R: Rng>(data: &TransitData, rng: &mut R) -> Option<(StopIdx, StopIdx)> {
    let nb_of_stops = data.nb_of_stops();
    if nb_of_stops < 2 {
        return None;
    }
    let origin = rng.gen_range(0..nb_of_stops);
    let destination = (origin + rng.gen_range(1..nb_of_stops)) % nb_of_stops;
    Some((origin, destination))
}
