#![allow(dead_code)]

use anyhow::{Context, Error};
use launch::{config::RequestParams, Solver};
use rangeraptor::{
    path::PathLeg,
    time::{parse_time, Time},
    Path, RaptorRequest, RaptorResponse, StopIdx, TransitData,
};

pub struct Config<'a> {
    /// departure time, or arrival time when `params.arrive_by` is set
    pub time: &'a str,
    pub origin: &'a str,
    pub destination: &'a str,
    pub params: RequestParams,
    pub pass_through: Vec<Vec<&'a str>>,
}

impl<'a> Config<'a> {
    pub fn new(time: &'a str, origin: &'a str, destination: &'a str) -> Self {
        Self {
            time,
            origin,
            destination,
            params: RequestParams::default(),
            pass_through: Vec::new(),
        }
    }
}

pub fn t(time: &str) -> Time {
    parse_time(time).unwrap()
}

pub fn stop(data: &TransitData, name: &str) -> Result<StopIdx, Error> {
    data.stop_idx(name)
        .with_context(|| format!("No stop named {}", name))
}

pub fn build_request(data: &TransitData, config: &Config) -> Result<RaptorRequest, Error> {
    let solver = Solver::new(data);
    let origin = stop(data, config.origin)?;
    let destination = stop(data, config.destination)?;
    let mut request = solver.build_request(
        &config.params,
        parse_time(config.time)?,
        &[(origin, 0)],
        &[(destination, 0)],
    );
    for point in config.pass_through.iter() {
        let stops = point
            .iter()
            .map(|name| stop(data, name))
            .collect::<Result<Vec<_>, _>>()?;
        request.search_params.pass_through_points.push(stops);
    }
    Ok(request)
}

pub fn build_and_solve(data: &TransitData, config: &Config) -> Result<RaptorResponse, Error> {
    let request = build_request(data, config)?;
    let response = Solver::new(data).solve(&request)?;
    Ok(response)
}

/// Ids of the trips ridden by `path`, in travel order.
pub fn trip_ids(path: &Path) -> Vec<&str> {
    path.legs
        .iter()
        .filter_map(|leg| leg.as_transit())
        .map(|leg| leg.trip_id.as_str())
        .collect()
}

/// Every stop where the traveller is, or passes by in a vehicle.
pub fn visited_stops(data: &TransitData, path: &Path) -> Vec<StopIdx> {
    use rangeraptor::TransitDataProvider;
    let mut stops = Vec::new();
    for leg in path.legs.iter() {
        match leg {
            PathLeg::Access(access) => stops.push(access.leg.stop),
            PathLeg::Transit(transit) => {
                let pattern = data.pattern(transit.trip.pattern_idx);
                for position in transit.board_position..=transit.alight_position {
                    stops.push(pattern.stop_at(position));
                }
            }
            PathLeg::Transfer(transfer) => stops.push(transfer.transfer.to_stop),
            PathLeg::Egress(egress) => stops.push(egress.leg.stop),
        }
    }
    stops
}

/// `(start, end, transfers, trips)` of each path, easy to compare.
pub fn summary(path: &Path) -> (Time, Time, usize, Vec<String>) {
    (
        path.start_time,
        path.end_time,
        path.nb_of_transfers,
        trip_ids(path).into_iter().map(str::to_string).collect(),
    )
}
