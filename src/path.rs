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

mod builder;
mod mapper;

pub use builder::{PathBuilder, RawLeg};
pub use mapper::map_path;

use std::fmt::Display;

use crate::{
    engine::cost_calculator::COST_UNITS_PER_SECOND,
    request::AccessEgress,
    time::{format_duration, format_time, Time},
    transit_data::{StopIdx, Transfer, TransitDataProvider, TripRef},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessLeg {
    pub leg: AccessEgress,
    pub from_time: Time,
    pub to_time: Time,
    pub c1: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitLeg {
    pub trip: TripRef,
    pub trip_id: String,
    pub pattern_name: String,
    pub board_stop: StopIdx,
    pub board_position: usize,
    pub board_time: Time,
    pub alight_stop: StopIdx,
    pub alight_position: usize,
    pub alight_time: Time,
    pub c1: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferLeg {
    pub transfer: Transfer,
    pub from_time: Time,
    pub to_time: Time,
    pub c1: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EgressLeg {
    pub leg: AccessEgress,
    pub from_time: Time,
    pub to_time: Time,
    pub c1: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLeg {
    Access(AccessLeg),
    Transit(TransitLeg),
    Transfer(TransferLeg),
    Egress(EgressLeg),
}

impl PathLeg {
    pub fn from_time(&self) -> Time {
        match self {
            PathLeg::Access(leg) => leg.from_time,
            PathLeg::Transit(leg) => leg.board_time,
            PathLeg::Transfer(leg) => leg.from_time,
            PathLeg::Egress(leg) => leg.from_time,
        }
    }

    pub fn to_time(&self) -> Time {
        match self {
            PathLeg::Access(leg) => leg.to_time,
            PathLeg::Transit(leg) => leg.alight_time,
            PathLeg::Transfer(leg) => leg.to_time,
            PathLeg::Egress(leg) => leg.to_time,
        }
    }

    pub fn c1(&self) -> i32 {
        match self {
            PathLeg::Access(leg) => leg.c1,
            PathLeg::Transit(leg) => leg.c1,
            PathLeg::Transfer(leg) => leg.c1,
            PathLeg::Egress(leg) => leg.c1,
        }
    }

    pub fn as_transit(&self) -> Option<&TransitLeg> {
        match self {
            PathLeg::Transit(leg) => Some(leg),
            _ => None,
        }
    }

    fn to_raw(&self) -> RawLeg {
        match self {
            PathLeg::Access(leg) => RawLeg::Access(leg.leg),
            PathLeg::Transit(leg) => RawLeg::Transit {
                trip: leg.trip,
                board_position: leg.board_position,
                alight_position: leg.alight_position,
            },
            PathLeg::Transfer(leg) => RawLeg::Transfer(leg.transfer.clone()),
            PathLeg::Egress(leg) => RawLeg::Egress(leg.leg),
        }
    }
}

/// The values on which paths are compared at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathCriteria {
    pub start_time: Time,
    pub end_time: Time,
    pub nb_of_transfers: usize,
    pub duration: i32,
    pub c1: i32,
    pub c2: Option<u8>,
}

/// A journey from the origin to the destination, with its legs in travel
/// order whatever the direction of the search that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub legs: Vec<PathLeg>,
    pub start_time: Time,
    pub end_time: Time,
    pub nb_of_transfers: usize,
    pub c1: i32,
    pub c2: Option<u8>,
    /// sum of the priority costs of the connections between rides
    pub transfer_priority_cost: i32,
    /// `c1` plus a cost favoring long waits at transfers,
    /// equal to `c1` until the transfers are optimized
    pub wait_time_optimized_cost: i32,
    pub iteration_departure_time: Time,
}

impl Path {
    pub fn duration(&self) -> i32 {
        self.end_time - self.start_time
    }

    pub fn criteria(&self) -> PathCriteria {
        PathCriteria {
            start_time: self.start_time,
            end_time: self.end_time,
            nb_of_transfers: self.nb_of_transfers,
            duration: self.duration(),
            c1: self.c1,
            c2: self.c2,
        }
    }

    pub fn transit_legs(&self) -> impl Iterator<Item = &TransitLeg> + '_ {
        self.legs.iter().filter_map(PathLeg::as_transit)
    }

    pub fn nb_of_transit_legs(&self) -> usize {
        self.transit_legs().count()
    }

    pub fn access(&self) -> Option<&AccessLeg> {
        match self.legs.first() {
            Some(PathLeg::Access(leg)) => Some(leg),
            _ => None,
        }
    }

    pub fn egress(&self) -> Option<&EgressLeg> {
        match self.legs.last() {
            Some(PathLeg::Egress(leg)) => Some(leg),
            _ => None,
        }
    }

    /// The legs as handed to a [`PathBuilder`].
    pub fn raw_legs(&self) -> Vec<RawLeg> {
        self.legs.iter().map(PathLeg::to_raw).collect()
    }

    /// Same legs on the same trips, times and costs are not compared.
    pub fn same_itinerary(&self, other: &Path) -> bool {
        self.raw_legs() == other.raw_legs()
    }

    pub fn display<'a, Data: TransitDataProvider>(
        &'a self,
        data: &'a Data,
    ) -> PathDisplay<'a, Data> {
        PathDisplay { path: self, data }
    }
}

/// Prints a path on one line, for logs and tests.
///
/// `Walk 2m ~ A ~ P1 08:00 08:20 ~ C ~ Walk 0s [08:00 08:22 22m Tx0 C1 1_440]`
pub struct PathDisplay<'a, Data> {
    path: &'a Path,
    data: &'a Data,
}

fn write_access_egress(
    f: &mut std::fmt::Formatter<'_>,
    leg: &AccessEgress,
) -> std::fmt::Result {
    let mode = if leg.on_board { "Flex" } else { "Walk" };
    write!(f, "{} {}", mode, format_duration(leg.duration))
}

impl<'a, Data: TransitDataProvider> Display for PathDisplay<'a, Data> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data;
        for (idx, leg) in self.path.legs.iter().enumerate() {
            if idx > 0 {
                write!(f, " ~ ")?;
            }
            match leg {
                PathLeg::Access(access) => {
                    write_access_egress(f, &access.leg)?;
                    write!(f, " ~ {}", data.stop_name(access.leg.stop))?;
                }
                PathLeg::Transit(transit) => write!(
                    f,
                    "{} {} {} ~ {}",
                    transit.trip_id,
                    format_time(transit.board_time),
                    format_time(transit.alight_time),
                    data.stop_name(transit.alight_stop)
                )?,
                PathLeg::Transfer(transfer) => write!(
                    f,
                    "Walk {} ~ {}",
                    format_duration(transfer.to_time - transfer.from_time),
                    data.stop_name(transfer.transfer.to_stop)
                )?,
                PathLeg::Egress(egress) => write_access_egress(f, &egress.leg)?,
            }
        }
        write!(
            f,
            " [{} {} {} Tx{} C1 {}",
            format_time(self.path.start_time),
            format_time(self.path.end_time),
            format_duration(self.path.duration()),
            self.path.nb_of_transfers,
            self.path.c1 / COST_UNITS_PER_SECOND
        )?;
        if let Some(c2) = self.path.c2 {
            write!(f, " C2 {}", c2)?;
        }
        write!(f, "]")
    }
}

/// Errors raised while turning search results into paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// the legs do not start with an access, end with an egress,
    /// or have two consecutive transfers
    MalformedLegs,
    PositionsNotFound { trip_id: String },
    InvalidPositions {
        trip_id: String,
        board_position: usize,
        alight_position: usize,
    },
    InfeasibleConnection { trip_id: String },
}

impl std::error::Error for PathError {}

impl Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::MalformedLegs => write!(f, "The legs of the path are malformed."),
            PathError::PositionsNotFound { trip_id } => write!(
                f,
                "Unable to find the boarding and alighting positions on trip {}.",
                trip_id
            ),
            PathError::InvalidPositions {
                trip_id,
                board_position,
                alight_position,
            } => write!(
                f,
                "Invalid ride on trip {} from position {} to position {}.",
                trip_id, board_position, alight_position
            ),
            PathError::InfeasibleConnection { trip_id } => write!(
                f,
                "Trip {} cannot be boarded in time from the previous leg.",
                trip_id
            ),
        }
    }
}
