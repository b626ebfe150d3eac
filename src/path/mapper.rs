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

//! Turns a chain of stop arrivals into a [`Path`].
//!
//! A forward search gives the chain from the egress back to the access, so
//! it is reversed. A reverse search already gives it in travel order, but
//! each of its legs is seen backward : its "access" is the egress of the
//! path, and its transit arrivals are made at the boarding stop.

use super::{Path, PathBuilder, PathError, RawLeg};
use crate::{
    engine::{
        search_context::SearchContext,
        stop_arrival::{ArrivalId, StopArrival, StopArrivalArena},
    },
    time::Time,
    transit_data::{trip_search, TransitDataProvider, TripRef},
};

pub fn map_path<Data: TransitDataProvider>(
    ctx: &SearchContext<'_, Data>,
    arena: &StopArrivalArena,
    destination_arrival: ArrivalId,
    iteration_departure_time: Time,
) -> Result<Path, PathError> {
    let mut chain: Vec<&StopArrival> = arena
        .chain(destination_arrival)
        .map(|(_, arrival)| arrival)
        .collect();
    let (legs, start_time) = if ctx.calculator.search_forward() {
        chain.reverse();
        forward_legs(ctx, &chain)?
    } else {
        reverse_legs(ctx, &chain)?
    };
    let c2 = if ctx.pass_through.is_active() {
        Some(arena.get(destination_arrival).c2())
    } else {
        None
    };
    PathBuilder::new(ctx.data, &ctx.request.slack, &ctx.cost).build(
        legs,
        start_time,
        iteration_departure_time,
        c2,
    )
}

fn forward_legs<Data: TransitDataProvider>(
    ctx: &SearchContext<'_, Data>,
    chain: &[&StopArrival],
) -> Result<(Vec<RawLeg>, Time), PathError> {
    let mut legs = Vec::with_capacity(chain.len());
    let mut start_time = 0;
    for (idx, arrival) in chain.iter().enumerate() {
        let leg = match arrival {
            StopArrival::Access { state, leg } => {
                start_time = state.time - leg.duration;
                RawLeg::Access(*leg)
            }
            StopArrival::Transit {
                state,
                trip,
                board_stop,
                positions,
                ..
            } => {
                let (board_position, alight_position) = match positions {
                    Some(info) => (info.board_position, info.alight_position),
                    None => {
                        let previous = idx
                            .checked_sub(1)
                            .and_then(|previous| chain.get(previous))
                            .ok_or(PathError::MalformedLegs)?;
                        let earliest_board_time = ctx.slack.earliest_board_time(
                            previous.time(),
                            previous.is_walking_access(),
                            previous.is_facilitated(),
                        );
                        let pattern = ctx.data.pattern(trip.pattern_idx);
                        trip_search::find_positions_forward(
                            pattern,
                            pattern.trip(trip.trip_idx),
                            *board_stop,
                            earliest_board_time,
                            state.stop,
                            ctx.slack.alight_time(state.time),
                        )
                        .ok_or_else(|| positions_not_found(ctx, *trip))?
                    }
                };
                RawLeg::Transit {
                    trip: *trip,
                    board_position,
                    alight_position,
                }
            }
            StopArrival::Transfer { transfer, .. } => RawLeg::Transfer(transfer.clone()),
            StopArrival::Egress { leg, .. } => RawLeg::Egress(*leg),
        };
        legs.push(leg);
    }
    Ok((legs, start_time))
}

fn reverse_legs<Data: TransitDataProvider>(
    ctx: &SearchContext<'_, Data>,
    chain: &[&StopArrival],
) -> Result<(Vec<RawLeg>, Time), PathError> {
    let mut legs = Vec::with_capacity(chain.len());
    let mut start_time = 0;
    for arrival in chain.iter() {
        let leg = match arrival {
            StopArrival::Egress { state, leg } => {
                start_time = state.time;
                RawLeg::Access(*leg)
            }
            StopArrival::Transit {
                state,
                trip,
                board_stop,
                board_time,
                positions,
            } => {
                let (board_position, alight_position) = match positions {
                    Some(info) => (info.alight_position, info.board_position),
                    None => {
                        let pattern = ctx.data.pattern(trip.pattern_idx);
                        trip_search::find_positions_reverse(
                            pattern,
                            pattern.trip(trip.trip_idx),
                            state.stop,
                            ctx.slack.alight_time(state.time),
                            *board_stop,
                            *board_time,
                        )
                        .ok_or_else(|| positions_not_found(ctx, *trip))?
                    }
                };
                RawLeg::Transit {
                    trip: *trip,
                    board_position,
                    alight_position,
                }
            }
            StopArrival::Transfer { transfer, .. } => RawLeg::Transfer(transfer.clone()),
            StopArrival::Access { leg, .. } => RawLeg::Egress(*leg),
        };
        legs.push(leg);
    }
    Ok((legs, start_time))
}

fn positions_not_found<Data: TransitDataProvider>(
    ctx: &SearchContext<'_, Data>,
    trip: TripRef,
) -> PathError {
    PathError::PositionsNotFound {
        trip_id: ctx.data.trip(trip).id().to_string(),
    }
}
