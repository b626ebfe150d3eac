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

//! Arena of the stop arrivals created by a search.
//!
//! We associate the minimum amount of data to each arrival so as to be able
//! to reconstruct the whole path :
//!  - Access  -> the access leg used to reach the stop
//!  - Transit -> the trip ridden, and the stop where it was boarded.
//!      The arrival we boarded from is given by `previous`.
//!  - Transfer -> the transfer walked from the stop of the previous arrival
//!  - Egress  -> the egress leg from the stop of the previous arrival to the
//!      destination
//!
//! Arrivals are never removed from the arena during a search, so an id stays
//! valid until the arena is dropped, even if the arrival has been discarded
//! from the pareto set of its stop.

use crate::{
    request::AccessEgress,
    time::Time,
    transit_data::{StopIdx, Transfer, TripRef},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrivalId {
    id: u32,
}

impl ArrivalId {
    /// Id of an arrival not yet pushed in the arena.
    pub(crate) const PENDING: ArrivalId = ArrivalId { id: u32::MAX };
}

/// Values shared by every kind of arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalState {
    pub stop: StopIdx,
    /// arrival time at the stop, or departure time in a reverse search
    pub time: Time,
    pub round: u8,
    /// time elapsed since the start of the access, waiting before the first ride excluded
    pub travel_duration: i32,
    pub c1: i32,
    /// number of pass-through points already visited
    pub c2: u8,
    pub previous: Option<ArrivalId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardingInfo {
    pub board_position: usize,
    pub alight_position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopArrival {
    Access {
        state: ArrivalState,
        leg: AccessEgress,
    },
    Transit {
        state: ArrivalState,
        trip: TripRef,
        board_stop: StopIdx,
        board_time: Time,
        /// not recorded when positions are recovered after the search
        positions: Option<BoardingInfo>,
    },
    Transfer {
        state: ArrivalState,
        transfer: Transfer,
    },
    Egress {
        state: ArrivalState,
        leg: AccessEgress,
    },
}

impl StopArrival {
    pub fn state(&self) -> &ArrivalState {
        match self {
            StopArrival::Access { state, .. }
            | StopArrival::Transit { state, .. }
            | StopArrival::Transfer { state, .. }
            | StopArrival::Egress { state, .. } => state,
        }
    }

    pub fn stop(&self) -> StopIdx {
        self.state().stop
    }

    pub fn time(&self) -> Time {
        self.state().time
    }

    pub fn round(&self) -> u8 {
        self.state().round
    }

    pub fn c1(&self) -> i32 {
        self.state().c1
    }

    pub fn c2(&self) -> u8 {
        self.state().c2
    }

    pub fn previous(&self) -> Option<ArrivalId> {
        self.state().previous
    }

    pub fn travel_duration(&self) -> i32 {
        self.state().travel_duration
    }

    /// The traveller is leaving a vehicle : either a transit ride or an
    /// access leg which contains a ride.
    pub fn arrived_on_board(&self) -> bool {
        match self {
            StopArrival::Transit { .. } => true,
            StopArrival::Access { leg, .. } => leg.on_board,
            _ => false,
        }
    }

    /// The next boarding will be the first ride of the journey.
    pub fn is_walking_access(&self) -> bool {
        matches!(self, StopArrival::Access { leg, .. } if !leg.on_board)
    }

    /// The next boarding does not need any slack.
    pub fn is_facilitated(&self) -> bool {
        matches!(self, StopArrival::Transfer { transfer, .. } if transfer.is_facilitated())
    }
}

#[derive(Debug, Default)]
pub struct StopArrivalArena {
    arrivals: Vec<StopArrival>,
}

impl StopArrivalArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, arrival: StopArrival) -> ArrivalId {
        let id = self.arrivals.len() as u32;
        self.arrivals.push(arrival);
        ArrivalId { id }
    }

    pub fn get(&self, id: ArrivalId) -> &StopArrival {
        &self.arrivals[id.id as usize]
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Iterates from `last` back to the access arrival which starts the chain.
    pub fn chain(&self, last: ArrivalId) -> Chain<'_> {
        Chain {
            arena: self,
            next: Some(last),
        }
    }
}

pub struct Chain<'arena> {
    arena: &'arena StopArrivalArena,
    next: Option<ArrivalId>,
}

impl<'arena> Iterator for Chain<'arena> {
    type Item = (ArrivalId, &'arena StopArrival);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let arrival = self.arena.get(id);
        self.next = arrival.previous();
        Some((id, arrival))
    }
}
