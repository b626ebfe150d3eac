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

use std::sync::Arc;

use crate::{
    engine::{
        debug::{
            ArrivalView, DebugEvent, DebugEventSource, DebugHandler, DebugListener, TraceListener,
        },
        pareto_set::{CompositeListener, ParetoComparator, ParetoSet, ParetoSetEventListener},
        stop_arrival::ArrivalId,
        touched_stops::TouchedStops,
    },
    time::Time,
    transit_data::StopIdx,
};

/// The criteria of a stop arrival, as stored in the pareto set of its stop.
///
/// The arrival itself lives in the arena, under `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McArrival {
    pub id: ArrivalId,
    pub stop: StopIdx,
    pub time: Time,
    pub round: u8,
    pub c1: i32,
    pub c2: u8,
    pub travel_duration: i32,
    /// arrived by transit or by an access leg with a ride
    pub on_board: bool,
    /// arrived by a guaranteed or stay-seated transfer
    pub facilitated: bool,
    /// arrived by a walking access : the next ride is the first one
    pub walking_access: bool,
    /// no ride since the access leg : waiting before the next boarding can be shifted away
    pub access_prefix: bool,
}

impl McArrival {
    fn view(&self) -> ArrivalView {
        ArrivalView {
            stop: self.stop,
            time: self.time,
            round: self.round,
            c1: self.c1,
            c2: self.c2,
            on_board: self.on_board,
        }
    }
}

impl DebugEventSource for McArrival {
    fn accepted(&self) -> DebugEvent {
        DebugEvent::StopArrivalAccepted(self.view())
    }

    fn rejected(&self, rejected_by: &Self) -> DebugEvent {
        DebugEvent::StopArrivalRejected {
            arrival: self.view(),
            rejected_by: rejected_by.view(),
        }
    }

    fn dropped(&self, dropped_by: &Self) -> DebugEvent {
        DebugEvent::StopArrivalDropped {
            arrival: self.view(),
            dropped_by: dropped_by.view(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct McArrivalComparator {
    search_forward: bool,
    with_c2: bool,
}

impl McArrivalComparator {
    pub fn new(search_forward: bool, with_c2: bool) -> Self {
        Self {
            search_forward,
            with_c2,
        }
    }
}

impl ParetoComparator<McArrival> for McArrivalComparator {
    fn left_dominance_exist(&self, left: &McArrival, right: &McArrival) -> bool {
        let better_time = if self.search_forward {
            left.time < right.time
        } else {
            left.time > right.time
        };
        better_time
            || left.round < right.round
            || left.c1 < right.c1
            || (self.with_c2 && left.c2 > right.c2)
            || (left.on_board && !right.on_board)
            || (left.facilitated && !right.facilitated)
    }
}

/// One pareto set of arrivals per stop, with the stops that received
/// arrivals since their marker was last moved.
pub struct McStopArrivals {
    pub(super) sets: Vec<ParetoSet<McArrival, McArrivalComparator>>,
    pub(super) touched_current_round: TouchedStops,
    pub(super) touched_previous_round: TouchedStops,
}

impl McStopArrivals {
    pub fn new(
        nb_of_stops: usize,
        comparator: McArrivalComparator,
        debug: Option<(&[StopIdx], Arc<dyn DebugHandler>)>,
    ) -> Self {
        let mut sets: Vec<_> = (0..nb_of_stops).map(|_| ParetoSet::new(comparator)).collect();
        if let Some((stops, handler)) = debug {
            for stop in stops.iter().filter(|stop| **stop < nb_of_stops) {
                let listeners: Vec<Box<dyn ParetoSetEventListener<McArrival>>> = vec![
                    Box::new(DebugListener::new(handler.clone())),
                    Box::new(TraceListener::new(format!("arrivals at stop {}", stop))),
                ];
                sets[*stop].set_listener(Box::new(CompositeListener::new(listeners)));
            }
        }
        Self {
            sets,
            touched_current_round: TouchedStops::new(nb_of_stops),
            touched_previous_round: TouchedStops::new(nb_of_stops),
        }
    }

    /// Returns `true` if the arrival entered the set of its stop. The caller
    /// then gives it its id with [`Self::set_id_of_last_added`].
    pub fn add(&mut self, arrival: McArrival) -> bool {
        let stop = arrival.stop;
        let added = self.sets[stop].add(arrival);
        if added {
            self.touched_current_round.insert(stop);
        }
        added
    }

    pub fn set_id_of_last_added(&mut self, stop: StopIdx, id: ArrivalId) {
        if let Some(last) = self.sets[stop].last_mut() {
            last.id = id;
        }
    }

    pub fn new_arrivals(&self, stop: StopIdx) -> &[McArrival] {
        self.sets[stop].elements_after_marker()
    }

    /// Makes every new arrival old, whatever the round it was added in.
    pub fn mark_all(&mut self) {
        for stop in self.touched_current_round.stops() {
            self.sets[*stop].mark_at_end_of_set();
        }
        for stop in self.touched_previous_round.stops() {
            self.sets[*stop].mark_at_end_of_set();
        }
        self.touched_current_round.clear();
        self.touched_previous_round.clear();
    }

    pub fn prepare_for_next_round(&mut self) {
        std::mem::swap(&mut self.touched_current_round, &mut self.touched_previous_round);
        self.touched_current_round.clear();
    }

    /// The arrivals of the previous round have been used for boarding.
    pub fn mark_previous_round(&mut self) {
        for stop in self.touched_previous_round.stops() {
            self.sets[*stop].mark_at_end_of_set();
        }
    }

    pub fn best_time(&self, stop: StopIdx, search_forward: bool) -> Option<Time> {
        let times = self.sets[stop].iter().map(|arrival| arrival.time);
        if search_forward {
            times.min()
        } else {
            times.max()
        }
    }

    pub fn min_rides(&self, stop: StopIdx) -> Option<u8> {
        self.sets[stop].iter().map(|arrival| arrival.round).min()
    }
}
