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

use std::{fmt::Debug, sync::Arc};

use tracing::trace;

use super::pareto_set::ParetoSetEventListener;
use crate::{path::PathCriteria, time::Time, transit_data::StopIdx};

/// The criteria of a stop arrival, as reported to a [`DebugHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalView {
    pub stop: StopIdx,
    pub time: Time,
    pub round: u8,
    pub c1: i32,
    pub c2: u8,
    pub on_board: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DebugEvent {
    StopArrivalAccepted(ArrivalView),
    StopArrivalRejected {
        arrival: ArrivalView,
        rejected_by: ArrivalView,
    },
    StopArrivalDropped {
        arrival: ArrivalView,
        dropped_by: ArrivalView,
    },
    /// discarded because it cannot lead to a new path at the destination
    StopArrivalPruned(ArrivalView),
    PathAccepted(PathCriteria),
    PathRejected(PathCriteria),
    PathDropped(PathCriteria),
}

/// Receives the events of the search on the stops listed in a [`DebugRequest`].
///
/// Handlers only observe : the search gives the same results with or
/// without them.
pub trait DebugHandler: Send + Sync {
    fn on_event(&self, event: &DebugEvent);
}

impl<F> DebugHandler for F
where
    F: Fn(&DebugEvent) + Send + Sync,
{
    fn on_event(&self, event: &DebugEvent) {
        self(event)
    }
}

#[derive(Clone)]
pub struct DebugRequest {
    /// stop arrivals events are reported for these stops only,
    /// path events are always reported
    pub stops: Vec<StopIdx>,
    pub handler: Arc<dyn DebugHandler>,
}

impl DebugRequest {
    pub fn new(stops: Vec<StopIdx>, handler: Arc<dyn DebugHandler>) -> Self {
        Self { stops, handler }
    }

    pub fn is_debugged(&self, stop: StopIdx) -> bool {
        self.stops.contains(&stop)
    }

    pub fn notify(&self, event: DebugEvent) {
        self.handler.on_event(&event);
    }
}

impl Debug for DebugRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugRequest")
            .field("stops", &self.stops)
            .finish()
    }
}

/// Forwards the events of a pareto set to a [`DebugHandler`].
pub struct DebugListener {
    handler: Arc<dyn DebugHandler>,
}

impl DebugListener {
    pub fn new(handler: Arc<dyn DebugHandler>) -> Self {
        Self { handler }
    }
}

/// Turns an element of a pareto set into debug events.
pub trait DebugEventSource {
    fn accepted(&self) -> DebugEvent;
    fn rejected(&self, rejected_by: &Self) -> DebugEvent;
    fn dropped(&self, dropped_by: &Self) -> DebugEvent;
}

impl<T: DebugEventSource> ParetoSetEventListener<T> for DebugListener {
    fn notify_element_accepted(&self, new_element: &T) {
        self.handler.on_event(&new_element.accepted());
    }

    fn notify_element_dropped(&self, dropped: &T, dropped_by: &T) {
        self.handler.on_event(&dropped.dropped(dropped_by));
    }

    fn notify_element_rejected(&self, rejected: &T, rejected_by: &T) {
        self.handler.on_event(&rejected.rejected(rejected_by));
    }
}

/// Logs the events of a pareto set at the `trace` level.
pub struct TraceListener {
    name: String,
}

impl TraceListener {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<T: Debug> ParetoSetEventListener<T> for TraceListener {
    fn notify_element_accepted(&self, new_element: &T) {
        trace!("{} : accepted {:?}", self.name, new_element);
    }

    fn notify_element_dropped(&self, dropped: &T, dropped_by: &T) {
        trace!("{} : dropped {:?} by {:?}", self.name, dropped, dropped_by);
    }

    fn notify_element_rejected(&self, rejected: &T, rejected_by: &T) {
        trace!("{} : rejected {:?} by {:?}", self.name, rejected, rejected_by);
    }
}
