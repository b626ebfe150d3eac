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

use tracing::warn;

use super::{
    debug::{DebugEvent, DebugHandler},
    pareto_set::{ParetoComparator, ParetoSet, ParetoSetEventListener},
    search_context::SearchContext,
    stop_arrival::{ArrivalId, StopArrivalArena},
};
use crate::{
    path::{map_path, Path, PathCriteria},
    request::Profile,
    time::Time,
    transit_data::TransitDataProvider,
};

/// Dominance between paths at the destination.
///
/// Forward searches compare arrival times, reverse searches departure
/// times : the side of the path on which the search had no constraint.
#[derive(Debug, Clone, Copy)]
pub struct PathComparator {
    search_forward: bool,
    multi_criteria: bool,
}

impl PathComparator {
    pub fn new(search_forward: bool, profile: Profile) -> Self {
        Self {
            search_forward,
            multi_criteria: profile == Profile::MultiCriteria,
        }
    }
}

impl ParetoComparator<PathCriteria> for PathComparator {
    fn left_dominance_exist(&self, left: &PathCriteria, right: &PathCriteria) -> bool {
        let better_time = if self.search_forward {
            left.end_time < right.end_time
        } else {
            left.start_time > right.start_time
        };
        if better_time || left.nb_of_transfers < right.nb_of_transfers {
            return true;
        }
        if self.multi_criteria {
            left.duration < right.duration
                || left.c1 < right.c1
                || left.c2.unwrap_or(0) > right.c2.unwrap_or(0)
        } else if self.search_forward {
            left.start_time > right.start_time
        } else {
            left.end_time < right.end_time
        }
    }
}

impl ParetoComparator<Path> for PathComparator {
    fn left_dominance_exist(&self, left: &Path, right: &Path) -> bool {
        ParetoComparator::<PathCriteria>::left_dominance_exist(
            self,
            &left.criteria(),
            &right.criteria(),
        )
    }
}

struct PathDebugListener {
    handler: Arc<dyn DebugHandler>,
}

impl ParetoSetEventListener<Path> for PathDebugListener {
    fn notify_element_accepted(&self, new_element: &Path) {
        self.handler
            .on_event(&DebugEvent::PathAccepted(new_element.criteria()));
    }

    fn notify_element_dropped(&self, dropped: &Path, _dropped_by: &Path) {
        self.handler
            .on_event(&DebugEvent::PathDropped(dropped.criteria()));
    }

    fn notify_element_rejected(&self, rejected: &Path, _rejected_by: &Path) {
        self.handler
            .on_event(&DebugEvent::PathRejected(rejected.criteria()));
    }
}

/// The pareto set of the paths found so far.
pub struct DestinationArrivalPaths {
    paths: ParetoSet<Path, PathComparator>,
    comparator: PathComparator,
    required_c2: Option<u8>,
}

impl DestinationArrivalPaths {
    pub fn new<Data: TransitDataProvider>(ctx: &SearchContext<'_, Data>) -> Self {
        let comparator = PathComparator::new(ctx.calculator.search_forward(), ctx.profile);
        let mut paths = ParetoSet::new(comparator);
        if let Some(debug) = ctx.debug() {
            paths.set_listener(Box::new(PathDebugListener {
                handler: debug.handler.clone(),
            }));
        }
        let required_c2 = if ctx.pass_through.is_active() {
            Some(ctx.pass_through.nb_of_points())
        } else {
            None
        };
        Self {
            paths,
            comparator,
            required_c2,
        }
    }

    /// Maps the arrival into a path and offers it to the set.
    ///
    /// An arrival that cannot be mapped is logged and dropped.
    pub fn add<Data: TransitDataProvider>(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        arena: &StopArrivalArena,
        egress_arrival: ArrivalId,
        iteration_departure_time: Time,
    ) -> bool {
        if let Some(required_c2) = self.required_c2 {
            if arena.get(egress_arrival).c2() < required_c2 {
                return false;
            }
        }
        match map_path(ctx, arena, egress_arrival, iteration_departure_time) {
            Ok(path) => self.paths.add(path),
            Err(err) => {
                warn!("Unable to build a path from a destination arrival : {}", err);
                false
            }
        }
    }

    /// A path with these criteria would enter the set.
    pub fn qualify(&self, criteria: &PathCriteria) -> bool {
        self.paths.iter().all(|path| {
            ParetoComparator::<PathCriteria>::left_dominance_exist(
                &self.comparator,
                criteria,
                &path.criteria(),
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.paths.into_vec()
    }
}
