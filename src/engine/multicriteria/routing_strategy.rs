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

use super::{
    arrivals::{McArrival, McArrivalComparator, McStopArrivals},
    pattern_ride::{PatternRide, PatternRideComparator},
};
use crate::{
    engine::{
        debug::{ArrivalView, DebugEvent},
        destination_paths::DestinationArrivalPaths,
        heuristics::Heuristics,
        pareto_set::ParetoSet,
        search_context::SearchContext,
        stop_arrival::{ArrivalId, ArrivalState, BoardingInfo, StopArrival, StopArrivalArena},
        worker::{RoundContext, RoutingStrategy, StrategyResults},
    },
    path::PathCriteria,
    response::StopArrivalsSummary,
    time::Time,
    transit_data::{Pattern, StopIdx, TransitDataProvider, TripRef},
};

/// An arrival computed during a phase of a round, added to the stop
/// arrivals once the phase is complete.
type PendingArrival = (McArrival, StopArrival);

/// Keeps, at each stop, every arrival not dominated on time, number of
/// rides, generalized cost and pass-through progress.
pub struct McRoutingStrategy {
    arena: StopArrivalArena,
    arrivals: McStopArrivals,
    rides: ParetoSet<PatternRide, PatternRideComparator>,
    pending_transits: Vec<PendingArrival>,
    pending_transfers: Vec<PendingArrival>,
    destination: DestinationArrivalPaths,
    heuristics: Option<Heuristics>,
    with_c2: bool,
    iteration_departure_time: Time,
}

impl McRoutingStrategy {
    pub fn new<Data: TransitDataProvider>(
        ctx: &SearchContext<'_, Data>,
        heuristics: Option<Heuristics>,
    ) -> Self {
        let search_forward = ctx.calculator.search_forward();
        let with_c2 = ctx.pass_through.is_active();
        let debug = ctx
            .debug()
            .map(|debug| (debug.stops.as_slice(), debug.handler.clone()));
        Self {
            arena: StopArrivalArena::new(),
            arrivals: McStopArrivals::new(
                ctx.nb_of_stops(),
                McArrivalComparator::new(search_forward, with_c2),
                debug,
            ),
            rides: ParetoSet::new(PatternRideComparator::new(search_forward, with_c2)),
            pending_transits: Vec::new(),
            pending_transfers: Vec::new(),
            destination: DestinationArrivalPaths::new(ctx),
            heuristics,
            with_c2,
            iteration_departure_time: 0,
        }
    }

    fn commit<Data: TransitDataProvider>(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        entry: McArrival,
        arrival: StopArrival,
    ) {
        if self.is_pruned(ctx, &entry) {
            if let Some(debug) = ctx.debug() {
                if debug.is_debugged(entry.stop) {
                    debug.notify(DebugEvent::StopArrivalPruned(view(&entry)));
                }
            }
            return;
        }
        if self.arrivals.add(entry) {
            let id = self.arena.push(arrival);
            self.arrivals.set_id_of_last_added(entry.stop, id);
        }
    }

    fn commit_pending<Data: TransitDataProvider>(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        pending: &mut Vec<PendingArrival>,
    ) {
        for (entry, arrival) in pending.drain(..) {
            self.commit(ctx, entry, arrival);
        }
    }

    /// The arrival cannot lead to a path better than the ones already found.
    fn is_pruned<Data: TransitDataProvider>(
        &self,
        ctx: &SearchContext<'_, Data>,
        entry: &McArrival,
    ) -> bool {
        let heuristics = match &self.heuristics {
            Some(heuristics) => heuristics,
            None => return false,
        };
        let at_stop = match heuristics.at_stop(entry.stop) {
            Some(at_stop) => at_stop,
            None => return true,
        };
        if self.destination.is_empty() {
            return false;
        }
        let calculator = &ctx.calculator;
        let rides = entry.round as usize + at_stop.min_rides;
        let destination_time = calculator.plus_duration(entry.time, at_stop.min_travel_duration);
        let (start_time, end_time) = if calculator.search_forward() {
            (self.iteration_departure_time, destination_time)
        } else {
            (destination_time, self.iteration_departure_time)
        };
        let criteria = PathCriteria {
            start_time,
            end_time,
            nb_of_transfers: rides.max(1) - 1,
            duration: entry.travel_duration + at_stop.min_travel_duration,
            c1: entry.c1 + at_stop.min_cost,
            c2: self.with_c2.then(|| ctx.pass_through.nb_of_points()),
        };
        !self.destination.qualify(&criteria)
    }

    fn update_rides_c2<Data: TransitDataProvider>(&mut self, ctx: &SearchContext<'_, Data>, stop: StopIdx) {
        let updated: Vec<PatternRide> = self
            .rides
            .iter()
            .map(|ride| PatternRide {
                c2: ctx.pass_through.update(ride.c2, stop),
                ..*ride
            })
            .collect();
        if updated
            .iter()
            .zip(self.rides.iter())
            .any(|(updated, ride)| updated.c2 != ride.c2)
        {
            self.rides.clear();
            for ride in updated {
                self.rides.add(ride);
            }
        }
    }
}

fn view(entry: &McArrival) -> ArrivalView {
    ArrivalView {
        stop: entry.stop,
        time: entry.time,
        round: entry.round,
        c1: entry.c1,
        c2: entry.c2,
        on_board: entry.on_board,
    }
}

fn state_of(entry: &McArrival, previous: Option<ArrivalId>) -> ArrivalState {
    ArrivalState {
        stop: entry.stop,
        time: entry.time,
        round: entry.round,
        travel_duration: entry.travel_duration,
        c1: entry.c1,
        c2: entry.c2,
        previous,
    }
}

fn board<Data: TransitDataProvider>(
    ctx: &SearchContext<'_, Data>,
    pattern: &Pattern,
    position: usize,
    previous: &McArrival,
) -> Option<PatternRide> {
    let calculator = &ctx.calculator;
    let stop = pattern.stop_at(position);
    let earliest_board_time =
        ctx.slack
            .earliest_board_time(previous.time, previous.walking_access, previous.facilitated);
    let boarding = calculator.search_trip(pattern, position, earliest_board_time, None)?;
    let wait = if previous.access_prefix {
        // the access is shifted to reach the stop just in time
        ctx.slack
            .boarding_slack(previous.walking_access, previous.facilitated)
    } else {
        calculator.duration(previous.time, boarding.time)
    };
    let board_c1 = previous.c1 + ctx.cost.boarding_cost(previous.round == 0, wait, stop);
    Some(PatternRide {
        previous: previous.id,
        board_stop: stop,
        board_position: position,
        board_time: boarding.time,
        trip_idx: boarding.trip_idx,
        relative_c1: ctx
            .cost
            .on_trip_relative_cost(calculator, board_c1, boarding.time),
        c2: previous.c2,
        travel_duration_at_board: previous.travel_duration + wait,
    })
}

fn transit_arrival<Data: TransitDataProvider>(
    ctx: &SearchContext<'_, Data>,
    round: u8,
    pattern: &Pattern,
    ride: &PatternRide,
    position: usize,
) -> Option<PendingArrival> {
    let calculator = &ctx.calculator;
    let trip = pattern.trip(ride.trip_idx);
    let alight_time = calculator.alight_time(trip, position);
    assert!(
        calculator.duration(ride.board_time, alight_time) >= 0,
        "Negative ride on trip {} between positions {} and {}",
        trip.id(),
        ride.board_position,
        position
    );
    let time = ctx.slack.stop_arrival_time(alight_time);
    if ctx.exceeds_time_limit(time) {
        return None;
    }
    let stop = pattern.stop_at(position);
    let entry = McArrival {
        id: ArrivalId::PENDING,
        stop,
        time,
        round,
        c1: ctx.cost.transit_arrival_cost(
            calculator,
            ride.relative_c1,
            ctx.slack.search_alight_slack(),
            alight_time,
            stop,
        ),
        c2: ride.c2,
        travel_duration: ride.travel_duration_at_board + calculator.duration(ride.board_time, time),
        on_board: true,
        facilitated: false,
        walking_access: false,
        access_prefix: false,
    };
    let positions = if ctx.approximate_trip_search {
        None
    } else {
        Some(BoardingInfo {
            board_position: ride.board_position,
            alight_position: position,
        })
    };
    let arrival = StopArrival::Transit {
        state: state_of(&entry, Some(ride.previous)),
        trip: TripRef {
            pattern_idx: pattern.idx(),
            trip_idx: ride.trip_idx,
        },
        board_stop: ride.board_stop,
        board_time: ride.board_time,
        positions,
    };
    Some((entry, arrival))
}

impl<Data: TransitDataProvider> RoutingStrategy<Data> for McRoutingStrategy {
    fn setup_iteration(&mut self, _ctx: &SearchContext<'_, Data>, iteration_departure_time: Time) {
        self.iteration_departure_time = iteration_departure_time;
        self.arrivals.mark_all();
    }

    fn add_access_arrivals(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
        let on_board = round.round > 0;
        for leg in ctx.access.iter().filter(|leg| leg.on_board == on_board) {
            let time = ctx
                .calculator
                .plus_duration(self.iteration_departure_time, leg.duration);
            if ctx.exceeds_time_limit(time) {
                continue;
            }
            let entry = McArrival {
                id: ArrivalId::PENDING,
                stop: leg.stop,
                time,
                round: round.round as u8,
                c1: leg.c1,
                c2: ctx.pass_through.update(0, leg.stop),
                travel_duration: leg.duration,
                on_board: leg.on_board,
                facilitated: false,
                walking_access: !leg.on_board,
                access_prefix: true,
            };
            let arrival = StopArrival::Access {
                state: state_of(&entry, None),
                leg: *leg,
            };
            self.commit(ctx, entry, arrival);
        }
    }

    fn prepare_for_next_round(&mut self, _ctx: &SearchContext<'_, Data>, _round: RoundContext) {
        self.arrivals.prepare_for_next_round();
    }

    fn stops_touched_previous_round(&self) -> &[StopIdx] {
        self.arrivals.touched_previous_round.stops()
    }

    fn route_pattern(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        round: RoundContext,
        pattern: &Pattern,
        first_position: usize,
    ) {
        let calculator = ctx.calculator;
        let round = round.round as u8;
        self.rides.clear();
        for position in calculator.positions_from(first_position, pattern.nb_of_positions()) {
            let stop = pattern.stop_at(position);
            if self.with_c2 && !self.rides.is_empty() {
                self.update_rides_c2(ctx, stop);
            }
            if calculator.alighting_possible_at(pattern, position) {
                for ride in self.rides.iter() {
                    if let Some(pending) = transit_arrival(ctx, round, pattern, ride, position) {
                        self.pending_transits.push(pending);
                    }
                }
            }
            if calculator.boarding_possible_at(pattern, position)
                && self.arrivals.touched_previous_round.contains(stop)
            {
                for previous in self.arrivals.new_arrivals(stop) {
                    if let Some(ride) = board(ctx, pattern, position, previous) {
                        self.rides.add(ride);
                    }
                }
            }
        }
    }

    fn transits_for_round_complete(&mut self, ctx: &SearchContext<'_, Data>, _round: RoundContext) {
        self.arrivals.mark_previous_round();
        let mut pending = std::mem::take(&mut self.pending_transits);
        self.commit_pending(ctx, &mut pending);
        self.pending_transits = pending;
    }

    fn relax_transfers(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
        let calculator = ctx.calculator;
        for stop in self.arrivals.touched_current_round.stops() {
            for previous in self.arrivals.new_arrivals(*stop) {
                if !previous.on_board {
                    continue;
                }
                for transfer in calculator.transfers(ctx.data, *stop) {
                    if !transfer.is_allowed() {
                        continue;
                    }
                    let duration = transfer.effective_duration();
                    let time = calculator.plus_duration(previous.time, duration);
                    if ctx.exceeds_time_limit(time) {
                        continue;
                    }
                    let target = calculator.transfer_target(transfer);
                    let entry = McArrival {
                        id: ArrivalId::PENDING,
                        stop: target,
                        time,
                        round: round.round as u8,
                        c1: previous.c1 + ctx.cost.walk_cost(duration),
                        c2: ctx.pass_through.update(previous.c2, target),
                        travel_duration: previous.travel_duration + duration,
                        on_board: false,
                        facilitated: transfer.is_facilitated(),
                        walking_access: false,
                        access_prefix: previous.access_prefix,
                    };
                    let arrival = StopArrival::Transfer {
                        state: state_of(&entry, Some(previous.id)),
                        transfer: transfer.clone(),
                    };
                    self.pending_transfers.push((entry, arrival));
                }
            }
        }
    }

    fn transfers_for_round_complete(&mut self, ctx: &SearchContext<'_, Data>, _round: RoundContext) {
        let mut pending = std::mem::take(&mut self.pending_transfers);
        self.commit_pending(ctx, &mut pending);
        self.pending_transfers = pending;
    }

    fn add_destination_arrivals(&mut self, ctx: &SearchContext<'_, Data>, _round: RoundContext) {
        let calculator = &ctx.calculator;
        for stop in ctx.egress_stops.iter() {
            if !self.arrivals.touched_current_round.contains(*stop) {
                continue;
            }
            for previous in self.arrivals.new_arrivals(*stop) {
                for egress_idx in ctx.egress_by_stop[*stop].iter() {
                    let leg = ctx.egress[*egress_idx];
                    // walking to the destination only after a ride
                    if !leg.on_board && !previous.on_board {
                        continue;
                    }
                    let slack = if leg.on_board && previous.on_board {
                        ctx.slack.transfer_slack()
                    } else {
                        0
                    };
                    let time = calculator.plus_duration(previous.time, slack + leg.duration);
                    if ctx.exceeds_time_limit(time) {
                        continue;
                    }
                    let mut c1 = previous.c1 + leg.c1;
                    if leg.on_board {
                        if previous.round > 0 {
                            c1 += ctx.cost.transfer_cost();
                        }
                        c1 += ctx.cost.waiting_cost(slack);
                    }
                    let state = ArrivalState {
                        stop: *stop,
                        time,
                        round: previous.round,
                        travel_duration: previous.travel_duration + slack + leg.duration,
                        c1,
                        c2: previous.c2,
                        previous: Some(previous.id),
                    };
                    let id = self.arena.push(StopArrival::Egress { state, leg });
                    self.destination
                        .add(ctx, &self.arena, id, self.iteration_departure_time);
                }
            }
        }
    }

    fn is_new_round_available(&self) -> bool {
        !self.arrivals.touched_current_round.is_empty()
    }

    fn into_results(self, ctx: &SearchContext<'_, Data>) -> StrategyResults {
        let calculator = ctx.calculator;
        let search_forward = calculator.search_forward();
        let unreached = calculator.unreached();
        let nb_of_stops = ctx.nb_of_stops();
        let best_times = (0..nb_of_stops)
            .map(|stop| self.arrivals.best_time(stop, search_forward).unwrap_or(unreached))
            .collect();
        let best_transit_times = (0..nb_of_stops)
            .map(|stop| {
                self.arrivals.sets[stop]
                    .iter()
                    .filter(|arrival| arrival.on_board)
                    .map(|arrival| arrival.time)
                    .fold(unreached, |best, time| {
                        if calculator.is_better(time, best) {
                            time
                        } else {
                            best
                        }
                    })
            })
            .collect();
        let min_rides = (0..nb_of_stops)
            .map(|stop| self.arrivals.min_rides(stop).unwrap_or(u8::MAX))
            .collect();
        StrategyResults {
            paths: self.destination.into_paths(),
            stop_arrivals: StopArrivalsSummary::new(
                calculator.direction(),
                best_times,
                best_transit_times,
                min_rides,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{deadline::Deadline, worker::RangeRaptorWorker},
        request::{Profile, RaptorRequest},
        time::parse_time,
        transit_data::{TransitData, TransitDataBuilder},
    };

    // A direct slow pattern, and a faster connection with a transfer at B.
    fn data() -> TransitData {
        TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "C"]).trip("P1", &["08:00", "08:30"]);
            })
            .pattern("Q", |p| {
                p.stops(&["A", "B"]).trip("Q1", &["08:00", "08:05"]);
            })
            .pattern("R", |p| {
                p.stops(&["B", "C"]).trip("R1", &["08:10", "08:20"]);
            })
            .build()
            .unwrap()
    }

    fn t(time: &str) -> Time {
        parse_time(time).unwrap()
    }

    fn route(data: &TransitData, request: &RaptorRequest) -> Vec<(Time, usize)> {
        let ctx = SearchContext::new(data, request, Deadline::unlimited());
        let results = RangeRaptorWorker::new(&ctx, McRoutingStrategy::new(&ctx, None)).route();
        let mut paths: Vec<(Time, usize)> = results
            .paths
            .iter()
            .map(|path| (path.end_time, path.nb_of_transfers))
            .collect();
        paths.sort_unstable();
        paths
    }

    #[test]
    fn keeps_the_faster_and_the_direct_path() {
        let data = data();
        let a = data.stop_idx("A").unwrap();
        let c = data.stop_idx("C").unwrap();
        let request = RaptorRequest::builder()
            .profile(Profile::MultiCriteria)
            .earliest_departure_time(t("08:00"))
            .add_access(a, 0)
            .add_egress(c, 0)
            .build();
        assert_eq!(route(&data, &request), vec![(t("08:20"), 1), (t("08:30"), 0)]);
    }

    fn criteria(set: &ParetoSet<McArrival, McArrivalComparator>) -> Vec<(Time, i32)> {
        let mut criteria: Vec<_> = set.iter().map(|arrival| (arrival.time, arrival.c1)).collect();
        criteria.sort_unstable();
        criteria
    }

    #[test]
    fn ride_reduction_keeps_the_pareto_optimal_arrivals() {
        let data = TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "B", "C", "D"])
                    .trip("T1", &["08:00", "08:10", "08:20", "08:30"])
                    .trip("T2", &["08:20", "08:30", "08:40", "08:50"]);
            })
            .build()
            .unwrap();
        let a = data.stop_idx("A").unwrap();
        let b = data.stop_idx("B").unwrap();
        let d = data.stop_idx("D").unwrap();
        let request = RaptorRequest::builder()
            .profile(Profile::MultiCriteria)
            .earliest_departure_time(t("07:00"))
            .add_access(a, 0)
            .add_egress(d, 0)
            .build();
        let ctx = SearchContext::new(&data, &request, Deadline::unlimited());
        let pattern = data.pattern(0);
        let previous = |stop: StopIdx, time: &str, c1: i32| McArrival {
            id: ArrivalId::PENDING,
            stop,
            time: t(time),
            round: 1,
            c1,
            c2: 0,
            travel_duration: 0,
            on_board: true,
            facilitated: false,
            walking_access: false,
            access_prefix: false,
        };
        // T1 is caught at A and at B for a high cost, T2 cheaply at both
        let boardings = vec![
            (0, previous(a, "07:58", 50_000)),
            (0, previous(a, "08:15", 0)),
            (1, previous(b, "08:08", 200_000)),
            (1, previous(b, "08:25", 0)),
        ];
        let comparator = McArrivalComparator::new(true, false);

        for position in 1..pattern.nb_of_positions() {
            // every ride compared on all criteria at the alight stop
            let mut full = ParetoSet::new(comparator);
            for (board_position, arrival) in boardings.iter() {
                if *board_position >= position {
                    continue;
                }
                if let Some(ride) = board(&ctx, pattern, *board_position, arrival) {
                    if let Some((entry, _)) = transit_arrival(&ctx, 2, pattern, &ride, position) {
                        full.add(entry);
                    }
                }
            }

            // rides reduced on their relative cost while scanning the pattern
            let mut rides = ParetoSet::new(PatternRideComparator::new(true, false));
            for scanned in 0..position {
                let scanned_boardings = boardings
                    .iter()
                    .filter(|(board_position, _)| *board_position == scanned);
                for (_, arrival) in scanned_boardings {
                    if let Some(ride) = board(&ctx, pattern, scanned, arrival) {
                        rides.add(ride);
                    }
                }
            }
            let mut reduced = ParetoSet::new(comparator);
            for ride in rides.iter() {
                if let Some((entry, _)) = transit_arrival(&ctx, 2, pattern, ride, position) {
                    reduced.add(entry);
                }
            }

            assert_eq!(criteria(&full), criteria(&reduced), "position {}", position);
        }
        // at D : early on T1, or cheaper on T2 boarded at B
        let mut rides = ParetoSet::new(PatternRideComparator::new(true, false));
        for (board_position, arrival) in boardings.iter() {
            if let Some(ride) = board(&ctx, pattern, *board_position, arrival) {
                rides.add(ride);
            }
        }
        let trips: Vec<(usize, StopIdx)> = rides
            .iter()
            .map(|ride| (ride.trip_idx, ride.board_stop))
            .collect();
        assert_eq!(trips, vec![(0, a), (1, b)]);
    }

    #[test]
    fn pass_through_point_discards_the_direct_path() {
        let data = data();
        let a = data.stop_idx("A").unwrap();
        let b = data.stop_idx("B").unwrap();
        let c = data.stop_idx("C").unwrap();
        let request = RaptorRequest::builder()
            .profile(Profile::MultiCriteria)
            .earliest_departure_time(t("08:00"))
            .add_access(a, 0)
            .add_egress(c, 0)
            .add_pass_through_point(vec![b])
            .build();
        assert_eq!(route(&data, &request), vec![(t("08:20"), 1)]);
    }
}
