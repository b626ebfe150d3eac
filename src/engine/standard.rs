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
    debug::{ArrivalView, DebugEvent},
    destination_paths::DestinationArrivalPaths,
    search_context::SearchContext,
    stop_arrival::{ArrivalId, ArrivalState, BoardingInfo, StopArrival, StopArrivalArena},
    touched_stops::TouchedStops,
    worker::{RoundContext, RoutingStrategy, StrategyResults},
};
use crate::{
    request::{AccessEgress, Profile},
    response::StopArrivalsSummary,
    time::Time,
    transit_data::{Pattern, StopIdx, TransitDataProvider, TripRef},
};

/// The trip currently ridden while scanning a pattern.
#[derive(Debug, Clone, Copy)]
struct OnTrip {
    trip_idx: usize,
    board_position: usize,
    board_stop: StopIdx,
    board_time: Time,
    previous: ArrivalId,
}

/// Keeps a single arrival per stop and round : the one with the best time.
///
/// With the `MinTravelDuration` profile a ride leaves as soon as the
/// traveller can board and runs at the fastest times seen among the trips of
/// its pattern : the best times become lower bounds of the travel durations
/// from the origin.
pub struct StandardRoutingStrategy {
    arena: StopArrivalArena,
    best_times: Vec<Time>,
    best_transit_times: Vec<Time>,
    min_rides: Vec<u8>,
    /// `[round][stop]`, the arrival giving the best time in this round
    arrivals: Vec<Vec<Option<ArrivalId>>>,
    /// `[round][stop]`, the best arrival on board in this round
    transit_arrivals: Vec<Vec<Option<ArrivalId>>>,
    stops_touched_current_round: TouchedStops,
    stops_touched_previous_round: TouchedStops,
    stops_reached_by_transit: TouchedStops,
    min_travel_duration: bool,
    destination: Option<DestinationArrivalPaths>,
    iteration_departure_time: Time,
}

impl StandardRoutingStrategy {
    pub fn new<Data: TransitDataProvider>(ctx: &SearchContext<'_, Data>) -> Self {
        let nb_of_stops = ctx.nb_of_stops();
        let nb_of_rounds = ctx.max_rounds + 1;
        let unreached = ctx.calculator.unreached();
        let destination = if ctx.profile == Profile::Standard {
            Some(DestinationArrivalPaths::new(ctx))
        } else {
            None
        };
        Self {
            arena: StopArrivalArena::new(),
            best_times: vec![unreached; nb_of_stops],
            best_transit_times: vec![unreached; nb_of_stops],
            min_rides: vec![u8::MAX; nb_of_stops],
            arrivals: vec![vec![None; nb_of_stops]; nb_of_rounds],
            transit_arrivals: vec![vec![None; nb_of_stops]; nb_of_rounds],
            stops_touched_current_round: TouchedStops::new(nb_of_stops),
            stops_touched_previous_round: TouchedStops::new(nb_of_stops),
            stops_reached_by_transit: TouchedStops::new(nb_of_stops),
            min_travel_duration: ctx.profile == Profile::MinTravelDuration,
            destination,
            iteration_departure_time: 0,
        }
    }

    pub fn best_time(&self, stop: StopIdx) -> Time {
        self.best_times[stop]
    }

    fn accept_arrival<Data: TransitDataProvider>(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        round: usize,
        stop: StopIdx,
        id: ArrivalId,
    ) {
        let arrival = self.arena.get(id);
        self.best_times[stop] = arrival.time();
        self.arrivals[round][stop] = Some(id);
        self.stops_touched_current_round.insert(stop);
        let rides = arrival.round();
        if rides < self.min_rides[stop] {
            self.min_rides[stop] = rides;
        }
        if let Some(debug) = ctx.debug() {
            if debug.is_debugged(stop) {
                debug.notify(DebugEvent::StopArrivalAccepted(view(arrival)));
            }
        }
    }

    /// Transit arrivals (and access legs with a ride) are kept apart : walking
    /// transfers and egress may only follow them.
    fn add_transit_arrival<Data: TransitDataProvider>(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        round: usize,
        arrival: StopArrival,
    ) {
        let stop = arrival.stop();
        let time = arrival.time();
        if ctx.exceeds_time_limit(time) || !ctx.calculator.is_better(time, self.best_transit_times[stop]) {
            return;
        }
        self.best_transit_times[stop] = time;
        let id = self.arena.push(arrival);
        self.transit_arrivals[round][stop] = Some(id);
        self.stops_reached_by_transit.insert(stop);
        if ctx.calculator.is_better(time, self.best_times[stop]) {
            self.accept_arrival(ctx, round, stop, id);
        }
    }

    fn alight<Data: TransitDataProvider>(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        round: usize,
        pattern: &Pattern,
        on_trip: &OnTrip,
        position: usize,
    ) {
        let calculator = &ctx.calculator;
        let alight_time = if self.min_travel_duration {
            calculator.plus_duration(
                on_trip.board_time,
                pattern.min_ride_duration(on_trip.board_position, position),
            )
        } else {
            let trip = pattern.trip(on_trip.trip_idx);
            let alight_time = calculator.alight_time(trip, position);
            assert!(
                calculator.duration(on_trip.board_time, alight_time) >= 0,
                "Negative ride on trip {} between positions {} and {}",
                trip.id(),
                on_trip.board_position,
                position
            );
            alight_time
        };
        let stop = pattern.stop_at(position);
        let time = ctx.slack.stop_arrival_time(alight_time);
        let previous = self.arena.get(on_trip.previous);
        let state = ArrivalState {
            stop,
            time,
            round: round as u8,
            travel_duration: previous.travel_duration() + calculator.duration(previous.time(), time),
            c1: 0,
            c2: 0,
            previous: Some(on_trip.previous),
        };
        let positions = if ctx.approximate_trip_search {
            None
        } else {
            Some(BoardingInfo {
                board_position: on_trip.board_position,
                alight_position: position,
            })
        };
        let arrival = StopArrival::Transit {
            state,
            trip: TripRef {
                pattern_idx: pattern.idx(),
                trip_idx: on_trip.trip_idx,
            },
            board_stop: on_trip.board_stop,
            board_time: on_trip.board_time,
            positions,
        };
        self.add_transit_arrival(ctx, round, arrival);
    }

    /// Boarding from `previous` at `position`, given the trip currently ridden.
    fn board<Data: TransitDataProvider>(
        &self,
        ctx: &SearchContext<'_, Data>,
        pattern: &Pattern,
        position: usize,
        previous: ArrivalId,
        on_trip: Option<OnTrip>,
    ) -> Option<OnTrip> {
        let calculator = &ctx.calculator;
        let arrival = self.arena.get(previous);
        let stop = pattern.stop_at(position);
        let earliest_board_time = ctx.slack.earliest_board_time(
            arrival.time(),
            arrival.is_walking_access(),
            arrival.is_facilitated(),
        );

        if self.min_travel_duration {
            // ride the fastest running times of the pattern without waiting
            if !pattern.has_trips() {
                return None;
            }
            if let Some(current) = on_trip {
                let current_time = calculator.plus_duration(
                    current.board_time,
                    pattern.min_duration_between_boardings(current.board_position, position),
                );
                if !calculator.is_better(earliest_board_time, current_time) {
                    return None;
                }
            }
            return Some(OnTrip {
                trip_idx: 0,
                board_position: position,
                board_stop: stop,
                board_time: earliest_board_time,
                previous,
            });
        }

        let current_trip_idx = on_trip.map(|current| current.trip_idx);
        if let Some(boarding) =
            calculator.search_trip(pattern, position, earliest_board_time, current_trip_idx)
        {
            return Some(OnTrip {
                trip_idx: boarding.trip_idx,
                board_position: position,
                board_stop: stop,
                board_time: boarding.time,
                previous,
            });
        }
        // no better trip : board the current one here if it can be caught
        let current = on_trip?;
        let board_time = calculator.board_time(pattern.trip(current.trip_idx), position);
        if calculator.is_better_or_equal(earliest_board_time, board_time) {
            Some(OnTrip {
                board_position: position,
                board_stop: stop,
                board_time,
                previous,
                ..current
            })
        } else {
            None
        }
    }

    fn add_access_arrival<Data: TransitDataProvider>(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        round: usize,
        leg: AccessEgress,
    ) {
        let calculator = &ctx.calculator;
        let time = calculator.plus_duration(self.iteration_departure_time, leg.duration);
        if ctx.exceeds_time_limit(time) {
            return;
        }
        let state = ArrivalState {
            stop: leg.stop,
            time,
            round: round as u8,
            travel_duration: leg.duration,
            c1: leg.c1,
            c2: ctx.pass_through.update(0, leg.stop),
            previous: None,
        };
        let arrival = StopArrival::Access { state, leg };
        if leg.on_board {
            self.add_transit_arrival(ctx, round, arrival);
            return;
        }

        let stop = leg.stop;
        if calculator.is_better(time, self.best_times[stop]) {
            let id = self.arena.push(arrival);
            self.accept_arrival(ctx, round, stop, id);
        } else if ctx.request.search_params.time_shifting_allowed {
            // keep the best access of this iteration even if an earlier
            // iteration reached the stop sooner
            let current = self.arrivals[round][stop]
                .filter(|_| self.stops_touched_current_round.contains(stop))
                .map(|id| self.arena.get(id).time());
            if current.map_or(true, |current| calculator.is_better(time, current)) {
                let id = self.arena.push(arrival);
                self.arrivals[round][stop] = Some(id);
                self.stops_touched_current_round.insert(stop);
            }
        }
    }
}

fn view(arrival: &StopArrival) -> ArrivalView {
    ArrivalView {
        stop: arrival.stop(),
        time: arrival.time(),
        round: arrival.round(),
        c1: arrival.c1(),
        c2: arrival.c2(),
        on_board: arrival.arrived_on_board(),
    }
}

impl<Data: TransitDataProvider> RoutingStrategy<Data> for StandardRoutingStrategy {
    fn setup_iteration(&mut self, _ctx: &SearchContext<'_, Data>, iteration_departure_time: Time) {
        self.iteration_departure_time = iteration_departure_time;
        self.stops_touched_current_round.clear();
        self.stops_touched_previous_round.clear();
        self.stops_reached_by_transit.clear();
    }

    fn add_access_arrivals(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
        let on_board = round.round > 0;
        for leg in ctx.access.iter().filter(|leg| leg.on_board == on_board) {
            self.add_access_arrival(ctx, round.round, *leg);
        }
    }

    fn prepare_for_next_round(&mut self, _ctx: &SearchContext<'_, Data>, _round: RoundContext) {
        std::mem::swap(
            &mut self.stops_touched_previous_round,
            &mut self.stops_touched_current_round,
        );
        self.stops_touched_current_round.clear();
        self.stops_reached_by_transit.clear();
    }

    fn stops_touched_previous_round(&self) -> &[StopIdx] {
        self.stops_touched_previous_round.stops()
    }

    fn route_pattern(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        round: RoundContext,
        pattern: &Pattern,
        first_position: usize,
    ) {
        let calculator = ctx.calculator;
        let previous_round = round.round - 1;
        let mut on_trip: Option<OnTrip> = None;
        for position in calculator.positions_from(first_position, pattern.nb_of_positions()) {
            if let Some(current) = &on_trip {
                if calculator.alighting_possible_at(pattern, position) {
                    self.alight(ctx, round.round, pattern, current, position);
                }
            }
            let stop = pattern.stop_at(position);
            if !calculator.boarding_possible_at(pattern, position)
                || !self.stops_touched_previous_round.contains(stop)
            {
                continue;
            }
            if let Some(previous) = self.arrivals[previous_round][stop] {
                if let Some(boarded) = self.board(ctx, pattern, position, previous, on_trip) {
                    on_trip = Some(boarded);
                }
            }
        }
    }

    fn transits_for_round_complete(&mut self, _ctx: &SearchContext<'_, Data>, _round: RoundContext) {}

    fn relax_transfers(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
        let calculator = ctx.calculator;
        for idx in 0..self.stops_reached_by_transit.stops().len() {
            let stop = self.stops_reached_by_transit.stops()[idx];
            let from = match self.transit_arrivals[round.round][stop] {
                Some(from) => from,
                None => continue,
            };
            let (from_time, from_travel_duration) = {
                let arrival = self.arena.get(from);
                (arrival.time(), arrival.travel_duration())
            };
            for transfer in calculator.transfers(ctx.data, stop) {
                if !transfer.is_allowed() {
                    continue;
                }
                let target = calculator.transfer_target(transfer);
                let duration = transfer.effective_duration();
                let time = calculator.plus_duration(from_time, duration);
                if ctx.exceeds_time_limit(time) || !calculator.is_better(time, self.best_times[target]) {
                    continue;
                }
                let id = self.arena.push(StopArrival::Transfer {
                    state: ArrivalState {
                        stop: target,
                        time,
                        round: round.round as u8,
                        travel_duration: from_travel_duration + duration,
                        c1: 0,
                        c2: 0,
                        previous: Some(from),
                    },
                    transfer: transfer.clone(),
                });
                self.accept_arrival(ctx, round.round, target, id);
            }
        }
    }

    fn transfers_for_round_complete(&mut self, _ctx: &SearchContext<'_, Data>, _round: RoundContext) {}

    fn add_destination_arrivals(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
        let destination = match &mut self.destination {
            Some(destination) => destination,
            None => return,
        };
        let calculator = &ctx.calculator;
        for stop in ctx.egress_stops.iter() {
            for egress_idx in ctx.egress_by_stop[*stop].iter() {
                let leg = ctx.egress[*egress_idx];
                let source = if leg.on_board {
                    self.arrivals[round.round][*stop]
                        .filter(|_| self.stops_touched_current_round.contains(*stop))
                } else {
                    self.transit_arrivals[round.round][*stop]
                        .filter(|_| self.stops_reached_by_transit.contains(*stop))
                };
                let source = match source {
                    Some(source) => source,
                    None => continue,
                };
                let arrival = self.arena.get(source);
                let slack = if leg.on_board && arrival.arrived_on_board() {
                    ctx.slack.transfer_slack()
                } else {
                    0
                };
                let time = calculator.plus_duration(arrival.time(), slack + leg.duration);
                if ctx.exceeds_time_limit(time) {
                    continue;
                }
                let state = ArrivalState {
                    stop: *stop,
                    time,
                    round: arrival.round(),
                    travel_duration: arrival.travel_duration() + slack + leg.duration,
                    c1: 0,
                    c2: arrival.c2(),
                    previous: Some(source),
                };
                let id = self.arena.push(StopArrival::Egress { state, leg });
                destination.add(ctx, &self.arena, id, self.iteration_departure_time);
            }
        }
    }

    fn is_new_round_available(&self) -> bool {
        !self.stops_touched_current_round.is_empty()
    }

    fn into_results(self, ctx: &SearchContext<'_, Data>) -> StrategyResults {
        StrategyResults {
            paths: self
                .destination
                .map(DestinationArrivalPaths::into_paths)
                .unwrap_or_default(),
            stop_arrivals: StopArrivalsSummary::new(
                ctx.calculator.direction(),
                self.best_times,
                self.best_transit_times,
                self.min_rides,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{deadline::Deadline, worker::RangeRaptorWorker},
        request::{RaptorRequest, SearchDirection},
        time::parse_time,
        transit_data::{TransitData, TransitDataBuilder},
    };
    use rstest::rstest;
    use std::{cell::RefCell, rc::Rc};

    fn data() -> TransitData {
        TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "B", "C"])
                    .trip("P1", &["08:00", "08:10", "08:20"])
                    .trip("P2", &["08:30", "08:40", "08:50"]);
            })
            .pattern("Q", |p| {
                p.stops(&["C", "D"])
                    .trip("Q1", &["08:25", "08:35"])
                    .trip("Q2", &["08:55", "09:05"]);
            })
            .build()
            .unwrap()
    }

    fn t(time: &str) -> Time {
        parse_time(time).unwrap()
    }

    #[test]
    fn best_times_and_rides() {
        let data = data();
        let a = data.stop_idx("A").unwrap();
        let c = data.stop_idx("C").unwrap();
        let d = data.stop_idx("D").unwrap();
        let request = RaptorRequest::builder()
            .profile(Profile::BestTime)
            .earliest_departure_time(t("07:55"))
            .add_access(a, 0)
            .add_egress(d, 0)
            .build();
        let ctx = SearchContext::new(&data, &request, Deadline::unlimited());
        let results = RangeRaptorWorker::new(&ctx, StandardRoutingStrategy::new(&ctx)).route();
        assert!(results.paths.is_empty());
        let summary = results.stop_arrivals;
        assert_eq!(summary.best_times[c], t("08:20"));
        // one minute of transfer slack : Q1 at 08:25 is caught
        assert_eq!(summary.best_times[d], t("08:35"));
        assert_eq!(summary.min_rides[d], 2);
        assert_eq!(summary.min_rides[a], 0);
    }

    #[test]
    fn min_travel_duration_removes_waiting() {
        let data = data();
        let a = data.stop_idx("A").unwrap();
        let d = data.stop_idx("D").unwrap();
        let request = RaptorRequest::builder()
            .profile(Profile::MinTravelDuration)
            .direction(SearchDirection::Reverse)
            .latest_arrival_time(t("10:00"))
            .add_access(a, 0)
            .add_egress(d, 0)
            .build();
        let ctx = SearchContext::new(&data, &request, Deadline::unlimited());
        let results = RangeRaptorWorker::new(&ctx, StandardRoutingStrategy::new(&ctx)).route();
        let summary = results.stop_arrivals;
        // 10 minutes on Q, the transfer slack at C, 20 minutes on P
        assert_eq!(t("10:00") - summary.best_times[a], 31 * 60);
    }

    /// Keeps the best times reached at the end of every iteration.
    struct IterationSnapshots {
        strategy: StandardRoutingStrategy,
        snapshots: Rc<RefCell<Vec<Vec<Time>>>>,
        started: bool,
    }

    impl<Data: TransitDataProvider> RoutingStrategy<Data> for IterationSnapshots {
        fn setup_iteration(&mut self, ctx: &SearchContext<'_, Data>, iteration_departure_time: Time) {
            if self.started {
                self.snapshots.borrow_mut().push(self.strategy.best_times.clone());
            }
            self.started = true;
            self.strategy.setup_iteration(ctx, iteration_departure_time);
        }

        fn add_access_arrivals(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
            self.strategy.add_access_arrivals(ctx, round);
        }

        fn prepare_for_next_round(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
            self.strategy.prepare_for_next_round(ctx, round);
        }

        fn stops_touched_previous_round(&self) -> &[StopIdx] {
            RoutingStrategy::<Data>::stops_touched_previous_round(&self.strategy)
        }

        fn route_pattern(
            &mut self,
            ctx: &SearchContext<'_, Data>,
            round: RoundContext,
            pattern: &Pattern,
            first_position: usize,
        ) {
            self.strategy.route_pattern(ctx, round, pattern, first_position);
        }

        fn transits_for_round_complete(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
            self.strategy.transits_for_round_complete(ctx, round);
        }

        fn relax_transfers(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
            self.strategy.relax_transfers(ctx, round);
        }

        fn transfers_for_round_complete(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
            self.strategy.transfers_for_round_complete(ctx, round);
        }

        fn add_destination_arrivals(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext) {
            self.strategy.add_destination_arrivals(ctx, round);
        }

        fn is_new_round_available(&self) -> bool {
            RoutingStrategy::<Data>::is_new_round_available(&self.strategy)
        }

        fn into_results(self, ctx: &SearchContext<'_, Data>) -> StrategyResults {
            self.snapshots.borrow_mut().push(self.strategy.best_times.clone());
            self.strategy.into_results(ctx)
        }
    }

    #[rstest]
    #[case(SearchDirection::Forward, "07:30", "08:35")]
    #[case(SearchDirection::Reverse, "09:10", "08:30")]
    fn best_times_improve_over_iterations(
        #[case] direction: SearchDirection,
        #[case] time: &str,
        #[case] final_best_time: &str,
    ) {
        let data = data();
        let a = data.stop_idx("A").unwrap();
        let c = data.stop_idx("C").unwrap();
        let d = data.stop_idx("D").unwrap();
        let builder = RaptorRequest::builder()
            .profile(Profile::BestTime)
            .direction(direction)
            .search_window(3600)
            .add_access(a, 0)
            .add_egress(d, 0);
        let request = if direction.is_forward() {
            builder.earliest_departure_time(t(time)).build()
        } else {
            builder.latest_arrival_time(t(time)).build()
        };
        let ctx = SearchContext::new(&data, &request, Deadline::unlimited());
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let strategy = IterationSnapshots {
            strategy: StandardRoutingStrategy::new(&ctx),
            snapshots: snapshots.clone(),
            started: false,
        };
        let results = RangeRaptorWorker::new(&ctx, strategy).route();
        assert_eq!(results.nb_of_iterations, 61);

        let snapshots = snapshots.borrow();
        assert_eq!(snapshots.len(), 61);
        for (iteration, pair) in snapshots.windows(2).enumerate() {
            for stop in 0..data.nb_of_stops() {
                assert!(
                    ctx.calculator.is_better_or_equal(pair[1][stop], pair[0][stop]),
                    "best time of stop {} got worse at iteration {}",
                    stop,
                    iteration + 1
                );
            }
        }
        // the first iteration rides the later trips, the last one the earlier trips
        let observed = if direction.is_forward() { d } else { a };
        let first = snapshots[0][observed];
        let last = snapshots[60][observed];
        assert!(ctx.calculator.is_better(last, first) || ctx.calculator.is_unreached(first));
        assert_eq!(last, t(final_best_time));
        if direction.is_forward() {
            assert_eq!(snapshots[60][c], t("08:20"));
        }
    }

    #[test]
    fn min_travel_duration_takes_the_fastest_trip() {
        // the early trip is fast, the late one slow
        let data = TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["B", "C"])
                    .trip("P1", &["08:07", "08:12"])
                    .trip("P2", &["08:30", "09:30"]);
            })
            .build()
            .unwrap();
        let b = data.stop_idx("B").unwrap();
        let c = data.stop_idx("C").unwrap();
        for horizon in ["08:20", "12:00"] {
            let request = RaptorRequest::builder()
                .profile(Profile::MinTravelDuration)
                .direction(SearchDirection::Reverse)
                .latest_arrival_time(t(horizon))
                .add_access(b, 0)
                .add_egress(c, 0)
                .build();
            let ctx = SearchContext::new(&data, &request, Deadline::unlimited());
            let results = RangeRaptorWorker::new(&ctx, StandardRoutingStrategy::new(&ctx)).route();
            let summary = results.stop_arrivals;
            assert_eq!(t(horizon) - summary.best_times[b], 5 * 60, "horizon {}", horizon);
        }
    }
}
