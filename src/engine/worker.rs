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

use tracing::{debug, trace};

use super::search_context::SearchContext;
use crate::{
    path::Path,
    response::StopArrivalsSummary,
    time::{format_time, Time},
    transit_data::{Pattern, StopIdx, TransitDataProvider},
};

/// Where the worker stands when it calls a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundContext {
    pub round: usize,
    pub iteration_departure_time: Time,
}

/// The per-round, per-pattern logic of a search.
///
/// The worker drives the rounds and decides which patterns to scan, the
/// strategy decides which arrivals are kept. Within a round the phases are
/// always called in this order :
///  - `prepare_for_next_round`
///  - `route_pattern` for every pattern touched by the previous round
///  - `transits_for_round_complete`
///  - `add_access_arrivals` (first round only, for access legs with a ride)
///  - `relax_transfers`
///  - `transfers_for_round_complete`
///  - `add_destination_arrivals`
pub trait RoutingStrategy<Data: TransitDataProvider> {
    fn setup_iteration(&mut self, ctx: &SearchContext<'_, Data>, iteration_departure_time: Time);

    /// Round 0 adds the walking access legs, round 1 the ones with a ride.
    fn add_access_arrivals(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext);

    fn prepare_for_next_round(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext);

    /// Stops with a new arrival in the previous round : the patterns serving
    /// them are the ones to scan.
    fn stops_touched_previous_round(&self) -> &[StopIdx];

    /// Scan `pattern` from `first_position`, the first touched position in
    /// search order.
    fn route_pattern(
        &mut self,
        ctx: &SearchContext<'_, Data>,
        round: RoundContext,
        pattern: &Pattern,
        first_position: usize,
    );

    fn transits_for_round_complete(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext);

    fn relax_transfers(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext);

    fn transfers_for_round_complete(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext);

    fn add_destination_arrivals(&mut self, ctx: &SearchContext<'_, Data>, round: RoundContext);

    fn is_new_round_available(&self) -> bool;

    fn into_results(self, ctx: &SearchContext<'_, Data>) -> StrategyResults;
}

pub struct StrategyResults {
    pub paths: Vec<Path>,
    pub stop_arrivals: StopArrivalsSummary,
}

pub struct WorkerResults {
    pub paths: Vec<Path>,
    pub stop_arrivals: StopArrivalsSummary,
    pub nb_of_iterations: usize,
    pub nb_of_rounds: usize,
    pub timed_out: bool,
}

/// Runs the Range Raptor iterations and rounds, delegating every decision
/// about arrivals to a [`RoutingStrategy`].
pub struct RangeRaptorWorker<'ctx, 'a, Data: TransitDataProvider, Strategy> {
    ctx: &'ctx SearchContext<'a, Data>,
    strategy: Strategy,
    first_position_of_pattern: Vec<Option<usize>>,
    touched_patterns: Vec<usize>,
    nb_of_iterations: usize,
    nb_of_rounds: usize,
    timed_out: bool,
}

impl<'ctx, 'a, Data, Strategy> RangeRaptorWorker<'ctx, 'a, Data, Strategy>
where
    Data: TransitDataProvider,
    Strategy: RoutingStrategy<Data>,
{
    pub fn new(ctx: &'ctx SearchContext<'a, Data>, strategy: Strategy) -> Self {
        Self {
            ctx,
            strategy,
            first_position_of_pattern: vec![None; ctx.data.nb_of_patterns()],
            touched_patterns: Vec::new(),
            nb_of_iterations: 0,
            nb_of_rounds: 0,
            timed_out: false,
        }
    }

    pub fn route(mut self) -> WorkerResults {
        let iteration_times = self
            .ctx
            .calculator
            .iteration_times(&self.ctx.request.search_params);
        for iteration_departure_time in iteration_times {
            if self.ctx.deadline.is_expired() {
                self.timed_out = true;
                break;
            }
            self.run_iteration(iteration_departure_time);
            if self.timed_out {
                break;
            }
        }
        if self.timed_out {
            debug!(
                "Search timed out after {} iterations and {} rounds",
                self.nb_of_iterations, self.nb_of_rounds
            );
        }
        let results = self.strategy.into_results(self.ctx);
        WorkerResults {
            paths: results.paths,
            stop_arrivals: results.stop_arrivals,
            nb_of_iterations: self.nb_of_iterations,
            nb_of_rounds: self.nb_of_rounds,
            timed_out: self.timed_out,
        }
    }

    fn run_iteration(&mut self, iteration_departure_time: Time) {
        let ctx = self.ctx;
        self.nb_of_iterations += 1;
        trace!("Iteration at {}", format_time(iteration_departure_time));

        self.strategy.setup_iteration(ctx, iteration_departure_time);
        let access_round = RoundContext {
            round: 0,
            iteration_departure_time,
        };
        self.strategy.add_access_arrivals(ctx, access_round);
        self.strategy.add_destination_arrivals(ctx, access_round);

        let has_on_board_access = ctx.has_on_board_access();
        let mut round = 0;
        while round < ctx.max_rounds
            && (self.strategy.is_new_round_available() || (round == 0 && has_on_board_access))
        {
            if ctx.deadline.is_expired() {
                self.timed_out = true;
                return;
            }
            round += 1;
            self.nb_of_rounds += 1;
            let round_context = RoundContext {
                round,
                iteration_departure_time,
            };

            self.strategy.prepare_for_next_round(ctx, round_context);
            self.find_touched_patterns();
            for pattern_idx in self.touched_patterns.iter() {
                let pattern = ctx.data.pattern(*pattern_idx);
                if let Some(first_position) = self.first_position_of_pattern[*pattern_idx] {
                    self.strategy
                        .route_pattern(ctx, round_context, pattern, first_position);
                }
            }
            for pattern_idx in self.touched_patterns.drain(..) {
                self.first_position_of_pattern[pattern_idx] = None;
            }
            self.strategy
                .transits_for_round_complete(ctx, round_context);

            if round == 1 && has_on_board_access {
                self.strategy.add_access_arrivals(ctx, round_context);
            }

            self.strategy.relax_transfers(ctx, round_context);
            self.strategy
                .transfers_for_round_complete(ctx, round_context);
            self.strategy.add_destination_arrivals(ctx, round_context);
        }
    }

    /// Collects the patterns boardable at a stop touched by the previous round,
    /// with the first such position in search order.
    fn find_touched_patterns(&mut self) {
        let calculator = self.ctx.calculator;
        let data = self.ctx.data;
        for stop in self.strategy.stops_touched_previous_round() {
            for (pattern_idx, position) in data.patterns_at(*stop) {
                let pattern = data.pattern(*pattern_idx);
                if !pattern.has_trips() || !calculator.boarding_possible_at(pattern, *position) {
                    continue;
                }
                match self.first_position_of_pattern[*pattern_idx] {
                    None => {
                        self.first_position_of_pattern[*pattern_idx] = Some(*position);
                        self.touched_patterns.push(*pattern_idx);
                    }
                    Some(first) if calculator.is_before(*position, first) => {
                        self.first_position_of_pattern[*pattern_idx] = Some(*position);
                    }
                    Some(_) => (),
                }
            }
        }
        self.touched_patterns.sort_unstable();
    }
}
