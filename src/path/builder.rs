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

use super::{AccessLeg, EgressLeg, Path, PathError, PathLeg, TransferLeg, TransitLeg};
use crate::{
    config::SlackParams,
    engine::{cost_calculator::CostCalculator, slack::SlackProvider, time_calculator::TimeCalculator},
    request::{AccessEgress, SearchDirection},
    time::Time,
    transit_data::{Transfer, TransitDataProvider, TripRef, DEFAULT_PRIORITY_COST},
};

/// A leg of a path before its times and costs are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLeg {
    Access(AccessEgress),
    Transit {
        trip: TripRef,
        board_position: usize,
        alight_position: usize,
    },
    Transfer(Transfer),
    Egress(AccessEgress),
}

impl RawLeg {
    fn is_on_board(&self) -> bool {
        match self {
            RawLeg::Transit { .. } => true,
            RawLeg::Access(leg) | RawLeg::Egress(leg) => leg.on_board,
            RawLeg::Transfer(_) => false,
        }
    }

    fn is_facilitated_transfer(&self) -> bool {
        matches!(self, RawLeg::Transfer(transfer) if transfer.is_facilitated())
    }
}

/// Computes the times and costs of a sequence of legs.
///
/// Times come from the schedules of the trips. The legs before the first
/// ride are shifted so that the traveller reaches the first boarding stop
/// just in time, legs after a ride start as soon as possible.
pub struct PathBuilder<'a, Data> {
    data: &'a Data,
    slack: SlackProvider,
    cost: &'a CostCalculator,
}

impl<'a, Data: TransitDataProvider> PathBuilder<'a, Data> {
    pub fn new(data: &'a Data, slack: &SlackParams, cost: &'a CostCalculator) -> Self {
        Self {
            data,
            slack: SlackProvider::new(slack, TimeCalculator::new(SearchDirection::Forward)),
            cost,
        }
    }

    /// `start_time` is only used by paths without any transit leg.
    pub fn build(
        &self,
        legs: Vec<RawLeg>,
        start_time: Time,
        iteration_departure_time: Time,
        c2: Option<u8>,
    ) -> Result<Path, PathError> {
        check_structure(&legs)?;
        for leg in legs.iter() {
            if let RawLeg::Transit {
                trip,
                board_position,
                alight_position,
            } = leg
            {
                self.check_ride(*trip, *board_position, *alight_position)?;
            }
        }

        let times = self.compute_times(&legs, start_time)?;
        let mut path_legs = Vec::with_capacity(legs.len());
        let mut nb_of_rides = 0;
        let mut c1 = 0;
        for (idx, leg) in legs.iter().enumerate() {
            let (from_time, to_time) = times[idx];
            let path_leg = match leg {
                RawLeg::Access(access) => PathLeg::Access(AccessLeg {
                    leg: *access,
                    from_time,
                    to_time,
                    c1: access.c1,
                }),
                RawLeg::Transit {
                    trip,
                    board_position,
                    alight_position,
                } => {
                    let pattern = self.data.pattern(trip.pattern_idx);
                    let schedule = pattern.trip(trip.trip_idx);
                    let board_stop = pattern.stop_at(*board_position);
                    let alight_stop = pattern.stop_at(*alight_position);
                    let wait = from_time - self.free_time(&legs, &times, idx - 1);
                    let leg_c1 = self.cost.boarding_cost(nb_of_rides == 0, wait, board_stop)
                        + self.cost.riding_cost(to_time - from_time)
                        + self.cost.waiting_cost(self.slack.alight_slack())
                        + self.cost.stop_cost(alight_stop);
                    PathLeg::Transit(TransitLeg {
                        trip: *trip,
                        trip_id: schedule.id().to_string(),
                        pattern_name: pattern.name().to_string(),
                        board_stop,
                        board_position: *board_position,
                        board_time: from_time,
                        alight_stop,
                        alight_position: *alight_position,
                        alight_time: to_time,
                        c1: leg_c1,
                    })
                }
                RawLeg::Transfer(transfer) => PathLeg::Transfer(TransferLeg {
                    transfer: transfer.clone(),
                    from_time,
                    to_time,
                    c1: self.cost.walk_cost(transfer.effective_duration()),
                }),
                RawLeg::Egress(egress) => {
                    let mut leg_c1 = egress.c1;
                    if egress.on_board {
                        if nb_of_rides > 0 {
                            leg_c1 += self.cost.transfer_cost();
                        }
                        let wait = from_time - self.free_time(&legs, &times, idx - 1);
                        leg_c1 += self.cost.waiting_cost(wait);
                    }
                    PathLeg::Egress(EgressLeg {
                        leg: *egress,
                        from_time,
                        to_time,
                        c1: leg_c1,
                    })
                }
            };
            if leg.is_on_board() {
                nb_of_rides += 1;
            }
            c1 += path_leg.c1();
            path_legs.push(path_leg);
        }

        let start_time = times[0].0;
        let end_time = times[times.len() - 1].1;
        let mut path = Path {
            legs: path_legs,
            start_time,
            end_time,
            nb_of_transfers: nb_of_rides.max(1) - 1,
            c1,
            c2,
            transfer_priority_cost: 0,
            wait_time_optimized_cost: c1,
            iteration_departure_time,
        };
        path.transfer_priority_cost = transfer_priority_cost(&path);
        Ok(path)
    }

    fn check_ride(
        &self,
        trip: TripRef,
        board_position: usize,
        alight_position: usize,
    ) -> Result<(), PathError> {
        let invalid = || PathError::InvalidPositions {
            trip_id: format!("{}:{}", trip.pattern_idx, trip.trip_idx),
            board_position,
            alight_position,
        };
        if trip.pattern_idx >= self.data.nb_of_patterns() {
            return Err(invalid());
        }
        let pattern = self.data.pattern(trip.pattern_idx);
        if trip.trip_idx >= pattern.trips().len()
            || board_position >= alight_position
            || alight_position >= pattern.nb_of_positions()
            || !pattern.can_board(board_position)
            || !pattern.can_alight(alight_position)
        {
            return Err(invalid());
        }
        Ok(())
    }

    /// `(from, to)` times of each leg.
    fn compute_times(&self, legs: &[RawLeg], start_time: Time) -> Result<Vec<(Time, Time)>, PathError> {
        let mut times = vec![(0, 0); legs.len()];
        let first_transit = legs
            .iter()
            .position(|leg| matches!(leg, RawLeg::Transit { .. }));

        let first_forward_leg = match first_transit {
            Some(first) => {
                let (board_time, alight_time) = self.ride_times(&legs[first]);
                times[first] = (board_time, alight_time);
                let previous = &legs[first - 1];
                let first_ride = matches!(previous, RawLeg::Access(access) if !access.on_board);
                let mut time =
                    board_time - self.slack.boarding_slack(first_ride, previous.is_facilitated_transfer());
                for idx in (0..first).rev() {
                    let duration = leg_duration(&legs[idx]);
                    times[idx] = (time - duration, time);
                    time -= duration;
                }
                first + 1
            }
            None => {
                let duration = leg_duration(&legs[0]);
                times[0] = (start_time, start_time + duration);
                1
            }
        };

        for idx in first_forward_leg..legs.len() {
            let free_time = self.free_time(legs, &times, idx - 1);
            let previous = &legs[idx - 1];
            times[idx] = match &legs[idx] {
                RawLeg::Transit { trip, .. } => {
                    let (board_time, alight_time) = self.ride_times(&legs[idx]);
                    let slack = self
                        .slack
                        .boarding_slack(false, previous.is_facilitated_transfer());
                    if board_time < free_time + slack {
                        return Err(PathError::InfeasibleConnection {
                            trip_id: self.data.trip(*trip).id().to_string(),
                        });
                    }
                    (board_time, alight_time)
                }
                RawLeg::Transfer(transfer) => {
                    (free_time, free_time + transfer.effective_duration())
                }
                RawLeg::Egress(egress) => {
                    let slack = if egress.on_board && previous.is_on_board() {
                        self.slack.transfer_slack()
                    } else {
                        0
                    };
                    let from_time = free_time + slack;
                    (from_time, from_time + egress.duration)
                }
                RawLeg::Access(_) => return Err(PathError::MalformedLegs),
            };
        }
        Ok(times)
    }

    fn ride_times(&self, leg: &RawLeg) -> (Time, Time) {
        match leg {
            RawLeg::Transit {
                trip,
                board_position,
                alight_position,
            } => {
                let schedule = self.data.trip(*trip);
                (
                    schedule.departure(*board_position),
                    schedule.arrival(*alight_position),
                )
            }
            _ => (0, 0),
        }
    }

    /// Time at which the traveller can go on after the leg at `idx`.
    fn free_time(&self, legs: &[RawLeg], times: &[(Time, Time)], idx: usize) -> Time {
        match legs[idx] {
            RawLeg::Transit { .. } => times[idx].1 + self.slack.alight_slack(),
            _ => times[idx].1,
        }
    }
}

fn leg_duration(leg: &RawLeg) -> i32 {
    match leg {
        RawLeg::Access(access) | RawLeg::Egress(access) => access.duration,
        RawLeg::Transfer(transfer) => transfer.effective_duration(),
        RawLeg::Transit { .. } => 0,
    }
}

fn check_structure(legs: &[RawLeg]) -> Result<(), PathError> {
    if legs.len() < 2 {
        return Err(PathError::MalformedLegs);
    }
    let last = legs.len() - 1;
    for (idx, leg) in legs.iter().enumerate() {
        let valid = match leg {
            RawLeg::Access(_) => idx == 0,
            RawLeg::Egress(_) => idx == last,
            RawLeg::Transfer(_) => {
                idx != 0 && idx != last && !matches!(legs[idx - 1], RawLeg::Transfer(_))
            }
            RawLeg::Transit { .. } => idx != 0 && idx != last,
        };
        if !valid {
            return Err(PathError::MalformedLegs);
        }
    }
    Ok(())
}

/// Sum of the priority costs of the connections between two consecutive rides.
fn transfer_priority_cost(path: &Path) -> i32 {
    let mut total = 0;
    let mut previous_was_transit = false;
    let mut pending_transfer: Option<&Transfer> = None;
    for leg in path.legs.iter() {
        match leg {
            PathLeg::Transit(_) => {
                if previous_was_transit {
                    total += pending_transfer.map_or(DEFAULT_PRIORITY_COST, Transfer::priority_cost);
                }
                previous_was_transit = true;
                pending_transfer = None;
            }
            PathLeg::Transfer(transfer) => pending_transfer = Some(&transfer.transfer),
            _ => (),
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CostParams,
        time::{parse_time, PositiveDuration},
        transit_data::{TransferConstraint, TransitData, TransitDataBuilder},
    };

    fn data() -> TransitData {
        TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "B", "C"])
                    .trip("P1", &["08:00", "08:10", "08:20"]);
            })
            .pattern("Q", |p| {
                p.stops(&["C", "D"]).trip("Q1", &["08:30", "08:40"]);
            })
            .pattern("R", |p| {
                p.stops(&["E", "D"]).trip("R1", &["08:25", "08:45"]);
            })
            .transfer("C", "E", 120)
            .build()
            .unwrap()
    }

    fn slack() -> SlackParams {
        SlackParams {
            board_slack: PositiveDuration::zero(),
            alight_slack: PositiveDuration::zero(),
            transfer_slack: PositiveDuration::from_seconds(60),
        }
    }

    fn leg(stop: usize, duration: i32) -> AccessEgress {
        AccessEgress {
            stop,
            duration,
            c1: duration * 200,
            on_board: false,
        }
    }

    fn ride(pattern_idx: usize, board_position: usize, alight_position: usize) -> RawLeg {
        RawLeg::Transit {
            trip: TripRef {
                pattern_idx,
                trip_idx: 0,
            },
            board_position,
            alight_position,
        }
    }

    #[test]
    fn access_is_shifted_to_the_first_boarding() {
        let data = data();
        let cost = CostCalculator::new(&CostParams::default());
        let builder = PathBuilder::new(&data, &slack(), &cost);
        let a = data.stop_idx("A").unwrap();
        let d = data.stop_idx("D").unwrap();
        let path = builder
            .build(
                vec![
                    RawLeg::Access(leg(a, 120)),
                    ride(0, 0, 2),
                    ride(1, 0, 1),
                    RawLeg::Egress(leg(d, 60)),
                ],
                0,
                parse_time("07:50").unwrap(),
                None,
            )
            .unwrap();
        assert_eq!(path.start_time, parse_time("07:58").unwrap());
        assert_eq!(path.end_time, parse_time("08:41").unwrap());
        assert_eq!(path.nb_of_transfers, 1);
        assert_eq!(path.transfer_priority_cost, DEFAULT_PRIORITY_COST);
        let legs_c1: i32 = path.legs.iter().map(PathLeg::c1).sum();
        assert_eq!(path.c1, legs_c1);
        // second ride : board + transfer cost, 10 minutes waiting, 10 minutes riding
        assert_eq!(path.legs[2].c1(), 6000 + 12000 + 600 * 100 + 600 * 100);
    }

    #[test]
    fn missed_connection_is_an_error() {
        let data = data();
        let cost = CostCalculator::new(&CostParams::default());
        let builder = PathBuilder::new(&data, &slack(), &cost);
        let a = data.stop_idx("A").unwrap();
        let c = data.stop_idx("C").unwrap();
        let e = data.stop_idx("E").unwrap();
        let d = data.stop_idx("D").unwrap();
        // 08:20, 2 minutes walking and 1 minute slack : the 08:25 departure is caught
        let fits = builder.build(
            vec![
                RawLeg::Access(leg(a, 0)),
                ride(0, 0, 2),
                RawLeg::Transfer(Transfer::new(c, e, 120)),
                ride(2, 0, 1),
                RawLeg::Egress(leg(d, 0)),
            ],
            0,
            0,
            None,
        );
        assert!(fits.is_ok());

        let mut long_transfer = Transfer::new(c, e, 300);
        long_transfer.constraint = Some(TransferConstraint::MinTransferTime(300));
        let missed = builder.build(
            vec![
                RawLeg::Access(leg(a, 0)),
                ride(0, 0, 2),
                RawLeg::Transfer(long_transfer),
                ride(2, 0, 1),
                RawLeg::Egress(leg(d, 0)),
            ],
            0,
            0,
            None,
        );
        assert!(matches!(missed, Err(PathError::InfeasibleConnection { .. })));
    }

    #[test]
    fn malformed_legs_are_rejected() {
        let data = data();
        let cost = CostCalculator::new(&CostParams::default());
        let builder = PathBuilder::new(&data, &slack(), &cost);
        let result = builder.build(vec![ride(0, 0, 2), RawLeg::Egress(leg(2, 0))], 0, 0, None);
        assert_eq!(result, Err(PathError::MalformedLegs));
        let backward = builder.build(
            vec![RawLeg::Access(leg(0, 0)), ride(0, 2, 0), RawLeg::Egress(leg(0, 0))],
            0,
            0,
            None,
        );
        assert!(matches!(backward, Err(PathError::InvalidPositions { .. })));
    }

    #[test]
    fn path_without_ride_starts_at_the_given_time() {
        let data = data();
        let cost = CostCalculator::new(&CostParams::default());
        let builder = PathBuilder::new(&data, &slack(), &cost);
        let mut flex = leg(2, 600);
        flex.on_board = true;
        let path = builder
            .build(
                vec![RawLeg::Access(leg(2, 60)), RawLeg::Egress(flex)],
                1000,
                1000,
                None,
            )
            .unwrap();
        assert_eq!(path.start_time, 1000);
        assert_eq!(path.end_time, 1660);
        assert_eq!(path.nb_of_transfers, 0);
    }
}
