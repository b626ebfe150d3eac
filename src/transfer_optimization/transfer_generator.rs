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

use crate::{
    engine::slack::SlackProvider,
    time::Time,
    transit_data::{Transfer, TransitDataProvider, TripRef, DEFAULT_PRIORITY_COST},
};

/// A way to go from a trip to the next one : alight at `from_position`,
/// walk the `transfer` if any, board at `to_position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripToTripTransfer {
    pub from_position: usize,
    pub to_position: usize,
    /// `None` when both positions serve the same stop
    pub transfer: Option<Transfer>,
}

impl TripToTripTransfer {
    pub fn priority_cost(&self) -> i32 {
        self.transfer
            .as_ref()
            .map_or(DEFAULT_PRIORITY_COST, Transfer::priority_cost)
    }

    pub fn walk_duration(&self) -> i32 {
        self.transfer
            .as_ref()
            .map_or(0, Transfer::effective_duration)
    }

    pub fn is_facilitated(&self) -> bool {
        self.transfer
            .as_ref()
            .map_or(false, Transfer::is_facilitated)
    }
}

pub struct TransferGenerator<'a, Data> {
    data: &'a Data,
    slack: SlackProvider,
}

impl<'a, Data: TransitDataProvider> TransferGenerator<'a, Data> {
    /// `slack` must be the one of a forward search.
    pub fn new(data: &'a Data, slack: SlackProvider) -> Self {
        Self { data, slack }
    }

    /// Every connection from `from` to `to` that leaves enough time to board
    /// `to`, sorted by alight then board position.
    pub fn find_transfers(&self, from: TripRef, to: TripRef) -> Vec<TripToTripTransfer> {
        let from_pattern = self.data.pattern(from.pattern_idx);
        let from_trip = from_pattern.trip(from.trip_idx);
        let to_pattern = self.data.pattern(to.pattern_idx);
        let to_trip = to_pattern.trip(to.trip_idx);
        let last_board_position = to_pattern.nb_of_positions() - 1;

        let mut transfers = Vec::new();
        for from_position in 1..from_pattern.nb_of_positions() {
            if !from_pattern.can_alight(from_position) {
                continue;
            }
            let stop = from_pattern.stop_at(from_position);
            let free_time = from_trip.arrival(from_position) + self.slack.alight_slack();
            let boardable = |to_position: &usize, earliest_board_time: Time| {
                *to_position < last_board_position
                    && to_pattern.can_board(*to_position)
                    && to_trip.departure(*to_position) >= earliest_board_time
            };

            let earliest_board_time = free_time + self.slack.boarding_slack(false, false);
            for to_position in to_pattern
                .positions_of(stop)
                .filter(|position| boardable(position, earliest_board_time))
            {
                transfers.push(TripToTripTransfer {
                    from_position,
                    to_position,
                    transfer: None,
                });
            }

            for transfer in self.data.transfers_from(stop) {
                if !transfer.is_allowed() {
                    continue;
                }
                let earliest_board_time = free_time
                    + transfer.effective_duration()
                    + self.slack.boarding_slack(false, transfer.is_facilitated());
                for to_position in to_pattern
                    .positions_of(transfer.to_stop)
                    .filter(|position| boardable(position, earliest_board_time))
                {
                    transfers.push(TripToTripTransfer {
                        from_position,
                        to_position,
                        transfer: Some(transfer.clone()),
                    });
                }
            }
        }
        transfers.sort_by_key(|transfer| (transfer.from_position, transfer.to_position));
        transfers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SlackParams,
        engine::time_calculator::TimeCalculator,
        request::SearchDirection,
        transit_data::{TransitData, TransitDataBuilder},
    };

    fn data() -> TransitData {
        TransitDataBuilder::new()
            .pattern("P", |p| {
                p.stops(&["A", "B", "C", "D"])
                    .trip("P1", &["08:00", "08:10", "08:20", "08:30"]);
            })
            .pattern("Q", |p| {
                p.stops(&["B", "C", "E", "F"])
                    .trip("Q1", &["08:10", "08:25", "08:40", "08:50"]);
            })
            .transfer("D", "E", 300)
            .build()
            .unwrap()
    }

    #[test]
    fn all_connections_with_enough_slack() {
        let data = data();
        let slack = SlackProvider::new(
            &SlackParams::default(),
            TimeCalculator::new(SearchDirection::Forward),
        );
        let generator = TransferGenerator::new(&data, slack);
        let from = data.pattern_by_name("P").unwrap().trip(0).trip_ref();
        let to = data.pattern_by_name("Q").unwrap().trip(0).trip_ref();
        let transfers = generator.find_transfers(from, to);
        let positions: Vec<(usize, usize, bool)> = transfers
            .iter()
            .map(|transfer| {
                (
                    transfer.from_position,
                    transfer.to_position,
                    transfer.transfer.is_some(),
                )
            })
            .collect();
        // B at 08:10 leaves no time for the transfer slack,
        // C at 08:20 then Q at 08:25 and D at 08:30 then a walk to E at 08:40 do
        assert_eq!(positions, vec![(2, 1, false), (3, 2, true)]);
        assert_eq!(transfers[1].walk_duration(), 300);
        assert_eq!(transfers[0].priority_cost(), DEFAULT_PRIORITY_COST);
    }
}
