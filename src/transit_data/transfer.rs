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

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::pattern::StopIdx;

/// Cost of a transfer between two trips that are on the same vehicle.
pub const STAY_SEATED_PRIORITY_COST: i32 = 10;
/// Cost of a transfer guaranteed by the operator.
pub const GUARANTEED_PRIORITY_COST: i32 = 20;
/// Cost of a transfer without any facility.
pub const DEFAULT_PRIORITY_COST: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferConstraint {
    /// the next trip waits for the traveller, no slack is required
    Guaranteed,
    /// the traveller stays in the same vehicle
    StaySeated,
    /// the transfer takes at least this many seconds
    MinTransferTime(u32),
    NotAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPriority {
    NotAllowed,
    Allowed,
    Recommended,
    Preferred,
}

impl TransferPriority {
    fn cost_offset(&self) -> i32 {
        match self {
            TransferPriority::NotAllowed => 1000,
            TransferPriority::Allowed => 0,
            TransferPriority::Recommended => -1,
            TransferPriority::Preferred => -2,
        }
    }
}

/// A walking connection from one stop to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from_stop: StopIdx,
    pub to_stop: StopIdx,
    /// walking duration in seconds
    pub duration: i32,
    pub constraint: Option<TransferConstraint>,
    pub priority: Option<TransferPriority>,
}

impl Transfer {
    pub fn new(from_stop: StopIdx, to_stop: StopIdx, duration: i32) -> Self {
        Self {
            from_stop,
            to_stop,
            duration,
            constraint: None,
            priority: None,
        }
    }

    pub fn effective_duration(&self) -> i32 {
        match self.constraint {
            Some(TransferConstraint::MinTransferTime(min)) => self.duration.max(min as i32),
            _ => self.duration,
        }
    }

    pub fn is_allowed(&self) -> bool {
        !matches!(self.constraint, Some(TransferConstraint::NotAllowed))
    }

    /// Guaranteed and stay-seated transfers waive the board and transfer slacks
    /// of the following boarding.
    pub fn is_facilitated(&self) -> bool {
        matches!(
            self.constraint,
            Some(TransferConstraint::Guaranteed) | Some(TransferConstraint::StaySeated)
        )
    }

    pub fn priority_cost(&self) -> i32 {
        transfer_priority_cost(self.constraint, self.priority)
    }
}

/// Cost ranking connections between two rides : facilitated transfers first,
/// then shifted by the priority given by the operator.
pub fn transfer_priority_cost(
    constraint: Option<TransferConstraint>,
    priority: Option<TransferPriority>,
) -> i32 {
    let base = match constraint {
        Some(TransferConstraint::StaySeated) => STAY_SEATED_PRIORITY_COST,
        Some(TransferConstraint::Guaranteed) => GUARANTEED_PRIORITY_COST,
        Some(TransferConstraint::NotAllowed) => {
            DEFAULT_PRIORITY_COST + TransferPriority::NotAllowed.cost_offset()
        }
        _ => DEFAULT_PRIORITY_COST,
    };
    base + priority.map_or(0, |priority| priority.cost_offset())
}

impl Display for TransferConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferConstraint::Guaranteed => write!(f, "guaranteed"),
            TransferConstraint::StaySeated => write!(f, "stay_seated"),
            TransferConstraint::MinTransferTime(seconds) => {
                write!(f, "min_transfer_time({}s)", seconds)
            }
            TransferConstraint::NotAllowed => write!(f, "not_allowed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_costs() {
        let mut transfer = Transfer::new(0, 1, 60);
        assert_eq!(transfer.priority_cost(), 30);
        transfer.constraint = Some(TransferConstraint::StaySeated);
        assert_eq!(transfer.priority_cost(), 10);
        transfer.priority = Some(TransferPriority::Preferred);
        assert_eq!(transfer.priority_cost(), 8);
        transfer.constraint = Some(TransferConstraint::Guaranteed);
        transfer.priority = Some(TransferPriority::Recommended);
        assert_eq!(transfer.priority_cost(), 19);
        assert_eq!(
            transfer_priority_cost(None, Some(TransferPriority::NotAllowed)),
            1030
        );
    }

    #[test]
    fn min_transfer_time_extends_walk() {
        let mut transfer = Transfer::new(0, 1, 60);
        transfer.constraint = Some(TransferConstraint::MinTransferTime(180));
        assert_eq!(transfer.effective_duration(), 180);
        assert!(!transfer.is_facilitated());
        transfer.constraint = Some(TransferConstraint::NotAllowed);
        assert!(!transfer.is_allowed());
    }
}
