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

use crate::transit_data::StopIdx;

/// Ordered sets of stops a path must visit.
///
/// The progress of a path is the number of points already visited (its `c2`
/// criterion). A visit to a stop of the next point increments it ; a visit to
/// any other stop leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassThroughPoints {
    points: Vec<Vec<StopIdx>>,
}

impl PassThroughPoints {
    /// A reverse search visits the points from the last one to the first one.
    pub fn new(mut points: Vec<Vec<StopIdx>>, search_forward: bool) -> Self {
        if !search_forward {
            points.reverse();
        }
        Self { points }
    }

    pub fn is_active(&self) -> bool {
        !self.points.is_empty()
    }

    /// The request was validated : there are at most `u8::MAX` points.
    pub fn nb_of_points(&self) -> u8 {
        u8::try_from(self.points.len()).unwrap_or(u8::MAX)
    }

    pub fn update(&self, progress: u8, stop: StopIdx) -> u8 {
        match self.points.get(progress as usize) {
            Some(point) if point.contains(&stop) => progress.saturating_add(1),
            _ => progress,
        }
    }

    pub fn is_complete(&self, progress: u8) -> bool {
        progress as usize >= self.points.len()
    }

    /// Progress made by visiting `stops` in order, starting from `progress`.
    pub fn update_along<I>(&self, progress: u8, stops: I) -> u8
    where
        I: IntoIterator<Item = StopIdx>,
    {
        stops
            .into_iter()
            .fold(progress, |progress, stop| self.update(progress, stop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_are_visited_in_order() {
        let points = PassThroughPoints::new(vec![vec![1, 2], vec![3]], true);
        assert_eq!(points.update(0, 3), 0);
        assert_eq!(points.update(0, 2), 1);
        assert_eq!(points.update(1, 3), 2);
        assert_eq!(points.update(2, 1), 2);
        assert!(points.is_complete(2));
        assert_eq!(points.update_along(0, vec![3, 1, 3]), 2);
        assert_eq!(points.update_along(0, vec![3, 1]), 1);
    }

    #[test]
    fn reverse_search_visits_points_backward() {
        let points = PassThroughPoints::new(vec![vec![1], vec![3]], false);
        assert_eq!(points.update_along(0, vec![3, 1]), 2);
        assert_eq!(points.update_along(0, vec![1, 3]), 1);
        assert!(!PassThroughPoints::default().is_active());
    }
}
