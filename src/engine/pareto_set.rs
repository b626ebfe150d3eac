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

use std::slice::Iter as SliceIter;

/// Compares two elements on several criteria.
pub trait ParetoComparator<T> {
    /// `left` is strictly better than `right` on at least one criterion.
    fn left_dominance_exist(&self, left: &T, right: &T) -> bool;
}

impl<T, F> ParetoComparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn left_dominance_exist(&self, left: &T, right: &T) -> bool {
        self(left, right)
    }
}

/// Notified of every change of a [`ParetoSet`].
pub trait ParetoSetEventListener<T> {
    fn notify_element_accepted(&self, _new_element: &T) {}

    fn notify_element_dropped(&self, _dropped: &T, _dropped_by: &T) {}

    fn notify_element_rejected(&self, _rejected: &T, _rejected_by: &T) {}
}

/// Forwards the events to several listeners.
pub struct CompositeListener<T> {
    listeners: Vec<Box<dyn ParetoSetEventListener<T>>>,
}

impl<T> CompositeListener<T> {
    pub fn new(listeners: Vec<Box<dyn ParetoSetEventListener<T>>>) -> Self {
        Self { listeners }
    }
}

impl<T> ParetoSetEventListener<T> for CompositeListener<T> {
    fn notify_element_accepted(&self, new_element: &T) {
        for listener in &self.listeners {
            listener.notify_element_accepted(new_element);
        }
    }

    fn notify_element_dropped(&self, dropped: &T, dropped_by: &T) {
        for listener in &self.listeners {
            listener.notify_element_dropped(dropped, dropped_by);
        }
    }

    fn notify_element_rejected(&self, rejected: &T, rejected_by: &T) {
        for listener in &self.listeners {
            listener.notify_element_rejected(rejected, rejected_by);
        }
    }
}

/// A set of mutually non-dominated elements.
///
/// A new element enters the set only if it is strictly better than every
/// element on at least one criterion ; an element equal to an existing one
/// is rejected. Elements dominated by the new one are removed, and the
/// relative order of the remaining elements is preserved.
///
/// The set carries a marker : the elements after the marker are the ones
/// added since the last call to [`ParetoSet::mark_at_end_of_set`].
pub struct ParetoSet<T, C> {
    elements: Vec<T>,
    comparator: C,
    marker: usize,
    listener: Option<Box<dyn ParetoSetEventListener<T>>>,
}

impl<T, C> ParetoSet<T, C>
where
    C: ParetoComparator<T>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            elements: Vec::new(),
            comparator,
            marker: 0,
            listener: None,
        }
    }

    pub fn with_listener(comparator: C, listener: Box<dyn ParetoSetEventListener<T>>) -> Self {
        Self {
            elements: Vec::new(),
            comparator,
            marker: 0,
            listener: Some(listener),
        }
    }

    pub fn set_listener(&mut self, listener: Box<dyn ParetoSetEventListener<T>>) {
        self.listener = Some(listener);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.marker = 0;
    }

    pub fn iter(&self) -> SliceIter<'_, T> {
        self.elements.iter()
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.elements.last_mut()
    }

    /// Some element of the set is at least as good as `candidate` on every criterion.
    fn find_rejecting(&self, candidate: &T) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| !self.comparator.left_dominance_exist(candidate, element))
    }

    /// `candidate` would be accepted by [`ParetoSet::add`].
    pub fn qualify(&self, candidate: &T) -> bool {
        self.find_rejecting(candidate).is_none()
    }

    /// Returns `true` if `new_element` was added to the set.
    pub fn add(&mut self, new_element: T) -> bool {
        if let Some(rejected_by) = self.find_rejecting(&new_element) {
            if let Some(listener) = &self.listener {
                listener.notify_element_rejected(&new_element, &self.elements[rejected_by]);
            }
            return false;
        }

        let mut kept = 0;
        let mut new_marker = self.marker;
        for index in 0..self.elements.len() {
            let dominated = !self
                .comparator
                .left_dominance_exist(&self.elements[index], &new_element);
            if dominated {
                if let Some(listener) = &self.listener {
                    listener.notify_element_dropped(&self.elements[index], &new_element);
                }
                if index < self.marker {
                    new_marker -= 1;
                }
            } else {
                self.elements.swap(kept, index);
                kept += 1;
            }
        }
        self.elements.truncate(kept);
        self.marker = new_marker;

        if let Some(listener) = &self.listener {
            listener.notify_element_accepted(&new_element);
        }
        self.elements.push(new_element);
        true
    }

    /// Elements added since the last call to [`ParetoSet::mark_at_end_of_set`].
    pub fn elements_after_marker(&self) -> &[T] {
        &self.elements[self.marker..]
    }

    pub fn mark_at_end_of_set(&mut self) {
        self.marker = self.elements.len();
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<'a, T, C> IntoIterator for &'a ParetoSet<T, C>
where
    C: ParetoComparator<T>,
{
    type Item = &'a T;
    type IntoIter = SliceIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    // (time, cost) : lower is better
    fn comparator(left: &(i32, i32), right: &(i32, i32)) -> bool {
        left.0 < right.0 || left.1 < right.1
    }

    type Set = ParetoSet<(i32, i32), fn(&(i32, i32), &(i32, i32)) -> bool>;

    fn set() -> Set {
        ParetoSet::new(comparator as fn(&(i32, i32), &(i32, i32)) -> bool)
    }

    #[test]
    fn keeps_non_dominated_elements() {
        let mut set = set();
        assert!(set.add((10, 10)));
        assert!(set.add((5, 20)));
        assert!(set.add((20, 5)));
        assert!(!set.add((10, 10)));
        assert!(!set.add((11, 11)));
        assert_eq!(set.len(), 3);
        assert!(set.add((4, 4)));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![(4, 4)]);
    }

    #[test]
    fn removal_preserves_order_and_marker() {
        let mut set = set();
        set.add((1, 50));
        set.add((10, 10));
        set.add((50, 1));
        set.mark_at_end_of_set();
        assert!(set.elements_after_marker().is_empty());
        set.add((30, 5));
        // drops (10, 10) which is before the marker
        set.add((9, 9));
        assert_eq!(
            set.iter().copied().collect::<Vec<_>>(),
            vec![(1, 50), (50, 1), (30, 5), (9, 9)]
        );
        assert_eq!(set.elements_after_marker(), &[(30, 5), (9, 9)]);
        assert!(set.qualify(&(0, 100)));
        assert!(!set.qualify(&(30, 5)));
    }

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl ParetoSetEventListener<(i32, i32)> for Recorder {
        fn notify_element_accepted(&self, new_element: &(i32, i32)) {
            self.events.borrow_mut().push(format!("accepted {:?}", new_element));
        }

        fn notify_element_dropped(&self, dropped: &(i32, i32), _: &(i32, i32)) {
            self.events.borrow_mut().push(format!("dropped {:?}", dropped));
        }

        fn notify_element_rejected(&self, rejected: &(i32, i32), _: &(i32, i32)) {
            self.events.borrow_mut().push(format!("rejected {:?}", rejected));
        }
    }

    #[test]
    fn listeners_see_every_event() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let first = Recorder {
            events: events.clone(),
        };
        let second = Recorder {
            events: events.clone(),
        };
        let listener = CompositeListener::new(vec![Box::new(first), Box::new(second)]);
        let mut set = ParetoSet::with_listener(
            comparator as fn(&(i32, i32), &(i32, i32)) -> bool,
            Box::new(listener),
        );
        set.add((10, 10));
        set.add((20, 20));
        set.add((5, 5));
        assert_eq!(
            *events.borrow(),
            vec![
                "accepted (10, 10)",
                "accepted (10, 10)",
                "rejected (20, 20)",
                "rejected (20, 20)",
                "dropped (10, 10)",
                "dropped (10, 10)",
                "accepted (5, 5)",
                "accepted (5, 5)",
            ]
        );
    }
}
