use crate::model::{Order, Traversal};

/// Walks every arrangement (ordered choice of distinct objects) of a selection.
///
/// Arrangements are reported as object indices, with between `max(1, minimum)` and `maximum` entries each.
/// Exhaustion (`None`) is the normal end of the walk.
///
/// Internally each position holds an index into the objects still available at that position (an odometer).
/// Under [`Order::Any`] the available objects are those not chosen yet.
/// Under [`Order::Definition`] they are the objects after the previous choice.
///
/// ### Example
/// ```
/// # use cmdsyntax_engine as cmdsyntax;
/// use cmdsyntax::{Order, SelectionEnumerator, Traversal};
///
/// let mut enumerator = SelectionEnumerator::new(2, 0, 2, Order::Any);
/// let mut arrangements = vec![];
/// let mut next = enumerator.begin();
///
/// while let Some(arrangement) = next {
///     arrangements.push(arrangement);
///     next = enumerator.advance(Traversal::WidthFirst);
/// }
///
/// assert_eq!(arrangements, vec![vec![0], vec![1], vec![0, 1], vec![1, 0]]);
/// ```
#[derive(Debug, Clone)]
pub struct SelectionEnumerator {
    objects: usize,
    minimum: usize,
    maximum: usize,
    order: Order,
    positions: Vec<usize>,
    active: usize,
    running: bool,
}

impl SelectionEnumerator {
    /// Prepare to walk the arrangements of `objects` objects.
    ///
    /// `maximum` is capped at the number of objects.
    pub fn new(objects: usize, minimum: usize, maximum: usize, order: Order) -> Self {
        Self {
            objects,
            minimum,
            maximum: maximum.min(objects),
            order,
            positions: Vec::default(),
            active: 0,
            running: false,
        }
    }

    /// (Re)start the walk, returning the first arrangement.
    pub fn begin(&mut self) -> Option<Vec<usize>> {
        let size = self.lower_size();

        if size > self.maximum {
            return self.finish(false);
        }

        self.positions = vec![0; size];
        self.active = size - 1;
        self.running = true;
        Some(self.arrangement())
    }

    /// Move to the next arrangement.
    pub fn advance(&mut self, traversal: Traversal) -> Option<Vec<usize>> {
        if !self.running {
            return None;
        }

        let found = match traversal {
            Traversal::WidthFirst => self.next_width(),
            Traversal::DepthFirst => self.next_depth(),
        };
        self.finish(found)
    }

    /// Move to the next depth-first arrangement which does not extend the current one.
    pub fn prune(&mut self) -> Option<Vec<usize>> {
        if !self.running {
            return None;
        }

        let found = self.next_sibling() && self.descend_to_minimum();
        self.finish(found)
    }

    fn lower_size(&self) -> usize {
        self.minimum.max(1)
    }

    fn finish(&mut self, found: bool) -> Option<Vec<usize>> {
        if found {
            Some(self.arrangement())
        } else {
            self.running = false;
            self.positions.clear();
            None
        }
    }

    /// The number of objects available at `position`, given the choices before it.
    fn limit(&self, position: usize) -> usize {
        match self.order {
            Order::Any => self.objects.saturating_sub(position),
            Order::Definition => {
                let next = match position {
                    0 => 0,
                    _ => self.absolute(position - 1) + 1,
                };
                self.objects.saturating_sub(next)
            }
        }
    }

    /// The object chosen at `position` (definition order only).
    fn absolute(&self, position: usize) -> usize {
        self.positions[..=position]
            .iter()
            .fold(None, |previous: Option<usize>, index| {
                Some(previous.map_or(0, |p| p + 1) + index)
            })
            .unwrap_or(0)
    }

    fn fits_after(&self, position: usize) -> bool {
        (position + 1..self.positions.len()).all(|p| self.positions[p] < self.limit(p))
    }

    fn arrangement(&self) -> Vec<usize> {
        match self.order {
            Order::Any => {
                let mut available: Vec<usize> = (0..self.objects).collect();
                self.positions
                    .iter()
                    .map(|index| available.remove(*index))
                    .collect()
            }
            Order::Definition => (0..self.positions.len())
                .map(|position| self.absolute(position))
                .collect(),
        }
    }

    fn next_width(&mut self) -> bool {
        let length = self.positions.len();
        self.active = length - 1;

        loop {
            self.positions[self.active] += 1;

            if self.positions[self.active] < self.limit(self.active) && self.fits_after(self.active)
            {
                self.active = length - 1;
                return true;
            }

            for position in self.active..length {
                self.positions[position] = 0;
            }

            if self.active == 0 {
                break;
            }

            self.active -= 1;
        }

        // Every arrangement of this size has been seen.
        if length + 1 > self.maximum {
            return false;
        }

        self.positions = vec![0; length + 1];
        self.active = length;
        true
    }

    fn next_depth(&mut self) -> bool {
        let length = self.positions.len();

        if length < self.maximum && self.limit(length) > 0 {
            self.positions.push(0);
            self.active = length;
            return true;
        }

        self.next_sibling() && self.descend_to_minimum()
    }

    /// Advance the last position, dropping positions which have run out of objects.
    fn next_sibling(&mut self) -> bool {
        while let Some(last) = self.positions.len().checked_sub(1) {
            self.active = last;
            self.positions[last] += 1;

            if self.positions[last] < self.limit(last) {
                return true;
            }

            self.positions.pop();
        }

        false
    }

    /// Extend the current arrangement with first choices until it is long enough to report.
    fn descend_to_minimum(&mut self) -> bool {
        loop {
            let length = self.positions.len();

            if length >= self.lower_size() {
                self.active = length - 1;
                return true;
            }

            if self.limit(length) > 0 {
                self.positions.push(0);
            } else if !self.next_sibling() {
                return false;
            }
        }
    }
}
