use crate::common::{Action, JointState, Position};
use crate::map::Map;

/// Lazily walks the cross-product of every agent's candidate moves and yields
/// only the joint moves free of vertex and swap conflicts.
///
/// The product is enumerated like an odometer, with agent 0 as the most
/// significant digit. When agent `j` conflicts with an earlier agent, every
/// combination sharing the digits `0..=j` conflicts too, so the odometer jumps
/// straight past them.
pub struct Successors<'a> {
    origin: &'a [Position],
    candidates: Vec<&'a [(Action, Position)]>,
    odometer: Vec<usize>,
    exhausted: bool,
}

impl<'a> Successors<'a> {
    pub fn new(map: &'a Map, state: &'a JointState) -> Self {
        let origin = state.positions();
        let candidates: Vec<&[(Action, Position)]> = origin
            .iter()
            .map(|&(x, y)| map.moves(x, y))
            .collect();
        // An agent without candidates empties the whole product.
        let exhausted = candidates.iter().any(|moves| moves.is_empty());

        Successors {
            origin,
            odometer: vec![0; candidates.len()],
            candidates,
            exhausted,
        }
    }

    fn targets(&self) -> Vec<Position> {
        self.odometer
            .iter()
            .zip(&self.candidates)
            .map(|(&digit, moves)| moves[digit].1)
            .collect()
    }

    /// Smallest agent index `j` that conflicts with some agent `i < j`.
    fn first_conflict(&self, targets: &[Position]) -> Option<usize> {
        (1..targets.len()).find(|&j| {
            (0..j).any(|i| {
                let vertex = targets[i] == targets[j];
                let swap = targets[i] == self.origin[j] && targets[j] == self.origin[i];
                vertex || swap
            })
        })
    }

    /// Increments digit `pos` and zeroes the less significant ones.
    fn advance(&mut self, mut pos: usize) {
        for digit in &mut self.odometer[pos + 1..] {
            *digit = 0;
        }
        loop {
            self.odometer[pos] += 1;
            if self.odometer[pos] < self.candidates[pos].len() {
                return;
            }
            self.odometer[pos] = 0;
            if pos == 0 {
                self.exhausted = true;
                return;
            }
            pos -= 1;
        }
    }

    fn step(&mut self) {
        match self.odometer.len() {
            0 => self.exhausted = true,
            n => self.advance(n - 1),
        }
    }
}

impl Iterator for Successors<'_> {
    type Item = (Vec<Action>, JointState);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let targets = self.targets();
            if let Some(agent) = self.first_conflict(&targets) {
                self.advance(agent);
                continue;
            }

            let actions = self
                .odometer
                .iter()
                .zip(&self.candidates)
                .map(|(&digit, moves)| moves[digit].0)
                .collect();
            self.step();
            return Some((actions, JointState(targets)));
        }
        None
    }
}
