//! Deterministic random sources.

use crate::domain::RandomSource;

/// Returns the same value on every draw.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRandom {
    value: f64,
}

impl ConstantRandom {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl RandomSource for ConstantRandom {
    fn next_unit(&mut self) -> f64 {
        self.value
    }
}

/// Replays a fixed script of values, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    /// An empty script behaves like a constant `0.0`.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_cycles() {
        let mut random = ScriptedRandom::new(vec![0.1, 0.2]);
        let drawn: Vec<f64> = (0..3).map(|_| random.next_unit()).collect();
        assert_eq!(drawn, vec![0.1, 0.2, 0.1]);
        assert_eq!(random.draws(), 3);
    }
}
