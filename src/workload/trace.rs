use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{StandardNormal, Uniform};
use serde::{Deserialize, Serialize};

/// Shape of a synthetic traversal workload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceParams {
    /// Ids are drawn from `0..node_count`.
    pub node_count: usize,
    /// Candidate ids tested per traversal, duplicates included.
    pub visits_per_traversal: usize,
    /// Fraction of candidates drawn near the hub region at the start of the id space.
    pub hub_ratio: f64,
    pub seed: u64,
}

impl TraceParams {
    /// Generates `traversals` candidate sequences.
    ///
    /// # Panics
    /// Panics if `node_count == 0` or `hub_ratio` is outside `[0, 1]`.
    pub fn generate(&self, traversals: usize) -> Vec<Vec<usize>> {
        assert!(self.node_count > 0, "node_count must be positive");
        assert!(
            (0.0..=1.0).contains(&self.hub_ratio),
            "hub_ratio must lie in [0, 1]"
        );

        let mut rng = StdRng::seed_from_u64(self.seed);
        let uniform = Uniform::new(0, self.node_count).unwrap();
        // hubs live in the first percent of the id space
        let hub_spread = (self.node_count as f64 / 100.0).max(1.0);

        (0..traversals)
            .map(|_| {
                (0..self.visits_per_traversal)
                    .map(|_| {
                        if rng.random_bool(self.hub_ratio) {
                            let offset: f64 = rng.sample(StandardNormal);
                            ((offset.abs() * hub_spread) as usize).min(self.node_count - 1)
                        } else {
                            rng.sample(&uniform)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Same workload shape with a seed derived for worker `worker`.
    pub fn for_worker(&self, worker: usize) -> TraceParams {
        TraceParams {
            seed: self.seed ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
            ..*self
        }
    }
}
