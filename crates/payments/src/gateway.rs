//! Gateway outcome source, injectable so tests can pin results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws the outcome of a charge attempt.
///
/// This is the fault-injection point standing in for a real gateway's
/// non-determinism: a declined charge is a normal outcome, not an error.
pub trait PaymentGateway: Send + Sync {
    /// Returns true if the charge is approved.
    fn authorize(&self) -> bool;
}

/// Simulated gateway that approves with probability 3/4.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    rng: Arc<Mutex<StdRng>>,
}

impl SimulatedGateway {
    /// Creates a gateway seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Creates a gateway with a fixed seed, for deterministic outcomes.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentGateway for SimulatedGateway {
    fn authorize(&self) -> bool {
        self.rng.lock().unwrap().gen_ratio(3, 4)
    }
}

/// Gateway with a pinned outcome, for tests.
#[derive(Debug, Clone)]
pub struct FixedGateway {
    approve: Arc<AtomicBool>,
}

impl FixedGateway {
    /// Creates a gateway that always returns `approve`.
    pub fn new(approve: bool) -> Self {
        Self {
            approve: Arc::new(AtomicBool::new(approve)),
        }
    }

    /// Changes the pinned outcome.
    pub fn set_approve(&self, approve: bool) {
        self.approve.store(approve, Ordering::SeqCst);
    }
}

impl PaymentGateway for FixedGateway {
    fn authorize(&self) -> bool {
        self.approve.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_gateway_is_deterministic() {
        let a = SimulatedGateway::seeded(42);
        let b = SimulatedGateway::seeded(42);

        let draws_a: Vec<bool> = (0..32).map(|_| a.authorize()).collect();
        let draws_b: Vec<bool> = (0..32).map(|_| b.authorize()).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn simulated_gateway_declines_sometimes() {
        let gateway = SimulatedGateway::seeded(7);
        let draws: Vec<bool> = (0..256).map(|_| gateway.authorize()).collect();
        assert!(draws.iter().any(|&approved| approved));
        assert!(draws.iter().any(|&approved| !approved));
    }

    #[test]
    fn fixed_gateway_pins_outcome() {
        let gateway = FixedGateway::new(true);
        assert!(gateway.authorize());

        gateway.set_approve(false);
        assert!(!gateway.authorize());
    }
}
