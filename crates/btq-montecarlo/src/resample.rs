use btq_decimal::Money;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::MonteCarloMethod;

/// Resamples `pnls` into a new vector of the same length, per the
/// method's resampling rule. `block_size` is only consulted by `BlockBootstrap`.
pub fn resample(method: MonteCarloMethod, pnls: &[Money], block_size: usize, rng: &mut impl Rng) -> Vec<Money> {
    match method {
        MonteCarloMethod::Bootstrap => bootstrap(pnls, rng),
        MonteCarloMethod::BlockBootstrap => block_bootstrap(pnls, block_size, rng),
        MonteCarloMethod::Permutation => permutation(pnls, rng),
        MonteCarloMethod::Parametric => parametric(pnls, rng),
    }
}

/// BOOTSTRAP: sample n with replacement, n = |p|.
fn bootstrap(pnls: &[Money], rng: &mut impl Rng) -> Vec<Money> {
    let n = pnls.len();
    (0..n).map(|_| pnls[rng.gen_range(0..n)]).collect()
}

/// BLOCK_BOOTSTRAP: pick ceil(n/blockSize) random start indices;
/// concatenate contiguous blocks (wrapping modulo n) until sampled length
/// = n.
fn block_bootstrap(pnls: &[Money], block_size: usize, rng: &mut impl Rng) -> Vec<Money> {
    let n = pnls.len();
    let blocks_needed = (n + block_size - 1) / block_size;
    let mut out = Vec::with_capacity(blocks_needed * block_size);
    for _ in 0..blocks_needed {
        let start = rng.gen_range(0..n);
        for k in 0..block_size {
            out.push(pnls[(start + k) % n]);
        }
    }
    out.truncate(n);
    out
}

/// PERMUTATION: random permutation of p.
fn permutation(pnls: &[Money], rng: &mut impl Rng) -> Vec<Money> {
    let mut out = pnls.to_vec();
    out.shuffle(rng);
    out
}

/// PARAMETRIC: sample n draws from Normal(mean(p), stdDev(p)).
fn parametric(pnls: &[Money], rng: &mut impl Rng) -> Vec<Money> {
    let n = pnls.len();
    let values: Vec<f64> = pnls.iter().map(|m| m.to_f64_lossy()).collect();
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt();

    let normal = Normal::new(mean, std_dev).unwrap_or_else(|_| Normal::new(mean, 0.0).unwrap());
    (0..n).map(|_| Money::from_f64_lossy(normal.sample(rng))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pnls() -> Vec<Money> {
        vec![
            Money::parse("100").unwrap(),
            Money::parse("-50").unwrap(),
            Money::parse("25").unwrap(),
            Money::parse("75").unwrap(),
            Money::parse("-30").unwrap(),
        ]
    }

    #[test]
    fn bootstrap_preserves_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sampled = bootstrap(&pnls(), &mut rng);
        assert_eq!(sampled.len(), pnls().len());
    }

    #[test]
    fn block_bootstrap_preserves_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sampled = block_bootstrap(&pnls(), 2, &mut rng);
        assert_eq!(sampled.len(), pnls().len());
    }

    #[test]
    fn permutation_is_same_multiset() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sampled = permutation(&pnls(), &mut rng);
        let mut original = pnls();
        sampled.sort();
        original.sort();
        assert_eq!(sampled, original);
    }

    #[test]
    fn parametric_preserves_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let sampled = parametric(&pnls(), &mut rng);
        assert_eq!(sampled.len(), pnls().len());
    }

    #[test]
    fn same_seed_yields_identical_resample() {
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);
        let a = resample(MonteCarloMethod::Bootstrap, &pnls(), 2, &mut rng_a);
        let b = resample(MonteCarloMethod::Bootstrap, &pnls(), 2, &mut rng_b);
        assert_eq!(a, b);
    }
}
