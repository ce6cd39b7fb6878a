use ba_core::BallotAuditError;
use ba_core::Concentration;
use ba_core::Probability;
use rand::RngCore;
use rand_distr::Binomial;
use rand_distr::Dirichlet;
use rand_distr::Distribution;

/// Draws a branch-probability vector `theta` from `Dirichlet(alpha)`.
///
/// `alpha` must have at least two entries; a single-branch node is handled
/// by the caller as a deterministic short circuit (see
/// [`crate::tree::DirichletTree`]) rather than asking `rand_distr::Dirichlet`
/// to normalize a one-element simplex.
pub fn draw_theta(
    alpha: &[Concentration],
    rng: &mut impl RngCore,
) -> Result<Vec<Probability>, BallotAuditError> {
    debug_assert!(alpha.len() >= 2, "single-branch nodes should short-circuit");
    let dirichlet = Dirichlet::new(alpha).map_err(|e| {
        BallotAuditError::invalid(format!("invalid Dirichlet concentration vector: {}", e))
    })?;
    Ok(dirichlet.sample(rng))
}

/// Splits `n` draws across branches with probabilities `theta` using
/// sequential binomial decomposition ("stick-breaking"): for branch `i`,
/// `m_i ~ Binomial(remaining_n, theta_i / remaining_p)`, then both
/// `remaining_n` and `remaining_p` shrink by what was just assigned. The
/// last branch absorbs whatever remains, guaranteeing the counts sum to `n`
/// exactly despite floating point.
///
/// This is the standard numerically-stable alternative to sampling a
/// categorical outcome `n` separate times, or to a direct multivariate
/// rejection scheme: it never needs the full `n`-way covariance structure of
/// the multinomial, only `theta.len() - 1` independent binomial draws.
pub fn multinomial_stick_break(
    n: u64,
    theta: &[Probability],
    rng: &mut impl RngCore,
) -> Vec<u64> {
    let mut counts = Vec::with_capacity(theta.len());
    let mut remaining_n = n;
    let mut remaining_p: f64 = theta.iter().sum();
    for (i, &p) in theta.iter().enumerate() {
        if i == theta.len() - 1 {
            counts.push(remaining_n);
            break;
        }
        let drawn = if remaining_n == 0 || remaining_p <= 0.0 {
            0
        } else {
            let ratio = (p / remaining_p).clamp(0.0, 1.0);
            if ratio >= 1.0 {
                remaining_n
            } else {
                Binomial::new(remaining_n, ratio)
                    .map(|b| b.sample(rng))
                    .unwrap_or(0)
            }
        };
        counts.push(drawn);
        remaining_n -= drawn;
        remaining_p -= p;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn stick_break_counts_sum_to_n() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let theta = vec![0.2, 0.3, 0.5];
        let counts = multinomial_stick_break(1000, &theta, &mut rng);
        assert_eq!(counts.iter().sum::<u64>(), 1000);
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn stick_break_degenerate_branch_gets_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let theta = vec![0.0, 1.0];
        let counts = multinomial_stick_break(50, &theta, &mut rng);
        assert_eq!(counts, vec![0, 50]);
    }

    #[test]
    fn draw_theta_sums_to_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let alpha = vec![1.0, 2.0, 3.0];
        let theta = draw_theta(&alpha, &mut rng).unwrap();
        let sum: f64 = theta.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
