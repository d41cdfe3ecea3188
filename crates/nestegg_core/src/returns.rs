//! Correlated asset-return sampling
//!
//! Per-asset yearly returns are drawn from a multivariate normal with the
//! configured mean vector and covariance `Σ = (σ σᵀ) ∘ ρ`, then projected
//! through the allocation weights into one portfolio return.
//!
//! The covariance is factored once per run (`Σ = L Lᵀ`), so a draw is `μ + L z`
//! with `z ~ N(0, I)`. The factorisation tolerates positive semi-definite
//! input: zero volatilities and perfectly correlated assets produce zero
//! columns instead of an error.

use rand::Rng;
use rand::distr::Distribution;
use rand_distr::StandardNormal;

use crate::config::SimulationParameters;
use crate::error::{Result, SimulationError};
use crate::model::{AssetClass, DEFAULT_MEAN_RETURNS, DEFAULT_VOLATILITY, default_correlation};
use crate::validation::{check_finite, check_len, check_square, check_symmetric};

// Relative slack for round-off when deciding a pivot is zero
const PSD_TOLERANCE: f64 = 1e-10;

/// Lower-triangular `L` with `L Lᵀ = cov`, row-major `n × n`.
fn psd_cholesky(cov: &[f64], n: usize) -> Result<Vec<f64>> {
    let scale = (0..n).map(|i| cov[i * n + i].abs()).fold(1.0, f64::max);
    let tolerance = PSD_TOLERANCE * scale;
    let mut l = vec![0.0; n * n];

    for j in 0..n {
        let mut diag = cov[j * n + j];
        for k in 0..j {
            diag -= l[j * n + k] * l[j * n + k];
        }

        if !diag.is_finite() || diag < -tolerance {
            return Err(SimulationError::InvalidCorrelation {
                reason: "covariance matrix is not positive semi-definite",
            });
        }

        if diag <= tolerance {
            // Degenerate direction: every remaining entry in this column must vanish
            for i in (j + 1)..n {
                let mut residual = cov[i * n + j];
                for k in 0..j {
                    residual -= l[i * n + k] * l[j * n + k];
                }
                if residual.abs() > tolerance.sqrt() {
                    return Err(SimulationError::InvalidCorrelation {
                        reason: "covariance matrix is not positive semi-definite",
                    });
                }
            }
            continue;
        }

        let pivot = diag.sqrt();
        l[j * n + j] = pivot;
        for i in (j + 1)..n {
            let mut sum = cov[i * n + j];
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            l[i * n + j] = sum / pivot;
        }
    }

    Ok(l)
}

/// Draws yearly portfolio returns from a correlated multi-asset model
#[derive(Debug, Clone)]
pub struct CorrelatedReturnSampler {
    num_assets: usize,
    weights: Vec<f64>,
    means: Vec<f64>,
    /// Cholesky factor of the covariance, row-major
    factor: Vec<f64>,
    /// `w · μ`
    expected_return: f64,
    /// `Lᵀ w`: portfolio exposure to each independent normal
    loadings: Vec<f64>,
}

impl CorrelatedReturnSampler {
    /// Build from simulation parameters, resolving every market override once
    pub fn new(params: &SimulationParameters) -> Result<Self> {
        let n = AssetClass::COUNT;
        let means = params
            .mean_returns
            .clone()
            .resolve_or_else(|| DEFAULT_MEAN_RETURNS.to_vec());
        check_len("mean_returns", n, means.len())?;
        let volatility = params
            .volatility
            .clone()
            .resolve_or_else(|| DEFAULT_VOLATILITY.to_vec());
        let correlation = params
            .correlation_matrix
            .clone()
            .resolve_or_else(default_correlation);

        Self::from_parts(params.allocation_weights(), means, volatility, &correlation)
    }

    /// Build from explicit vectors. The asset count is `means.len()`.
    pub fn from_parts(
        weights: Vec<f64>,
        means: Vec<f64>,
        volatility: Vec<f64>,
        correlation: &[Vec<f64>],
    ) -> Result<Self> {
        let n = means.len();
        check_len("asset_allocation", n, weights.len())?;
        check_len("volatility", n, volatility.len())?;
        check_square("correlation_matrix", n, correlation)?;
        check_finite("mean_returns", &means)?;
        check_finite("volatility", &volatility)?;
        check_finite("correlation_matrix", correlation.iter().flatten())?;
        check_symmetric(correlation)?;

        let mut cov = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                cov[i * n + j] = volatility[i] * volatility[j] * correlation[i][j];
            }
        }
        let factor = psd_cholesky(&cov, n)?;

        let expected_return = weights.iter().zip(&means).map(|(w, m)| w * m).sum();
        let loadings = (0..n)
            .map(|k| (k..n).map(|i| weights[i] * factor[i * n + k]).sum())
            .collect();

        Ok(Self {
            num_assets: n,
            weights,
            means,
            factor,
            expected_return,
            loadings,
        })
    }

    pub fn num_assets(&self) -> usize {
        self.num_assets
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Mean of the portfolio return distribution
    pub fn expected_return(&self) -> f64 {
        self.expected_return
    }

    /// One multivariate-normal draw of per-asset returns
    pub fn sample_asset_returns<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let n = self.num_assets;
        let z: Vec<f64> = (0..n).map(|_| StandardNormal.sample(rng)).collect();
        (0..n)
            .map(|i| {
                let shock: f64 = (0..=i).map(|k| self.factor[i * n + k] * z[k]).sum();
                self.means[i] + shock
            })
            .collect()
    }

    /// One draw of the allocation-weighted portfolio return.
    ///
    /// Equal to `w · (μ + L z)` for a fresh `z`, evaluated as `w·μ + (Lᵀw)·z`.
    pub fn sample_portfolio_return<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut shock = 0.0;
        for loading in &self.loadings {
            let z: f64 = StandardNormal.sample(rng);
            shock += loading * z;
        }
        self.expected_return + shock
    }

    /// Grow `portfolio_value` by one freshly drawn yearly return
    pub fn sample_return<R: Rng + ?Sized>(&self, portfolio_value: f64, rng: &mut R) -> f64 {
        portfolio_value * (1.0 + self.sample_portfolio_return(rng))
    }
}

/// Build a sampler from `params` and apply one draw to `portfolio_value`.
///
/// Simulations build the sampler once; this is for one-off evaluations.
pub fn sample_return<R: Rng + ?Sized>(
    portfolio_value: f64,
    params: &SimulationParameters,
    rng: &mut R,
) -> Result<f64> {
    Ok(CorrelatedReturnSampler::new(params)?.sample_return(portfolio_value, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarketOverride;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_cholesky_reconstructs_default_covariance() {
        let n = AssetClass::COUNT;
        let mut cov = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                cov[i * n + j] = DEFAULT_VOLATILITY[i]
                    * DEFAULT_VOLATILITY[j]
                    * crate::model::DEFAULT_CORRELATION[i][j];
            }
        }
        let l = psd_cholesky(&cov, n).unwrap();
        for i in 0..n {
            for j in 0..n {
                let v: f64 = (0..n).map(|k| l[i * n + k] * l[j * n + k]).sum();
                assert!((v - cov[i * n + j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_zero_volatility_returns_mean_exactly() {
        let sampler = CorrelatedReturnSampler::from_parts(
            vec![0.5, 0.5],
            vec![0.05, 0.05],
            vec![0.0, 0.0],
            &[vec![1.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10 {
            assert!((sampler.sample_return(100.0, &mut rng) - 105.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_perfect_correlation_is_accepted() {
        let sampler = CorrelatedReturnSampler::from_parts(
            vec![0.5, 0.5],
            vec![0.0, 0.0],
            vec![0.1, 0.2],
            &[vec![1.0, 1.0], vec![1.0, 1.0]],
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let r = sampler.sample_asset_returns(&mut rng);
        // One shared shock scaled by each volatility
        assert!((r[1] - 2.0 * r[0]).abs() < 1e-12);
    }

    #[test]
    fn test_non_psd_correlation_is_rejected() {
        let result = CorrelatedReturnSampler::from_parts(
            vec![0.5, 0.5],
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            &[vec![1.0, 2.0], vec![2.0, 1.0]],
        );
        assert!(matches!(
            result,
            Err(SimulationError::InvalidCorrelation { .. })
        ));
    }

    #[test]
    fn test_asymmetric_correlation_is_rejected() {
        let result = CorrelatedReturnSampler::from_parts(
            vec![0.5, 0.5],
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            &[vec![1.0, 0.9], vec![-0.9, 1.0]],
        );
        assert_eq!(
            result.unwrap_err(),
            SimulationError::InvalidCorrelation {
                reason: "correlation matrix is not symmetric",
            }
        );
    }

    #[test]
    fn test_nan_inputs_never_reach_sampling() {
        let result = CorrelatedReturnSampler::from_parts(
            vec![0.5, 0.5],
            vec![0.05, f64::NAN],
            vec![0.1, 0.1],
            &[vec![1.0, 0.0], vec![0.0, 1.0]],
        );
        assert!(matches!(
            result,
            Err(SimulationError::NonFinite {
                field: "mean_returns",
                index: 1,
            })
        ));

        assert!(psd_cholesky(&[f64::NAN, 0.0, 0.0, 1.0], 2).is_err());
    }

    #[test]
    fn test_wrong_correlation_shape_fails_before_sampling() {
        let params = SimulationParameters {
            correlation_matrix: MarketOverride::Override(vec![vec![1.0, 0.2], vec![0.2, 1.0]]),
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            sample_return(1_000_000.0, &params, &mut rng),
            Err(SimulationError::DimensionMismatch {
                field: "correlation_matrix",
                expected: 6,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_weight_length_checked_against_assets() {
        let result = CorrelatedReturnSampler::from_parts(
            vec![1.0],
            vec![0.05, 0.05],
            vec![0.1, 0.1],
            &[vec![1.0, 0.0], vec![0.0, 1.0]],
        );
        assert!(matches!(
            result,
            Err(SimulationError::DimensionMismatch {
                field: "asset_allocation",
                ..
            })
        ));
    }

    #[test]
    fn test_projection_matches_full_draw() {
        let sampler = CorrelatedReturnSampler::new(&SimulationParameters::default()).unwrap();
        let mut a = SmallRng::seed_from_u64(42);
        let mut b = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let assets = sampler.sample_asset_returns(&mut a);
            let dot: f64 = sampler.weights().iter().zip(&assets).map(|(w, r)| w * r).sum();
            let direct = sampler.sample_portfolio_return(&mut b);
            assert!((dot - direct).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sample_mean_converges_to_weighted_mean() {
        let sampler = CorrelatedReturnSampler::from_parts(
            vec![0.4, 0.3, 0.1, 0.1, 0.05, 0.05],
            vec![0.08, 0.04, 0.06, 0.03, 0.07, 0.035],
            vec![0.15, 0.06, 0.20, 0.15, 0.17, 0.08],
            &[
                vec![1.0, 0.2, 0.3, 0.1, 0.7, 0.2],
                vec![0.2, 1.0, 0.1, 0.0, 0.2, 0.8],
                vec![0.3, 0.1, 1.0, 0.4, 0.3, 0.1],
                vec![0.1, 0.0, 0.4, 1.0, 0.1, 0.0],
                vec![0.7, 0.2, 0.3, 0.1, 1.0, 0.2],
                vec![0.2, 0.8, 0.1, 0.0, 0.2, 1.0],
            ],
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let draws = 20_000;
        let mean: f64 = (0..draws)
            .map(|_| sampler.sample_portfolio_return(&mut rng))
            .sum::<f64>()
            / draws as f64;
        assert!((mean - sampler.expected_return()).abs() < 0.01);
    }
}
