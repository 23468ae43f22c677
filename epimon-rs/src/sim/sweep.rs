use crate::{
    models::simulate,
    params::SimulationParameters,
    prelude::Real,
    trackers::Trajectory,
};
use log::*;
use ndarray::{Array2, Zip};
use rayon::prelude::*;

/// Run several independent simulations on the rayon thread pool.
///
/// Results follow the order of the input and are identical to calling
/// [`simulate`] on each parameter set in sequence.
pub fn simulate_many(params: &[SimulationParameters]) -> Vec<Trajectory> {
    info!(target: "sweep", "running {} simulations", params.len());
    params.par_iter().map(simulate).collect()
}

/// Peak infected count for every combination of transmission and recovery
/// rates. Entry (i, j) of the result uses `betas[i]` and `gammas[j]`; every
/// other parameter is taken from `base`.
pub fn peak_grid(base: &SimulationParameters, betas: &[Real], gammas: &[Real]) -> Array2<Real> {
    info!(
        target: "sweep",
        "peak grid: {} x {} simulations of {} days",
        betas.len(),
        gammas.len(),
        base.days()
    );
    let mut grid = Array2::<Real>::zeros((betas.len(), gammas.len()));
    Zip::indexed(&mut grid).par_for_each(|(i, j), value| {
        let params = base.with_beta(betas[i]).with_gamma(gammas[j]);
        *value = peak_infected(&params);
    });
    return grid;
}

/// Largest infected count along a simulated trajectory.
pub fn peak_infected(params: &SimulationParameters) -> Real {
    simulate(params)
        .iter()
        .map(|p| p.infected())
        .fold(0.0, Real::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_matches_sequential() {
        let params: Vec<_> = (1..=8)
            .map(|k| {
                SimulationParameters::default()
                    .with_beta(0.05 * k as Real)
                    .with_days(60)
            })
            .collect();
        let parallel = simulate_many(&params);
        assert_eq!(parallel.len(), params.len());
        for (p, curve) in params.iter().zip(&parallel) {
            assert_eq!(&simulate(p), curve);
        }
    }

    #[test]
    fn empty_batch() {
        assert!(simulate_many(&[]).is_empty());
    }

    #[test]
    fn grid_shape_and_ordering() {
        let base = SimulationParameters::default();
        let betas = [0.1, 0.2, 0.4];
        let gammas = [0.1, 0.2];
        let grid = peak_grid(&base, &betas, &gammas);
        assert_eq!(grid.dim(), (3, 2));

        for (i, &beta) in betas.iter().enumerate() {
            for (j, &gamma) in gammas.iter().enumerate() {
                let expected = peak_infected(&base.with_beta(beta).with_gamma(gamma));
                assert_eq!(grid[[i, j]], expected);
            }
        }

        // Faster transmission means a larger peak, faster recovery a smaller one.
        assert!(grid[[2, 0]] > grid[[1, 0]]);
        assert!(grid[[2, 0]] > grid[[2, 1]]);
    }

    #[test]
    fn subcritical_epidemic_peaks_at_start() {
        let params = SimulationParameters::default().with_beta(0.05);
        assert_eq!(peak_infected(&params), 1.0);
    }
}
