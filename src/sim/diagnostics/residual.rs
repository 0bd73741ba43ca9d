use crate::sim::fidelity::FidelityLevel;
use crate::sim::thermal::FieldModel;

use super::statistics::GridStatistics;

/// Reported energy-balance residual.
///
/// This is a proxy monotonic in fidelity, not a conservation check:
/// - PDE model: the nominal per-fidelity value.
/// - Analytic model: `base * (1 + std_dev / 100)`, so rougher fields report more.
pub fn energy_residual(model: FieldModel, fidelity: FidelityLevel, stats: &GridStatistics) -> f64 {
    match model {
        FieldModel::Pde => fidelity.nominal_residual(),
        FieldModel::Analytic => {
            fidelity.analytic_params().base_residual * (1.0 + stats.std_dev_k / 100.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::thermal::TemperatureGrid;

    #[test]
    fn test_pde_residual_ignores_grid() {
        let flat = GridStatistics::from_grid(&TemperatureGrid::uniform(2, 2, 300.0).unwrap());
        let rough =
            GridStatistics::from_grid(&TemperatureGrid::from_rows(&[vec![250.0, 400.0]]).unwrap());
        for level in FidelityLevel::ALL {
            assert_eq!(
                energy_residual(FieldModel::Pde, level, &flat),
                energy_residual(FieldModel::Pde, level, &rough)
            );
        }
        assert_eq!(energy_residual(FieldModel::Pde, FidelityLevel::High, &flat), 1e-8);
    }

    #[test]
    fn test_analytic_residual_scales_with_spread() {
        // std dev of {300, 310} is 5 -> factor 1.05
        let stats =
            GridStatistics::from_grid(&TemperatureGrid::from_rows(&[vec![300.0, 310.0]]).unwrap());
        let r = energy_residual(FieldModel::Analytic, FidelityLevel::Medium, &stats);
        assert!((r - 1e-3 * 1.05).abs() < 1e-15, "got {r}");
    }
}
