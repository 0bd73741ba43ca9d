//! Surface heat-exchange terms of the panel heat balance.
//!
//! Sign convention: positive flux is heat *leaving* the panel, except for
//! [`absorbed_solar_flux`] which is heat entering it. All fluxes are per unit
//! panel area [W/m²].

use super::config::{PanelThermalConfig, STEFAN_BOLTZMANN};

/// Wind-forced convection coefficient [W/(m²·K)].
///
/// Linear model `h = h_base + k_wind * V`.
pub fn convection_coefficient(config: &PanelThermalConfig, wind_speed: f64) -> f64 {
    config.h_conv_base_w_per_m2_k + config.h_conv_wind_coeff * wind_speed
}

/// Convective loss `h * (T - T_amb)`.
pub fn convective_flux(h: f64, temperature: f64, ambient: f64) -> f64 {
    h * (temperature - ambient)
}

/// Long-wave radiative loss to a sky at `T_sky`: `eps * sigma * (T^4 - T_sky^4)`.
pub fn radiative_flux(emissivity: f64, temperature: f64, sky_temperature: f64) -> f64 {
    emissivity * STEFAN_BOLTZMANN * (temperature.powi(4) - sky_temperature.powi(4))
}

/// Effective sky temperature for a given ambient temperature [K].
pub fn sky_temperature(config: &PanelThermalConfig, ambient: f64) -> f64 {
    ambient - config.sky_temperature_depression_k
}

/// Solar heat absorbed by the panel.
pub fn absorbed_solar_flux(config: &PanelThermalConfig, solar_irradiance: f64) -> f64 {
    config.absorbed_fraction * solar_irradiance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convection_coefficient_linear_in_wind() {
        let cfg = PanelThermalConfig::new();
        assert!((convection_coefficient(&cfg, 0.0) - 10.0).abs() < 1e-12);
        assert!((convection_coefficient(&cfg, 2.0) - 20.0).abs() < 1e-12);
        assert!((convection_coefficient(&cfg, 4.0) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_convective_flux_sign() {
        assert!(convective_flux(20.0, 310.0, 300.0) > 0.0, "hot panel loses heat");
        assert!(convective_flux(20.0, 290.0, 300.0) < 0.0, "cold panel gains heat");
        assert!((convective_flux(20.0, 310.0, 300.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_radiative_flux_at_ambient() {
        // Panel at ambient still radiates to the colder sky.
        let cfg = PanelThermalConfig::new();
        let t_amb = 298.15;
        let q = radiative_flux(cfg.emissivity, t_amb, sky_temperature(&cfg, t_amb));
        let expected = 0.9 * 5.67e-8 * (t_amb.powi(4) - (t_amb - 10.0).powi(4));
        assert!((q - expected).abs() < 1e-9, "got {q}, expected {expected}");
        assert!(q > 40.0 && q < 60.0, "got {q}");
    }

    #[test]
    fn test_radiative_flux_zero_for_equal_temperatures() {
        assert_eq!(radiative_flux(0.9, 300.0, 300.0), 0.0);
    }

    #[test]
    fn test_absorbed_solar() {
        let cfg = PanelThermalConfig::new();
        assert!((absorbed_solar_flux(&cfg, 1000.0) - 800.0).abs() < 1e-12);
    }
}
