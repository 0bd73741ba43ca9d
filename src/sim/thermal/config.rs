use serde::{Deserialize, Serialize};

use crate::error::{SimError, check_positive, check_range};

/// Stefan-Boltzmann constant [W/(m²·K⁴)].
pub const STEFAN_BOLTZMANN: f64 = 5.67e-8;

/// Offset between 0 °C and 0 K.
pub const CELSIUS_OFFSET: f64 = 273.15;

/// Explicit updates are accepted only while `dt / C * stiffness` stays below this.
pub const MAX_STABILITY_NUMBER: f64 = 1.0;

/// Physical constants of the panel heat-balance model.
///
/// The reference model folds time step and thermal capacitance into a single
/// `dt * 0.001` multiplier. Here they are separate: the explicit update is
/// `T += q_net * dt / C` with `C = areal_heat_capacity_j_per_m2_k`, and the default
/// `C = 1000 J/(m²·K)` reproduces the folded multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelThermalConfig {
    /// Fraction of incident irradiance absorbed as heat (the rest is converted to
    /// electricity or reflected).
    pub absorbed_fraction: f64,
    /// Still-air convection coefficient [W/(m²·K)].
    pub h_conv_base_w_per_m2_k: f64,
    /// Linear wind term of the convection coefficient [W/(m²·K) per m/s].
    pub h_conv_wind_coeff: f64,
    /// Long-wave emissivity of the panel surface.
    pub emissivity: f64,
    /// Sky temperature depression below ambient used for radiative exchange [K].
    pub sky_temperature_depression_k: f64,
    /// Lateral thermal diffusivity coefficient [m²/s].
    pub thermal_diffusivity_m2_per_s: f64,
    /// Grid spacing [m].
    pub grid_spacing_m: f64,
    /// Explicit sub-step size [s].
    pub time_step_s: f64,
    /// Heat capacity per unit panel area [J/(m²·K)].
    pub areal_heat_capacity_j_per_m2_k: f64,
    /// Hard lower clamp applied after every solve [K].
    pub min_temperature_k: f64,
    /// Hard upper clamp applied after every solve [K].
    pub max_temperature_k: f64,
}

impl PanelThermalConfig {
    pub fn new() -> Self {
        Self {
            absorbed_fraction: 0.8,
            h_conv_base_w_per_m2_k: 10.0,
            h_conv_wind_coeff: 5.0,
            emissivity: 0.9,
            sky_temperature_depression_k: 10.0,
            thermal_diffusivity_m2_per_s: 1.3e-4,
            grid_spacing_m: 0.1,
            time_step_s: 0.1,
            areal_heat_capacity_j_per_m2_k: 1000.0,
            min_temperature_k: 250.0,
            max_temperature_k: 400.0,
        }
    }

    /// Derives the areal heat capacity from a homogeneous panel layer:
    /// `C = density * specific_heat * thickness`.
    pub fn with_panel_layer(
        mut self,
        density_kg_per_m3: f64,
        specific_heat_j_per_kg_k: f64,
        thickness_m: f64,
    ) -> Self {
        self.areal_heat_capacity_j_per_m2_k =
            density_kg_per_m3 * specific_heat_j_per_kg_k * thickness_m;
        self
    }

    /// Multiplier applied to the net flux in the explicit update, `dt / C`.
    pub fn update_factor(&self) -> f64 {
        self.time_step_s / self.areal_heat_capacity_j_per_m2_k
    }

    /// Largest linearized loss rate of one cell [W/(m²·K)] at the given wind speed
    /// and temperature.
    ///
    /// Sum of convection `h`, radiation `4 eps sigma T^3` and the checkerboard mode
    /// of the 5-point Laplacian `8 alpha / dx^2`.
    pub fn stiffness(&self, wind_speed: f64, temperature: f64) -> f64 {
        let h = self.h_conv_base_w_per_m2_k + self.h_conv_wind_coeff * wind_speed;
        let radiative = 4.0 * self.emissivity * STEFAN_BOLTZMANN * temperature.powi(3);
        let conduction = 8.0 * self.thermal_diffusivity_m2_per_s / self.grid_spacing_m.powi(2);
        h + radiative + conduction
    }

    /// Rejects sub-steps too long for the explicit update to stay bounded at
    /// wind speeds up to `wind_speed` and temperatures up to `temperature`.
    pub fn check_stability(&self, wind_speed: f64, temperature: f64) -> Result<(), SimError> {
        check_range("wind_speed", wind_speed, 0.0, f64::MAX)?;
        check_positive("temperature", temperature)?;
        let number = self.update_factor() * self.stiffness(wind_speed, temperature);
        if number.is_nan() || number >= MAX_STABILITY_NUMBER {
            return Err(SimError::invalid(
                "time_step_s",
                self.time_step_s,
                format!(
                    "explicit update unstable: dt / C * stiffness = {number:.3e}, \
                     must stay below {MAX_STABILITY_NUMBER}"
                ),
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SimError> {
        check_range("absorbed_fraction", self.absorbed_fraction, 0.0, 1.0)?;
        check_range("h_conv_base_w_per_m2_k", self.h_conv_base_w_per_m2_k, 0.0, 1.0e3)?;
        check_range("h_conv_wind_coeff", self.h_conv_wind_coeff, 0.0, 1.0e3)?;
        check_range("emissivity", self.emissivity, 0.0, 1.0)?;
        check_range(
            "sky_temperature_depression_k",
            self.sky_temperature_depression_k,
            0.0,
            100.0,
        )?;
        check_range(
            "thermal_diffusivity_m2_per_s",
            self.thermal_diffusivity_m2_per_s,
            0.0,
            100.0,
        )?;
        check_positive("grid_spacing_m", self.grid_spacing_m)?;
        check_positive("time_step_s", self.time_step_s)?;
        check_positive(
            "areal_heat_capacity_j_per_m2_k",
            self.areal_heat_capacity_j_per_m2_k,
        )?;
        check_positive("min_temperature_k", self.min_temperature_k)?;
        if !(self.max_temperature_k.is_finite() && self.max_temperature_k > self.min_temperature_k)
        {
            return Err(SimError::invalid(
                "max_temperature_k",
                self.max_temperature_k,
                "must be finite and above min_temperature_k",
            ));
        }
        Ok(())
    }
}

impl Default for PanelThermalConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepted ranges for caller-supplied forcing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcingLimits {
    pub max_solar_irradiance_w_per_m2: f64,
    pub max_wind_speed_m_per_s: f64,
    pub min_ambient_temperature_k: f64,
    pub max_ambient_temperature_k: f64,
}

impl ForcingLimits {
    pub fn validate(&self) -> Result<(), SimError> {
        check_range(
            "max_solar_irradiance_w_per_m2",
            self.max_solar_irradiance_w_per_m2,
            0.0,
            1.0e4,
        )?;
        check_range("max_wind_speed_m_per_s", self.max_wind_speed_m_per_s, 0.0, 200.0)?;
        check_range(
            "min_ambient_temperature_k",
            self.min_ambient_temperature_k,
            1.0,
            1.0e3,
        )?;
        check_range(
            "max_ambient_temperature_k",
            self.max_ambient_temperature_k,
            1.0,
            1.0e3,
        )?;
        if self.max_ambient_temperature_k <= self.min_ambient_temperature_k {
            return Err(SimError::invalid(
                "max_ambient_temperature_k",
                self.max_ambient_temperature_k,
                "must be above min_ambient_temperature_k",
            ));
        }
        Ok(())
    }
}

impl Default for ForcingLimits {
    fn default() -> Self {
        Self {
            max_solar_irradiance_w_per_m2: 2000.0,
            max_wind_speed_m_per_s: 60.0,
            min_ambient_temperature_k: 200.0,
            max_ambient_temperature_k: 350.0,
        }
    }
}

/// Environmental load on the panel for one solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelForcing {
    /// Incident solar irradiance [W/m²].
    pub solar_irradiance: f64,
    /// Wind speed [m/s].
    pub wind_speed: f64,
    /// Ambient air temperature [K].
    pub ambient_temperature: f64,
}

impl Default for PanelForcing {
    fn default() -> Self {
        Self {
            solar_irradiance: 1000.0,
            wind_speed: 2.0,
            ambient_temperature: 298.15,
        }
    }
}

impl PanelForcing {
    pub fn new(solar_irradiance: f64, wind_speed: f64, ambient_temperature: f64) -> Self {
        Self {
            solar_irradiance,
            wind_speed,
            ambient_temperature,
        }
    }

    pub fn validate(&self, limits: &ForcingLimits) -> Result<(), SimError> {
        check_range(
            "solar_irradiance",
            self.solar_irradiance,
            0.0,
            limits.max_solar_irradiance_w_per_m2,
        )?;
        check_range("wind_speed", self.wind_speed, 0.0, limits.max_wind_speed_m_per_s)?;
        check_range(
            "ambient_temperature",
            self.ambient_temperature,
            limits.min_ambient_temperature_k,
            limits.max_ambient_temperature_k,
        )?;
        Ok(())
    }
}
