use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DAYS_PER_YEAR: f64 = 365.0;
const USD_PER_KWH: f64 = 0.12;
const CO2_KG_PER_KWH: f64 = 0.45;
const CO2_KG_PER_TREE_YEAR: f64 = 0.06;
const MILES_PER_CO2_KG: f64 = 2.5;
// 10 W LED bulb
const LED_BULB_KW: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Phone,
    Computer,
    Tv,
}

impl Device {
    /// Average draw in kWh for one hour of use.
    pub fn base_consumption_kwh_per_hour(self) -> f64 {
        match self {
            Device::Phone => 0.00066,
            Device::Computer => 0.017,
            Device::Tv => 0.015,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScreenType {
    Oled,
    Lcd,
}

impl ScreenType {
    /// Fraction of display power saved by rendering dark pixels. Backlit LCD
    /// panels barely benefit.
    pub fn savings_rate(self) -> f64 {
        match self {
            ScreenType::Oled => 0.43,
            ScreenType::Lcd => 0.03,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub device: Device,
    pub screen_type: ScreenType,
    pub daily_hours: f64,
    pub app_count: u32,
    pub dark_mode_adoption_percent: f64,
}

fn clamp_or_zero(value: f64, max: f64) -> f64 {
    // Also folds -0.0 into 0.0 so nothing downstream prints "-0.00".
    if value.is_nan() || value <= 0.0 {
        0.0
    } else {
        value.clamp(0.0, max)
    }
}

impl CalculatorInput {
    /// Builds an input from unchecked form values: hours are clamped to
    /// 0..=24, the adoption share to 0..=100, negative app counts become 0
    /// and NaN becomes 0.
    pub fn clamped(
        device: Device,
        screen_type: ScreenType,
        daily_hours: f64,
        app_count: i64,
        dark_mode_adoption_percent: f64,
    ) -> Self {
        Self {
            device,
            screen_type,
            daily_hours: clamp_or_zero(daily_hours, 24.0),
            app_count: app_count.clamp(0, i64::from(u32::MAX)) as u32,
            dark_mode_adoption_percent: clamp_or_zero(dark_mode_adoption_percent, 100.0),
        }
    }
}

impl Default for CalculatorInput {
    // Form defaults shown before the user touches anything.
    fn default() -> Self {
        Self {
            device: Device::Phone,
            screen_type: ScreenType::Oled,
            daily_hours: 4.8,
            app_count: 10,
            dark_mode_adoption_percent: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactResult {
    pub energy_savings_kwh: f64,
    pub cost_savings_usd: f64,
    pub co2_reduction_kg: f64,
    pub trees_equivalent: f64,
    pub miles_not_driven_equivalent: f64,
    pub led_bulb_hours_equivalent: f64,
}

impl ImpactResult {
    /// Label/value pairs in display order with their units.
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Annual Energy Savings", format!("{:.2} kWh", self.energy_savings_kwh)),
            ("Cost Savings", format!("${:.2}", self.cost_savings_usd)),
            ("CO2 Reduction", format!("{:.2} kg", self.co2_reduction_kg)),
            ("Trees Equivalent", format!("{:.1}", self.trees_equivalent)),
            ("Miles Not Driven", format!("{:.1} miles", self.miles_not_driven_equivalent)),
            ("LED Bulb Hours", format!("{:.1} hours", self.led_bulb_hours_equivalent)),
        ]
    }
}

/// Annual savings from switching the remaining light-themed apps to dark mode.
///
/// Expects validated, non-negative input (see [`CalculatorInput::clamped`]).
/// Zero hours or zero apps yield an all-zero result.
pub fn compute_impact(input: &CalculatorInput) -> ImpactResult {
    let base = input.device.base_consumption_kwh_per_hour();
    let rate = input.screen_type.savings_rate();

    let apps_without_dark_mode =
        f64::from(input.app_count) * (1.0 - input.dark_mode_adoption_percent / 100.0);
    let annual_savings_kwh =
        input.daily_hours * DAYS_PER_YEAR * base * apps_without_dark_mode * rate;

    let co2_reduction_kg = annual_savings_kwh * CO2_KG_PER_KWH;
    let result = ImpactResult {
        energy_savings_kwh: annual_savings_kwh,
        cost_savings_usd: annual_savings_kwh * USD_PER_KWH,
        co2_reduction_kg,
        trees_equivalent: co2_reduction_kg / CO2_KG_PER_TREE_YEAR,
        miles_not_driven_equivalent: co2_reduction_kg * MILES_PER_CO2_KG,
        led_bulb_hours_equivalent: annual_savings_kwh * 1000.0 / LED_BULB_KW,
    };

    debug!(
        action = "compute",
        component = "impact",
        device = ?input.device,
        screen_type = ?input.screen_type,
        energy_savings_kwh = result.energy_savings_kwh,
        "Computed impact"
    );
    result
}
