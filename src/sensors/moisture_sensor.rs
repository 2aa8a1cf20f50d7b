use std::borrow::Borrow;

use esp_idf_svc::hal::{
    adc::{
        attenuation,
        oneshot::{config::AdcChannelConfig, AdcChannelDriver, AdcDriver},
        Adc,
    },
    gpio::ADCPin,
};

use super::calibration::MoistureCalibration;

/// Capacitive soil probe on a oneshot ADC channel. One sample per cycle,
/// no averaging; the calibration anchors come from NVS.
pub struct MoistureSensor<'a, ADC: Adc + 'a, APin: ADCPin<Adc = ADC>, M: Borrow<AdcDriver<'a, ADC>>>
{
    channel: AdcChannelDriver<'a, APin, M>,
    calibration: MoistureCalibration,
}

impl<'a, ADC: Adc + 'a, APin: ADCPin<Adc = ADC>, M: Borrow<AdcDriver<'a, ADC>>>
    MoistureSensor<'a, ADC, APin, M>
{
    pub fn new(
        adc_driver: M,
        pin_adc: APin,
        calibration: MoistureCalibration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            channel: AdcChannelDriver::new(
                adc_driver,
                pin_adc,
                &AdcChannelConfig {
                    attenuation: attenuation::DB_11,
                    // Raw counts only; the anchors in NVS carry the scale.
                    calibration: false,
                    ..Default::default()
                },
            )?,
            calibration,
        })
    }

    /// Single oneshot sample. A failed conversion reads as 0 raw, which the
    /// calibration turns into an implausible percentage.
    pub fn read_raw_value(&mut self) -> u16 {
        self.channel.read_raw().unwrap_or(0)
    }

    pub fn percent_of(&self, raw: u16) -> i32 {
        self.calibration.percent(raw)
    }
}
