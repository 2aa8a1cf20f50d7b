use esp_idf_svc::hal::{
    adc::{oneshot::AdcDriver, ADC1},
    gpio::*,
    i2c::I2C0,
};

use crate::configuration::nvs_configuration::NvsConfiguration;
use crate::sensors::{climate_sensor::ClimateSensor, moisture_sensor::MoistureSensor};

pub struct Sensors<'a> {
    pub moisture: MoistureSensor<'a, ADC1, Gpio34, AdcDriver<'a, ADC1>>,
    pub climate: ClimateSensor<'a>,
}

pub struct Buttons<'a> {
    pub settings: PinDriver<'a, Gpio0, Input>,
}

pub struct OnBoardLed<'a> {
    pub orange: PinDriver<'a, Gpio18, Output>,
    pub green: PinDriver<'a, Gpio19, Output>,
}

pub struct Board<'a> {
    pub sensors: Sensors<'a>,
    pub buttons: Buttons<'a>,
    pub leds: OnBoardLed<'a>,
}

impl<'a> Board<'a> {
    pub fn new(
        config: &NvsConfiguration,
        adc1: ADC1,
        i2c0: I2C0,
        pins: Pins,
    ) -> anyhow::Result<Self> {
        let mut board = Self {
            sensors: Sensors {
                moisture: MoistureSensor::new(
                    AdcDriver::new(adc1)?,
                    pins.gpio34,
                    config.get_calibration(),
                )?,
                climate: ClimateSensor::new(i2c0, pins.gpio21, pins.gpio22)?,
            },
            buttons: Buttons {
                settings: PinDriver::input(pins.gpio0)?,
            },
            leds: OnBoardLed {
                orange: PinDriver::output(pins.gpio18)?,
                green: PinDriver::output(pins.gpio19)?,
            },
        };

        board.buttons.settings.set_pull(Pull::Up)?;
        board.leds.orange.set_low()?;
        board.leds.green.set_low()?;

        Ok(board)
    }
}
