use anyhow::anyhow;
use bme280::i2c::BME280;
use esp_idf_svc::hal::{
    delay::Ets,
    gpio::IOPin,
    i2c::{I2c, I2cConfig, I2cDriver},
    peripheral::Peripheral,
    units::FromValueType,
};

/// Temperature and relative humidity of one cycle. Not retained.
#[derive(Debug, Clone, Copy)]
pub struct ClimateReading {
    pub temperature: f32,
    pub humidity: f32,
}

/// BME280 on the I2C bus (primary address).
pub struct ClimateSensor<'a> {
    bme: BME280<I2cDriver<'a>>,
}

impl<'a> ClimateSensor<'a> {
    pub fn new<I2C: I2c>(
        i2c: impl Peripheral<P = I2C> + 'a,
        pin_sda: impl Peripheral<P = impl IOPin> + 'a,
        pin_scl: impl Peripheral<P = impl IOPin> + 'a,
    ) -> anyhow::Result<Self> {
        let i2c_drv = I2cDriver::new(
            i2c,
            pin_sda,
            pin_scl,
            &I2cConfig::new().baudrate(100.kHz().into()),
        )?;

        let mut delay = Ets;
        let mut bme = BME280::new_primary(i2c_drv);
        bme.init(&mut delay)
            .map_err(|e| anyhow!("Failed to init climate sensor: {e:?}"))?;

        Ok(Self { bme })
    }

    pub fn read(&mut self) -> anyhow::Result<ClimateReading> {
        let mut delay = Ets;
        let measurements = self
            .bme
            .measure(&mut delay)
            .map_err(|e| anyhow!("Climate measurement failed: {e:?}"))?;

        Ok(ClimateReading {
            temperature: measurements.temperature,
            humidity: measurements.humidity,
        })
    }
}
