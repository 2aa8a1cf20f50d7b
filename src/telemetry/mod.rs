use std::fmt::{self, Display};

use serde_json::json;

pub mod dashboard;

/// Dashboard channel numbering is fixed: one channel per scalar.
pub const CHANNEL_SOIL: u8 = 0;
pub const CHANNEL_TEMPERATURE: u8 = 1;
pub const CHANNEL_HUMIDITY: u8 = 2;

/// One measurement cycle's values. Built, pushed, discarded.
#[derive(Debug, Clone, Copy)]
pub struct Reading {
    pub soil_moisture: i32,
    pub temperature: f32,
    pub humidity: f32,
}

impl Reading {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "soil_moisture": self.soil_moisture,
            "temperature": self.temperature,
            "humidity": self.humidity,
        })
    }
}

impl Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "soil {} %, {:.2} °C, {:.2} %RH",
            self.soil_moisture, self.temperature, self.humidity
        )
    }
}

/// Write side of a dashboard session: put one scalar on one numbered
/// channel. Implemented by the MQTT client and by test doubles.
pub trait ChannelWriter {
    fn write_channel(&mut self, channel: u8, value: &str) -> anyhow::Result<()>;
}

/// Push one reading: exactly three channel writes, soil first, then
/// temperature, then humidity. A failed write aborts the cycle; the next
/// wake retries with fresh values.
pub fn push_reading<W: ChannelWriter>(writer: &mut W, reading: &Reading) -> anyhow::Result<()> {
    writer.write_channel(CHANNEL_SOIL, &reading.soil_moisture.to_string())?;
    writer.write_channel(CHANNEL_TEMPERATURE, &format!("{:.2}", reading.temperature))?;
    writer.write_channel(CHANNEL_HUMIDITY, &format!("{:.2}", reading.humidity))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingWriter {
        writes: Vec<(u8, String)>,
    }

    impl ChannelWriter for RecordingWriter {
        fn write_channel(&mut self, channel: u8, value: &str) -> anyhow::Result<()> {
            self.writes.push((channel, value.to_string()));
            Ok(())
        }
    }

    struct FailingWriter {
        calls: usize,
    }

    impl ChannelWriter for FailingWriter {
        fn write_channel(&mut self, _channel: u8, _value: &str) -> anyhow::Result<()> {
            self.calls += 1;
            anyhow::bail!("session lost")
        }
    }

    #[test]
    fn pushes_three_channels_in_order() {
        let mut writer = RecordingWriter::default();
        let reading = Reading {
            soil_moisture: 42,
            temperature: 21.5,
            humidity: 60.25,
        };

        push_reading(&mut writer, &reading).unwrap();

        assert_eq!(
            writer.writes,
            vec![
                (CHANNEL_SOIL, "42".to_string()),
                (CHANNEL_TEMPERATURE, "21.50".to_string()),
                (CHANNEL_HUMIDITY, "60.25".to_string()),
            ]
        );
    }

    #[test]
    fn pushes_regardless_of_value_validity() {
        let mut writer = RecordingWriter::default();
        let reading = Reading {
            soil_moisture: -7,
            temperature: f32::NAN,
            humidity: 120.0,
        };

        push_reading(&mut writer, &reading).unwrap();

        assert_eq!(writer.writes.len(), 3);
        assert_eq!(writer.writes[0].1, "-7");
    }

    #[test]
    fn failed_write_aborts_the_cycle() {
        let mut writer = FailingWriter { calls: 0 };
        let reading = Reading {
            soil_moisture: 0,
            temperature: 0.0,
            humidity: 0.0,
        };

        assert!(push_reading(&mut writer, &reading).is_err());
        assert_eq!(writer.calls, 1);
    }

    #[test]
    fn json_snapshot_carries_all_three_fields() {
        let reading = Reading {
            soil_moisture: 55,
            temperature: 19.0,
            humidity: 48.5,
        };

        let json = reading.to_json();
        assert_eq!(json["soil_moisture"], 55);
        assert_eq!(json["humidity"], 48.5);
    }
}
