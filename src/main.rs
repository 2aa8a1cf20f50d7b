use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::sys::esp_deep_sleep;
use log::{error, info};

use board::Board;
use configuration::nvs_configuration::NvsConfiguration;
use telemetry::{dashboard::DashboardClient, push_reading, Reading};

mod board;
mod configuration;
mod portal;
mod post_data;
mod sensors;
mod string_error;
mod telemetry;
mod template;
mod wifi_helper;

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let config = NvsConfiguration::new()?;

    let mut board = Board::new(&config, peripherals.adc1, peripherals.i2c0, peripherals.pins)?;

    // Give the settings button a moment after power-on.
    FreeRtos::delay_ms(1000);

    if board.buttons.settings.is_high() {
        let sleep_duration = config.get_deep_sleep_duration();

        if let Err(e) = main_sensor(&mut board, &config, peripherals.modem) {
            error!("Measurement cycle failed: {e:#}");
        }

        let _ = board.leds.orange.set_low();
        enter_deep_sleep(sleep_duration)
    } else {
        board.leds.green.set_high()?;
        let wifi = wifi_helper::create_ap(peripherals.modem)?;
        portal::run(config, wifi)
    }
}

/// One measurement cycle: sample, connect, push. Errors bubble up so the
/// caller still puts the node to sleep on a dead network.
fn main_sensor(
    board: &mut Board,
    config: &NvsConfiguration,
    modem: impl Peripheral<P = Modem> + 'static,
) -> anyhow::Result<()> {
    board.leds.orange.set_high()?;

    let raw = board.sensors.moisture.read_raw_value();
    let climate = board.sensors.climate.read()?;

    let reading = Reading {
        soil_moisture: board.sensors.moisture.percent_of(raw),
        temperature: climate.temperature,
        humidity: climate.humidity,
    };

    info!("Reading: {reading} (raw {raw})");
    info!("Payload: {}", reading.to_json());

    let _wifi = wifi_helper::connect_wifi(config, modem)?;

    let mut dashboard = DashboardClient::connect(config)?;
    push_reading(&mut dashboard, &reading)?;
    info!("Reading pushed");

    Ok(())
}

fn enter_deep_sleep(duration_us: u64) -> ! {
    info!("Going to sleep for {} s", duration_us / 1_000_000);

    unsafe { esp_deep_sleep(duration_us) }
}
