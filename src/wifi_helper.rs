use std::net::Ipv4Addr;
use std::str::FromStr;

use esp_idf_svc::hal::{modem::Modem, peripheral::Peripheral};
use esp_idf_svc::sys::EspError;
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    ipv4::{self, Mask, Subnet},
    netif::{EspNetif, NetifConfiguration, NetifStack},
    nvs::EspDefaultNvsPartition,
    wifi::{
        AccessPointConfiguration, AuthMethod, BlockingWifi, ClientConfiguration, Configuration,
        EspWifi, WifiDriver,
    },
};
use log::{info, warn};

use crate::configuration::nvs_configuration::NvsConfiguration;

const MAX_CONNECT_ATTEMPTS: u32 = 5;
const PORTAL_AP_SSID: &str = "PlantPulse Config";
const PORTAL_GATEWAY: &str = "192.168.70.1";

/// Join the provisioned network as a station. Up to five attempts, then
/// the error of the last one.
pub fn connect_wifi<'a>(
    config: &NvsConfiguration,
    modem: impl Peripheral<P = Modem> + 'a,
) -> anyhow::Result<BlockingWifi<EspWifi<'a>>> {
    let wifi_configuration: Configuration = Configuration::Client(ClientConfiguration {
        ssid: config.get_ssid().as_str().try_into().unwrap(),
        bssid: None,
        auth_method: AuthMethod::WPA2Personal,
        password: config.get_passphrase().as_str().try_into().unwrap(),
        channel: None,
    });

    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sys_loop.clone(), Some(nvs))?, sys_loop)?;
    wifi.set_configuration(&wifi_configuration)?;

    for attempt in 1..=MAX_CONNECT_ATTEMPTS {
        info!("Wifi connection attempt #{attempt}");
        let _ = wifi.disconnect();

        match bring_up(&mut wifi) {
            Ok(()) => break,
            Err(e) if attempt == MAX_CONNECT_ATTEMPTS => return Err(e.into()),
            Err(e) => warn!("Wifi attempt #{attempt} failed: {e}"),
        }
    }

    Ok(wifi)
}

fn bring_up(wifi: &mut BlockingWifi<EspWifi<'_>>) -> Result<(), EspError> {
    wifi.start()?;
    info!("Wifi started");

    wifi.connect()?;
    info!("Wifi connected");

    wifi.wait_netif_up()?;
    info!("Wifi netif up");

    Ok(())
}

/// Open access point for the settings portal, routing 192.168.70.0/24.
pub fn create_ap<'a>(
    modem: impl Peripheral<P = Modem> + 'a,
) -> anyhow::Result<BlockingWifi<EspWifi<'a>>> {
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    let wifi_drv = WifiDriver::new(modem, sys_loop.clone(), Some(nvs))?;
    let wifi_esp = EspWifi::wrap_all(
        wifi_drv,
        EspNetif::new(NetifStack::Sta)?,
        EspNetif::new_with_conf(&NetifConfiguration {
            ip_configuration: ipv4::Configuration::Router(ipv4::RouterConfiguration {
                subnet: Subnet {
                    gateway: Ipv4Addr::from_str(PORTAL_GATEWAY)?,
                    mask: Mask(24),
                },
                ..Default::default()
            }),
            ..NetifConfiguration::wifi_default_router()
        })?,
    )?;

    let mut wifi = BlockingWifi::wrap(wifi_esp, sys_loop)?;

    let wifi_configuration = Configuration::Mixed(
        ClientConfiguration::default(),
        AccessPointConfiguration {
            ssid: PORTAL_AP_SSID.try_into().unwrap(),
            ssid_hidden: false,
            auth_method: AuthMethod::None,
            max_connections: 4,
            channel: 1,
            ..Default::default()
        },
    );

    wifi.set_configuration(&wifi_configuration)?;
    wifi.start()?;
    info!("Settings access point '{PORTAL_AP_SSID}' up");

    Ok(wifi)
}
