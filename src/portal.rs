use std::str::FromStr;
use std::sync::Mutex;

use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::io::{Read, Write};
use esp_idf_svc::http::{self, server::EspHttpServer, Method};
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::info;

use crate::configuration::{
    main_configuration::{MapFormType, MAP_NVS_FORM},
    nvs_configuration::NvsConfiguration,
};
use crate::post_data::PostData;
use crate::template;

const MAX_BODY_LEN: u64 = 512;

/// Settings portal: serves the form on `/`, stores submitted fields to
/// NVS. Runs until the device is power-cycled.
pub fn run(config: NvsConfiguration, wifi: BlockingWifi<EspWifi<'static>>) -> anyhow::Result<()> {
    let mutex_config = Mutex::new(config);
    let mutex_wifi = Mutex::new(wifi);

    let mut server = EspHttpServer::new(&http::server::Configuration {
        stack_size: 10240,
        ..Default::default()
    })?;

    server.fn_handler("/", Method::Get, |req| {
        let scan_result = mutex_wifi.lock().unwrap().scan().ok();

        req.into_ok_response()?
            .write_all(
                template::to_html(&mutex_config.lock().unwrap(), None, scan_result).as_bytes(),
            )
            .map(|_| ())
    })?;

    server.fn_handler::<anyhow::Error, _>("/", Method::Post, |mut req| {
        let len_body = req
            .header("Content-Length")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        let message: String;

        if len_body == 0 {
            message = "Save error: No body or no content-length".to_string();
        } else if len_body >= MAX_BODY_LEN {
            message = "Save error: Content-length too long.".to_string();
        } else {
            let mut buffer = [0u8; MAX_BODY_LEN as usize];

            match req.read(&mut buffer) {
                Ok(bytes_read) => {
                    let post_data =
                        PostData::from_string(&String::from_utf8(buffer[0..bytes_read].to_vec())?);

                    store_form(&mut mutex_config.lock().unwrap(), &post_data)?;
                    message = "Save successful!".to_string();
                }
                Err(_) => {
                    message = "Save error: Failed to read request.".to_string();
                }
            };
        }

        req.into_ok_response()?.write_all(
            template::to_html(&mutex_config.lock().unwrap(), Some(message), None).as_bytes(),
        )?;

        Ok(())
    })?;

    info!("Settings portal ready");

    loop {
        FreeRtos::delay_ms(100);
    }

    #[allow(unreachable_code)]
    Ok(())
}

fn store_form(config: &mut NvsConfiguration, post_data: &PostData) -> anyhow::Result<()> {
    for elem in MAP_NVS_FORM {
        if !post_data.is_key_exists(elem.form_name) {
            continue;
        }

        let data = post_data.read_value(elem.form_name).unwrap_or_default();

        match elem.data_type {
            MapFormType::String(_, max_size) => {
                // Secret fields are never echoed into the form; an empty
                // submission keeps the stored value.
                if data.is_empty() && elem.template_id.is_none() {
                    continue;
                }
                config.store_string(elem.nvs_key, &data, max_size)?
            }

            MapFormType::Unsigned(_) => {
                config.store_u32(elem.nvs_key, u32::from_str(data.trim())?)?
            }

            MapFormType::Unsigned64(_) => {
                config.store_u64(elem.nvs_key, u64::from_str(data.trim())?)?
            }
        };
    }

    Ok(())
}
