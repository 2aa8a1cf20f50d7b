use esp_idf_svc::wifi::AccessPointInfo;

use crate::configuration::{main_configuration, nvs_configuration::NvsConfiguration};

const BASE_HTML: &str = include_str!("html/base.html");
const SENSOR_FORM_HTML: &str = include_str!("html/form_plant.html");

pub fn to_html(
    config: &NvsConfiguration,
    message: Option<String>,
    aps: Option<Vec<AccessPointInfo>>,
) -> String {
    let mut template = BASE_HTML.to_string();

    template = template.replace("{FORM_SETTINGS}", SENSOR_FORM_HTML);
    template = template.replace("{ERROR_MSG}", &message.unwrap_or_default());
    template = template.replace("{AP_LIST}", &accesspoint_to_template(aps));

    for elem in main_configuration::MAP_NVS_FORM {
        let Some(template_id) = elem.template_id else {
            continue;
        };

        template = match elem.data_type {
            main_configuration::MapFormType::String(default, _) => {
                template.replace(template_id, &config.read_string(elem.nvs_key, default))
            }

            main_configuration::MapFormType::Unsigned(default) => template.replace(
                template_id,
                &config.read_u32(elem.nvs_key, default).to_string(),
            ),

            main_configuration::MapFormType::Unsigned64(default) => template.replace(
                template_id,
                &config.read_u64(elem.nvs_key, default).to_string(),
            ),
        };
    }

    template
}

fn accesspoint_to_template(aps: Option<Vec<AccessPointInfo>>) -> String {
    let Some(aps) = aps else {
        return "[]".to_string();
    };

    let mut result = String::from("[");
    for ap in aps {
        result += &format!("{{ssid:\"{}\",rssi:{}}},", ap.ssid, ap.signal_strength);
    }
    result += "]";

    result
}
