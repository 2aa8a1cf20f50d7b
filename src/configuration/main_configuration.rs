use super::nvs_configuration::*;
use crate::sensors::calibration::{DEFAULT_RAW_DRY, DEFAULT_RAW_WET};

#[derive(Debug)]
pub enum MapFormType {
    String(&'static str, usize),
    Unsigned(u32),
    Unsigned64(u64),
}

/// One provisioned field: its NVS key, its form input name and the
/// placeholder it fills in the portal template.
#[derive(Debug)]
pub struct MapFormElement {
    pub nvs_key: &'static str,
    pub form_name: &'static str,
    pub template_id: Option<&'static str>,
    pub data_type: MapFormType,
}

pub const MAP_NVS_FORM: &[MapFormElement] = &[
    MapFormElement {
        nvs_key: KEY_SSID,
        form_name: "ssid",
        template_id: Some("{SSID}"),
        data_type: MapFormType::String("", 32),
    },
    MapFormElement {
        nvs_key: KEY_PASSPHRASE,
        form_name: "pass",
        template_id: None,
        data_type: MapFormType::String("", 63),
    },
    MapFormElement {
        nvs_key: KEY_HOST,
        form_name: "host",
        template_id: Some("{HOST}"),
        data_type: MapFormType::String("", 128),
    },
    MapFormElement {
        nvs_key: KEY_PORT,
        form_name: "port",
        template_id: Some("{PORT}"),
        data_type: MapFormType::Unsigned(DEFAULT_PORT),
    },
    MapFormElement {
        nvs_key: KEY_TOKEN,
        form_name: "token",
        template_id: None,
        data_type: MapFormType::String("", 64),
    },
    MapFormElement {
        nvs_key: KEY_NAME,
        form_name: "name",
        template_id: Some("{NAME}"),
        data_type: MapFormType::String(DEFAULT_NAME, 32),
    },
    MapFormElement {
        nvs_key: KEY_ID,
        form_name: "id",
        template_id: Some("{ID}"),
        data_type: MapFormType::Unsigned(0),
    },
    MapFormElement {
        nvs_key: KEY_RAW_DRY,
        form_name: "raw_dry",
        template_id: Some("{RAW_DRY}"),
        data_type: MapFormType::Unsigned(DEFAULT_RAW_DRY as u32),
    },
    MapFormElement {
        nvs_key: KEY_RAW_WET,
        form_name: "raw_wet",
        template_id: Some("{RAW_WET}"),
        data_type: MapFormType::Unsigned(DEFAULT_RAW_WET as u32),
    },
    MapFormElement {
        nvs_key: KEY_SLEEP,
        form_name: "sleep",
        template_id: Some("{SLEEP}"),
        data_type: MapFormType::Unsigned64(DEFAULT_SLEEP_US),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_names_and_nvs_keys_are_unique() {
        for (i, a) in MAP_NVS_FORM.iter().enumerate() {
            for b in &MAP_NVS_FORM[i + 1..] {
                assert_ne!(a.form_name, b.form_name);
                assert_ne!(a.nvs_key, b.nvs_key);
            }
        }
    }

    #[test]
    fn secrets_have_no_template_placeholder() {
        for elem in MAP_NVS_FORM {
            if elem.nvs_key == KEY_PASSPHRASE || elem.nvs_key == KEY_TOKEN {
                assert!(elem.template_id.is_none());
            }
        }
    }
}
