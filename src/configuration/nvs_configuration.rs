use std::sync::atomic::{AtomicBool, Ordering};

use esp_idf_svc::nvs::{EspCustomNvsPartition, EspNvs, NvsCustom};
use pad::{Alignment, PadStr};

use crate::sensors::calibration::{MoistureCalibration, DEFAULT_RAW_DRY, DEFAULT_RAW_WET};
use crate::string_error::{StringError, StringEspError};

static IS_NVS_TAKEN: AtomicBool = AtomicBool::new(false);

const PARTITION_NAME: &str = "config";
const NAMESPACE: &str = "config";

const PAD_CHAR: char = 0x03 as char;

pub const KEY_SSID: &str = "SSID";
pub const KEY_PASSPHRASE: &str = "PASS";
pub const KEY_HOST: &str = "HOST";
pub const KEY_PORT: &str = "PORT";
pub const KEY_TOKEN: &str = "TOKEN";
pub const KEY_NAME: &str = "NAME";
pub const KEY_ID: &str = "ID";
pub const KEY_SLEEP: &str = "SLEEP";
pub const KEY_RAW_DRY: &str = "RAWDRY";
pub const KEY_RAW_WET: &str = "RAWWET";

pub const DEFAULT_NAME: &str = "plantpulse";
pub const DEFAULT_PORT: u32 = 1883;
pub const DEFAULT_SLEEP_US: u64 = 600_000_000;

/// Handle on the `config` NVS partition. Only one may live at a time.
pub struct NvsConfiguration {
    nvs: EspNvs<NvsCustom>,
}

impl NvsConfiguration {
    pub fn new() -> Result<Self, StringError> {
        if IS_NVS_TAKEN.load(Ordering::Relaxed) {
            return Err(StringError("Configuration NVS already taken"));
        }

        IS_NVS_TAKEN.store(true, Ordering::Relaxed);

        let nvs_custom = match EspCustomNvsPartition::take(PARTITION_NAME) {
            Ok(nvs) => nvs,
            Err(_) => return Err(StringError("Fail to take partition")),
        };

        match EspNvs::new(nvs_custom, NAMESPACE, true) {
            Ok(nvs) => Ok(Self { nvs }),
            Err(_) => Err(StringError("Failed to create EspNvs. Bad namespace ?")),
        }
    }

    pub fn get_ssid(&self) -> String {
        self.read_string(KEY_SSID, "")
    }

    pub fn get_passphrase(&self) -> String {
        self.read_string(KEY_PASSPHRASE, "")
    }

    pub fn get_dashboard_host(&self) -> String {
        self.read_string(KEY_HOST, "")
    }

    pub fn get_dashboard_port(&self) -> u16 {
        self.read_u32(KEY_PORT, DEFAULT_PORT) as u16
    }

    pub fn get_token(&self) -> String {
        self.read_string(KEY_TOKEN, "")
    }

    pub fn get_name(&self) -> String {
        self.read_string(KEY_NAME, DEFAULT_NAME)
    }

    pub fn get_id(&self) -> u32 {
        self.read_u32(KEY_ID, 0)
    }

    pub fn get_deep_sleep_duration(&self) -> u64 {
        self.read_u64(KEY_SLEEP, DEFAULT_SLEEP_US)
    }

    pub fn get_calibration(&self) -> MoistureCalibration {
        MoistureCalibration::new(
            self.read_u32(KEY_RAW_DRY, DEFAULT_RAW_DRY as u32) as u16,
            self.read_u32(KEY_RAW_WET, DEFAULT_RAW_WET as u32) as u16,
        )
    }

    pub fn store_string(
        &mut self,
        key: &str,
        value: &str,
        max_size: usize,
    ) -> Result<(), StringEspError> {
        self.nvs
            .remove(key)
            .map_err(|e| StringEspError("Failed to erase key", e))?;
        self.nvs
            .set_str(key, &Self::trunc_pad_string(value, max_size))
            .map_err(|e| StringEspError("Failed to store string", e))
    }

    pub fn read_string(&self, key: &str, default: &str) -> String {
        let size = self.nvs.str_len(key).unwrap_or(None).unwrap_or(0);
        let mut buf = vec![0; size];

        if size == 0 {
            return default.to_string();
        }

        let result = self
            .nvs
            .get_str(key, &mut buf)
            .unwrap_or(None)
            .unwrap_or(default)
            .to_string();

        result
            .split_once(PAD_CHAR)
            .unwrap_or((&result, ""))
            .0
            .to_owned()
    }

    pub fn store_u32(&mut self, key: &str, value: u32) -> Result<(), StringEspError> {
        self.nvs
            .remove(key)
            .map_err(|e| StringEspError("Failed to erase key", e))?;
        self.nvs
            .set_u32(key, value)
            .map_err(|e| StringEspError("Failed to store U32", e))
    }

    pub fn read_u32(&self, key: &str, default: u32) -> u32 {
        self.nvs.get_u32(key).unwrap_or(None).unwrap_or(default)
    }

    pub fn store_u64(&mut self, key: &str, value: u64) -> Result<(), StringEspError> {
        self.nvs
            .remove(key)
            .map_err(|e| StringEspError("Failed to erase key", e))?;
        self.nvs
            .set_u64(key, value)
            .map_err(|e| StringEspError("Failed to store U64", e))
    }

    pub fn read_u64(&self, key: &str, default: u64) -> u64 {
        self.nvs.get_u64(key).unwrap_or(None).unwrap_or(default)
    }

    fn trunc_pad_string(s: &str, max: usize) -> String {
        s.pad(max, PAD_CHAR, Alignment::Left, true)
    }
}

impl Drop for NvsConfiguration {
    fn drop(&mut self) {
        IS_NVS_TAKEN.store(false, Ordering::Relaxed);
    }
}
