pub mod calibration;
pub mod climate_sensor;
pub mod moisture_sensor;
