/// Two-point linear calibration from raw ADC counts to a moisture
/// percentage. `raw_dry` maps to 0 % and `raw_wet` to 100 %; on a
/// capacitive probe the dry end reads high, so the domain runs backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoistureCalibration {
    raw_dry: u16,
    raw_wet: u16,
}

pub const DEFAULT_RAW_DRY: u16 = 4095;
pub const DEFAULT_RAW_WET: u16 = 1200;

impl MoistureCalibration {
    pub fn new(raw_dry: u16, raw_wet: u16) -> Self {
        Self { raw_dry, raw_wet }
    }

    /// Rescale a raw sample with truncating integer division. Samples
    /// outside the anchors extrapolate past [0, 100]; an implausible
    /// percentage on the dashboard is the fault signal for a floating or
    /// miswired probe.
    pub fn percent(&self, raw: u16) -> i32 {
        let span = self.raw_wet as i32 - self.raw_dry as i32;
        if span == 0 {
            // Identical anchors read as uncalibrated.
            return 0;
        }

        (raw as i32 - self.raw_dry as i32) * 100 / span
    }
}

impl Default for MoistureCalibration {
    fn default() -> Self {
        Self::new(DEFAULT_RAW_DRY, DEFAULT_RAW_WET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_map_to_range_endpoints() {
        let cal = MoistureCalibration::default();

        assert_eq!(cal.percent(4095), 0);
        assert_eq!(cal.percent(1200), 100);
    }

    #[test]
    fn midpoint_maps_to_half() {
        let cal = MoistureCalibration::default();

        assert_eq!(cal.percent(2647), 50);
    }

    #[test]
    fn samples_outside_the_anchors_extrapolate() {
        let cal = MoistureCalibration::default();

        // A floating input that reads 0 raw lands well above 100 %.
        assert!(cal.percent(0) > 100);
        assert!(cal.percent(600) > 100);
        // Counts past the dry anchor go negative.
        assert!(cal.percent(4500) < 0);
    }

    #[test]
    fn forward_anchor_order_also_works() {
        let cal = MoistureCalibration::new(200, 3800);

        assert_eq!(cal.percent(200), 0);
        assert_eq!(cal.percent(3800), 100);
        assert_eq!(cal.percent(2000), 50);
    }

    #[test]
    fn identical_anchors_read_as_uncalibrated() {
        let cal = MoistureCalibration::new(1000, 1000);

        assert_eq!(cal.percent(1500), 0);
    }
}
