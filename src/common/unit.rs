//! Unit conversion utilities.
//!
//! PresentationML measures geometry in EMU (English Metric Units), angles in
//! 60000ths of a degree, font sizes in hundredths of a point and percentages
//! in thousandths of a percent. These are pure conversions with no state.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_CM: i64 = 360_000;
pub const EMUS_PER_PT: i64 = 12_700;
pub const EMUS_PER_PX_96: i64 = 9_525;

/// Legacy PowerPoint master units per inch (comment positions).
pub const MASTER_UNITS_PER_INCH: i64 = 576;

/// Angle units per degree (`a:xfrm rot`, gradient `lin ang`).
pub const ANGLE_UNITS_PER_DEGREE: i64 = 60_000;

/// Run baseline for subscript text, in thousandths of a percent.
pub const BASELINE_SUBSCRIPT: i32 = -25_000;
/// Run baseline for superscript text, in thousandths of a percent.
pub const BASELINE_SUPERSCRIPT: i32 = 30_000;

#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

#[inline]
pub fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

#[inline]
pub fn px_to_emu(px: u32) -> i64 {
    px as i64 * EMUS_PER_PX_96
}

#[inline]
pub fn emu_to_px(emu: i64) -> u32 {
    (emu / EMUS_PER_PX_96).max(0) as u32
}

#[inline]
pub fn inch_to_emu(inch: f64) -> i64 {
    (inch * EMUS_PER_INCH as f64).round() as i64
}

#[inline]
pub fn cm_to_emu(cm: f64) -> i64 {
    (cm * EMUS_PER_CM as f64).round() as i64
}

#[inline]
pub fn degrees_to_angle(deg: f64) -> i64 {
    (deg * ANGLE_UNITS_PER_DEGREE as f64).round() as i64
}

#[inline]
pub fn angle_to_degrees(angle: i64) -> f64 {
    angle as f64 / ANGLE_UNITS_PER_DEGREE as f64
}

/// EMU to master units, as used by `p:cm/p:pos`.
#[inline]
pub fn emu_to_master_units(emu: i64) -> i64 {
    emu * MASTER_UNITS_PER_INCH / EMUS_PER_INCH
}

#[inline]
pub fn master_units_to_emu(units: i64) -> i64 {
    units * EMUS_PER_INCH / MASTER_UNITS_PER_INCH
}

/// Font size in points to the `sz` attribute value (hundredths of a point).
#[inline]
pub fn pt_to_font_size(pt: f64) -> u32 {
    (pt * 100.0).round().max(0.0) as u32
}

#[inline]
pub fn font_size_to_pt(sz: u32) -> f64 {
    sz as f64 / 100.0
}

/// Percentage (0..=100) to thousandths of a percent (`alpha`, `lumMod`, `spcPct`).
#[inline]
pub fn percent_to_st(percent: f64) -> i64 {
    (percent * 1000.0).round() as i64
}

#[inline]
pub fn st_to_percent(st: i64) -> f64 {
    st as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_emu_conversion() {
        assert_eq!(pt_to_emu(1.0), 12_700);
        assert_eq!(pt_to_emu(0.75), 9_525);
        assert_eq!(emu_to_pt(25_400), 2.0);
    }

    #[test]
    fn test_font_size() {
        assert_eq!(pt_to_font_size(60.0), 6000);
        assert_eq!(pt_to_font_size(10.5), 1050);
        assert_eq!(font_size_to_pt(1800), 18.0);
    }

    #[test]
    fn test_angles() {
        assert_eq!(degrees_to_angle(90.0), 5_400_000);
        assert_eq!(angle_to_degrees(2_700_000), 45.0);
    }

    #[test]
    fn test_pixels_and_inches() {
        assert_eq!(px_to_emu(96), EMUS_PER_INCH);
        assert_eq!(emu_to_px(EMUS_PER_INCH), 96);
        assert_eq!(inch_to_emu(10.0), 9_144_000);
        assert_eq!(cm_to_emu(1.0), 360_000);
    }

    #[test]
    fn test_master_units() {
        assert_eq!(emu_to_master_units(EMUS_PER_INCH), 576);
        assert_eq!(master_units_to_emu(576), EMUS_PER_INCH);
        assert_eq!(emu_to_master_units(1_588), 1);
    }

    #[test]
    fn test_baselines_have_opposite_signs() {
        assert!(BASELINE_SUBSCRIPT < 0);
        assert!(BASELINE_SUPERSCRIPT > 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_pixels_survive_emu(px in 0u32..1_000_000) {
                prop_assert_eq!(emu_to_px(px_to_emu(px)), px);
            }

            #[test]
            fn prop_angles_survive_degrees(angle in -21_600_000i64..21_600_000) {
                prop_assert_eq!(degrees_to_angle(angle_to_degrees(angle)), angle);
            }

            #[test]
            fn prop_master_units_lose_less_than_one_unit(emu in 0i64..1_000_000_000) {
                let back = master_units_to_emu(emu_to_master_units(emu));
                prop_assert!(back <= emu);
                prop_assert!(emu - back < 1_589);
            }
        }
    }
}
