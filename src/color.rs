use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::data::model::Attrition;

// ---------------------------------------------------------------------------
// Outcome series colours
// ---------------------------------------------------------------------------

/// Leavers: warm red.
pub const ATTRITION_YES: Color32 = Color32::from_rgb(226, 54, 54);
/// Stayers: the complementary teal.
pub const ATTRITION_NO: Color32 = Color32::from_rgb(54, 226, 226);

/// Series colour of an outcome.
pub fn outcome_color(outcome: Attrition) -> Color32 {
    match outcome {
        Attrition::Yes => ATTRITION_YES,
        Attrition::No => ATTRITION_NO,
    }
}

// ---------------------------------------------------------------------------
// Diverging map for correlations
// ---------------------------------------------------------------------------

const COOL: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

/// Colour for an undefined correlation.
pub const UNDEFINED: Color32 = Color32::DARK_GRAY;

fn linear(rgb: (u8, u8, u8)) -> LinSrgb {
    Srgb::new(rgb.0, rgb.1, rgb.2).into_format::<f32>().into_linear()
}

/// Blue → grey → red for `value` in `[-1, 1]` (clamped).
pub fn coolwarm(value: f64) -> Color32 {
    let t = value.clamp(-1.0, 1.0) as f32;
    let mixed = if t < 0.0 {
        linear(NEUTRAL).mix(linear(COOL), -t)
    } else {
        linear(NEUTRAL).mix(linear(WARM), t)
    };
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Black or white, whichever reads better on `background`.
pub fn text_on(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(c: Color32, rgb: (u8, u8, u8)) -> bool {
        c.r().abs_diff(rgb.0) <= 1 && c.g().abs_diff(rgb.1) <= 1 && c.b().abs_diff(rgb.2) <= 1
    }

    #[test]
    fn coolwarm_endpoints_and_clamping() {
        assert!(close(coolwarm(-1.0), COOL));
        assert!(close(coolwarm(0.0), NEUTRAL));
        assert!(close(coolwarm(1.0), WARM));
        assert_eq!(coolwarm(7.0), coolwarm(1.0));
    }

    #[test]
    fn outcomes_get_distinct_colours() {
        assert_ne!(outcome_color(Attrition::Yes), outcome_color(Attrition::No));
        assert_eq!(outcome_color(Attrition::Yes), ATTRITION_YES);
    }

    #[test]
    fn annotation_contrast() {
        assert_eq!(text_on(Color32::WHITE), Color32::BLACK);
        assert_eq!(text_on(coolwarm(-1.0)), Color32::WHITE);
    }
}
