use serde::Serialize;

use crate::model::ConditionCategory;

/// Presentation state for a condition: page background, optional overlay
/// animation and the icon drawn over the current conditions card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeState {
    pub background_id: &'static str,
    pub background_gradient: &'static str,
    pub animation_id: Option<&'static str>,
    pub icon_overlay_id: &'static str,
}

const RAIN: Option<&str> = Some("rain");
const SNOW: Option<&str> = Some("snow");

/// Look up the theme for a condition category.
pub fn theme_for(category: ConditionCategory) -> ThemeState {
    let (background_id, background_gradient, animation_id, icon_overlay_id) = match category {
        ConditionCategory::Clear => (
            "clear",
            "linear-gradient(135deg, #f7971e 0%, #ffd200 100%)",
            None,
            "sun",
        ),
        ConditionCategory::Clouds => (
            "clouds",
            "linear-gradient(135deg, #606c88 0%, #3f4c6b 100%)",
            None,
            "cloud",
        ),
        ConditionCategory::Rain => (
            "rain",
            "linear-gradient(135deg, #4b79a1 0%, #283e51 100%)",
            RAIN,
            "cloud-rain",
        ),
        ConditionCategory::Drizzle => (
            "drizzle",
            "linear-gradient(135deg, #5f9ea0 0%, #2f4f4f 100%)",
            RAIN,
            "cloud-drizzle",
        ),
        ConditionCategory::Thunderstorm => (
            "thunderstorm",
            "linear-gradient(135deg, #2c3e50 0%, #4ca1af 100%)",
            RAIN,
            "cloud-lightning",
        ),
        ConditionCategory::Snow => (
            "snow",
            "linear-gradient(135deg, #83a4d4 0%, #b6fbff 100%)",
            SNOW,
            "snowflake",
        ),
        ConditionCategory::Mist => (
            "mist",
            "linear-gradient(135deg, #bdc3c7 0%, #2c3e50 100%)",
            None,
            "cloud-fog",
        ),
        ConditionCategory::Other => (
            "other",
            "linear-gradient(135deg, #D7D2CC 0%, #304352 100%)",
            None,
            "cloud-sun",
        ),
    };

    ThemeState {
        background_id,
        background_gradient,
        animation_id,
        icon_overlay_id,
    }
}
