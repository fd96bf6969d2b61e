use crate::classification::ClassificationTable;
use crate::colors::{DEFAULT_GRAY, color_of};
use crate::geo::StateFeature;

pub const BORDER_COLOR: &str = "#666666";
pub const DASH_PATTERN: &str = "3";

const WEIGHT_DEFAULT: u8 = 1;
const WEIGHT_EMPHASIZED: u8 = 3;
const OPACITY_DEFAULT: f64 = 0.6;
const OPACITY_HOVERED: f64 = 0.8;
const OPACITY_SELECTED: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderDash {
    None,
    Dashed,
}

impl BorderDash {
    /// Value for the SVG `stroke-dasharray` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            BorderDash::None => "none",
            BorderDash::Dashed => DASH_PATTERN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStyle {
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub border_color: &'static str,
    pub border_weight: u8,
    pub border_dash: BorderDash,
}

impl FeatureStyle {
    /// Applied to features that cannot be identified.
    pub const NEUTRAL: FeatureStyle = FeatureStyle {
        fill_color: DEFAULT_GRAY,
        fill_opacity: OPACITY_DEFAULT,
        border_color: BORDER_COLOR,
        border_weight: WEIGHT_DEFAULT,
        border_dash: BorderDash::Dashed,
    };
}

/// Style of one feature given the current selection and hover. Depends on
/// nothing but its arguments.
pub fn style_of(
    feature: Option<&StateFeature>,
    selected: Option<&str>,
    hovered: Option<&str>,
    table: &ClassificationTable,
) -> FeatureStyle {
    match feature.and_then(StateFeature::name) {
        Some(name) => style_for_name(name, selected, hovered, table),
        None => FeatureStyle::NEUTRAL,
    }
}

/// [`style_of`] for callers that already hold the feature's name.
pub fn style_for_name(
    name: &str,
    selected: Option<&str>,
    hovered: Option<&str>,
    table: &ClassificationTable,
) -> FeatureStyle {
    let is_selected = selected == Some(name);
    let is_hovered = hovered == Some(name);

    FeatureStyle {
        fill_color: color_of(table.category_of(name)),
        fill_opacity: if is_selected {
            OPACITY_SELECTED
        } else if is_hovered {
            OPACITY_HOVERED
        } else {
            OPACITY_DEFAULT
        },
        border_color: BORDER_COLOR,
        border_weight: if is_selected || is_hovered {
            WEIGHT_EMPHASIZED
        } else {
            WEIGHT_DEFAULT
        },
        border_dash: if is_selected {
            BorderDash::None
        } else {
            BorderDash::Dashed
        },
    }
}
