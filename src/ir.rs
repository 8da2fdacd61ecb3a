use indexmap::IndexMap;

use crate::model::Orientation;
use crate::stack::CornerRadii;

// =============================================================================
// Phase 1: Resolution
// =============================================================================

/// Which fields play which role, derived from the spec and the first row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedKeys {
    pub category: String,
    pub values: Vec<String>,
    pub all_keys: Vec<String>,
}

/// key → CSS color string
pub type ColorMap = IndexMap<String, String>;

/// key → display label
pub type LabelMap = IndexMap<String, String>;

/// Everything the dispatcher needs besides the raw spec
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChart {
    pub keys: ResolvedKeys,
    pub colors: ColorMap,
    pub labels: LabelMap,
}

// =============================================================================
// Phase 2: Scene
// =============================================================================

/// A compiled chart. Colors are still CSS strings; the canvas resolves them
/// against the active theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub title: String,
    pub description: Option<String>,
    /// Empty when the legend is disabled
    pub legend: Vec<LegendEntry>,
    pub body: ChartBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub key: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Bar(BarScene),
    Line(CartesianScene),
    Area(CartesianScene),
    /// Pie and donut charts (donut has a non-zero inner radius)
    Pie(PieScene),
    Radial(RadialScene),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarScene {
    pub orientation: Orientation,
    pub categories: Vec<String>,
    pub value_domain: (f64, f64),
    /// Number of side-by-side slots per category (one per stack or unstacked series)
    pub slot_count: usize,
    pub segments: Vec<BarSegment>,
}

/// One rectangle: a single series at a single category
#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub key: String,
    pub category_index: usize,
    pub slot: usize,
    /// Value-axis extent; `start` is the stack base
    pub start: f64,
    pub end: f64,
    pub color: String,
    pub radius: CornerRadii,
    pub stack_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartesianScene {
    pub categories: Vec<String>,
    pub value_domain: (f64, f64),
    pub series: Vec<SeriesPath>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPath {
    pub key: String,
    pub color: String,
    /// One entry per category; `None` leaves a gap
    pub points: Vec<Option<f64>>,
    /// Area fill opacity (areas only)
    pub fill_opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieScene {
    pub slices: Vec<Slice>,
    /// Inner radius as a fraction of the outer radius (0 for a full pie)
    pub inner_radius_ratio: f64,
    pub total: Option<TotalLabel>,
}

/// Angles are in degrees, counter-clockwise from three o'clock
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub name: String,
    pub value: f64,
    pub color: String,
    pub start_angle: f64,
    pub end_angle: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalLabel {
    pub value: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialScene {
    pub bars: Vec<RadialBar>,
    pub max_value: f64,
}

/// Ring 0 is the innermost
#[derive(Debug, Clone, PartialEq)]
pub struct RadialBar {
    pub name: String,
    pub value: f64,
    pub color: String,
    pub ring: usize,
}
