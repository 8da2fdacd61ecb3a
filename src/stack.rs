//! Stack membership and corner rounding for bar segments.

use crate::model::{Orientation, StackGroups};

/// Stack id used when stacking without named groups
pub const DEFAULT_STACK_ID: &str = "stack";

/// Radius of a rounded bar corner, in pixels
pub const CORNER_RADIUS: f64 = 4.0;

/// Per-corner radii, in the order top-left, top-right, bottom-right, bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    pub const fn new(top_left: f64, top_right: f64, bottom_right: f64, bottom_left: f64) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    pub const fn uniform(radius: f64) -> Self {
        Self::new(radius, radius, radius, radius)
    }

    pub const fn square() -> Self {
        Self::uniform(0.0)
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

/// Where a segment sits inside its stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPosition {
    First,
    Middle,
    Last,
}

/// Radii for the first, middle and last segment of a stack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundingProfile {
    pub first: CornerRadii,
    pub middle: CornerRadii,
    pub last: CornerRadii,
}

impl RoundingProfile {
    /// Horizontal stacks grow left to right, vertical stacks bottom to top;
    /// only the outer ends of a stack are rounded.
    pub const fn for_orientation(orientation: Orientation) -> Self {
        let r = CORNER_RADIUS;
        match orientation {
            Orientation::Horizontal => Self {
                first: CornerRadii::new(r, 0.0, 0.0, r),
                middle: CornerRadii::square(),
                last: CornerRadii::new(0.0, r, r, 0.0),
            },
            Orientation::Vertical => Self {
                first: CornerRadii::new(0.0, 0.0, r, r),
                middle: CornerRadii::square(),
                last: CornerRadii::new(r, r, 0.0, 0.0),
            },
        }
    }

    pub fn radii(&self, position: SegmentPosition) -> CornerRadii {
        match position {
            SegmentPosition::First => self.first,
            SegmentPosition::Middle => self.middle,
            SegmentPosition::Last => self.last,
        }
    }
}

/// Stack id and rounding resolved for one value key
#[derive(Debug, Clone, PartialEq)]
pub struct BarStacking {
    pub stack_id: Option<String>,
    pub radius: CornerRadii,
}

/// Stacking policy for one bar chart
#[derive(Debug, Clone, Copy)]
pub struct StackLayout<'a> {
    stacked: bool,
    groups: Option<&'a StackGroups>,
    orientation: Orientation,
    series_count: usize,
}

impl<'a> StackLayout<'a> {
    /// `series_count` is the length of the resolved value key list
    pub fn new(
        stacked: bool,
        groups: Option<&'a StackGroups>,
        orientation: Orientation,
        series_count: usize,
    ) -> Self {
        Self {
            stacked,
            groups,
            orientation,
            series_count,
        }
    }

    /// First group, in declared order, that lists the key
    fn group_of(&self, key: &str) -> Option<(&'a str, &'a [String])> {
        self.groups?
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == key))
            .map(|(id, members)| (id.as_str(), members.as_slice()))
    }

    pub fn stack_id(&self, key: &str) -> Option<String> {
        if !self.stacked {
            return None;
        }
        match self.group_of(key) {
            Some((id, _)) => Some(id.to_string()),
            None => Some(DEFAULT_STACK_ID.to_string()),
        }
    }

    /// Position inside the stack; `None` when not stacking
    pub fn position(&self, key: &str, index: usize) -> Option<SegmentPosition> {
        if !self.stacked {
            return None;
        }

        let (index, len) = match self.group_of(key) {
            Some((_, members)) => {
                let in_group = members.iter().position(|m| m == key).unwrap_or(0);
                (in_group, members.len())
            }
            None => (index, self.series_count),
        };

        // first wins over last for one-member stacks
        Some(if index == 0 {
            SegmentPosition::First
        } else if index + 1 == len {
            SegmentPosition::Last
        } else {
            SegmentPosition::Middle
        })
    }

    pub fn radius(&self, key: &str, index: usize) -> CornerRadii {
        match self.position(key, index) {
            None => CornerRadii::uniform(CORNER_RADIUS),
            Some(position) => RoundingProfile::for_orientation(self.orientation).radii(position),
        }
    }

    pub fn resolve(&self, key: &str, index: usize) -> BarStacking {
        BarStacking {
            stack_id: self.stack_id(key),
            radius: self.radius(key, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(entries: Vec<(&str, Vec<&str>)>) -> StackGroups {
        entries
            .into_iter()
            .map(|(id, keys)| (id.to_string(), keys.into_iter().map(String::from).collect()))
            .collect()
    }

    #[test]
    fn test_unstacked_has_no_id_and_uniform_radius() {
        let layout = StackLayout::new(false, None, Orientation::Vertical, 3);
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            let s = layout.resolve(key, i);
            assert_eq!(s.stack_id, None);
            assert_eq!(s.radius, CornerRadii::uniform(4.0));
        }
    }

    #[test]
    fn test_unstacked_ignores_groups() {
        let g = groups(vec![("2019", vec!["a", "b"])]);
        let layout = StackLayout::new(false, Some(&g), Orientation::Horizontal, 2);
        assert_eq!(layout.stack_id("a"), None);
        assert_eq!(layout.radius("a", 0), CornerRadii::uniform(4.0));
    }

    #[test]
    fn test_default_stack_vertical() {
        let layout = StackLayout::new(true, None, Orientation::Vertical, 3);
        assert_eq!(layout.stack_id("consumption"), Some("stack".to_string()));
        assert_eq!(layout.radius("consumption", 0).as_array(), [0.0, 0.0, 4.0, 4.0]);
        assert_eq!(layout.radius("investment", 1).as_array(), [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(layout.radius("government", 2).as_array(), [4.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_default_stack_horizontal() {
        let layout = StackLayout::new(true, None, Orientation::Horizontal, 2);
        assert_eq!(layout.radius("a", 0).as_array(), [4.0, 0.0, 0.0, 4.0]);
        assert_eq!(layout.radius("b", 1).as_array(), [0.0, 4.0, 4.0, 0.0]);
    }

    #[test]
    fn test_single_series_stack_is_first() {
        let layout = StackLayout::new(true, None, Orientation::Vertical, 1);
        assert_eq!(layout.position("only", 0), Some(SegmentPosition::First));
    }

    #[test]
    fn test_named_groups() {
        let g = groups(vec![("2019", vec!["a", "b"]), ("2024", vec!["c", "d"])]);
        let layout = StackLayout::new(true, Some(&g), Orientation::Horizontal, 4);

        let a = layout.resolve("a", 0);
        assert_eq!(a.stack_id, Some("2019".to_string()));
        assert_eq!(a.radius.as_array(), [4.0, 0.0, 0.0, 4.0]);

        // position comes from the group, not the global index
        assert_eq!(layout.position("c", 2), Some(SegmentPosition::First));
        assert_eq!(layout.position("d", 3), Some(SegmentPosition::Last));
        assert_eq!(layout.stack_id("d"), Some("2024".to_string()));
    }

    #[test]
    fn test_group_middle_member() {
        let g = groups(vec![("2015", vec!["h", "f", "t", "o"])]);
        let layout = StackLayout::new(true, Some(&g), Orientation::Vertical, 4);
        assert_eq!(layout.position("f", 1), Some(SegmentPosition::Middle));
        assert_eq!(layout.position("t", 2), Some(SegmentPosition::Middle));
        assert_eq!(layout.radius("o", 3).as_array(), [4.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_key_outside_groups_falls_back_to_default_stack() {
        let g = groups(vec![("2019", vec!["a", "b"])]);
        let layout = StackLayout::new(true, Some(&g), Orientation::Vertical, 3);
        assert_eq!(layout.stack_id("z"), Some("stack".to_string()));
        // rounding by index in the value list
        assert_eq!(layout.position("z", 2), Some(SegmentPosition::Last));
        assert_eq!(layout.position("z", 1), Some(SegmentPosition::Middle));
    }

    #[test]
    fn test_first_listed_group_wins() {
        let g = groups(vec![("one", vec!["a"]), ("two", vec!["a", "b"])]);
        let layout = StackLayout::new(true, Some(&g), Orientation::Vertical, 2);
        assert_eq!(layout.stack_id("a"), Some("one".to_string()));
    }
}
