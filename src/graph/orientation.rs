// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Facing directions for orientation-aware agents.
//!
//! When orientation is modeled, an agent can only translate in the direction
//! it faces, and changing facing costs one step (a quarter turn). When it is
//! not modeled every pose carries [`Orientation::None`] and agents move freely
//! along any edge.

use strum_macros::{Display, EnumCount, EnumIter};

/// A facing on the grid, or `None` when orientation is not modeled.
///
/// `YPlus` points towards increasing `y` (the next map row), `XPlus` towards
/// increasing `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, EnumCount, EnumIter)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    #[strum(serialize = "NONE")]
    None,
    #[strum(serialize = "Y_PLUS")]
    YPlus,
    #[strum(serialize = "Y_MINUS")]
    YMinus,
    #[strum(serialize = "X_MINUS")]
    XMinus,
    #[strum(serialize = "X_PLUS")]
    XPlus,
}

impl Orientation {
    /// The two facings reachable by a single quarter turn.
    ///
    /// Empty for [`Orientation::None`].
    pub fn adjacent(self) -> &'static [Orientation] {
        match self {
            Orientation::YPlus | Orientation::YMinus => &[Orientation::XMinus, Orientation::XPlus],
            Orientation::XMinus | Orientation::XPlus => &[Orientation::YMinus, Orientation::YPlus],
            Orientation::None => &[],
        }
    }

    /// Unit displacement `(dx, dy)` of a forward move, or `None` when unoriented.
    pub fn step(self) -> Option<(i32, i32)> {
        match self {
            Orientation::YPlus => Some((0, 1)),
            Orientation::YMinus => Some((0, -1)),
            Orientation::XMinus => Some((-1, 0)),
            Orientation::XPlus => Some((1, 0)),
            Orientation::None => None,
        }
    }

    /// Whether this pose component is modeled at all.
    pub fn is_oriented(self) -> bool {
        self != Orientation::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn test_adjacent_are_perpendicular() {
        assert_eq!(Orientation::None.adjacent(), &[] as &[Orientation]);
        assert_eq!(
            Orientation::YPlus.adjacent(),
            &[Orientation::XMinus, Orientation::XPlus]
        );
        assert_eq!(
            Orientation::YMinus.adjacent(),
            &[Orientation::XMinus, Orientation::XPlus]
        );
        assert_eq!(
            Orientation::XMinus.adjacent(),
            &[Orientation::YMinus, Orientation::YPlus]
        );
        assert_eq!(
            Orientation::XPlus.adjacent(),
            &[Orientation::YMinus, Orientation::YPlus]
        );
    }

    #[test]
    fn test_turns_are_symmetric() {
        for o in Orientation::iter().filter(|o| o.is_oriented()) {
            for &turned in o.adjacent() {
                assert!(turned.adjacent().contains(&o), "{} <-> {}", o, turned);
            }
        }
    }

    #[test]
    fn test_step_directions() {
        assert_eq!(Orientation::None.step(), None);
        assert_eq!(Orientation::YPlus.step(), Some((0, 1)));
        assert_eq!(Orientation::XMinus.step(), Some((-1, 0)));
        assert_eq!(Orientation::COUNT, 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Orientation::None.to_string(), "NONE");
        assert_eq!(Orientation::XPlus.to_string(), "X_PLUS");
    }
}
