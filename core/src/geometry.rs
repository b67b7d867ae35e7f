//! Integer tile-grid geometry.
//!
//! The grid grows eastwards along `x` and northwards along `y`. Distances are
//! measured with the Chebyshev metric and ignore the level, which callers must
//! keep consistent themselves.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{COMPLEMENT_OFFSET, COMPLEMENT_PERIOD};

/// Single map tile identified by its coordinates and vertical level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    x: i32,
    y: i32,
    #[serde(default)]
    level: u8,
}

impl Tile {
    /// Creates a new tile.
    #[must_use]
    pub const fn new(x: i32, y: i32, level: u8) -> Self {
        Self { x, y, level }
    }

    /// East-west coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// North-south coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Vertical map layer.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Largest per-axis distance between two tiles. Levels are ignored.
    #[must_use]
    pub fn chebyshev_distance(self, other: Tile) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Mirror of the tile in the parallel realm sharing its horizontal coordinates.
    #[must_use]
    pub fn complement(self) -> Tile {
        let mirrored = (i64::from(self.y) + i64::from(COMPLEMENT_OFFSET))
            .rem_euclid(i64::from(COMPLEMENT_PERIOD));
        // rem_euclid keeps the value inside [0, COMPLEMENT_PERIOD).
        let y = i32::try_from(mirrored).unwrap_or(0);
        Tile::new(self.x, y, self.level)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.level)
    }
}

/// Reasons a rectangle cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The top-left corner lies east or south of the bottom-right corner.
    #[error("rectangle corners are inverted: top-left {top_left} must be north-west of bottom-right {bottom_right}")]
    Inverted {
        /// Corner supplied as the north-west bound.
        top_left: Tile,
        /// Corner supplied as the south-east bound.
        bottom_right: Tile,
    },
    /// The corners lie on different levels.
    #[error("rectangle spans levels {top_left} and {bottom_right}")]
    CrossLevel {
        /// Level of the north-west corner.
        top_left: u8,
        /// Level of the south-east corner.
        bottom_right: u8,
    },
}

/// Axis-aligned tile rectangle with inclusive bounds on a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RectRepr", into = "RectRepr")]
pub struct Rect {
    top_left: Tile,
    bottom_right: Tile,
}

impl Rect {
    /// Creates a rectangle from its north-west and south-east corners.
    pub fn new(top_left: Tile, bottom_right: Tile) -> Result<Self, GeometryError> {
        if top_left.level != bottom_right.level {
            return Err(GeometryError::CrossLevel {
                top_left: top_left.level,
                bottom_right: bottom_right.level,
            });
        }

        if top_left.x > bottom_right.x || top_left.y < bottom_right.y {
            return Err(GeometryError::Inverted {
                top_left,
                bottom_right,
            });
        }

        Ok(Self {
            top_left,
            bottom_right,
        })
    }

    /// Degenerate rectangle covering exactly one tile.
    #[must_use]
    pub const fn from_tile(tile: Tile) -> Self {
        Self {
            top_left: tile,
            bottom_right: tile,
        }
    }

    /// The 3x3 area around a dig spot in which digging uncovers it.
    #[must_use]
    pub fn dig_area(spot: Tile) -> Self {
        Self {
            top_left: Tile::new(spot.x.saturating_sub(1), spot.y.saturating_add(1), spot.level),
            bottom_right: Tile::new(spot.x.saturating_add(1), spot.y.saturating_sub(1), spot.level),
        }
    }

    /// North-west corner.
    #[must_use]
    pub const fn top_left(&self) -> Tile {
        self.top_left
    }

    /// South-east corner.
    #[must_use]
    pub const fn bottom_right(&self) -> Tile {
        self.bottom_right
    }

    /// Level shared by every tile of the rectangle.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.top_left.level
    }

    /// Reports whether the rectangle covers a single tile.
    #[must_use]
    pub fn is_single_tile(&self) -> bool {
        self.top_left == self.bottom_right
    }

    /// All four corners, clockwise from the north-west.
    #[must_use]
    pub fn corners(&self) -> [Tile; 4] {
        let level = self.level();
        [
            self.top_left,
            Tile::new(self.bottom_right.x, self.top_left.y, level),
            self.bottom_right,
            Tile::new(self.top_left.x, self.bottom_right.y, level),
        ]
    }

    /// Reports whether the tile lies within the rectangle, level included.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        tile.level == self.level()
            && (self.top_left.x..=self.bottom_right.x).contains(&tile.x)
            && (self.bottom_right.y..=self.top_left.y).contains(&tile.y)
    }

    /// Tile of the rectangle closest to `tile`, taking the rectangle's level.
    #[must_use]
    pub fn clamp(&self, tile: Tile) -> Tile {
        Tile::new(
            tile.x.clamp(self.top_left.x, self.bottom_right.x),
            tile.y.clamp(self.bottom_right.y, self.top_left.y),
            self.level(),
        )
    }

    /// Corner of the rectangle farthest from `tile`.
    #[must_use]
    pub fn farthest_corner(&self, tile: Tile) -> Tile {
        let x = if tile.x.abs_diff(self.top_left.x) >= tile.x.abs_diff(self.bottom_right.x) {
            self.top_left.x
        } else {
            self.bottom_right.x
        };
        let y = if tile.y.abs_diff(self.top_left.y) >= tile.y.abs_diff(self.bottom_right.y) {
            self.top_left.y
        } else {
            self.bottom_right.y
        };
        Tile::new(x, y, self.level())
    }

    /// Iterator over every tile of the rectangle in row-major order from the north-west.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let level = self.level();
        let (west, east) = (self.top_left.x, self.bottom_right.x);
        (self.bottom_right.y..=self.top_left.y)
            .rev()
            .flat_map(move |y| (west..=east).map(move |x| Tile::new(x, y, level)))
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RectRepr {
    top_left: Tile,
    bottom_right: Tile,
}

impl TryFrom<RectRepr> for Rect {
    type Error = GeometryError;

    fn try_from(repr: RectRepr) -> Result<Self, Self::Error> {
        Self::new(repr.top_left, repr.bottom_right)
    }
}

impl From<Rect> for RectRepr {
    fn from(rect: Rect) -> Self {
        Self {
            top_left: rect.top_left,
            bottom_right: rect.bottom_right,
        }
    }
}
