//! Virtual controller element enumerations.

use serde::{Deserialize, Serialize};

/// Analog axes a virtual controller can expose.
///
/// The discriminant order (X, Y, Z, RotX, RotY, RotZ) is the ordered-axis
/// layout used throughout the library, including force-feedback magnitude
/// component vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
    RotX = 3,
    RotY = 4,
    RotZ = 5,
}

/// Number of distinct virtual axes.
pub const AXIS_COUNT: usize = 6;

impl Axis {
    /// All axes in ordered-axis layout.
    pub const ALL: [Axis; AXIS_COUNT] = [
        Axis::X,
        Axis::Y,
        Axis::Z,
        Axis::RotX,
        Axis::RotY,
        Axis::RotZ,
    ];

    /// Position of this axis in the ordered-axis layout.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Axis at the given ordered-axis position, if in range.
    pub const fn from_index(index: usize) -> Option<Axis> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            3 => Some(Axis::RotX),
            4 => Some(Axis::RotY),
            5 => Some(Axis::RotZ),
            _ => None,
        }
    }
}

/// Maximum number of digital buttons a virtual controller can expose.
pub const BUTTON_COUNT_MAX: u8 = 16;

/// A virtual controller button, identified by zero-based index.
///
/// # Examples
///
/// ```
/// use openpad_types::element::Button;
///
/// let b = Button::new(3).expect("index in range");
/// assert_eq!(b.index(), 3);
/// assert!(Button::new(16).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Button(u8);

impl Button {
    /// Creates a button identifier, rejecting indices beyond
    /// [`BUTTON_COUNT_MAX`].
    pub const fn new(index: u8) -> Option<Button> {
        if index < BUTTON_COUNT_MAX {
            Some(Button(index))
        } else {
            None
        }
    }

    /// Zero-based button index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Directions a POV hat mapper can contribute to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PovDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Collapsed POV hat reading: one of eight compass points or centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompassDirection {
    #[default]
    Center,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    /// Expands a compass direction back into canonical hat components.
    pub const fn components(self) -> PovComponents {
        let (up, down, left, right) = match self {
            CompassDirection::Center => (false, false, false, false),
            CompassDirection::North => (true, false, false, false),
            CompassDirection::NorthEast => (true, false, false, true),
            CompassDirection::East => (false, false, false, true),
            CompassDirection::SouthEast => (false, true, false, true),
            CompassDirection::South => (false, true, false, false),
            CompassDirection::SouthWest => (false, true, true, false),
            CompassDirection::West => (false, false, true, false),
            CompassDirection::NorthWest => (true, false, true, false),
        };
        PovComponents {
            up,
            down,
            left,
            right,
        }
    }
}

/// Independent POV hat direction components, prior to collapsing.
///
/// Opposing components cancel: a hat reporting both up and down is treated as
/// reporting neither. [`PovComponents::canonical`] applies that cancellation,
/// after which components correspond one-to-one with compass directions.
///
/// # Examples
///
/// ```
/// use openpad_types::element::{CompassDirection, PovComponents};
///
/// let up_left = PovComponents { up: true, left: true, ..Default::default() };
/// assert_eq!(up_left.direction(), CompassDirection::NorthWest);
///
/// let conflicted = PovComponents { up: true, down: true, ..Default::default() };
/// assert_eq!(conflicted.direction(), CompassDirection::Center);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PovComponents {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PovComponents {
    /// Components with no direction pressed.
    pub const CENTER: PovComponents = PovComponents {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Marks one direction component as pressed.
    pub fn press(&mut self, direction: PovDirection) {
        match direction {
            PovDirection::Up => self.up = true,
            PovDirection::Down => self.down = true,
            PovDirection::Left => self.left = true,
            PovDirection::Right => self.right = true,
        }
    }

    /// Returns the components with opposing pairs cancelled.
    pub fn canonical(self) -> PovComponents {
        let (up, down) = if self.up && self.down {
            (false, false)
        } else {
            (self.up, self.down)
        };
        let (left, right) = if self.left && self.right {
            (false, false)
        } else {
            (self.left, self.right)
        };
        PovComponents {
            up,
            down,
            left,
            right,
        }
    }

    /// Collapses the components to a compass direction.
    pub fn direction(self) -> CompassDirection {
        let c = self.canonical();
        match (c.up, c.down, c.left, c.right) {
            (true, false, false, false) => CompassDirection::North,
            (true, false, false, true) => CompassDirection::NorthEast,
            (false, false, false, true) => CompassDirection::East,
            (false, true, false, true) => CompassDirection::SouthEast,
            (false, true, false, false) => CompassDirection::South,
            (false, true, true, false) => CompassDirection::SouthWest,
            (false, false, true, false) => CompassDirection::West,
            (true, false, true, false) => CompassDirection::NorthWest,
            _ => CompassDirection::Center,
        }
    }
}

/// Kinds of virtual controller elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Axis,
    Button,
    Pov,
}

/// Identifies a single virtual controller element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementIdentifier {
    Axis(Axis),
    Button(Button),
    Pov,
}

impl ElementIdentifier {
    /// The kind of element this identifier refers to.
    pub const fn element_type(self) -> ElementType {
        match self {
            ElementIdentifier::Axis(_) => ElementType::Axis,
            ElementIdentifier::Button(_) => ElementType::Button,
            ElementIdentifier::Pov => ElementType::Pov,
        }
    }
}
