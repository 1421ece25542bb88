use serde::{Deserialize, Serialize};

/// Shapes the task can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Square,
    Circle,
    Triangle,
    Star,
    Diamond,
    Rectangle,
    Hexagon,
    Pentagon,
}

impl Shape {
    pub const ALL: [Shape; 8] = [
        Shape::Square,
        Shape::Circle,
        Shape::Triangle,
        Shape::Star,
        Shape::Diamond,
        Shape::Rectangle,
        Shape::Hexagon,
        Shape::Pentagon,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
            Shape::Star => "star",
            Shape::Diamond => "diamond",
            Shape::Rectangle => "rectangle",
            Shape::Hexagon => "hexagon",
            Shape::Pentagon => "pentagon",
        }
    }
}

/// Fill colors the task can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Pink,
    Orange,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Pink,
        Color::Orange,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Pink => "pink",
            Color::Orange => "orange",
        }
    }
}

/// One shape/color combination shown on screen. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusSpec {
    pub shape: Shape,
    pub color: Color,
}

impl StimulusSpec {
    pub const fn new(shape: Shape, color: Color) -> Self {
        Self { shape, color }
    }

    /// The canonical CPT target: a red square.
    pub const fn red_square() -> Self {
        Self::new(Shape::Square, Color::Red)
    }
}

impl std::fmt::Display for StimulusSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color.label(), self.shape.label())
    }
}
