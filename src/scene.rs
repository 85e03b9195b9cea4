//! A retained-mode drawing surface.
//!
//! The scene is the one piece of mutable state that a trace plays back
//! against. Drivers allocate every element they will ever need up front
//! (usually hidden), and from then on elements are only touched through
//! [`Edit`]s issued by actions.

use crate::geom::Point;

/// A handle to an element in a [`Scene`].
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ElementId(pub usize);

/// A vector indexed by [`ElementId`].
#[derive(Clone, PartialEq)]
pub struct ElementVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(ElementVec, ElementId, "e");

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const GREY: Color = Color::rgb(0xBB, 0xBB, 0xBB);
    pub const ORANGE: Color = Color::rgb(0xEE, 0x9B, 0x00);
    pub const CYAN: Color = Color::rgb(0x29, 0xD8, 0xDB);
    pub const GREEN: Color = Color::rgb(0x00, 0xAA, 0x00);
    pub const RED: Color = Color::rgb(0xAE, 0x20, 0x12);
    pub const BLUE: Color = Color::rgb(0x00, 0x5F, 0x73);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// The color as a CSS hex string, like `#29d8db`.
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The geometry of an element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Shape {
    Line { from: Point, to: Point },
    Circle { center: Point, radius: f64 },
    Rect { min: Point, max: Point },
    Polygon(Vec<Point>),
    Text { anchor: Point, content: String },
}

impl Shape {
    /// A loose bounding box, ignoring stroke widths and text extents.
    pub fn bounding_box(&self) -> kurbo::Rect {
        fn pts(ps: &[Point]) -> kurbo::Rect {
            ps.iter()
                .map(|p| kurbo::Rect::from_points(p.to_kurbo(), p.to_kurbo()))
                .reduce(|a, b| a.union(b))
                .unwrap_or_default()
        }
        match self {
            Shape::Line { from, to } => pts(&[*from, *to]),
            Shape::Circle { center, radius } => {
                kurbo::Rect::from_center_size(center.to_kurbo(), (2.0 * radius, 2.0 * radius))
            }
            Shape::Rect { min, max } => pts(&[*min, *max]),
            Shape::Polygon(ps) => pts(ps),
            Shape::Text { anchor, .. } => pts(&[*anchor]),
        }
    }
}

/// Something drawn on the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Element {
    pub shape: Shape,
    pub visible: bool,
    pub stroke: Color,
    pub stroke_width: f64,
    pub fill: Option<Color>,
    pub opacity: f64,
}

impl Element {
    fn new(shape: Shape) -> Self {
        Element {
            shape,
            visible: true,
            stroke: Color::BLACK,
            stroke_width: 1.0,
            fill: None,
            opacity: 1.0,
        }
    }

    pub fn line(from: Point, to: Point) -> Self {
        Self::new(Shape::Line { from, to })
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(Shape::Circle { center, radius }).with_fill(Color::BLACK)
    }

    pub fn rect(min: Point, max: Point) -> Self {
        Self::new(Shape::Rect { min, max })
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Self::new(Shape::Polygon(points))
    }

    pub fn text(anchor: Point, content: impl Into<String>) -> Self {
        Self::new(Shape::Text {
            anchor,
            content: content.into(),
        })
        .with_fill(Color::BLACK)
    }

    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke = color;
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Draws only the outline.
    pub fn without_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// The text content, for text elements.
    pub fn content(&self) -> Option<&str> {
        match &self.shape {
            Shape::Text { content, .. } => Some(content.as_str()),
            _ => None,
        }
    }
}

/// An atomic change to a single element.
///
/// Edits are plain data so that actions can be cloned, compared and
/// inspected. They are not self-inverse: undoing an edit means applying
/// another edit that restores the old value.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum Edit {
    Show,
    Hide,
    Stroke(Color),
    Fill(Option<Color>),
    StrokeWidth(f64),
    Opacity(f64),
    Shape(Shape),
    /// Replace the content of a text element.
    Text(String),
}

impl Edit {
    pub fn apply(&self, el: &mut Element) {
        match self {
            Edit::Show => el.visible = true,
            Edit::Hide => el.visible = false,
            Edit::Stroke(c) => el.stroke = *c,
            Edit::Fill(c) => el.fill = *c,
            Edit::StrokeWidth(w) => el.stroke_width = *w,
            Edit::Opacity(o) => el.opacity = *o,
            Edit::Shape(s) => el.shape = s.clone(),
            Edit::Text(t) => match &mut el.shape {
                Shape::Text { content, .. } => content.clone_from(t),
                other => tracing::warn!(?other, "ignoring a text edit on a non-text element"),
            },
        }
    }
}

/// The collection of everything drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    elements: ElementVec<Element>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element as it is.
    pub fn add(&mut self, element: Element) -> ElementId {
        self.elements.push(element)
    }

    /// Adds an element, hiding it first.
    ///
    /// This is how drivers pre-allocate the elements that actions will later
    /// reveal: an action never has to deal with an element that doesn't exist yet.
    pub fn add_hidden(&mut self, mut element: Element) -> ElementId {
        element.visible = false;
        self.elements.push(element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Applies an edit. Edits to unknown elements (from some other scene,
    /// presumably) are dropped.
    pub fn apply(&mut self, id: ElementId, edit: &Edit) {
        match self.elements.get_mut(id) {
            Some(el) => edit.apply(el),
            None => tracing::warn!(?id, "edit for an element that isn't in the scene"),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.elements.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.elements.iter().filter(|(_, el)| el.visible)
    }

    /// Throws away every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// A bounding box of all visible elements.
    pub fn bounding_box(&self) -> Option<kurbo::Rect> {
        self.visible()
            .map(|(_, el)| el.shape.bounding_box())
            .reduce(|a, b| a.union(b))
    }

    /// Draws the visible elements.
    #[cfg(feature = "debug-svg")]
    pub fn to_svg(&self) -> svg::Document {
        use svg::node::element::{path::Data, Circle, Path, Text};

        let bbox = self
            .bounding_box()
            .unwrap_or(kurbo::Rect::new(0.0, 0.0, 1.0, 1.0))
            .inflate(10.0, 10.0);
        let mut document =
            svg::Document::new().set("viewBox", (bbox.x0, bbox.y0, bbox.width(), bbox.height()));

        for (_, el) in self.visible() {
            let fill = el.fill.map(Color::to_css).unwrap_or_else(|| "none".to_owned());
            let path = |data: Data| {
                Path::new()
                    .set("d", data)
                    .set("stroke", el.stroke.to_css())
                    .set("stroke-width", el.stroke_width)
                    .set("fill", fill.clone())
                    .set("opacity", el.opacity)
            };
            document = match &el.shape {
                Shape::Line { from, to } => {
                    document.add(path(Data::new().move_to((from.x, from.y)).line_to((to.x, to.y))))
                }
                Shape::Rect { min, max } => document.add(path(
                    Data::new()
                        .move_to((min.x, min.y))
                        .line_to((max.x, min.y))
                        .line_to((max.x, max.y))
                        .line_to((min.x, max.y))
                        .close(),
                )),
                Shape::Polygon(ps) => {
                    let mut data = Data::new();
                    for (i, p) in ps.iter().enumerate() {
                        data = if i == 0 {
                            data.move_to((p.x, p.y))
                        } else {
                            data.line_to((p.x, p.y))
                        };
                    }
                    if ps.is_empty() {
                        document
                    } else {
                        document.add(path(data.close()))
                    }
                }
                Shape::Circle { center, radius } => document.add(
                    Circle::new()
                        .set("cx", center.x)
                        .set("cy", center.y)
                        .set("r", *radius)
                        .set("stroke", el.stroke.to_css())
                        .set("fill", fill.clone())
                        .set("opacity", el.opacity),
                ),
                Shape::Text { anchor, content } => document.add(
                    Text::new(content.clone())
                        .set("x", anchor.x)
                        .set("y", anchor.y)
                        .set("text-anchor", "middle")
                        .set("font-family", "Helvetica, sans-serif")
                        .set("fill", fill.clone())
                        .set("opacity", el.opacity),
                ),
            };
        }
        document
    }
}
