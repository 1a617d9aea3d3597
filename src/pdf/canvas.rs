use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

use super::font::{Face, encode};
use super::layout::PAGE_HEIGHT;

/// Content-stream builder for one page.
///
/// Takes top-left based coordinates and tracks the current font and fill
/// colour so repeated settings are not re-emitted.
pub struct Canvas {
    content: Content,
    font: Option<(Face, f32)>,
    fill: Option<u32>,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            content: Content { operations: vec![] },
            font: None,
            fill: None,
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_fill(&mut self, color: u32) {
        if self.fill != Some(color) {
            self.op("rg", rgb(color));
            self.fill = Some(color);
        }
    }

    fn set_font(&mut self, face: Face, size: f32) {
        if self.font != Some((face, size)) {
            self.op(
                "Tf",
                vec![Object::Name(face.resource_name().as_bytes().to_vec()), size.into()],
            );
            self.font = Some((face, size));
        }
    }

    pub fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: u32) {
        self.set_fill(color);
        let y = PAGE_HEIGHT - top - height;
        self.op("re", vec![x.into(), y.into(), width.into(), height.into()]);
        self.op("f", vec![]);
    }

    pub fn stroke_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: u32, line: f32) {
        let y = PAGE_HEIGHT - top - height;
        self.op("w", vec![line.into()]);
        self.op("RG", rgb(color));
        self.op("re", vec![x.into(), y.into(), width.into(), height.into()]);
        self.op("S", vec![]);
    }

    /// Draw one line of text with its baseline `baseline` points below the page top.
    pub fn text(&mut self, x: f32, baseline: f32, face: Face, size: f32, color: u32, text: &str) {
        if text.is_empty() {
            return;
        }
        self.op("BT", vec![]);
        self.set_font(face, size);
        self.set_fill(color);
        self.op("Td", vec![x.into(), (PAGE_HEIGHT - baseline).into()]);
        self.op("Tj", vec![Object::String(encode(text), StringFormat::Literal)]);
        self.op("ET", vec![]);
    }

    /// Paint an image XObject into a box.
    pub fn image(&mut self, name: &str, x: f32, top: f32, width: f32, height: f32) {
        let y = PAGE_HEIGHT - top - height;
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                y.into(),
            ],
        );
        self.op("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.op("Q", vec![]);
    }

    pub fn finish(self) -> Content {
        self.content
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

fn rgb(color: u32) -> Vec<Object> {
    [16, 8, 0]
        .into_iter()
        .map(|shift| (((color >> shift) & 0xFF) as f32 / 255.0).into())
        .collect()
}
