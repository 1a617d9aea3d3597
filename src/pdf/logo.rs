use lopdf::{Document, ObjectId, Stream, dictionary};

use crate::core::SaldoError;

/// A decoded logo ready to embed as an image XObject.
#[derive(Debug, Clone)]
pub struct Logo {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    /// Soft mask; `None` when every pixel is opaque.
    alpha: Option<Vec<u8>>,
}

impl Logo {
    /// Decode PNG, JPEG or GIF bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, SaldoError> {
        let image = image::load_from_memory(bytes).map_err(|e| SaldoError::Logo(e.to_string()))?;
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(SaldoError::Logo("image has no pixels".into()));
        }

        let has_alpha = image.color().has_alpha();
        let rgba = image.to_rgba8();
        let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(rgba.len() / 4);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }
        let alpha = (has_alpha && alpha.iter().any(|&a| a != u8::MAX)).then_some(alpha);

        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn has_mask(&self) -> bool {
        self.alpha.is_some()
    }

    /// Size in points when scaled into a `side` × `side` box, keeping the aspect ratio.
    pub fn fit(&self, side: f32) -> (f32, f32) {
        let scale = side / self.width.max(self.height) as f32;
        (self.width as f32 * scale, self.height as f32 * scale)
    }

    /// Add the image (and its soft mask) to the document.
    pub fn embed(&self, doc: &mut Document) -> ObjectId {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        if let Some(alpha) = &self.alpha {
            let mask = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => self.width as i64,
                    "Height" => self.height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha.clone(),
            );
            dict.set("SMask", doc.add_object(mask));
        }
        doc.add_object(Stream::new(dict, self.rgb.clone()))
    }
}
