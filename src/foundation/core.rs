use crate::foundation::error::{SpriteError, SpriteResult};

/// Average on-screen character height of the target engine, in pixels.
pub const TARGET_AVG_HEIGHT: f64 = 30.0;

/// Straight-alpha RGBA8 still image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SpriteResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpriteError::validation("frame width/height must be >= 1"));
        }
        let frame = Self {
            width,
            height,
            data,
        };
        if !frame.is_well_formed() {
            return Err(SpriteError::validation(format!(
                "frame data has {} bytes, expected {}x{}x4",
                frame.data.len(),
                width,
                height
            )));
        }
        Ok(frame)
    }

    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> Self {
        Self {
            width,
            height,
            data: px.repeat((width as usize) * (height as usize)),
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// True when `data` holds exactly one RGBA tuple per pixel.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0 && self.height > 0 && self.data.len() == self.pixel_count() * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    pub fn to_rgba_image(&self) -> SpriteResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            SpriteError::validation("frame data does not match width*height*4")
        })
    }

    pub fn into_rgba_image(self) -> SpriteResult<image::RgbaImage> {
        let (w, h) = (self.width, self.height);
        image::RgbaImage::from_raw(w, h, self.data)
            .ok_or_else(|| SpriteError::validation("frame data does not match width*height*4"))
    }
}

/// Exact RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_components(components: &[i64]) -> SpriteResult<Self> {
        let [r, g, b] = components else {
            return Err(SpriteError::validation(format!(
                "{} color values given, 3 needed (got {:?})",
                components.len(),
                components
            )));
        };
        fn channel(v: i64) -> SpriteResult<u8> {
            u8::try_from(v).map_err(|_| {
                SpriteError::validation(format!("color value {v} must be between 0 and 255"))
            })
        }
        Ok(Self::new(channel(*r)?, channel(*g)?, channel(*b)?))
    }

    pub fn matches(self, px: &[u8]) -> bool {
        px.len() >= 3 && px[0] == self.r && px[1] == self.g && px[2] == self.b
    }
}

impl std::str::FromStr for Rgb {
    type Err = SpriteError;

    /// Parses three whitespace-separated integers, e.g. `"64 64 64"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i64>().map_err(|_| {
                    SpriteError::validation(format!("color value '{tok}' is not an integer"))
                })
            })
            .collect::<SpriteResult<Vec<_>>>()?;
        Self::from_components(&components)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

/// Uniform resize ratio, always positive and finite.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(v: f64) -> SpriteResult<Self> {
        if !v.is_finite() || v <= 0.0 {
            return Err(SpriteError::validation("scale factor must be > 0"));
        }
        Ok(Self(v))
    }

    /// Ratio mapping `avg_char_height` source pixels onto [`TARGET_AVG_HEIGHT`].
    pub fn for_avg_height(avg_char_height: u32) -> SpriteResult<Self> {
        if avg_char_height == 0 {
            return Err(SpriteError::validation("avg_char_height must be > 0"));
        }
        Self::new(TARGET_AVG_HEIGHT / f64::from(avg_char_height))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn inverse(self) -> Self {
        Self(1.0 / self.0)
    }
}
