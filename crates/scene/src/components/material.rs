/// Index into a model's texture list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Unlit surface: a color map and a base color, nothing else.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UnlitMaterial {
    pub base_color: [f32; 4],
    pub map: Option<TextureId>,
}

impl Default for UnlitMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            map: None,
        }
    }
}

impl UnlitMaterial {
    pub fn new(base_color: [f32; 4], map: Option<TextureId>) -> Self {
        Self { base_color, map }
    }
}

/// Decoded RGBA8 texture.
#[derive(Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl TextureImage {
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255, 255, 255, 255],
        }
    }
}
