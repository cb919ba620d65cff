use tweenery_animation::Target;

/// A drawable as far as the animations are concerned.
///
/// The numeric fields are animatable by name. The tint is a packed RGB color and is set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub x: f64,
    pub y: f64,
    /// The resting height, animations start from here.
    pub base_y: f64,
    /// The height the fighter drops to.
    pub floor_y: f64,
    pub rotation: f64,
    pub alpha: f64,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub tint: u32,
}

impl Sprite {
    pub const FIELDS: [&'static str; 9] = [
        "x", "y", "base_y", "floor_y", "rotation", "alpha", "scale", "width", "height",
    ];

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            base_y: 0.0,
            floor_y: 0.0,
            rotation: 0.0,
            alpha: 1.0,
            scale: 1.0,
            width,
            height,
            tint: 0xffffff,
        }
    }

    /// Place the sprite, making `y` its resting height.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self.base_y = y;
        self.floor_y = y;
        self
    }

    pub fn with_floor(mut self, floor_y: f64) -> Self {
        self.floor_y = floor_y;
        self
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut f64> {
        Some(match name {
            "x" => &mut self.x,
            "y" => &mut self.y,
            "base_y" => &mut self.base_y,
            "floor_y" => &mut self.floor_y,
            "rotation" => &mut self.rotation,
            "alpha" => &mut self.alpha,
            "scale" => &mut self.scale,
            "width" => &mut self.width,
            "height" => &mut self.height,
            _ => return None,
        })
    }
}

impl Target for Sprite {
    fn field(&self, name: &str) -> Option<f64> {
        Some(match name {
            "x" => self.x,
            "y" => self.y,
            "base_y" => self.base_y,
            "floor_y" => self.floor_y,
            "rotation" => self.rotation,
            "alpha" => self.alpha,
            "scale" => self.scale,
            "width" => self.width,
            "height" => self.height,
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, value: f64) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                *field = value;
                true
            }
            None => false,
        }
    }
}
