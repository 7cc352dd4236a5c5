//! Light and dark palettes for the graph canvas.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Build a color from hue (degrees), saturation and lightness (percent).
	pub fn hsl(h: f64, s: f64, l: f64) -> Self {
		let (s, l) = (s / 100.0, l / 100.0);
		let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
		let hp = h.rem_euclid(360.0) / 60.0;
		let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
		let (r, g, b) = match hp as u32 {
			0 => (c, x, 0.0),
			1 => (x, c, 0.0),
			2 => (0.0, c, x),
			3 => (0.0, x, c),
			4 => (x, 0.0, c),
			_ => (c, 0.0, x),
		};
		let m = l - c / 2.0;
		let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
		Self::rgb(channel(r), channel(g), channel(b))
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors used by the visual policy and the canvas painter.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphTheme {
	/// Nearby or fully read articles.
	pub accent: Color,
	/// Everything else.
	pub neutral: Color,
	pub background: Color,
	/// Outline drawn around the current article and the hovered node.
	pub ring: Color,
}

impl GraphTheme {
	pub fn light() -> Self {
		Self {
			accent: Color::hsl(51.0, 80.0, 64.0),
			neutral: Color::rgb(0xe7, 0xe5, 0xe4),
			background: Color::rgb(0xfa, 0xfa, 0xf9),
			ring: Color::rgb(0x78, 0x71, 0x6c),
		}
	}

	pub fn dark() -> Self {
		Self {
			accent: Color::hsl(51.0, 80.0, 43.0),
			neutral: Color::rgb(0x57, 0x53, 0x4e),
			background: Color::rgb(0x26, 0x26, 0x26),
			ring: Color::rgb(0xe8, 0xe6, 0xe3),
		}
	}

	pub fn for_mode(dark_mode: bool) -> Self {
		if dark_mode { Self::dark() } else { Self::light() }
	}
}
