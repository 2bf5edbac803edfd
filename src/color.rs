// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assign stable per-tag colors: fixed palette by frequency position, muted random colors for the rest
// role: core/color
// inputs: Tag names (bulk, in server frequency order, or one at a time); an injected rand::Rng
// outputs: TagColor values and the session's ordered tag -> color table
// invariants:
// - a recorded color is returned unchanged on every later lookup
// - a bulk pass only replaces a recorded color with a palette color, never with a random one
// - generated hex colors are always #RRGGBB, upper-case
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb {
  pub const fn new(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b }
  }

  pub fn to_hex(&self) -> String {
    format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
  }

  pub fn rgba(&self, alpha: f32) -> String {
    format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
  }
}

/// Fill and stroke for one tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagColor {
  pub background: String,
  pub border: String,
}

impl TagColor {
  fn solid(color: String) -> Self {
    Self { background: color.clone(), border: color }
  }
}

struct PaletteEntry {
  fill: Rgb,
  stroke: Rgb,
}

const PALETTE: [PaletteEntry; 12] = [
  PaletteEntry { fill: Rgb::new(70, 86, 89), stroke: Rgb::new(70, 86, 89) },
  PaletteEntry { fill: Rgb::new(124, 162, 166), stroke: Rgb::new(124, 162, 166) },
  PaletteEntry { fill: Rgb::new(23, 38, 38), stroke: Rgb::new(23, 38, 38) },
  PaletteEntry { fill: Rgb::new(217, 137, 67), stroke: Rgb::new(217, 137, 67) },
  PaletteEntry { fill: Rgb::new(217, 167, 139), stroke: Rgb::new(217, 167, 139) },
  PaletteEntry { fill: Rgb::new(89, 105, 109), stroke: Rgb::new(89, 105, 109) },
  PaletteEntry { fill: Rgb::new(140, 208, 182), stroke: Rgb::new(140, 208, 182) },
  PaletteEntry { fill: Rgb::new(80, 60, 60), stroke: Rgb::new(80, 60, 60) },
  PaletteEntry { fill: Rgb::new(247, 167, 87), stroke: Rgb::new(247, 187, 87) },
  PaletteEntry { fill: Rgb::new(237, 187, 159), stroke: Rgb::new(237, 187, 159) },
  PaletteEntry { fill: Rgb::new(204, 92, 47), stroke: Rgb::new(204, 92, 47) },
  PaletteEntry { fill: Rgb::new(204, 204, 204), stroke: Rgb::new(204, 204, 204) },
];

pub const PALETTE_LEN: usize = PALETTE.len();

const FILL_ALPHA: f32 = 0.8;

/// Palette color for a 0-based position, if the palette reaches that far.
pub fn palette_color(position: usize) -> Option<TagColor> {
  PALETTE.get(position).map(|p| TagColor {
    background: p.fill.rgba(FILL_ALPHA),
    border: p.stroke.rgba(1.0),
  })
}

/// Base RGB of a palette slot; used for the fixed single-series charts.
pub fn palette_rgb(position: usize) -> Rgb {
  PALETTE[position % PALETTE_LEN].fill
}

/// Sector-based HSV to RGB; each component in `[0, 1)`, channels floored to 0..=255.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
  let i = (h * 6.0).floor();
  let f = h * 6.0 - i;
  let p = v * (1.0 - s);
  let q = v * (1.0 - f * s);
  let t = v * (1.0 - (1.0 - f) * s);

  let (r, g, b) = match (i as i64).rem_euclid(6) {
    0 => (v, t, p),
    1 => (q, v, p),
    2 => (p, v, t),
    3 => (p, q, v),
    4 => (t, p, v),
    _ => (v, p, q),
  };

  Rgb::new(channel(r), channel(g), channel(b))
}

fn channel(c: f64) -> u8 {
  (c * 255.0).floor().clamp(0.0, 255.0) as u8
}

/// A muted, medium-bright color: saturation in [0.1, 0.3), value in [0.5, 0.7).
pub fn muted_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb {
  let h: f64 = rng.gen();
  let s = rng.gen_range(0.1..0.3);
  let v = rng.gen_range(0.5..0.7);

  hsv_to_rgb(h, s, v)
}

/// Session-scoped tag color table.
pub struct ColorAssigner<R = StdRng> {
  table: IndexMap<String, TagColor>,
  rng: R,
}

impl ColorAssigner<StdRng> {
  pub fn from_entropy() -> Self {
    Self::with_rng(StdRng::from_entropy())
  }

  pub fn seeded(seed: u64) -> Self {
    Self::with_rng(StdRng::seed_from_u64(seed))
  }
}

impl<R: Rng> ColorAssigner<R> {
  pub fn with_rng(rng: R) -> Self {
    Self { table: IndexMap::new(), rng }
  }

  /// Bulk pass in frequency order: position `i` takes palette slot `i`;
  /// tags past the palette keep an existing color or get a generated one.
  pub fn assign_in_order<I, S>(&mut self, tags: I) -> IndexMap<String, TagColor>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut assigned = IndexMap::new();

    for (position, tag) in tags.into_iter().enumerate() {
      let tag = tag.as_ref();
      let color = match palette_color(position) {
        Some(fixed) => {
          self.table.insert(tag.to_string(), fixed.clone());
          fixed
        }
        None => self.color_for(tag),
      };

      assigned.insert(tag.to_string(), color);
    }

    tracing::debug!(count = assigned.len(), "assigned tag colors by position");
    assigned
  }

  /// Recorded color for `tag`, generating and recording one on first sight.
  pub fn color_for(&mut self, tag: &str) -> TagColor {
    if let Some(existing) = self.table.get(tag) {
      return existing.clone();
    }

    let color = TagColor::solid(muted_color(&mut self.rng).to_hex());
    self.table.insert(tag.to_string(), color.clone());

    color
  }

  pub fn table(&self) -> &IndexMap<String, TagColor> {
    &self.table
  }
}
