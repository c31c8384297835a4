//! Cell layout and colors
//!
//! Every entity is drawn as padded unit squares on the grid, scaled to pixels.

use crate::sim::{FruitSkin, Point, SnakeSkin};

/// Pixel rectangle for one grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle for `cell`, inset by `padding` cells on the top-left edge
pub fn cell_rect(cell: Point, scale: f64, padding: f64) -> CellRect {
    let inset = padding * scale;
    CellRect {
        x: cell.x as f64 * scale + inset,
        y: cell.y as f64 * scale + inset,
        width: scale - inset,
        height: scale - inset,
    }
}

/// CSS colors for each skin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub head: &'static str,
    pub body: &'static str,
    pub fruit: &'static str,
}

impl Palette {
    pub fn for_skins(snake: SnakeSkin, fruit: FruitSkin) -> Self {
        let (head, body) = match snake {
            SnakeSkin::Classic => ("blue", "lightblue"),
            SnakeSkin::Neon => ("#39ff14", "#b3ffa1"),
        };
        let fruit = match fruit {
            FruitSkin::Plain => "red",
            FruitSkin::Golden => "gold",
            FruitSkin::Neon => "#ff2bd6",
        };
        Self { head, body, fruit }
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;

    #[test]
    fn test_cell_rect_scaling() {
        let rect = cell_rect(IVec2::new(3, 2), 20.0, 0.1);
        assert!((rect.x - 62.0).abs() < 1e-9);
        assert!((rect.y - 42.0).abs() < 1e-9);
        assert!((rect.width - 18.0).abs() < 1e-9);
        assert_eq!(rect.width, rect.height);
    }

    #[test]
    fn test_cells_do_not_overlap() {
        let a = cell_rect(IVec2::new(0, 0), 20.0, 0.1);
        let b = cell_rect(IVec2::new(1, 0), 20.0, 0.1);
        assert!(a.x + a.width <= b.x);
    }

    #[test]
    fn test_classic_palette() {
        let palette = Palette::for_skins(SnakeSkin::Classic, FruitSkin::Plain);
        assert_eq!(palette.head, "blue");
        assert_eq!(palette.body, "lightblue");
        assert_eq!(palette.fruit, "red");
        assert_ne!(
            Palette::for_skins(SnakeSkin::Classic, FruitSkin::Golden).fruit,
            palette.fruit
        );
    }
}
