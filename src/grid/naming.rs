//! Output file names for tiles.

use super::planner::GridSpec;

/// Scheme for turning a tile's grid position into a file name.
///
/// Both schemes number rows and columns from 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TileNaming {
    /// `<name>-<row><col>.<ext>` with the two numbers written back to back,
    /// e.g. `photo-11.png`. Ambiguous once rows or cols pass 10: row 1 col 11
    /// and row 11 col 1 both read `111`.
    #[default]
    Concatenated,
    /// `<name>-<row>-<col>.<ext>`, zero-padded to the widest index,
    /// e.g. `photo-01-10.png`.
    Padded,
}

impl TileNaming {
    /// File name for the tile at 0-based (`row`, `col`).
    pub fn file_name(&self, base: &str, row: u32, col: u32, grid: GridSpec, ext: &str) -> String {
        let (r, c) = (row + 1, col + 1);
        match self {
            TileNaming::Concatenated => format!("{base}-{r}{c}.{ext}"),
            TileNaming::Padded => {
                let width = digits(grid.rows().max(grid.cols()));
                format!("{base}-{r:0width$}-{c:0width$}.{ext}")
            }
        }
    }
}

fn digits(mut n: u32) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
