use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Sheet geometry the game slices these images with.
const TILE: u32 = 16;
const TILESET_COLUMNS: u32 = 16;
const TILESET_ROWS: u32 = 8;
const HERO_COLUMNS: u32 = 8;
const HERO_ROWS: u32 = 4;
const ENEMY_FRAME: u32 = 50;
const ENEMY_FRAMES: u32 = 5;
const GLYPH_CELL: u32 = 6;
const FONT_COLUMNS: u32 = 10;
const FONT_ROWS: u32 = 4;

/// Tile ids the town map draws as walls.
const WALL_TILES: [u32; 9] = [69, 71, 79, 81, 91, 101, 102, 112, 113];

/// 3×5 bitmaps in font order: digits, `A`-`Z`, space, `:`, `!`, `?`.
const GLYPHS: [[&str; 5]; 40] = [
    ["###", "#.#", "#.#", "#.#", "###"],
    [".#.", "##.", ".#.", ".#.", "###"],
    ["###", "..#", "###", "#..", "###"],
    ["###", "..#", "###", "..#", "###"],
    ["#.#", "#.#", "###", "..#", "..#"],
    ["###", "#..", "###", "..#", "###"],
    ["###", "#..", "###", "#.#", "###"],
    ["###", "..#", "..#", "..#", "..#"],
    ["###", "#.#", "###", "#.#", "###"],
    ["###", "#.#", "###", "..#", "###"],
    [".#.", "#.#", "###", "#.#", "#.#"],
    ["##.", "#.#", "##.", "#.#", "##."],
    ["###", "#..", "#..", "#..", "###"],
    ["##.", "#.#", "#.#", "#.#", "##."],
    ["###", "#..", "##.", "#..", "###"],
    ["###", "#..", "##.", "#..", "#.."],
    ["###", "#..", "#.#", "#.#", "###"],
    ["#.#", "#.#", "###", "#.#", "#.#"],
    ["###", ".#.", ".#.", ".#.", "###"],
    ["..#", "..#", "..#", "#.#", "###"],
    ["#.#", "#.#", "##.", "#.#", "#.#"],
    ["#..", "#..", "#..", "#..", "###"],
    ["#.#", "###", "###", "#.#", "#.#"],
    ["##.", "#.#", "#.#", "#.#", "#.#"],
    [".#.", "#.#", "#.#", "#.#", ".#."],
    ["###", "#.#", "###", "#..", "#.."],
    ["###", "#.#", "#.#", "###", "..#"],
    ["##.", "#.#", "##.", "#.#", "#.#"],
    [".##", "#..", ".#.", "..#", "##."],
    ["###", ".#.", ".#.", ".#.", ".#."],
    ["#.#", "#.#", "#.#", "#.#", "###"],
    ["#.#", "#.#", "#.#", "#.#", ".#."],
    ["#.#", "#.#", "###", "###", "#.#"],
    ["#.#", "#.#", ".#.", "#.#", "#.#"],
    ["#.#", "#.#", ".#.", ".#.", ".#."],
    ["###", "..#", ".#.", "#..", "###"],
    ["...", "...", "...", "...", "..."],
    ["...", ".#.", "...", ".#.", "..."],
    [".#.", ".#.", ".#.", "...", ".#."],
    ["###", "..#", ".#.", "...", ".#."],
];

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn usage() -> String {
    "Usage: cargo run -p arcade_assetgen -- [output_dir]\nWrites placeholder sprite sheets (default output_dir: assets/gfx)".to_string()
}

fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 2 {
        return Err(usage());
    }
    let output_dir = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/gfx"));

    let written = write_sheets(&output_dir)?;
    println!(
        "Wrote {} placeholder sheets -> {}",
        written.len(),
        output_dir.display()
    );
    Ok(())
}

/// Every file the game loads, paired with its generated image.
fn sheets() -> Vec<(&'static str, RgbaImage)> {
    vec![
        ("ball.png", ball()),
        ("block.png", block()),
        ("ship.png", ship()),
        ("collectible.png", collectible()),
        ("background.png", background()),
        ("rpg_sprites.png", tileset()),
        ("enemy_idle.png", enemy_idle()),
        ("hero.png", hero()),
        ("font.png", font()),
    ]
}

/// Write every sheet under `output_dir`. Either all files are replaced or
/// none are.
fn write_sheets(output_dir: &Path) -> Result<Vec<PathBuf>, String> {
    fs::create_dir_all(output_dir).map_err(|e| {
        format!(
            "Failed to create output dir '{}': {e}",
            output_dir.display()
        )
    })?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
    for (name, image) in sheets() {
        let final_path = output_dir.join(name);
        let temp_path = temporary_output_path(&final_path);
        image
            .save_with_format(&temp_path, image::ImageFormat::Png)
            .map_err(|e| format!("Failed to write '{}': {e}", temp_path.display()))?;
        staged.push((temp_path, final_path));
    }

    let pairs: Vec<(&Path, &Path)> = staged
        .iter()
        .map(|(temp, final_path)| (temp.as_path(), final_path.as_path()))
        .collect();
    promote_outputs_transactional(&pairs)?;

    Ok(staged.into_iter().map(|(_, final_path)| final_path).collect())
}

fn filled_circle(size: u32, color: [u8; 4]) -> RgbaImage {
    let center = (size as f32 - 1.0) * 0.5;
    let radius = size as f32 * 0.5;
    RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        if dx * dx + dy * dy <= radius * radius {
            Rgba(color)
        } else {
            CLEAR
        }
    })
}

fn ball() -> RgbaImage {
    filled_circle(32, [255, 220, 40, 255])
}

fn block() -> RgbaImage {
    RgbaImage::from_fn(48, 48, |x, y| {
        if x < 3 || y < 3 || x >= 45 || y >= 45 {
            Rgba([20, 90, 30, 255])
        } else {
            Rgba([60, 190, 70, 255])
        }
    })
}

/// Up-pointing triangle; the game rotates it for the other facings.
fn ship() -> RgbaImage {
    let size = 64;
    RgbaImage::from_fn(size, size, |x, y| {
        let half_width = y as f32 * 0.5;
        let dx = (x as f32 - size as f32 * 0.5).abs();
        if dx <= half_width {
            Rgba([210, 210, 230, 255])
        } else {
            CLEAR
        }
    })
}

fn collectible() -> RgbaImage {
    let size = 24;
    let half = size as i32 / 2;
    RgbaImage::from_fn(size, size, |x, y| {
        if (x as i32 - half).abs() + (y as i32 - half).abs() <= half {
            Rgba([255, 80, 200, 255])
        } else {
            CLEAR
        }
    })
}

fn background() -> RgbaImage {
    RgbaImage::from_fn(320, 180, |x, y| {
        if (x * 7 + y * 13) % 97 == 0 {
            Rgba([230, 230, 255, 255])
        } else {
            Rgba([8, 8, 32, 255])
        }
    })
}

/// Floor at id 0, stone at the wall ids, a distinct flat color elsewhere.
fn tileset() -> RgbaImage {
    RgbaImage::from_fn(TILESET_COLUMNS * TILE, TILESET_ROWS * TILE, |x, y| {
        let id = (y / TILE) * TILESET_COLUMNS + x / TILE;
        let (tx, ty) = (x % TILE, y % TILE);
        let edge = tx == 0 || ty == 0 || tx == TILE - 1 || ty == TILE - 1;
        if id == 0 {
            if (tx + ty * 3) % 7 == 0 {
                Rgba([50, 140, 50, 255])
            } else {
                Rgba([70, 170, 70, 255])
            }
        } else if WALL_TILES.contains(&id) {
            if edge {
                Rgba([70, 70, 80, 255])
            } else {
                Rgba([130, 130, 140, 255])
            }
        } else {
            let shade = (id * 37 % 200) as u8;
            Rgba([shade, 255 - shade, 128, 255])
        }
    })
}

/// Red blob that swells and shrinks over five frames.
fn enemy_idle() -> RgbaImage {
    let mut sheet = RgbaImage::new(ENEMY_FRAME * ENEMY_FRAMES, ENEMY_FRAME);
    for frame in 0..ENEMY_FRAMES {
        let pulse = [0.0, 2.0, 4.0, 2.0, 0.0][frame as usize];
        let radius = 16.0 + pulse;
        let center = ENEMY_FRAME as f32 * 0.5;
        for y in 0..ENEMY_FRAME {
            for x in 0..ENEMY_FRAME {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                if dx * dx + dy * dy <= radius * radius {
                    sheet.put_pixel(frame * ENEMY_FRAME + x, y, Rgba([200, 40, 40, 255]));
                }
            }
        }
    }
    sheet
}

/// One row per direction (down, up, left, right); idle in columns 0-1,
/// walk in 2-3, attack in 4-6. A light "eye" marks the facing side.
fn hero() -> RgbaImage {
    RgbaImage::from_fn(HERO_COLUMNS * TILE, HERO_ROWS * TILE, |x, y| {
        let column = x / TILE;
        let row = y / TILE;
        let (tx, ty) = (x % TILE, y % TILE);
        if column == 7 || tx < 3 || tx > 12 || ty < 2 {
            return CLEAR;
        }

        // Walk frames bob by one pixel, attack frames extend a blade.
        let bob = u32::from(column == 3);
        if ty < 2 + bob {
            return CLEAR;
        }
        let eye = match row {
            0 => ty == 5 && (tx == 6 || tx == 9),
            1 => false,
            2 => ty == 5 && tx == 4,
            _ => ty == 5 && tx == 11,
        };
        if eye {
            return Rgba([250, 250, 250, 255]);
        }
        let body = match column {
            0 | 1 => [40, 80, 200, 255],
            2 | 3 => [40, 120, 220, 255],
            _ => [200, 160, 40, 255 - (column - 4) as u8 * 40],
        };
        Rgba(body)
    })
}

/// Glyph `id` drawn as white pixels inside a `GLYPH_CELL` square.
fn font() -> RgbaImage {
    let mut sheet = RgbaImage::new(FONT_COLUMNS * GLYPH_CELL, FONT_ROWS * GLYPH_CELL);
    for (id, rows) in GLYPHS.iter().enumerate() {
        let id = id as u32;
        let origin_x = (id % FONT_COLUMNS) * GLYPH_CELL + 1;
        let origin_y = (id / FONT_COLUMNS) * GLYPH_CELL;
        for (dy, row) in rows.iter().enumerate() {
            for (dx, bit) in row.bytes().enumerate() {
                if bit == b'#' {
                    sheet.put_pixel(
                        origin_x + dx as u32,
                        origin_y + dy as u32,
                        Rgba([255, 255, 255, 255]),
                    );
                }
            }
        }
    }
    sheet
}

fn temporary_output_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("output");
    path.with_file_name(format!("{file_name}.tmp"))
}

fn promote_temporary_file(temp_path: &Path, final_path: &Path) -> Result<(), String> {
    if final_path.exists() {
        fs::remove_file(final_path).map_err(|e| {
            format!(
                "Failed to replace existing output '{}': {e}",
                final_path.display()
            )
        })?;
    }
    fs::rename(temp_path, final_path).map_err(|e| {
        format!(
            "Failed to move temporary output '{}' -> '{}': {e}",
            temp_path.display(),
            final_path.display()
        )
    })
}

/// Promote every `(temp, final)` pair, restoring the previous finals if any
/// promotion fails.
fn promote_outputs_transactional(pairs: &[(&Path, &Path)]) -> Result<(), String> {
    let mut backups: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut promoted: Vec<PathBuf> = Vec::new();

    for (_, final_path) in pairs {
        if final_path.exists() {
            let backup_path = final_path.with_extension("bak.tmp");
            fs::rename(final_path, &backup_path).map_err(|e| {
                format!(
                    "Failed to stage backup '{}' -> '{}': {e}",
                    final_path.display(),
                    backup_path.display()
                )
            })?;
            backups.insert((*final_path).to_path_buf(), backup_path);
        }
    }

    for (temp_path, final_path) in pairs {
        if let Err(err) = promote_temporary_file(temp_path, final_path) {
            for promoted_path in promoted.iter().rev() {
                let _ = fs::remove_file(promoted_path);
            }
            for (final_path, backup_path) in backups {
                let _ = fs::rename(backup_path, final_path);
            }
            return Err(err);
        }
        promoted.push((*final_path).to_path_buf());
    }

    for (_, backup_path) in backups {
        let _ = fs::remove_file(backup_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn test_temp_path(hint: &str) -> PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "arcade_assetgen_test_{}_{}_{}",
            hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn sheets_match_the_geometry_the_game_slices() {
        let sizes: HashMap<&str, (u32, u32)> = sheets()
            .iter()
            .map(|(name, image)| (*name, image.dimensions()))
            .collect();
        assert_eq!(sizes["rpg_sprites.png"], (256, 128));
        assert_eq!(sizes["enemy_idle.png"], (250, 50));
        assert_eq!(sizes["hero.png"], (128, 64));
        assert_eq!(sizes["font.png"], (60, 24));
        assert_eq!(sizes["block.png"], (48, 48));
        assert_eq!(sizes.len(), 9);
    }

    #[test]
    fn glyphs_are_distinct() {
        let visible = &GLYPHS[..36];
        let unique: HashSet<_> = visible.iter().collect();
        assert_eq!(unique.len(), visible.len());
        assert!(GLYPHS[36].iter().all(|row| !row.contains('#')));
    }

    #[test]
    fn font_glyph_pixels_land_in_their_cell() {
        let sheet = font();
        // Glyph 10 ('A') starts at cell (0, 1); its top row is ".#."
        assert_eq!(sheet.get_pixel(2, 6)[3], 255);
        assert_eq!(sheet.get_pixel(1, 6)[3], 0);
    }

    #[test]
    fn hero_rows_have_idle_walk_and_attack_frames() {
        let sheet = hero();
        for row in 0..HERO_ROWS {
            for column in 0..7 {
                let center = sheet.get_pixel(column * TILE + 8, row * TILE + 10);
                assert!(center[3] > 0, "frame ({column}, {row}) is empty");
            }
            let unused = sheet.get_pixel(7 * TILE + 8, row * TILE + 10);
            assert_eq!(unused[3], 0);
        }
    }

    #[test]
    fn test_temporary_output_path() {
        let result = temporary_output_path(Path::new("assets/gfx/ball.png"));
        assert_eq!(result, PathBuf::from("assets/gfx/ball.png.tmp"));
    }

    #[test]
    fn test_write_sheets_creates_every_file() {
        let dir = test_temp_path("sheets");
        let written = write_sheets(&dir).expect("write sheets");
        assert_eq!(written.len(), 9);
        for path in &written {
            let decoded = image::open(path).expect("generated png decodes");
            assert!(decoded.width() > 0);
            assert!(!temporary_output_path(path).exists());
        }

        // A second run replaces the files in place.
        write_sheets(&dir).expect("rewrite sheets");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_promote_temporary_file_overwrites_existing() {
        let temp = test_temp_path("overwrite_temp");
        let final_path = test_temp_path("overwrite_final");

        fs::write(&final_path, "old content").expect("write final");
        fs::write(&temp, "new content").expect("write temp");

        promote_temporary_file(&temp, &final_path).expect("promote");

        let content = fs::read_to_string(&final_path).expect("read final");
        assert_eq!(content, "new content");
        assert!(!temp.exists());

        let _ = fs::remove_file(&final_path);
    }

    #[test]
    fn test_promote_outputs_transactional_restores_on_failure() {
        let temp1 = test_temp_path("txn_temp1");
        let final1 = test_temp_path("txn_final1");
        let missing_temp = test_temp_path("txn_missing");
        let final2 = test_temp_path("txn_final2");

        fs::write(&temp1, "new one").expect("write temp1");
        fs::write(&final1, "old one").expect("write final1");

        let pairs: Vec<(&Path, &Path)> = vec![(&temp1, &final1), (&missing_temp, &final2)];
        assert!(promote_outputs_transactional(&pairs).is_err());

        let content = fs::read_to_string(&final1).expect("read final1");
        assert_eq!(content, "old one");
        assert!(!final2.exists());

        let _ = fs::remove_file(&final1);
        let _ = fs::remove_file(&temp1);
    }
}
