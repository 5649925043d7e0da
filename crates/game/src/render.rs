use crate::net::{GameSnapshot, Paddle, WORLD_SIZE};

pub const GRID_WIDTH: usize = 50;
pub const GRID_HEIGHT: usize = 25;

const BALL: char = '⬤';
const PADDLE: char = '█';
const DIVIDER: char = '■';

const LEFT_PADDLE_COLUMN: usize = 1;
const RIGHT_PADDLE_COLUMN: usize = GRID_WIDTH - 2;

/// One rendered frame: the fixed-size playfield grid plus the status lines
/// shown beneath it. Recomputed from scratch for every snapshot, never
/// diffed against the previous frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub grid: Vec<Vec<char>>,
    pub status: Vec<String>,
}

impl RenderFrame {
    /// Grid rows joined into displayable lines.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.grid.iter().map(|row| row.iter().collect())
    }
}

/// Map a world coordinate in `[0, WORLD_SIZE)` onto a grid axis of `extent`
/// cells. Monotonic. Out-of-range input may land outside `[0, extent)`;
/// callers clip instead of erroring.
pub fn scale(v: f32, extent: usize) -> i32 {
    (v / WORLD_SIZE * extent as f32).floor() as i32
}

/// Project an authoritative snapshot onto the character grid.
///
/// Pure: no state beyond its arguments. Entities that scale off-grid are
/// silently omitted so transient out-of-bounds values from network jitter
/// cannot corrupt the display.
pub fn render(snapshot: &GameSnapshot, player_slot: u8) -> RenderFrame {
    let mut grid = vec![vec![' '; GRID_WIDTH]; GRID_HEIGHT];

    // Dashed center divider on every other row.
    for (y, row) in grid.iter_mut().enumerate() {
        if y % 2 != 0 {
            row[GRID_WIDTH / 2] = DIVIDER;
        }
    }

    // The ball glyph renders double-width, so the rightmost column stays
    // reserved for its overflow.
    let ball_x = scale(snapshot.ball_x, GRID_WIDTH);
    let ball_y = scale(snapshot.ball_y, GRID_HEIGHT);
    if (0..GRID_HEIGHT as i32).contains(&ball_y) && (0..GRID_WIDTH as i32 - 1).contains(&ball_x) {
        grid[ball_y as usize][ball_x as usize] = BALL;
    }

    draw_paddle(&mut grid, LEFT_PADDLE_COLUMN, &snapshot.paddle1);
    draw_paddle(&mut grid, RIGHT_PADDLE_COLUMN, &snapshot.paddle2);

    RenderFrame {
        grid,
        status: vec![
            format!(
                "Score: {} - {}",
                snapshot.player1_score, snapshot.player2_score
            ),
            format!("Game started! You are Player {player_slot}"),
            "Use Arrow keys or W/S to move.".to_owned(),
        ],
    }
}

fn draw_paddle(grid: &mut [Vec<char>], column: usize, paddle: &Paddle) {
    let top = scale(paddle.y, GRID_HEIGHT);
    let height = scale(paddle.height, GRID_HEIGHT);
    for y in top..top + height {
        // Each cell clips independently; a paddle may hang partly off-grid.
        if (0..GRID_HEIGHT as i32).contains(&y) {
            grid[y as usize][column] = PADDLE;
        }
    }
}
