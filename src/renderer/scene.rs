//! Scene painters for each game

use super::{Color, RenderSink};
use crate::sim::{GridGame, RunnerGame};

/// Gap left between neighbouring grid cells
const CELL_GUTTER: f32 = 2.0;

/// Draw the snake board: background, body, then the target
pub fn draw_grid(game: &GridGame, sink: &mut dyn RenderSink) {
    let cell = game.config.cell_size;
    let size = (cell - CELL_GUTTER).max(1.0);

    sink.clear(Color::BLACK);
    for segment in &game.body {
        sink.draw_rect(segment.x as f32 * cell, segment.y as f32 * cell, size, size, Color::TEAL);
    }

    let radius = size / 2.0;
    sink.draw_circle(
        game.target.x as f32 * cell + radius,
        game.target.y as f32 * cell + radius,
        radius,
        Color::CORAL,
    );
}

/// Draw the runner track: background, lane separators, player, obstacles
pub fn draw_runner(game: &RunnerGame, sink: &mut dyn RenderSink) {
    let config = &game.config;

    sink.clear(Color::ASPHALT);
    for lane in 1..config.lanes {
        let x = config.lane_x(lane);
        sink.draw_rect(x - 1.0, 0.0, 2.0, config.view_height, Color::LANE_LINE);
    }

    let player = game.player_rect();
    sink.draw_rect(player.left(), player.top(), player.size.x, player.size.y, Color::TEAL);

    for obstacle in &game.obstacles {
        let r = &obstacle.rect;
        sink.draw_rect(r.left(), r.top(), r.size.x, r.size.y, Color::CORAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{BestScore, MemoryScoreStore};
    use crate::renderer::{DrawCommand, RecordingSink};
    use crate::settings::{GridConfig, RunnerConfig};
    use crate::sim::{Obstacle, Rect};

    #[test]
    fn test_grid_frame_order() {
        let best = BestScore::load("snake", MemoryScoreStore::new().shared());
        let game = GridGame::new(GridConfig::default(), best, 1);
        let mut sink = RecordingSink::new();

        draw_grid(&game, &mut sink);

        assert_eq!(
            sink.commands,
            vec![
                DrawCommand::Clear(Color::BLACK),
                DrawCommand::Rect { x: 200.0, y: 200.0, w: 18.0, h: 18.0, color: Color::TEAL },
                DrawCommand::Circle { x: 109.0, y: 109.0, radius: 9.0, color: Color::CORAL },
            ]
        );
    }

    #[test]
    fn test_runner_frame_order() {
        let best = BestScore::load("runner", MemoryScoreStore::new().shared());
        let mut game = RunnerGame::new(RunnerConfig::default(), best, 1);
        game.obstacles.push(Obstacle {
            id: 1,
            lane: 0,
            rect: Rect::new(300.0, 10.0, 80.0, 50.0),
        });
        let mut sink = RecordingSink::new();

        draw_runner(&game, &mut sink);

        assert_eq!(sink.frames, 1);
        assert_eq!(sink.commands[0], DrawCommand::Clear(Color::ASPHALT));
        // Two lane separators, the player, one obstacle
        assert_eq!(sink.commands.len(), 5);
        assert_eq!(
            sink.commands[3],
            DrawCommand::Rect { x: 400.0, y: 500.0, w: 40.0, h: 60.0, color: Color::TEAL }
        );
        assert!(matches!(sink.commands[4], DrawCommand::Rect { color: Color::CORAL, .. }));
    }
}
