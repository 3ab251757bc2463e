//! Recorded draw commands, serialized for web hosts

use glam::Vec2;
use serde::Serialize;

use super::{Color, Display, PLAYER_COLOR, TRAJECTORY_COLOR};
use crate::sim::{Platform, Player};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Axis-aligned box, `x`/`y` is the center
    Platform {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Player {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        jumping: bool,
        color: Color,
    },
    Power {
        level: f32,
        color: Color,
    },
    Trajectory {
        points: Vec<[f32; 2]>,
        color: Color,
    },
}

impl DrawCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            DrawCommand::Platform { .. } => "platform",
            DrawCommand::Player { .. } => "player",
            DrawCommand::Power { .. } => "power",
            DrawCommand::Trajectory { .. } => "trajectory",
        }
    }
}

/// `Display` that records one frame of commands
#[derive(Debug, Clone, Default, Serialize)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame, keeping the allocation
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.commands)
    }
}

impl Display for DrawList {
    fn draw_platform(&mut self, platform: &Platform, color: Color) {
        self.commands.push(DrawCommand::Platform {
            x: platform.x,
            y: platform.y,
            width: platform.width,
            height: platform.height,
            color,
        });
    }

    fn draw_player(&mut self, player: &Player) {
        self.commands.push(DrawCommand::Player {
            x: player.pos.x,
            y: player.pos.y,
            width: player.width,
            height: player.height,
            jumping: player.is_jumping(),
            color: PLAYER_COLOR,
        });
    }

    fn draw_power(&mut self, level: f32, color: Color) {
        self.commands.push(DrawCommand::Power { level, color });
    }

    fn draw_trajectory(&mut self, points: &[Vec2]) {
        self.commands.push(DrawCommand::Trajectory {
            points: points.iter().map(|p| p.to_array()).collect(),
            color: TRAJECTORY_COLOR,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_tagged() {
        let mut list = DrawList::new();
        list.draw_platform(&Platform::new(200.0, 400.0, 80.0, 20.0), [1.0, 0.0, 0.0, 1.0]);
        list.draw_power(0.5, [0.0, 1.0, 0.0, 1.0]);

        let json = list.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "platform");
        assert_eq!(value[0]["width"], 80.0);
        assert_eq!(value[1]["kind"], "power");
        assert_eq!(value[1]["level"], 0.5);
    }

    #[test]
    fn test_clear() {
        let mut list = DrawList::new();
        list.draw_trajectory(&[Vec2::ZERO, Vec2::ONE]);
        assert_eq!(list.commands.len(), 1);
        list.clear();
        assert!(list.commands.is_empty());
    }
}
