//! Player body and its kinematic integrator

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platforms::Platform;
use super::trajectory::JumpPlan;
use crate::consts::*;

/// Grounded or in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    Grounded,
    Airborne,
}

/// The player's body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub motion: Motion,
    /// Expected touchdown x of the current flight
    pub target_x: f32,
    /// Height at which the landing check fires
    pub target_y: f32,
    /// Gravity in effect right now
    pub gravity: f32,
    /// Gravity restored after each landing
    pub base_gravity: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            motion: Motion::Grounded,
            target_x: pos.x,
            target_y: pos.y,
            gravity: DEFAULT_GRAVITY,
            base_gravity: DEFAULT_GRAVITY,
        }
    }

    /// A grounded player resting on `platform`
    pub fn standing_on(platform: &Platform) -> Self {
        Self::new(Vec2::new(platform.x, platform.y - PLAYER_HEIGHT / 2.0))
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self.base_gravity = gravity;
        self
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.width / 2.0
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.motion == Motion::Airborne
    }

    /// Launch along `plan`. Does nothing while already airborne.
    /// Returns true if the jump started.
    pub fn jump(&mut self, plan: &JumpPlan) -> bool {
        if self.is_jumping() {
            log::trace!("jump ignored: already airborne");
            return false;
        }
        self.motion = Motion::Airborne;
        self.vel = plan.velocity;
        self.gravity = plan.gravity;
        self.target_x = plan.target_x;
        self.target_y = plan.target_y;
        true
    }

    /// Advance one step of `dt` seconds (semi-implicit Euler). Grounded
    /// bodies do not move.
    pub fn update(&mut self, dt: f32) {
        if !self.is_jumping() {
            return;
        }
        self.vel.y += self.gravity * dt;
        self.pos.x += self.vel.x * dt;
        self.pos.y += self.vel.y * dt;
    }

    /// Descending and at or below the landing height
    pub fn landing_due(&self) -> bool {
        self.is_jumping() && self.vel.y > 0.0 && self.pos.y >= self.target_y
    }

    /// Snap onto the landing height and stop
    pub fn land(&mut self) {
        self.motion = Motion::Grounded;
        self.vel = Vec2::ZERO;
        self.pos.y = self.target_y;
        self.gravity = self.base_gravity;
        log::debug!("landed at ({:.1}, {:.1})", self.pos.x, self.pos.y);
    }

    /// Stop steering the flight and fall under base gravity (after a miss)
    pub fn release_plan(&mut self) {
        self.gravity = self.base_gravity;
    }

    /// Translate horizontally (viewport recentering)
    pub fn shift_x(&mut self, dx: f32) {
        self.pos.x += dx;
        self.target_x += dx;
    }
}
