//! Game session - the per-frame simulation
//!
//! This module ties together the field, the bag, the active piece and scoring.
//! It owns every timer and is driven exclusively by [`GameSession::advance`]
//! (or the direct action methods), so a seed plus the sequence of
//! `(elapsed_ms, InputSnapshot)` pairs fully determines a run.
//!
//! Order of resolution inside one frame:
//!
//! 1. pause toggle (a paused session only advances its pause timer)
//! 2. timers
//! 3. horizontal shift (DAS/ARR, left wins over right)
//! 4. rotation (clockwise wins over counter-clockwise)
//! 5. gravity / soft drop and lock delay
//! 6. hard drop
//! 7. hold
//! 8. mode finish check

use log::{debug, info};

use crate::config::SessionConfig;
use crate::field::Field;
use crate::mode::{GameMode, ModeRules, SessionStats};
use crate::piece::ActivePiece;
use crate::pieces;
use crate::rng::PieceBag;
use crate::scoring::{drop_points, gravity_interval_ms, level_for_lines, line_clear_award};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
use crate::types::{
    Action, AutoShift, Banner, GameEvent, InputSnapshot, ModeResult, PieceKind,
    RotationDirection,
};

/// Undrained events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 64;

/// Where the active piece is in its fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PiecePhase {
    /// Free to descend.
    Falling,
    /// Resting on something; the lock timer is running.
    Locking,
}

/// Complete game state for one run of a mode
#[derive(Debug, Clone)]
pub struct GameSession<M: ModeRules = GameMode> {
    config: SessionConfig,
    auto_shift: AutoShift,
    mode: M,
    field: Field,
    bag: PieceBag,
    active: ActivePiece,
    phase: PiecePhase,
    hold: Option<PieceKind>,
    hold_used: bool,
    score: u32,
    level: u32,
    lines: u32,
    gravity_ms: f64,
    drop_timer_ms: f64,
    lock_timer_ms: f64,
    /// Unpaused simulated time.
    game_ms: f64,
    pause_ms: f64,
    banner: Option<Banner>,
    banner_timer_ms: f64,
    paused: bool,
    game_failed: bool,
    result: Option<ModeResult>,
    /// Pending events, drained by [`GameSession::take_events`]. Capped at
    /// [`MAX_PENDING_EVENTS`].
    events: Vec<GameEvent>,
}

impl<M: ModeRules> GameSession<M> {
    /// Create a session and spawn its first piece from the bag
    pub fn new(mode: M, config: SessionConfig) -> Self {
        let mut bag = PieceBag::new(config.seed, config.bag_lookahead);
        let first = bag.next();

        Self {
            config,
            auto_shift: config.auto_shift(),
            mode,
            field: Field::new(),
            bag,
            active: ActivePiece::spawn(first),
            phase: PiecePhase::Falling,
            hold: None,
            hold_used: false,
            score: 0,
            level: 0,
            lines: 0,
            gravity_ms: gravity_interval_ms(0),
            drop_timer_ms: 0.0,
            lock_timer_ms: 0.0,
            game_ms: 0.0,
            pause_ms: 0.0,
            banner: None,
            banner_timer_ms: 0.0,
            paused: false,
            game_failed: false,
            result: None,
            events: Vec::new(),
        }
    }

    /// Start from a prepared field instead of an empty one.
    pub fn with_field(mut self, field: Field) -> Self {
        self.field = field;
        self
    }

    /// Replace the first piece with a fresh spawn of `kind`.
    ///
    /// The kind originally drawn from the bag is discarded.
    pub fn with_active(mut self, kind: PieceKind) -> Self {
        self.spawn(kind);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn active(&self) -> ActivePiece {
        self.active
    }

    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    /// Hold is available for the current piece.
    pub fn can_hold(&self) -> bool {
        !self.hold_used
    }

    /// Upcoming kinds, nearest first.
    pub fn next_pieces(&self, count: usize) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.preview(count)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Sticky once a piece locks above the field.
    pub fn game_failed(&self) -> bool {
        self.game_failed
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Hand-off value, present once the mode has finished.
    pub fn result(&self) -> Option<ModeResult> {
        self.result
    }

    /// No further simulation will happen.
    pub fn is_over(&self) -> bool {
        self.game_failed || self.result.is_some()
    }

    /// Accepts player actions right now.
    pub fn playable(&self) -> bool {
        !self.is_over() && !self.paused
    }

    /// Unpaused simulated time since the session started.
    pub fn elapsed_ms(&self) -> f64 {
        self.game_ms
    }

    /// Accumulated paused time.
    pub fn pause_elapsed_ms(&self) -> f64 {
        self.pause_ms
    }

    /// Current gravity interval in milliseconds.
    pub fn gravity_ms(&self) -> f64 {
        self.gravity_ms
    }

    pub fn lock_timer_ms(&self) -> f64 {
        self.lock_timer_ms
    }

    /// The latest line-clear banner, while it is still visible.
    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    pub fn ghost_row(&self) -> i8 {
        self.active.ghost_row(&self.field)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            score: self.score,
            level: self.level,
            lines_cleared: self.lines,
            elapsed_ms: self.game_ms,
        }
    }

    /// Events emitted since the last call to `take_events`.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take and clear pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.field = *self.field.rows();
        out.active = ActiveSnapshot::from(self.active);
        out.ghost_y = self.ghost_row();
        out.hold = self.hold;
        out.can_hold = self.can_hold();
        out.next_queue.clear();
        out.next_queue
            .extend(self.bag.preview(self.config.bag_lookahead));
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.paused = self.paused;
        out.game_failed = self.game_failed;
        out.finished = self.is_finished();
        out.banner = self.banner;
        out.timers = TimersSnapshot {
            drop_ms: self.drop_timer_ms,
            lock_ms: self.lock_timer_ms,
            game_ms: self.game_ms,
            pause_ms: self.pause_ms,
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Run one frame.
    ///
    /// Events raised during the frame queue up until [`GameSession::take_events`]
    /// is called; a caller that never drains them keeps only the latest
    /// [`MAX_PENDING_EVENTS`].
    pub fn advance(&mut self, elapsed_ms: f64, input: &InputSnapshot) {
        if self.is_over() {
            return;
        }

        if input.pressed(Action::Pause) {
            self.toggle_pause();
        }
        if self.paused {
            self.pause_ms += elapsed_ms;
            return;
        }

        self.tick_timers(elapsed_ms);

        let left = input.held(Action::MoveLeft);
        let right = input.held(Action::MoveRight);
        if left > 0 {
            if self.auto_shift.fires(left) {
                self.shift(-1);
            }
        } else if right > 0 && self.auto_shift.fires(right) {
            self.shift(1);
        }

        if input.pressed(Action::RotateCw) {
            self.rotate(RotationDirection::Clockwise);
        } else if input.pressed(Action::RotateCcw) {
            self.rotate(RotationDirection::CounterClockwise);
        }

        self.resolve_vertical(input.is_down(Action::MoveDown));

        if input.pressed(Action::HardDrop) {
            self.hard_drop();
        }
        if input.pressed(Action::Hold) {
            self.hold();
        }

        self.check_mode();
    }

    fn tick_timers(&mut self, elapsed_ms: f64) {
        self.game_ms += elapsed_ms;
        self.drop_timer_ms += elapsed_ms;
        if self.phase == PiecePhase::Locking {
            self.lock_timer_ms += elapsed_ms;
        }
        if self.banner.is_some() {
            self.banner_timer_ms += elapsed_ms;
            if self.banner_timer_ms >= self.config.banner_ms {
                self.banner = None;
            }
        }
    }

    /// Gravity or soft drop, then the lock-delay state machine.
    fn resolve_vertical(&mut self, soft_drop: bool) {
        if self.active.can_move_down(&self.field) {
            if self.phase == PiecePhase::Locking {
                self.phase = PiecePhase::Falling;
                self.lock_timer_ms = 0.0;
            }

            // Soft drop first, gravity as the fallback
            let stepped = if soft_drop && self.drop_timer_ms >= self.config.soft_drop_interval_ms {
                self.score += drop_points(1, false);
                true
            } else {
                self.drop_timer_ms >= self.gravity_ms
            };
            if stepped {
                self.active.y += 1;
                self.drop_timer_ms = 0.0;
                // Landing starts the lock delay this frame
                if !self.active.can_move_down(&self.field) {
                    self.phase = PiecePhase::Locking;
                    self.lock_timer_ms = 0.0;
                }
            }
            return;
        }

        match self.phase {
            PiecePhase::Falling => {
                self.phase = PiecePhase::Locking;
                self.lock_timer_ms = 0.0;
            }
            PiecePhase::Locking => {
                if self.lock_timer_ms >= self.config.lock_delay_ms {
                    self.lock_piece();
                }
            }
        }
    }

    /// A successful move or rotation that frees the piece cancels the lock timer.
    fn after_player_move(&mut self) {
        if self.phase == PiecePhase::Locking && self.active.can_move_down(&self.field) {
            self.phase = PiecePhase::Falling;
            self.lock_timer_ms = 0.0;
        }
    }

    /// Shift the active piece horizontally by one cell (`dx` = -1 or 1).
    pub fn shift(&mut self, dx: i8) -> bool {
        if !self.playable() {
            return false;
        }
        let moved = self.active.try_shift(&self.field, dx);
        if moved {
            self.after_player_move();
        }
        moved
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    /// Rotate with wall kicks. Returns false when every kick collides.
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if !self.playable() {
            return false;
        }
        let rotated = self.active.try_rotate(&self.field, direction).is_some();
        if rotated {
            self.after_player_move();
        }
        rotated
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(RotationDirection::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(RotationDirection::CounterClockwise)
    }

    /// Drop to the ghost row and lock. Returns the number of rows descended.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.playable() {
            return 0;
        }
        let target = self.ghost_row();
        let rows = (target - self.active.y) as u32;
        self.score += drop_points(rows, true);
        self.active.y = target;
        self.lock_piece();
        rows
    }

    /// Swap with the hold slot, once per spawned piece
    pub fn hold(&mut self) -> bool {
        if !self.playable() || self.hold_used {
            return false;
        }

        let current = self.active.kind;
        let next = match self.hold.replace(current) {
            Some(held) => held,
            None => self.bag.next(),
        };
        self.spawn(next);
        self.hold_used = true;

        debug!("held {} and spawned {}", current.as_str(), next.as_str());
        self.emit(GameEvent::PieceHeld {
            held: current,
            active: next,
        });
        true
    }

    /// Flip the pause flag. No effect once the session is over.
    pub fn toggle_pause(&mut self) {
        if self.is_over() {
            return;
        }
        self.paused = !self.paused;
        debug!("paused: {}", self.paused);
    }

    fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    fn spawn(&mut self, kind: PieceKind) {
        self.active = ActivePiece::spawn(kind);
        self.phase = PiecePhase::Falling;
        self.drop_timer_ms = 0.0;
        self.lock_timer_ms = 0.0;
    }

    /// Single-corner T-spin heuristic.
    ///
    /// Looks at the first filled cell in the middle row of the piece's box and
    /// tests the field tile in the box's top row at that column. Evaluated
    /// after the cleared rows are removed, so rows shifted down into the box
    /// count.
    fn t_spin_corner_filled(&self, piece: &ActivePiece) -> bool {
        (0..3u8)
            .find(|&px| pieces::cell_at(piece.kind, piece.rotation, px, 1))
            .is_some_and(|px| self.field.is_solid(piece.x + px as i8, piece.y))
    }

    /// Write the active piece into the field, clear rows, score, and spawn the next piece
    fn lock_piece(&mut self) {
        let piece = self.active;

        let color = pieces::color(piece.kind);
        let mut topped_out = false;
        for (x, y) in piece.cells() {
            if y < 0 {
                topped_out = true;
            } else {
                self.field.fill(x, y, color);
            }
        }

        debug!(
            "locked {} at ({}, {}) rotation {}",
            piece.kind.as_str(),
            piece.x,
            piece.y,
            piece.rotation.index()
        );
        self.emit(GameEvent::PieceLocked {
            kind: piece.kind,
            x: piece.x,
            y: piece.y,
            rotation: piece.rotation,
        });

        if topped_out && !self.game_failed {
            self.game_failed = true;
            info!(
                "game failed: {} locked above the field (score {}, lines {})",
                piece.kind.as_str(),
                self.score,
                self.lines
            );
            self.emit(GameEvent::GameFailed);
        }

        let size = pieces::layout(piece.kind).size;
        let cleared = self.field.clear_full_rows_in(piece.y, size);
        let rows = cleared.len();
        // Checked against the field left after the clear
        let t_spin = piece.kind == PieceKind::T && rows >= 2 && self.t_spin_corner_filled(&piece);

        if let Some(award) = line_clear_award(rows, self.level, t_spin) {
            self.score += award.points;
            self.lines += rows as u32;
            self.banner = Some(award.banner);
            self.banner_timer_ms = 0.0;

            debug!(
                "cleared {} row(s): {} +{} at level {}",
                rows,
                award.banner.label(),
                award.points,
                self.level
            );
            self.emit(GameEvent::LinesCleared {
                rows: rows as u8,
                banner: award.banner,
                points: award.points,
            });
        }

        self.level = level_for_lines(self.lines);
        self.gravity_ms = gravity_interval_ms(self.level);
        self.hold_used = false;

        let next = self.bag.next();
        self.spawn(next);
    }

    fn check_mode(&mut self) {
        let stats = self.stats();

        if !self.game_failed && self.mode.is_failed(&stats) {
            self.game_failed = true;
            info!("game failed by mode rules (score {})", self.score);
            self.emit(GameEvent::GameFailed);
        }
        if self.game_failed || self.result.is_some() {
            return;
        }

        if self.mode.is_finished(&stats) {
            let result = self.mode.on_finished(&stats);
            info!("mode finished: {:?}", result);
            self.result = Some(result);
            self.emit(GameEvent::Finished(result));
        }
    }
}

impl Default for GameSession<GameMode> {
    fn default() -> Self {
        Self::new(GameMode::default(), SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rotation, Tile, TileColor};

    fn session(kind: PieceKind) -> GameSession {
        GameSession::new(GameMode::Marathon, SessionConfig::with_seed(12345)).with_active(kind)
    }

    fn at_level_one(mut state: GameSession) -> GameSession {
        state.lines = 10;
        state.level = 1;
        state.gravity_ms = gravity_interval_ms(1);
        state
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::new()
    }

    #[test]
    fn test_new_session() {
        let state = GameSession::new(GameMode::Sprint, SessionConfig::with_seed(1));
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 0);
        assert_eq!(state.lines_cleared(), 0);
        assert_eq!(state.gravity_ms(), 1000.0);
        assert_eq!(state.phase(), PiecePhase::Falling);
        assert_eq!(state.hold_piece(), None);
        assert!(state.can_hold());
        assert!(state.playable());
        assert_eq!(state.next_pieces(5).count(), 5);
        let (x, y) = pieces::spawn_position(state.active().kind);
        assert_eq!((state.active().x, state.active().y), (x, y));
    }

    #[test]
    fn test_with_active() {
        let state = session(PieceKind::I);
        assert_eq!(state.active(), ActivePiece::spawn(PieceKind::I));
    }

    #[test]
    fn test_hard_drop_o_on_empty_field() {
        let mut state = session(PieceKind::O);
        assert_eq!(state.hard_drop(), 20);
        assert_eq!(state.score(), 40);
        assert_eq!(state.field().solid_count(), 4);
        for (x, y) in [(4, 18), (5, 18), (4, 19), (5, 19)] {
            assert_eq!(state.field().get(x, y), Some(Tile::solid(TileColor::Yellow)));
        }
        assert_eq!(
            state.events(),
            &[GameEvent::PieceLocked {
                kind: PieceKind::O,
                x: 4,
                y: 18,
                rotation: Rotation::North
            }]
        );
        // Next piece spawned from the bag
        assert_eq!(state.active().y, pieces::spawn_position(state.active().kind).1);
    }

    #[test]
    fn test_single_line_clear_scores_previous_level() {
        let mut field = Field::new();
        field.fill_row_except(19, &[4, 5], TileColor::Red);
        let mut state = at_level_one(session(PieceKind::O).with_field(field));

        state.hard_drop();

        assert_eq!(state.lines_cleared(), 11);
        assert_eq!(state.score(), 40 + 100);
        assert_eq!(state.banner(), Some(Banner::Single));
        // The O's top half shifted into row 19
        assert_eq!(state.field().solid_count(), 2);
        assert!(state.field().is_solid(4, 19));
        assert!(state.field().is_solid(5, 19));
        assert!(state.events().contains(&GameEvent::LinesCleared {
            rows: 1,
            banner: Banner::Single,
            points: 100
        }));
    }

    #[test]
    fn test_line_clear_at_level_zero_awards_nothing() {
        let mut field = Field::new();
        field.fill_row_except(19, &[4, 5], TileColor::Red);
        let mut state = session(PieceKind::O).with_field(field);

        state.hard_drop();

        assert_eq!(state.lines_cleared(), 1);
        assert_eq!(state.score(), 40);
        assert_eq!(state.banner(), Some(Banner::Single));
    }

    #[test]
    fn test_level_and_gravity_update() {
        let mut field = Field::new();
        field.fill_row_except(19, &[4, 5], TileColor::Red);
        let mut state = session(PieceKind::O).with_field(field);
        state.lines = 9;

        state.hard_drop();

        assert_eq!(state.lines_cleared(), 10);
        assert_eq!(state.level(), 1);
        assert_eq!(state.gravity_ms(), gravity_interval_ms(1));
    }

    fn t_spin_double_field(with_overhang: bool) -> Field {
        let mut field = Field::new();
        field.fill_row_except(19, &[4], TileColor::Blue);
        field.fill_row_except(18, &[3, 4, 5], TileColor::Blue);
        if with_overhang {
            field.fill(3, 15, TileColor::Blue);
        }
        field
    }

    #[test]
    fn test_t_spin_double() {
        let mut state = at_level_one(session(PieceKind::T).with_field(t_spin_double_field(true)));
        state.active = ActivePiece::new(PieceKind::T, 3, 17, Rotation::South);
        assert!(!state.active.collides(&state.field));

        assert_eq!(state.hard_drop(), 0);

        assert_eq!(state.lines_cleared(), 12);
        assert_eq!(state.score(), 1200);
        assert_eq!(state.banner(), Some(Banner::TSpinDouble));
        // Only the overhang remains, shifted down into the box's top row
        assert_eq!(state.field().solid_count(), 1);
        assert!(state.field().is_solid(3, 17));
    }

    #[test]
    fn test_t_spin_corner_checked_after_clear() {
        let mut field = t_spin_double_field(false);
        field.fill(3, 17, TileColor::Blue);
        let mut state = at_level_one(session(PieceKind::T).with_field(field));
        state.active = ActivePiece::new(PieceKind::T, 3, 17, Rotation::South);
        assert!(!state.active.collides(&state.field));

        state.hard_drop();

        // The corner held a tile before the clear but is empty after it
        assert_eq!(state.score(), 300);
        assert_eq!(state.banner(), Some(Banner::Double));
        assert_eq!(state.field().solid_count(), 1);
        assert!(state.field().is_solid(3, 19));
    }

    #[test]
    fn test_t_double_without_overhang_is_plain_double() {
        let mut state = at_level_one(session(PieceKind::T).with_field(t_spin_double_field(false)));
        state.active = ActivePiece::new(PieceKind::T, 3, 17, Rotation::South);

        state.hard_drop();

        assert_eq!(state.score(), 300);
        assert_eq!(state.banner(), Some(Banner::Double));
    }

    #[test]
    fn test_t_spin_triple() {
        let mut field = Field::new();
        field.fill_row_except(17, &[4], TileColor::Green);
        field.fill_row_except(18, &[3, 4], TileColor::Green);
        field.fill_row_except(19, &[4], TileColor::Green);
        field.fill(3, 14, TileColor::Green);
        let mut state = at_level_one(session(PieceKind::T).with_field(field));
        state.active = ActivePiece::new(PieceKind::T, 3, 17, Rotation::West);
        assert!(!state.active.collides(&state.field));

        state.hard_drop();

        assert_eq!(state.lines_cleared(), 13);
        assert_eq!(state.score(), 1600);
        assert_eq!(state.banner(), Some(Banner::TSpinTriple));
        assert_eq!(state.field().solid_count(), 1);
        assert!(state.field().is_solid(3, 17));
    }

    #[test]
    fn test_t_triple_failing_corner_test_is_plain_triple() {
        let mut field = Field::new();
        field.fill_row_except(17, &[4], TileColor::Green);
        field.fill_row_except(18, &[4, 5], TileColor::Green);
        field.fill_row_except(19, &[4], TileColor::Green);
        let mut state = at_level_one(session(PieceKind::T).with_field(field));
        // East: the corner column is the piece's own column, empty once the
        // three rows are gone
        state.active = ActivePiece::new(PieceKind::T, 3, 17, Rotation::East);
        assert!(!state.active.collides(&state.field));

        state.hard_drop();

        assert_eq!(state.score(), 500);
        assert_eq!(state.banner(), Some(Banner::Triple));
    }

    #[test]
    fn test_tetris() {
        let mut field = Field::new();
        for y in 16..20 {
            field.fill_row_except(y, &[0], TileColor::Orange);
        }
        let mut state = at_level_one(session(PieceKind::I).with_field(field));
        assert!(state.rotate_cw());
        // Vertical I sits in local column 1
        while state.move_left() {}
        assert_eq!(state.active().x, -1);

        state.hard_drop();

        assert_eq!(state.lines_cleared(), 14);
        assert_eq!(state.banner(), Some(Banner::Tetris));
        assert_eq!(state.field().solid_count(), 0);
    }

    #[test]
    fn test_gravity_moves_piece_after_interval() {
        let mut state = session(PieceKind::T);
        let y = state.active().y;

        state.advance(999.0, &idle());
        assert_eq!(state.active().y, y);

        state.advance(1.0, &idle());
        assert_eq!(state.active().y, y + 1);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_soft_drop_interval_and_points() {
        let mut state = session(PieceKind::T);
        let y = state.active().y;
        let down = idle().with(Action::MoveDown, 1);

        state.advance(49.0, &down);
        assert_eq!(state.active().y, y);
        state.advance(1.0, &down.with(Action::MoveDown, 2));
        assert_eq!(state.active().y, y + 1);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_soft_drop_never_slower_than_gravity() {
        let fast = |mut state: GameSession| {
            state.level = 14;
            state.gravity_ms = gravity_interval_ms(14);
            state
        };
        let mut falling = fast(session(PieceKind::T));
        let mut held = fast(session(PieceKind::T));
        let y = falling.active().y;

        for frame in 1..=8 {
            falling.advance(16.0, &idle());
            held.advance(16.0, &idle().with(Action::MoveDown, frame));
        }

        assert_eq!(falling.active().y, y + 8);
        assert_eq!(held.active().y, y + 8);
        // Every step came from gravity
        assert_eq!(held.score(), 0);
    }

    #[test]
    fn test_das_arr_sequence() {
        let mut state = session(PieceKind::T);
        assert_eq!(state.active().x, 3);

        let mut xs = Vec::new();
        for frame in 1..=11 {
            state.advance(16.0, &idle().with(Action::MoveLeft, frame));
            xs.push(state.active().x);
        }
        // Moves on frames 1, 8 and 11
        assert_eq!(xs, vec![2, 2, 2, 2, 2, 2, 2, 1, 1, 1, 0]);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut state = session(PieceKind::T);
        let input = idle()
            .with(Action::MoveLeft, 1)
            .with(Action::MoveRight, 1);
        state.advance(16.0, &input);
        assert_eq!(state.active().x, 2);
    }

    #[test]
    fn test_rotation_only_on_press() {
        let mut state = session(PieceKind::T);
        state.advance(16.0, &idle().with(Action::RotateCw, 1));
        assert_eq!(state.active().rotation, Rotation::East);
        state.advance(16.0, &idle().with(Action::RotateCw, 2));
        assert_eq!(state.active().rotation, Rotation::East);
        state.advance(16.0, &idle().with(Action::RotateCcw, 1));
        assert_eq!(state.active().rotation, Rotation::North);
    }

    #[test]
    fn test_lock_delay() {
        let mut state = session(PieceKind::O);
        state.active.y = 18;

        state.advance(16.0, &idle());
        assert_eq!(state.phase(), PiecePhase::Locking);
        assert_eq!(state.lock_timer_ms(), 0.0);

        state.advance(1000.0, &idle());
        state.advance(999.0, &idle());
        assert_eq!(state.field().solid_count(), 0);

        state.advance(1.0, &idle());
        assert_eq!(state.field().solid_count(), 4);
        assert_eq!(state.phase(), PiecePhase::Falling);
    }

    #[test]
    fn test_landing_step_starts_lock_delay() {
        let mut state = session(PieceKind::O);
        state.active.y = 17;

        state.advance(1000.0, &idle());
        assert_eq!(state.active().y, 18);
        assert_eq!(state.phase(), PiecePhase::Locking);
        assert_eq!(state.lock_timer_ms(), 0.0);

        state.advance(1999.0, &idle());
        assert_eq!(state.field().solid_count(), 0);
        state.advance(1.0, &idle());
        assert_eq!(state.field().solid_count(), 4);
    }

    #[test]
    fn test_lock_delay_resets_on_rotation() {
        let mut field = Field::new();
        field.fill(4, 18, TileColor::Red);
        let mut state = session(PieceKind::I).with_field(field);
        // Vertical I standing on a one-cell ledge
        state.active = ActivePiece::new(PieceKind::I, 3, 14, Rotation::East);
        assert!(!state.active.can_move_down(&state.field));

        state.advance(16.0, &idle());
        assert_eq!(state.phase(), PiecePhase::Locking);
        state.advance(700.0, &idle());
        assert_eq!(state.lock_timer_ms(), 700.0);

        // Flat I at row 16 clears the ledge
        state.advance(16.0, &idle().with(Action::RotateCcw, 1));
        assert_eq!(state.active().rotation, Rotation::North);
        assert_eq!(state.active().y, 14);
        assert_eq!(state.phase(), PiecePhase::Falling);
        assert_eq!(state.lock_timer_ms(), 0.0);
    }

    #[test]
    fn test_lock_delay_resets_when_descent_reenabled() {
        let mut field = Field::new();
        field.fill(5, 19, TileColor::Red);
        let mut state = session(PieceKind::O).with_field(field);
        state.active.y = 17;

        state.advance(16.0, &idle());
        assert_eq!(state.phase(), PiecePhase::Locking);
        state.advance(1500.0, &idle());
        assert_eq!(state.lock_timer_ms(), 1500.0);

        // Off the ledge
        assert!(state.move_left());
        assert_eq!(state.phase(), PiecePhase::Falling);
        assert_eq!(state.lock_timer_ms(), 0.0);
    }

    #[test]
    fn test_move_while_still_grounded_keeps_lock_timer() {
        let mut field = Field::new();
        field.fill(3, 19, TileColor::Red);
        field.fill(4, 19, TileColor::Red);
        field.fill(5, 19, TileColor::Red);
        let mut state = session(PieceKind::O).with_field(field);
        state.active.y = 17;

        state.advance(16.0, &idle());
        state.advance(500.0, &idle());
        assert!(state.move_left());
        assert_eq!(state.phase(), PiecePhase::Locking);
        assert_eq!(state.lock_timer_ms(), 500.0);
    }

    #[test]
    fn test_hard_drop_via_input() {
        let mut state = session(PieceKind::O);
        state.advance(16.0, &idle().with(Action::HardDrop, 1));
        assert_eq!(state.field().solid_count(), 4);
        assert_eq!(state.score(), 40);

        // Held, not pressed: nothing more
        state.advance(16.0, &idle().with(Action::HardDrop, 2));
        assert_eq!(state.field().solid_count(), 4);
    }

    #[test]
    fn test_hold_empty_slot() {
        let mut state = session(PieceKind::T);
        let upcoming = state.next_pieces(1).next();

        assert!(state.hold());
        assert_eq!(state.hold_piece(), Some(PieceKind::T));
        assert_eq!(Some(state.active().kind), upcoming);
        assert!(!state.can_hold());

        // Second hold before lock does nothing
        let active = state.active();
        assert!(!state.hold());
        assert_eq!(state.active(), active);
        assert_eq!(state.hold_piece(), Some(PieceKind::T));
        assert_eq!(
            state.events(),
            &[GameEvent::PieceHeld {
                held: PieceKind::T,
                active: active.kind
            }]
        );
    }

    #[test]
    fn test_hold_swap_after_lock() {
        let mut state = session(PieceKind::T);
        assert!(state.hold());

        state.hard_drop();
        assert!(state.can_hold());

        let third = state.active().kind;
        assert!(state.hold());
        assert_eq!(state.active(), ActivePiece::spawn(PieceKind::T));
        assert_eq!(state.hold_piece(), Some(third));
        assert_eq!(state.lines_cleared(), 0);
        assert_eq!(state.field().solid_count(), 4);
    }

    #[test]
    fn test_hold_resets_timers() {
        let mut state = session(PieceKind::O);
        state.active.y = 18;
        state.advance(16.0, &idle());
        state.advance(700.0, &idle());

        state.advance(16.0, &idle().with(Action::Hold, 1));
        assert_eq!(state.phase(), PiecePhase::Falling);
        assert_eq!(state.lock_timer_ms(), 0.0);
        assert_eq!(state.hold_piece(), Some(PieceKind::O));
    }

    #[test]
    fn test_pause_freezes_timers() {
        let mut state = session(PieceKind::T);
        let y = state.active().y;

        state.advance(16.0, &idle().with(Action::Pause, 1));
        assert!(state.paused());
        assert_eq!(state.elapsed_ms(), 0.0);
        assert_eq!(state.pause_elapsed_ms(), 16.0);

        state.advance(5000.0, &idle().with(Action::Pause, 2));
        assert!(state.paused());
        assert_eq!(state.active().y, y);
        assert_eq!(state.elapsed_ms(), 0.0);
        assert_eq!(state.pause_elapsed_ms(), 5016.0);

        // Actions are ignored while paused
        assert!(!state.move_left());
        assert_eq!(state.hard_drop(), 0);

        state.advance(16.0, &idle().with(Action::Pause, 1));
        assert!(!state.paused());
        assert_eq!(state.elapsed_ms(), 16.0);
    }

    #[test]
    fn test_banner_expires() {
        let mut field = Field::new();
        field.fill_row_except(19, &[4, 5], TileColor::Red);
        let mut state = session(PieceKind::O).with_field(field);
        state.hard_drop();
        assert_eq!(state.banner(), Some(Banner::Single));

        state.advance(1999.0, &idle());
        assert_eq!(state.banner(), Some(Banner::Single));
        state.advance(1.0, &idle());
        assert_eq!(state.banner(), None);
    }

    #[test]
    fn test_game_failed_is_sticky() {
        let mut field = Field::new();
        field.fill(4, 0, TileColor::Red);
        field.fill(5, 0, TileColor::Red);
        let mut state = session(PieceKind::O).with_field(field);

        assert_eq!(state.hard_drop(), 0);
        assert!(state.game_failed());
        assert!(state.is_over());
        assert!(state.events().contains(&GameEvent::GameFailed));

        let snapshot = state.snapshot();
        state.advance(5000.0, &idle().with(Action::MoveLeft, 1));
        assert_eq!(state.snapshot(), snapshot);
        assert!(!state.hold());
        state.toggle_pause();
        assert!(!state.paused());
    }

    #[test]
    fn test_sprint_finishes_with_time() {
        let mut field = Field::new();
        field.fill_row_except(19, &[4, 5], TileColor::Red);
        let mut state = GameSession::new(GameMode::Sprint, SessionConfig::with_seed(9))
            .with_field(field)
            .with_active(PieceKind::O);
        state.lines = 39;
        state.level = 3;

        state.advance(16.0, &idle().with(Action::HardDrop, 1));

        assert!(state.is_finished());
        assert_eq!(state.result(), Some(ModeResult::Time(16.0)));
        assert!(state
            .take_events()
            .contains(&GameEvent::Finished(ModeResult::Time(16.0))));
        assert!(state.events().is_empty());

        // Finished sessions stop simulating
        state.advance(16.0, &idle());
        assert_eq!(state.elapsed_ms(), 16.0);
    }

    #[test]
    fn test_ultra_finishes_on_time() {
        let mut state = GameSession::new(GameMode::Ultra, SessionConfig::with_seed(5));
        state.advance(119_000.0, &idle());
        assert!(!state.is_finished());
        state.advance(1_000.0, &idle());
        assert_eq!(state.result(), Some(ModeResult::Score(0)));
    }

    #[test]
    fn test_take_events_drains() {
        let mut state = session(PieceKind::O);
        state.hard_drop();
        assert_eq!(state.take_events().len(), 1);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut state = session(PieceKind::O);
        let total = MAX_PENDING_EVENTS + 3;
        for y in 0..total {
            state.emit(GameEvent::PieceLocked {
                kind: PieceKind::O,
                x: 4,
                y: y as i8,
                rotation: Rotation::North,
            });
        }

        let events = state.take_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        // Oldest dropped first
        assert!(matches!(events[0], GameEvent::PieceLocked { y: 3, .. }));
        assert!(matches!(
            events.last(),
            Some(GameEvent::PieceLocked { y, .. }) if *y as usize == total - 1
        ));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = session(PieceKind::O);
        state.hard_drop();
        let snap = state.snapshot();
        assert_eq!(snap.solid_count(), 4);
        assert_eq!(snap.score, 40);
        assert_eq!(snap.next_queue.len(), 5);
        assert_eq!(snap.active, ActiveSnapshot::from(state.active()));
        assert_eq!(snap.ghost_y, state.ghost_row());
        assert!(snap.playable());
    }
}
