//! The noughts and crosses program: a turn state machine around the board and the search.
//!
//! The program never draws anything itself. Everything the player sees goes through a
//! [`NacDisplay`], and the AI's "thinking" pause and the delayed result are queued on a
//! [`Scheduler`] that the host drives with [`NoughtsAndCrosses::tick`].

use std::time::Duration;

use log::{debug, error};

use crate::board::{FIRST_MARK, Mark};
use crate::boards::noughts_and_crosses::{BOARD_SIZE, NoughtsAndCrossesBoard};
use crate::config::NacConfig;
use crate::random::RandomGenerator;
use crate::schedule::{CancellationToken, Scheduler};
use crate::search::MinimaxSearch;

/// Presentation side of the program, implemented by the host.
pub trait NacDisplay {
    /// Shows the nought/cross choice.
    fn show_choosing(&mut self);

    /// Shows an empty board.
    fn show_in_game(&mut self);

    /// Draws one cell. `None` clears it.
    fn render_cell(&mut self, x: usize, y: usize, mark: Option<Mark>);

    /// Enables board input while it is the player's turn and disables it while the AI thinks.
    fn set_input_enabled(&mut self, enabled: bool);

    /// Announces the result. `winner` is `None` for a draw.
    fn show_game_over(&mut self, winner: Option<Mark>, human: Mark);

    /// The program has shut down.
    fn close(&mut self) {}
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameState {
    /// The player is choosing a mark.
    Opening,
    /// Moves alternate between the player and the AI.
    InGame,
    /// A win or draw has been reached.
    GameOver,
    /// The program has been shut down.
    Closed,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum PendingAction {
    AiMove,
    RevealGameOver,
}

/// Noughts and crosses against a minimax AI.
///
/// Cross always opens. If the player picks nought, the AI plays first.
pub struct NoughtsAndCrosses<D: NacDisplay, K: RandomGenerator> {
    display: D,
    config: NacConfig,
    state: GameState,
    board: Option<NoughtsAndCrossesBoard>,
    human: Mark,
    current_turn: Mark,
    winner: Option<Mark>,
    result_shown: bool,
    scheduler: Scheduler<PendingAction>,
    round_token: CancellationToken,
    random: K,
}

impl<D: NacDisplay, K: RandomGenerator> NoughtsAndCrosses<D, K> {
    pub fn new(display: D, config: NacConfig, random: K) -> Self {
        Self {
            display,
            config,
            state: GameState::Opening,
            board: None,
            human: FIRST_MARK,
            current_turn: FIRST_MARK,
            winner: None,
            result_shown: false,
            scheduler: Scheduler::new(),
            round_token: CancellationToken::new(),
            random,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// The live board, if a round is in progress or just finished.
    pub fn board(&self) -> Option<&NoughtsAndCrossesBoard> {
        self.board.as_ref()
    }

    pub fn human_mark(&self) -> Mark {
        self.human
    }

    pub fn current_turn(&self) -> Mark {
        self.current_turn
    }

    /// The winner of the finished round, `None` for a draw or while still playing.
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// Whether an AI move is queued.
    pub fn is_ai_thinking(&self) -> bool {
        self.state == GameState::InGame
            && self.current_turn != self.human
            && !self.scheduler.is_idle()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Opens the program on the mark choice.
    pub fn start_up(&mut self) {
        self.go_to_state(GameState::Opening);
    }

    /// The player picks a mark and the round begins. Ignored outside `Opening`.
    pub fn choose_mark(&mut self, mark: Mark) -> bool {
        if self.state != GameState::Opening {
            return false;
        }

        self.human = mark;
        self.current_turn = FIRST_MARK;
        self.go_to_state(GameState::InGame);
        true
    }

    /// The player clicks a cell.
    ///
    /// Returns `false` without changing anything when no round is running, it is not the
    /// player's turn, the cell is taken, or the coordinates are off the board.
    pub fn click_cell(&mut self, x: usize, y: usize) -> bool {
        if self.state != GameState::InGame || self.current_turn != self.human {
            return false;
        }

        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return false;
        }

        self.play_turn(x, y)
    }

    /// Answers the "play again?" question once the result is showing.
    ///
    /// `true` goes back to choosing a mark, `false` shuts the program down.
    pub fn play_again(&mut self, again: bool) -> bool {
        if self.state != GameState::GameOver || !self.result_shown {
            return false;
        }

        if again {
            self.go_to_state(GameState::Opening);
        } else {
            self.shut_down();
        }
        true
    }

    /// Advances time, running every queued action that is now due.
    pub fn tick(&mut self, elapsed: Duration) {
        self.scheduler.advance_clock(elapsed);
        while let Some(action) = self.scheduler.pop_due() {
            match action {
                PendingAction::AiMove => self.play_ai_turn(),
                PendingAction::RevealGameOver => self.reveal_game_over(),
            }
        }
    }

    /// Stops the program. Anything still queued is discarded and never touches the board.
    pub fn shut_down(&mut self) {
        self.round_token.cancel();
        self.scheduler.clear();
        self.board = None;
        self.state = GameState::Closed;
        debug!("noughts and crosses shut down");
        self.display.close();
    }

    fn go_to_state(&mut self, state: GameState) {
        debug!("noughts and crosses: {:?} -> {:?}", self.state, state);
        self.state = state;
        match state {
            GameState::Opening => {
                self.start_new_round();
                self.display.show_choosing();
            }
            GameState::InGame => {
                let board = NoughtsAndCrossesBoard::new();
                self.display.show_in_game();
                for cell in board.cells() {
                    self.display.render_cell(cell.x, cell.y, cell.mark);
                }
                self.board = Some(board);

                if self.current_turn != self.human {
                    self.schedule_ai_turn();
                } else {
                    self.display.set_input_enabled(true);
                }
            }
            GameState::GameOver => {
                self.display.set_input_enabled(false);
                self.scheduler.schedule(
                    self.config.game_over_delay(),
                    &self.round_token,
                    PendingAction::RevealGameOver,
                );
            }
            GameState::Closed => {}
        }
    }

    /// Voids whatever the previous round left queued.
    fn start_new_round(&mut self) {
        self.round_token.cancel();
        self.round_token = CancellationToken::new();
        self.scheduler.clear();
        self.board = None;
        self.winner = None;
        self.result_shown = false;
    }

    fn schedule_ai_turn(&mut self) {
        self.display.set_input_enabled(false);
        self.scheduler.schedule(
            self.config.ai_delay(),
            &self.round_token,
            PendingAction::AiMove,
        );
    }

    /// Plays one cell for the side to move, then checks for the end of the round.
    fn play_turn(&mut self, x: usize, y: usize) -> bool {
        let Some(board) = self.board.as_mut() else {
            return false;
        };
        if !board.play_cell(x, y, self.current_turn) {
            return false;
        }

        let winner = board.winning_mark();
        let draw = board.check_draw();
        self.display.render_cell(x, y, Some(self.current_turn));

        if winner.is_some() || draw {
            self.winner = winner;
            self.go_to_state(GameState::GameOver);
            return true;
        }

        self.current_turn = self.current_turn.opponent();
        if self.current_turn != self.human {
            self.schedule_ai_turn();
        } else {
            self.display.set_input_enabled(true);
        }
        true
    }

    fn play_ai_turn(&mut self) {
        if self.state != GameState::InGame || self.current_turn == self.human {
            return;
        }
        let Some(board) = self.board else {
            return;
        };

        let random = std::mem::take(&mut self.random);
        let search = MinimaxSearch::builder(board, self.current_turn)
            .with_random_generator(random)
            .with_max_depth(self.config.search_depth)
            .build();
        let best_move = search.get_best_move();
        self.random = search.into_random_generator();

        match best_move {
            Some((x, y)) => {
                debug!("AI plays {:?} at ({x}, {y})", self.current_turn);
                self.play_turn(x, y);
            }
            None => error!("AI has no move on a board that is still in play"),
        }
    }

    fn reveal_game_over(&mut self) {
        if self.state != GameState::GameOver {
            return;
        }

        self.result_shown = true;
        self.display.show_game_over(self.winner, self.human);
    }
}
