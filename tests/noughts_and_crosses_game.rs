use std::time::Duration;

use treespire::board::Mark;
use treespire::config::NacConfig;
use treespire::noughts_and_crosses::{GameState, NacDisplay, NoughtsAndCrosses};
use treespire::random::CustomNumberGenerator;

#[derive(Debug, PartialEq, Clone)]
enum Event {
    Choosing,
    InGame,
    Cell(usize, usize, Option<Mark>),
    Input(bool),
    GameOver(Option<Mark>, Mark),
    Closed,
}

#[derive(Default)]
struct RecordingDisplay {
    events: Vec<Event>,
}

impl RecordingDisplay {
    fn played_cells(&self) -> Vec<(usize, usize, Mark)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Cell(x, y, Some(mark)) => Some((*x, *y, *mark)),
                _ => None,
            })
            .collect()
    }

    fn game_overs(&self) -> Vec<(Option<Mark>, Mark)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::GameOver(winner, human) => Some((*winner, *human)),
                _ => None,
            })
            .collect()
    }
}

impl NacDisplay for RecordingDisplay {
    fn show_choosing(&mut self) {
        self.events.push(Event::Choosing);
    }

    fn show_in_game(&mut self) {
        self.events.push(Event::InGame);
    }

    fn render_cell(&mut self, x: usize, y: usize, mark: Option<Mark>) {
        self.events.push(Event::Cell(x, y, mark));
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.events.push(Event::Input(enabled));
    }

    fn show_game_over(&mut self, winner: Option<Mark>, human: Mark) {
        self.events.push(Event::GameOver(winner, human));
    }

    fn close(&mut self) {
        self.events.push(Event::Closed);
    }
}

type Game = NoughtsAndCrosses<RecordingDisplay, CustomNumberGenerator>;

const AI_DELAY: Duration = Duration::from_millis(500);
const REVEAL_DELAY: Duration = Duration::from_millis(1000);

fn new_game(seed: i64) -> Game {
    let mut game = NoughtsAndCrosses::new(
        RecordingDisplay::default(),
        NacConfig::default(),
        CustomNumberGenerator::new(seed),
    );
    game.start_up();
    game
}

/// Clicks the first free cell in row-major order.
fn click_first_free(game: &mut Game) -> (usize, usize) {
    for y in 0..3 {
        for x in 0..3 {
            if game.click_cell(x, y) {
                return (x, y);
            }
        }
    }
    panic!("no free cell accepted the click");
}

/// Plays the human side naively until the round ends, letting the AI answer each move.
fn play_out(game: &mut Game) {
    while game.state() == GameState::InGame {
        if game.current_turn() == game.human_mark() {
            click_first_free(game);
        } else {
            game.tick(AI_DELAY);
        }
    }
}

#[test]
fn opening_shows_the_mark_choice() {
    let game = new_game(1);

    assert_eq!(game.state(), GameState::Opening);
    assert_eq!(game.display().events, vec![Event::Choosing]);
}

#[test]
fn human_move_is_followed_by_a_delayed_ai_move() {
    // arrange
    let mut game = new_game(2);
    game.choose_mark(Mark::Cross);

    // act
    assert!(game.click_cell(1, 1));

    // assert
    assert!(game.is_ai_thinking());
    assert!(!game.click_cell(0, 0), "input is closed while the AI thinks");
    assert_eq!(game.display().played_cells(), vec![(1, 1, Mark::Cross)]);

    game.tick(Duration::from_millis(200));
    assert_eq!(game.display().played_cells().len(), 1);

    game.tick(Duration::from_millis(300));
    let played = game.display().played_cells();
    assert_eq!(played.len(), 2);
    assert_eq!(played[1].2, Mark::Nought);
    assert_eq!(game.current_turn(), Mark::Cross);
    assert_eq!(game.display().events.last(), Some(&Event::Input(true)));
}

#[test]
fn occupied_cell_click_is_a_no_op() {
    let mut game = new_game(3);
    game.choose_mark(Mark::Cross);
    game.click_cell(0, 0);
    game.tick(AI_DELAY);
    let events_before = game.display().events.len();

    let (ai_x, ai_y, _) = game.display().played_cells()[1];
    assert!(!game.click_cell(0, 0));
    assert!(!game.click_cell(ai_x, ai_y));

    assert_eq!(game.display().events.len(), events_before);
    assert_eq!(game.current_turn(), Mark::Cross);
}

#[test]
fn ai_opens_when_the_player_picks_nought() {
    let mut game = new_game(4);
    game.choose_mark(Mark::Nought);

    game.tick(AI_DELAY);

    let played = game.display().played_cells();
    assert_eq!(played.len(), 1);
    assert_eq!(played[0].2, Mark::Cross);
    assert_eq!(game.current_turn(), Mark::Nought);
}

#[test]
fn naive_player_never_beats_the_ai() {
    for (seed, mark) in [(5, Mark::Cross), (6, Mark::Nought), (7, Mark::Cross)] {
        // arrange
        let mut game = new_game(seed);
        game.choose_mark(mark);

        // act
        play_out(&mut game);

        // assert
        assert_eq!(game.state(), GameState::GameOver);
        assert_ne!(game.winner(), Some(mark), "seed {seed}");
    }
}

#[test]
fn result_is_revealed_after_the_delay() {
    let mut game = new_game(8);
    game.choose_mark(Mark::Cross);
    play_out(&mut game);
    assert!(game.display().game_overs().is_empty());
    assert!(!game.play_again(true), "no answer before the result shows");

    game.tick(REVEAL_DELAY);

    assert_eq!(game.display().game_overs(), vec![(game.winner(), Mark::Cross)]);
}

#[test]
fn play_again_returns_to_the_mark_choice() {
    let mut game = new_game(9);
    game.choose_mark(Mark::Nought);
    play_out(&mut game);
    game.tick(REVEAL_DELAY);

    assert!(game.play_again(true));

    assert_eq!(game.state(), GameState::Opening);
    assert!(game.board().is_none());
    assert_eq!(game.winner(), None);
    assert_eq!(game.display().events.last(), Some(&Event::Choosing));
    assert!(game.choose_mark(Mark::Cross));
}

#[test]
fn declining_to_play_again_closes_the_program() {
    let mut game = new_game(10);
    game.choose_mark(Mark::Cross);
    play_out(&mut game);
    game.tick(REVEAL_DELAY);

    assert!(game.play_again(false));

    assert_eq!(game.state(), GameState::Closed);
    assert_eq!(game.display().events.last(), Some(&Event::Closed));
}

#[test]
fn shutting_down_discards_a_pending_ai_move() {
    // arrange
    let mut game = new_game(11);
    game.choose_mark(Mark::Nought);
    assert!(game.is_ai_thinking());

    // act
    game.shut_down();
    game.tick(Duration::from_secs(10));

    // assert
    assert_eq!(game.state(), GameState::Closed);
    assert!(game.board().is_none());
    assert!(game.display().played_cells().is_empty());
}

#[test]
fn shutting_down_discards_a_pending_reveal() {
    let mut game = new_game(12);
    game.choose_mark(Mark::Cross);
    play_out(&mut game);

    game.shut_down();
    game.tick(Duration::from_secs(10));

    assert!(game.display().game_overs().is_empty());
}

#[test]
fn restarting_voids_the_previous_rounds_reveal() {
    let mut game = new_game(13);
    game.choose_mark(Mark::Cross);
    play_out(&mut game);
    game.tick(REVEAL_DELAY);
    game.play_again(true);
    game.choose_mark(Mark::Nought);

    game.tick(AI_DELAY);

    assert_eq!(game.display().game_overs().len(), 1);
    assert_eq!(game.state(), GameState::InGame);
}
