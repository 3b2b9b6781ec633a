extern crate treespire;

use treespire::board::{Board, FIRST_MARK, Mark};
use treespire::boards::noughts_and_crosses::{BOARD_SIZE, NoughtsAndCrossesBoard};
use treespire::random::StandardRandomGenerator;
use treespire::search::{DEFAULT_MAX_DEPTH, MinimaxSearch};

fn main() {
    // Start from an empty board, Cross moves first
    let mut board = NoughtsAndCrossesBoard::default();
    let mut to_move = FIRST_MARK;
    let mut rg = StandardRandomGenerator::default();

    while !board.check_end() {
        // Search the position for the side to move
        let search = MinimaxSearch::builder(board, to_move)
            .with_random_generator(rg)
            .with_max_depth(DEFAULT_MAX_DEPTH)
            .build();

        // Print how every reply scores
        let tree = search.get_tree();
        let root = search.get_root();
        for child in root.children() {
            let evaluation = search.minimax(child, false);
            println!(
                "{:?}: move {:?} scores {}",
                to_move,
                child.value().prev_move(),
                evaluation.score
            );
        }
        println!("{} positions searched", tree.nodes().count());

        let Some((x, y)) = search.get_best_move() else {
            break;
        };
        println!("{:?} plays ({}, {})\n", to_move, x, y);

        rg = search.into_random_generator();
        board.perform_move((x, y), to_move);
        print_board(&board);
        to_move = to_move.opponent();
    }

    match board.winning_mark() {
        Some(mark) => println!("{:?} wins!", mark),
        None => println!("It's a draw!"),
    }
}

fn print_board(board: &NoughtsAndCrossesBoard) {
    for y in 0..BOARD_SIZE {
        let row: Vec<&str> = (0..BOARD_SIZE)
            .map(|x| match board.cell(x, y).mark {
                Some(Mark::Cross) => "X",
                Some(Mark::Nought) => "O",
                None => ".",
            })
            .collect();
        println!("{}", row.join(" "));
    }
    println!();
}
