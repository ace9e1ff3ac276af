// Simple command-line application to play chess against the computer
//
// Moves are entered either as minimal SAN (`e4`, `Nf3`, `Bxc6`) or as UCI (`e2e4`). Type `undo`
// to take back the last full move, `quit` to exit. Set `RUST_LOG=debug` to see the engine log.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Instant;
use tapchess::{
    board::PrettyStyle, Color, GameMode, Move, NumberPolicy, Options, Session,
};

fn main() {
    env_logger::init();

    let mut stdin = io::stdin().lock();
    let mut rng = StdRng::from_entropy();
    let mut session = Session::with_options(Options::default().with_mode(GameMode::HumanVsAi));

    loop {
        if let Some(outcome) = session.outcome() {
            println!("{}", session.board().pretty(PrettyStyle::Ascii));
            println!("Game finished: {}", outcome);
            println!("Notation:");
            println!("{}", session.history(NumberPolicy::FromStart));
            break;
        }

        if session.is_computer_turn() {
            // Drive the deferred move the same way a UI event loop would
            while session.poll(Instant::now(), &mut rng).is_none() {
                if session.pending_computer_move().is_none() {
                    println!("Computer has no moves");
                    return;
                }
                thread::sleep(session.options().ai_delay / 10);
            }
            if let Some(last) = session.records().last() {
                println!("Computer plays {}", last);
            }
            println!();
            continue;
        }

        println!("{}", session.board().pretty(PrettyStyle::Ascii));
        if session.board().is_check(session.side()) {
            println!("Check!");
        }
        print!("Your move ({}): ", session.side());
        io::stdout().flush().unwrap();
        let mut s = String::new();
        if stdin.read_line(&mut s).unwrap() == 0 {
            break;
        }
        let s = s.trim();

        match s {
            "quit" => break,
            "undo" => {
                // Take back the computer reply as well
                if let Err(e) = session.undo_move() {
                    println!("Cannot undo: {}", e);
                    println!();
                    continue;
                }
                while session.side() != Color::White {
                    if session.undo_move().is_err() {
                        break;
                    }
                }
                println!();
                continue;
            }
            _ => {}
        }

        let mv = match Move::from_san(s, session.board(), session.side())
            .or_else(|_| Move::from_uci(s, session.board()))
        {
            Ok(mv) => mv,
            Err(e) => {
                println!("Bad move: {}", e);
                println!();
                continue;
            }
        };

        // The move is legal, but the session can still reject it (e.g. wrong side)
        if let Err(e) = session.play_move(mv.src(), mv.dst()) {
            println!("Bad move: {}", e);
        }
        println!();
    }
}
