use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use generic_array::typenum::U15;

use gomoku::core::{Board, GridIndex};
use gomoku::net::{RetryPolicy, TcpMoveChannel, DEFAULT_PORT};
use gomoku::session::{
    LocalSession, OnlineSession, Placement, SessionPhase, FLASH_INTERVAL, FULL_BOARD_PAUSE,
    INPUT_DEBOUNCE,
};

/// How often the networked loop polls the channel and the input thread.
const TICK: Duration = Duration::from_millis(33);

#[derive(Parser)]
#[command(name = "gomoku", about = "Five in a row, locally or against one network peer")]
struct Args {
    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand)]
enum Role {
    /// Both players share this terminal
    Offline,
    /// Listen for one incoming peer
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Connect to a listening peer
    Connect {
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    match Args::parse().role {
        Role::Offline => run_offline(),
        Role::Serve { port } => run_online(TcpMoveChannel::accept(port)?),
        Role::Connect { host, port } => run_online(TcpMoveChannel::connect(
            (host.as_str(), port),
            RetryPolicy::default(),
        )?),
    }
}

enum Command {
    Place(GridIndex),
    Undo,
    Quit,
}

fn parse_command(line: &str, side: usize) -> Result<Command, String> {
    let line = line.trim();
    match line {
        "quit" | "q" => return Ok(Command::Quit),
        "undo" | "u" => return Ok(Command::Undo),
        _ => {}
    }
    let mut parts = line.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("expected `x y`, `undo` or `quit`".to_string());
    };
    let (Ok(x), Ok(y)) = (x.parse::<usize>(), y.parse::<usize>()) else {
        return Err("coordinates must be numbers".to_string());
    };
    if x >= side || y >= side {
        return Err(format!("position out of range, the board is {side}x{side}"));
    }
    Ok(Command::Place(GridIndex::new(y, x)))
}

fn print_board(board: &Board<U15>) {
    print!("   ");
    for x in 0..board.side() {
        print!(" {} ", x % 10);
    }
    println!();
    for y in 0..board.side() {
        print!("{:2} ", y);
        for x in 0..board.side() {
            print!("{}", board.get(GridIndex::new(y, x)));
        }
        println!();
    }
}

fn run_offline() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = LocalSession::<U15>::new();
    println!("offline game: enter `x y` to place, `undo` to take back, `quit` to leave");
    print_board(session.board());

    loop {
        println!("{} to move", session.active_stone());
        let Some(line) = read_line()? else { break };
        match parse_command(&line, session.board().side()) {
            Err(reason) => println!("{}", reason),
            Ok(Command::Quit) => break,
            Ok(Command::Undo) => {
                if session.undo(Instant::now()).is_none() {
                    println!("nothing to undo");
                }
                print_board(session.board());
            }
            Ok(Command::Place(index)) => {
                let placement = loop {
                    match session.place(index, Instant::now()) {
                        Placement::Debounced => thread::sleep(INPUT_DEBOUNCE),
                        placement => break placement,
                    }
                };
                match placement {
                    Placement::Accepted(_) => print_board(session.board()),
                    Placement::Occupied => println!("that cell is taken"),
                    _ => {}
                }
                if !session.is_playing() {
                    play_out_round_end(&mut session);
                }
            }
        }
    }
    Ok(())
}

/// Drives the celebration or the full-board pause to its end, then shows the
/// fresh board. Placement input is not read here; quitting still works
/// because the process only blocks between frames.
fn play_out_round_end(session: &mut LocalSession<U15>) {
    while !session.is_playing() {
        thread::sleep(frame_delay(session.phase()));
        session.tick(Instant::now());
        print_board(session.board());
    }
    println!("new round, black to move");
}

fn frame_delay(phase: &SessionPhase) -> Duration {
    match phase {
        SessionPhase::Pausing { .. } => FULL_BOARD_PAUSE,
        _ => FLASH_INTERVAL,
    }
}

fn run_online(channel: TcpMoveChannel) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = OnlineSession::<U15, _>::new(channel);
    let input = spawn_input_thread();
    println!("online game: enter `x y` to place, `quit` to leave");
    println!("whoever places first plays black");
    print_board(session.board());

    loop {
        let now = Instant::now();
        if let Some(index) = session.tick(now)? {
            println!("peer played {}", index);
            print_board(session.board());
            if session.is_playing() {
                println!("your turn");
            }
        }

        match input.try_recv() {
            Ok(line) => match parse_command(&line, session.board().side()) {
                Err(reason) => println!("{}", reason),
                Ok(Command::Quit) => break,
                Ok(Command::Undo) => println!("undo is only available offline"),
                Ok(Command::Place(index)) => {
                    let placement = loop {
                        match session.place(index, Instant::now())? {
                            Placement::Debounced => thread::sleep(INPUT_DEBOUNCE),
                            placement => break placement,
                        }
                    };
                    match placement {
                        Placement::Accepted(stone) => {
                            println!("you played {} as {}", index, stone);
                            print_board(session.board());
                        }
                        Placement::Occupied => println!("that cell is taken"),
                        Placement::OutOfTurn => println!("waiting for the peer's move"),
                        Placement::Suspended => println!("the round is finishing"),
                        Placement::Debounced => {}
                    }
                }
            },
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        if session.is_playing() {
            thread::sleep(TICK);
        } else {
            while !session.is_playing() {
                thread::sleep(frame_delay(session.phase()));
                session.tick(Instant::now())?;
                print_board(session.board());
            }
            println!("new round, the board is clear; whoever places first plays black");
        }
    }
    Ok(())
}

fn spawn_input_thread() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
