//! Two networked sessions wired back to back over an in-process channel.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use generic_array::typenum::U15;

use gomoku::core::{GridIndex, Stone};
use gomoku::net::{MoveChannel, MoveMessage, WireError, WireResult};
use gomoku::session::{
    OnlineSession, Placement, TurnState, FLASH_CYCLES, FLASH_INTERVAL, INPUT_DEBOUNCE,
};

/// Both directions of an in-process connection, with a switch to simulate
/// losing it.
#[derive(Default)]
struct Wire {
    to_first: VecDeque<MoveMessage>,
    to_second: VecDeque<MoveMessage>,
    cut: bool,
}

/// Handle onto the shared wire, kept outside the sessions so a test can cut
/// the connection mid-game.
#[derive(Clone)]
struct WireHandle(Rc<RefCell<Wire>>);

impl WireHandle {
    fn cut(&self) {
        self.0.borrow_mut().cut = true;
    }
}

struct LoopbackChannel {
    wire: Rc<RefCell<Wire>>,
    first: bool,
}

fn pair() -> (LoopbackChannel, LoopbackChannel, WireHandle) {
    let wire = Rc::new(RefCell::new(Wire::default()));
    (
        LoopbackChannel {
            wire: Rc::clone(&wire),
            first: true,
        },
        LoopbackChannel {
            wire: Rc::clone(&wire),
            first: false,
        },
        WireHandle(wire),
    )
}

impl MoveChannel for LoopbackChannel {
    fn send(&mut self, message: MoveMessage) -> WireResult<()> {
        let mut wire = self.wire.borrow_mut();
        if wire.cut {
            return Err(WireError::Disconnected);
        }
        if self.first {
            wire.to_second.push_back(message);
        } else {
            wire.to_first.push_back(message);
        }
        Ok(())
    }

    fn try_recv(&mut self) -> WireResult<Option<MoveMessage>> {
        let mut wire = self.wire.borrow_mut();
        let queue = if self.first {
            &mut wire.to_first
        } else {
            &mut wire.to_second
        };
        if let Some(message) = queue.pop_front() {
            return Ok(Some(message));
        }
        if wire.cut {
            return Err(WireError::Disconnected);
        }
        Ok(None)
    }
}

fn xy(x: usize, y: usize) -> GridIndex {
    GridIndex::new(y, x)
}

/// Timestamps far enough apart to clear the input debounce on either side.
fn clock() -> impl Iterator<Item = Instant> {
    let start = Instant::now();
    (1u32..).map(move |n| start + INPUT_DEBOUNCE * n)
}

#[test]
fn test_turn_exchange() {
    let (wire_a, wire_b, _) = pair();
    let mut a = OnlineSession::<U15, _>::new(wire_a);
    let mut b = OnlineSession::<U15, _>::new(wire_b);
    let mut clock = clock();

    let now = clock.next().unwrap();
    assert_eq!(
        a.place(xy(7, 7), now).unwrap(),
        Placement::Accepted(Stone::Black)
    );
    assert_eq!(a.turn_state(), TurnState::Wait);

    let now = clock.next().unwrap();
    assert_eq!(b.tick(now).unwrap(), Some(xy(7, 7)));
    assert_eq!(b.local_stone(), Some(Stone::White));
    assert_eq!(b.turn_state(), TurnState::Ready);
    assert_eq!(b.board().get(xy(7, 7)).stone(), Some(Stone::Black));

    let now = clock.next().unwrap();
    assert_eq!(
        b.place(xy(8, 8), now).unwrap(),
        Placement::Accepted(Stone::White)
    );
    assert_eq!(b.turn_state(), TurnState::Wait);

    let now = clock.next().unwrap();
    assert_eq!(a.tick(now).unwrap(), Some(xy(8, 8)));
    assert_eq!(a.turn_state(), TurnState::Ready);
    assert_eq!(a.board().get(xy(8, 8)).stone(), Some(Stone::White));

    assert_eq!(a.board().history().len(), b.board().history().len());
}

#[test]
fn test_networked_win_resets_both_sides() {
    let (wire_a, wire_b, _) = pair();
    let mut a = OnlineSession::<U15, _>::new(wire_a);
    let mut b = OnlineSession::<U15, _>::new(wire_b);
    let mut clock = clock();

    // black walks a row while white stays on its own row
    for x in 0..4 {
        assert!(a
            .place(xy(x, 7), clock.next().unwrap())
            .unwrap()
            .is_accepted());
        b.tick(clock.next().unwrap()).unwrap();
        assert!(b
            .place(xy(x, 0), clock.next().unwrap())
            .unwrap()
            .is_accepted());
        a.tick(clock.next().unwrap()).unwrap();
    }

    let winning_at = clock.next().unwrap();
    assert!(a.place(xy(4, 7), winning_at).unwrap().is_accepted());
    assert!(!a.is_playing());

    let seen_at = clock.next().unwrap();
    assert_eq!(b.tick(seen_at).unwrap(), Some(xy(4, 7)));
    assert!(!b.is_playing());

    // no input during the celebration
    assert_eq!(
        b.place(xy(9, 9), clock.next().unwrap()).unwrap(),
        Placement::Suspended
    );

    // play the flashes out on both sides
    a.tick(winning_at + FLASH_INTERVAL * FLASH_CYCLES).unwrap();
    b.tick(seen_at + FLASH_INTERVAL * FLASH_CYCLES).unwrap();

    for session in [&a, &b] {
        assert!(session.is_playing());
        assert_eq!(session.turn_state(), TurnState::Initial);
        assert_eq!(session.local_stone(), None);
        assert!(session.board().history().is_empty());
    }
}

#[test]
fn test_disconnect_while_waiting_is_fatal() {
    let (wire_a, _wire_b, handle) = pair();
    let mut a = OnlineSession::<U15, _>::new(wire_a);
    let mut clock = clock();

    a.place(xy(7, 7), clock.next().unwrap()).unwrap();
    assert_eq!(a.turn_state(), TurnState::Wait);

    handle.cut();
    assert!(matches!(
        a.tick(clock.next().unwrap()),
        Err(WireError::Disconnected)
    ));

    // nothing beyond the last successfully applied move
    assert_eq!(a.board().history(), [xy(7, 7)]);
    assert_eq!(a.turn_state(), TurnState::Wait);
}

#[test]
fn test_send_failure_is_fatal() {
    let (wire_a, _wire_b, handle) = pair();
    let mut a = OnlineSession::<U15, _>::new(wire_a);

    handle.cut();
    assert!(matches!(
        a.place(xy(7, 7), Instant::now()),
        Err(WireError::Disconnected)
    ));
}

#[test]
fn test_queued_move_is_delivered_before_the_failure() {
    let (wire_a, wire_b, handle) = pair();
    let mut a = OnlineSession::<U15, _>::new(wire_a);
    let mut b = OnlineSession::<U15, _>::new(wire_b);
    let mut clock = clock();

    a.place(xy(7, 7), clock.next().unwrap()).unwrap();
    handle.cut();

    // the move already on the wire still arrives, the next poll fails
    assert_eq!(b.tick(clock.next().unwrap()).unwrap(), Some(xy(7, 7)));
    assert!(matches!(
        a.tick(clock.next().unwrap()),
        Err(WireError::Disconnected)
    ));
}
