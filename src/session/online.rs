use std::time::Instant;

use generic_array::ArrayLength;
use log::debug;

use crate::core::{Board, GridIndex, Stone};
use crate::net::{MoveChannel, MoveMessage, WireResult};
use crate::session::{
    Debounce, Placement, SessionPhase, TurnCoordinator, TurnState, INPUT_DEBOUNCE,
};

/// A networked game against one peer on the other end of a [`MoveChannel`].
///
/// Single-threaded by design: the presentation loop calls [`place`] when the
/// local participant acts and [`tick`] once per frame, which polls the
/// channel without blocking. While the coordinator is in [`TurnState::Wait`]
/// no further local placements are accepted, so there is at most one
/// outstanding local move. A channel failure is fatal to the session.
///
/// [`place`]: OnlineSession::place
/// [`tick`]: OnlineSession::tick
#[derive(Debug)]
pub struct OnlineSession<S: ArrayLength, C: MoveChannel> {
    board: Board<S>,
    turn: TurnCoordinator,
    channel: C,
    phase: SessionPhase,
    debounce: Debounce,
}

impl<S: ArrayLength, C: MoveChannel> OnlineSession<S, C> {
    pub fn new(channel: C) -> Self {
        Self {
            board: Board::new(),
            turn: TurnCoordinator::new(),
            channel,
            phase: SessionPhase::Playing,
            debounce: Debounce::new(INPUT_DEBOUNCE),
        }
    }

    pub fn board(&self) -> &Board<S> {
        &self.board
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn.state()
    }

    /// The local participant's color, unset until first contact.
    pub fn local_stone(&self) -> Option<Stone> {
        self.turn.local_stone()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase.is_playing()
    }

    /// Offers a local placement at `now`. An accepted move is committed,
    /// serialized onto the channel and leaves the session waiting for the
    /// reply; a send failure is a fatal channel error.
    pub fn place(&mut self, index: GridIndex, now: Instant) -> WireResult<Placement> {
        if !self.phase.is_playing() {
            return Ok(Placement::Suspended);
        }
        if self.turn.state() == TurnState::Wait {
            return Ok(Placement::OutOfTurn);
        }
        if !self.debounce.try_accept(now) {
            return Ok(Placement::Debounced);
        }
        let Some(stone) = self.turn.commit_local(&mut self.board, index) else {
            return Ok(Placement::Occupied);
        };
        self.channel.send(MoveMessage::from(index))?;
        self.phase = SessionPhase::settle(&self.board, now);
        Ok(Placement::Accepted(stone))
    }

    /// Advances timed phases and polls the channel once; call every tick.
    /// Returns the remote placement applied this tick, if one arrived.
    /// The channel is only polled while a remote move can be expected, i.e.
    /// outside [`TurnState::Ready`].
    pub fn tick(&mut self, now: Instant) -> WireResult<Option<GridIndex>> {
        if self.phase.advance(&mut self.board, now) {
            self.reset();
        }
        if !self.phase.is_playing() {
            return Ok(None);
        }
        if self.turn.state() == TurnState::Ready {
            return Ok(None);
        }
        let Some(message) = self.channel.try_recv()? else {
            return Ok(None);
        };
        let index = message.to_index::<S>()?;
        self.turn.commit_remote(&mut self.board, index);
        self.phase = SessionPhase::settle(&self.board, now);
        Ok(Some(index))
    }

    pub fn reset(&mut self) {
        self.board.reset();
        self.turn.reset();
        self.phase = SessionPhase::Playing;
        self.debounce.reset();
        debug!("online session reset");
    }
}
