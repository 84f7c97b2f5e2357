//! Session engine and restart scheduler.
//!
//! The engine exclusively owns the live [`Session`], applies inbound events
//! to it, evaluates progress on a periodic tick, and replaces the session
//! wholesale when a round completes or times out. It is the only component
//! with temporal behavior; both timers are engine-owned tasks that are
//! cancelled before a new round installs its own.

use crate::config::Config;
use crate::event::GameEvent;
use crate::progress;
use crate::puzzle::{GRID_SIZE, PuzzleError, PuzzleSource};
use crate::session::{Session, SessionError};
use chrono::Utc;
use derive_more::{Display, Error, From};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Fatal failures while starting a round.
#[derive(Debug, Display, Error, From)]
pub enum EngineError {
    /// The puzzle source failed to deliver a playable round.
    #[display("{_0}")]
    Puzzle(PuzzleError),
    /// The generated round violated the session contract.
    #[display("{_0}")]
    Session(SessionError),
}

/// Messages processed by the engine task, one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMessage {
    /// An event from the inbound wire.
    Client(GameEvent),
    /// Periodic evaluation armed for the given round generation.
    Tick {
        /// Round the timer was armed against; stale generations are ignored.
        round: u64,
    },
}

/// One cell as shown to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    /// Column, 0-based.
    pub x: usize,
    /// Row, 0-based.
    pub y: usize,
    /// Current digit; 0 renders empty.
    pub value: u8,
    /// Pre-filled by the template, rendered read-only.
    pub fixed: bool,
}

/// Full board snapshot, one row unit per board row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Rows top to bottom, each left to right.
    pub rows: Vec<Vec<CellView>>,
}

/// Terminal or cleared status overlay content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No overlay; shown when a fresh round begins.
    Clear,
    /// The round was solved.
    Success,
    /// The round timed out.
    Failed,
}

/// Both progress indicators from one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressView {
    /// Completion percent, quantized to tens.
    pub percent_complete: i64,
    /// Elapsed share of the round in percent.
    pub percent_time: i64,
    /// Whole minutes remaining, rounded up.
    pub minutes_remaining: i64,
}

/// View data emitted by the engine; rendering happens downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// Replace the whole board.
    Board(BoardView),
    /// Replace a single cell.
    Cell(CellView),
    /// Replace the status overlay.
    Status(Status),
    /// Refresh both progress indicators.
    Progress(ProgressView),
}

/// Session engine: owns the live session and its two timers.
pub struct Engine<S> {
    source: S,
    config: Config,
    session: Option<Session>,
    round: u64,
    ticker: Option<JoinHandle<()>>,
    restart: Option<JoinHandle<()>>,
    msg_tx: mpsc::UnboundedSender<EngineMessage>,
    view_tx: mpsc::UnboundedSender<ViewUpdate>,
}

impl<S: PuzzleSource> Engine<S> {
    /// Creates an engine that schedules its timers onto `msg_tx` and emits
    /// view updates onto `view_tx`.
    pub fn new(
        source: S,
        config: Config,
        msg_tx: mpsc::UnboundedSender<EngineMessage>,
        view_tx: mpsc::UnboundedSender<ViewUpdate>,
    ) -> Self {
        Self {
            source,
            config,
            session: None,
            round: 0,
            ticker: None,
            restart: None,
            msg_tx,
            view_tx,
        }
    }

    /// Starts the first round, then applies messages until the stream ends.
    pub async fn run(
        mut self,
        mut messages: mpsc::UnboundedReceiver<EngineMessage>,
    ) -> Result<(), EngineError> {
        self.start_round()?;

        while let Some(message) = messages.recv().await {
            match message {
                EngineMessage::Client(event) => self.apply_event(event)?,
                EngineMessage::Tick { round } => self.tick(round),
            }
        }

        info!("message stream closed, engine stopping");
        Ok(())
    }

    /// Discards any current session and starts a fresh round.
    ///
    /// Timers armed for the superseded round are cancelled before the new
    /// ones are installed; a stale tick must never evaluate the new session.
    #[instrument(skip(self))]
    pub fn start_round(&mut self) -> Result<(), EngineError> {
        self.cancel_timers();
        self.round += 1;

        let template = self.source.generate(*self.config.difficulty())?;
        let solution = self
            .source
            .solve(&template)
            .filter(|grid| grid.is_complete())
            .ok_or(PuzzleError::Solve)?;

        let session = Session::new(template, solution, Utc::now(), self.config.round_duration())?;
        info!(
            round = self.round,
            blanks = session.blank_count(),
            "starting round"
        );

        self.emit(ViewUpdate::Status(Status::Clear));
        self.emit(ViewUpdate::Board(board_view(&session)));
        self.session = Some(session);
        self.arm_ticker();
        Ok(())
    }

    /// Applies one inbound event to the live session.
    #[instrument(skip(self))]
    pub fn apply_event(&mut self, event: GameEvent) -> Result<(), EngineError> {
        match event {
            GameEvent::SetCell { x, y, value } => {
                let Some(session) = self.session.as_mut() else {
                    return Ok(());
                };
                // The parser admits coordinate 9, one past the board edge;
                // such writes are dropped here instead of panicking.
                if session.set_cell(x, y, value).is_err() {
                    warn!(x, y, value, "edit outside the board dropped");
                    return Ok(());
                }
                let fixed = session.is_fixed(x, y);
                debug!(x, y, value, "cell updated");
                self.emit(ViewUpdate::Cell(CellView { x, y, value, fixed }));
            }
            GameEvent::NewPlayer { id } => {
                debug!(player = id, "player joined, sending board snapshot");
                if let Some(session) = &self.session {
                    let view = board_view(session);
                    self.emit(ViewUpdate::Board(view));
                }
            }
            GameEvent::StartGame => self.start_round()?,
            GameEvent::Noop => {}
        }
        Ok(())
    }

    /// One periodic evaluation pass for the given round generation.
    ///
    /// Completion is checked before timeout; when both hold in the same
    /// tick the round counts as solved. A terminal result cancels the
    /// ticker and arms the one-shot restart.
    #[instrument(skip(self))]
    pub fn tick(&mut self, round: u64) {
        if round != self.round || self.restart.is_some() {
            debug!(current = self.round, "stale tick ignored");
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        let completion = progress::completion(
            session.board().cells(),
            session.solution().cells(),
            session.blank_count(),
        );
        let time = progress::time_status(session.start_time(), session.end_time(), Utc::now());

        if completion.is_complete {
            info!(round, "round solved");
            self.emit(ViewUpdate::Status(Status::Success));
        } else if time.is_out_of_time {
            info!(round, "round timed out");
            self.emit(ViewUpdate::Status(Status::Failed));
        }

        if completion.is_complete || time.is_out_of_time {
            if let Some(ticker) = self.ticker.take() {
                ticker.abort();
            }
            self.schedule_restart();
        }

        self.emit(ViewUpdate::Progress(ProgressView {
            percent_complete: completion.percent,
            percent_time: time.percent,
            minutes_remaining: time.minutes_remaining,
        }));
    }

    /// Current round generation; bumps on every restart.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Returns the live session, if a round has started.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// True while the engine is between rounds waiting on the restart delay.
    pub fn restart_scheduled(&self) -> bool {
        self.restart.is_some()
    }

    /// Arms the periodic evaluation timer for the current round.
    fn arm_ticker(&mut self) {
        let tx = self.msg_tx.clone();
        let round = self.round;
        let period = self.config.check_interval();

        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; skip it so evaluation
            // starts one full period after the round begins.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(EngineMessage::Tick { round }).is_err() {
                    break;
                }
            }
        }));
    }

    /// Arms the one-shot timer that begins the next round.
    fn schedule_restart(&mut self) {
        let tx = self.msg_tx.clone();
        let delay = self.config.restart_delay();
        debug!(?delay, "restart scheduled");

        self.restart = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(EngineMessage::Client(GameEvent::StartGame));
        }));
    }

    fn cancel_timers(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if let Some(restart) = self.restart.take() {
            restart.abort();
        }
    }

    fn emit(&self, update: ViewUpdate) {
        if self.view_tx.send(update).is_err() {
            debug!("view channel closed, update dropped");
        }
    }
}

impl<S> Drop for Engine<S> {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if let Some(restart) = self.restart.take() {
            restart.abort();
        }
    }
}

/// Snapshots the session board for observers.
fn board_view(session: &Session) -> BoardView {
    let rows = (0..GRID_SIZE)
        .map(|y| {
            (0..GRID_SIZE)
                .map(|x| CellView {
                    x,
                    y,
                    value: session.board().get(x, y).unwrap_or(0),
                    fixed: session.is_fixed(x, y),
                })
                .collect()
        })
        .collect();
    BoardView { rows }
}
