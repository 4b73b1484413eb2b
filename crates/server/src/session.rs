//! Game-analysis sessions: move navigation plus cancellable evaluation.
//!
//! Each session owns its move list and current position. Positions are never
//! mutated incrementally — every index change re-derives the board by
//! replaying the move prefix from the start, so landing on the same index
//! always yields the same FEN.
//!
//! At most one evaluation request is intentionally in flight per session.
//! Starting a new one cancels its predecessor, and a superseded request's
//! late result is discarded by a generation check rather than applied.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{oneshot, Mutex};

use crate::clients::chess_api::{AnalysisError, AnalysisResult};
use chess_core::replay::{self, STARTING_FEN};
use chess_core::{GameData, GameMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Position settled, no evaluation in flight.
    Ready,
    /// An evaluation request is in flight for the current position.
    Analyzing,
}

/// Everything a navigation step needs to hand to the evaluation task: the
/// position, the generation that must still be current when the result
/// lands, and the receiver the in-flight request listens on for cancellation.
pub struct AnalysisTicket {
    pub fen: String,
    pub generation: u64,
    pub cancel: oneshot::Receiver<()>,
}

pub struct NavigationState {
    champion_id: i64,
    game_id: String,
    game: GameData,
    /// `None` is the initial position, before any move.
    current_index: Option<usize>,
    fen: String,
    phase: Phase,
    pending: Option<oneshot::Sender<()>>,
    generation: u64,
    analysis: Option<AnalysisResult>,
    analysis_error: Option<String>,
}

impl NavigationState {
    /// A session starts at the initial position with no evaluation.
    /// Callers must only construct this with a game whose move list already
    /// replayed cleanly.
    pub fn new(champion_id: i64, game_id: String, game: GameData) -> Self {
        Self {
            champion_id,
            game_id,
            game,
            current_index: None,
            fen: STARTING_FEN.to_string(),
            phase: Phase::Ready,
            pending: None,
            generation: 0,
            analysis: None,
            analysis_error: None,
        }
    }

    /// Jump to the position after move `index`. Out-of-range indices are a
    /// no-op. On success the pending request (if any) is cancelled and the
    /// returned ticket must be driven to completion by the caller.
    pub fn goto(&mut self, index: usize) -> Option<AnalysisTicket> {
        if index >= self.game.moves.len() {
            return None;
        }

        // Replay failures can't happen for a validated move list, but a
        // defensive bail keeps this total.
        let fen = replay::fen_after(&self.game.moves, index + 1).ok()?;

        self.cancel_pending();
        self.current_index = Some(index);
        self.fen = fen.clone();
        self.generation += 1;
        self.phase = Phase::Analyzing;
        self.analysis_error = None;

        let (tx, rx) = oneshot::channel();
        self.pending = Some(tx);

        Some(AnalysisTicket {
            fen,
            generation: self.generation,
            cancel: rx,
        })
    }

    /// Advance one move. At the last move this is a no-op.
    pub fn next(&mut self) -> Option<AnalysisTicket> {
        let target = match self.current_index {
            None => 0,
            Some(i) => i + 1,
        };
        self.goto(target)
    }

    /// Retreat one move. From the first move this returns to the initial
    /// position (no evaluation is requested there); before the first move it
    /// is a no-op.
    pub fn prev(&mut self) -> Option<AnalysisTicket> {
        match self.current_index {
            Some(i) if i > 0 => self.goto(i - 1),
            Some(_) => {
                self.reset();
                None
            }
            None => None,
        }
    }

    /// Back to the initial position: cancel any in-flight evaluation and
    /// clear its result. Bumps the generation so a request that already
    /// finished racing the cancel can no longer land.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.current_index = None;
        self.fen = STARTING_FEN.to_string();
        self.phase = Phase::Ready;
        self.analysis = None;
        self.analysis_error = None;
    }

    /// Apply the outcome of an evaluation request. Results from cancelled or
    /// superseded requests are discarded silently, whatever order they
    /// arrive in.
    pub fn apply(
        &mut self,
        generation: u64,
        outcome: Result<Option<AnalysisResult>, AnalysisError>,
    ) {
        if generation != self.generation {
            return;
        }

        let result = match outcome {
            Err(AnalysisError::Cancelled) => return,
            Ok(result) => result,
        };

        self.pending = None;
        self.phase = Phase::Ready;
        match result {
            Some(result) => {
                self.analysis = Some(result);
                self.analysis_error = None;
            }
            None => {
                self.analysis = None;
                self.analysis_error = Some("No analysis available".to_string());
            }
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            champion_id: self.champion_id,
            game_id: self.game_id.clone(),
            metadata: self.game.metadata.clone(),
            moves: self.game.moves.clone(),
            current_index: self.current_index,
            fen: self.fen.clone(),
            phase: self.phase,
            analysis: self.analysis.clone(),
            analysis_error: self.analysis_error.clone(),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(tx) = self.pending.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub champion_id: i64,
    pub game_id: String,
    pub metadata: GameMetadata,
    pub moves: Vec<String>,
    pub current_index: Option<usize>,
    pub fen: String,
    pub phase: Phase,
    pub analysis: Option<AnalysisResult>,
    pub analysis_error: Option<String>,
}

/// In-memory registry of live analysis sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    next_id: Arc<AtomicU64>,
    sessions: Arc<Mutex<HashMap<String, Arc<Mutex<NavigationState>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, state: NavigationState) -> (String, Arc<Mutex<NavigationState>>) {
        let id = format!("sess-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let session = Arc::new(Mutex::new(state));
        self.sessions
            .lock()
            .await
            .insert(id.clone(), session.clone());
        (id, session)
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<NavigationState>>> {
        self.sessions.lock().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruy_lopez() -> Vec<String> {
        ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn ruy_lopez_game() -> GameData {
        GameData {
            metadata: GameMetadata {
                white: "White".to_string(),
                black: "Black".to_string(),
                result: "*".to_string(),
                date: None,
                time_control: None,
                eco: None,
                event: None,
                link: None,
            },
            moves: ruy_lopez(),
            pgn: "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 *".to_string(),
        }
    }

    fn result(bestmove: &str) -> AnalysisResult {
        AnalysisResult {
            bestmove: Some(bestmove.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_is_ready_at_start() {
        let state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        let view = state.view();
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.current_index, None);
        assert_eq!(view.fen, STARTING_FEN);
        assert!(view.analysis.is_none());
    }

    #[test]
    fn test_goto_derives_position_and_enters_analyzing() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        let ticket = state.goto(1).expect("in range");

        assert_eq!(ticket.fen, replay::fen_after(&ruy_lopez(), 2).unwrap());
        let view = state.view();
        assert_eq!(view.current_index, Some(1));
        assert_eq!(view.fen, ticket.fen);
        assert_eq!(view.phase, Phase::Analyzing);
    }

    #[test]
    fn test_goto_same_index_twice_yields_identical_fen() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        let first = state.goto(3).unwrap().fen;
        let second = state.goto(3).unwrap().fen;
        assert_eq!(first, second);
    }

    #[test]
    fn test_goto_out_of_range_is_a_no_op() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        state.goto(0).unwrap();
        let before = state.view();

        assert!(state.goto(6).is_none());
        assert!(state.goto(usize::MAX).is_none());

        let after = state.view();
        assert_eq!(after.current_index, before.current_index);
        assert_eq!(after.fen, before.fen);
    }

    #[test]
    fn test_next_and_prev_walk_the_move_list() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());

        assert!(state.next().is_some());
        assert_eq!(state.view().current_index, Some(0));

        assert!(state.next().is_some());
        assert_eq!(state.view().current_index, Some(1));

        assert!(state.prev().is_some());
        assert_eq!(state.view().current_index, Some(0));

        // From the first move, prev returns to the initial position.
        assert!(state.prev().is_none());
        assert_eq!(state.view().current_index, None);
        assert_eq!(state.view().fen, STARTING_FEN);

        // And from there it is a no-op.
        assert!(state.prev().is_none());
    }

    #[test]
    fn test_next_stops_at_last_move() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        state.goto(5).unwrap();
        assert!(state.next().is_none());
        assert_eq!(state.view().current_index, Some(5));
    }

    #[test]
    fn test_superseded_result_is_discarded_regardless_of_arrival_order() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());

        let stale = state.goto(0).unwrap();
        let fresh = state.goto(1).unwrap();

        // The stale request finishes after being superseded.
        state.apply(stale.generation, Ok(Some(result("e7e5"))));
        assert!(state.view().analysis.is_none());
        assert_eq!(state.view().phase, Phase::Analyzing);

        state.apply(fresh.generation, Ok(Some(result("g1f3"))));
        let view = state.view();
        assert_eq!(view.phase, Phase::Ready);
        assert_eq!(view.analysis.unwrap().bestmove.as_deref(), Some("g1f3"));
    }

    #[test]
    fn test_cancelled_outcome_never_populates_analysis() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        let ticket = state.goto(0).unwrap();

        state.apply(ticket.generation, Err(AnalysisError::Cancelled));
        assert!(state.view().analysis.is_none());
    }

    #[test]
    fn test_goto_fires_cancellation_of_the_pending_request() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        let mut first = state.goto(0).unwrap();

        assert!(first.cancel.try_recv().is_err()); // nothing yet

        let _second = state.goto(1).unwrap();
        assert!(first.cancel.try_recv().is_ok()); // cancelled by the new goto
    }

    #[test]
    fn test_result_racing_a_reset_cannot_land() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        let ticket = state.goto(2).unwrap();

        // The HTTP future won the select against the cancel signal, so the
        // outcome is a real result — but the session was reset meanwhile.
        state.reset();
        state.apply(ticket.generation, Ok(Some(result("b1c3"))));

        let view = state.view();
        assert!(view.analysis.is_none());
        assert_eq!(view.current_index, None);
        assert_eq!(view.phase, Phase::Ready);
    }

    #[test]
    fn test_rejected_request_reports_no_analysis_available() {
        let mut state = NavigationState::new(16, "game1".into(), ruy_lopez_game());
        let ticket = state.goto(0).unwrap();

        state.apply(ticket.generation, Ok(None));
        let view = state.view();
        assert_eq!(view.phase, Phase::Ready);
        assert!(view.analysis.is_none());
        assert_eq!(view.analysis_error.as_deref(), Some("No analysis available"));
    }

    #[tokio::test]
    async fn test_store_insert_get_remove() {
        let store = SessionStore::new();
        let (id, _) = store
            .insert(NavigationState::new(16, "game1".into(), ruy_lopez_game()))
            .await;

        assert!(store.get(&id).await.is_some());
        assert!(store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
        assert!(!store.remove(&id).await);
    }
}
