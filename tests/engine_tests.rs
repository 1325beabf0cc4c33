//! Engine tests - swaps, activations, and rejection rules end to end

use trimatch::core::session::{GameSession, SessionConfig};
use trimatch::core::snapshot;
use trimatch::engine::{
    activate_line_bonus, play_swap, EngineError, MoveOutcome, Pacing, SessionEvent,
};
use trimatch::types::{BonusKind, Position, ShapeId, Tile};

fn session_with(rows: &[&[u8]]) -> GameSession {
    let mut session = GameSession::new(SessionConfig::default()).unwrap();
    for (row, shapes) in rows.iter().enumerate() {
        for (col, &shape) in shapes.iter().enumerate() {
            session
                .grid_mut()
                .set(Position::new(row, col), Some(Tile::new(ShapeId(shape))));
        }
    }
    session
}

fn checkerboard() -> GameSession {
    session_with(&[
        &[0, 1, 0, 1, 0, 1],
        &[1, 0, 1, 0, 1, 0],
        &[0, 1, 0, 1, 0, 1],
        &[1, 0, 1, 0, 1, 0],
        &[0, 1, 0, 1, 0, 1],
        &[1, 0, 1, 0, 1, 0],
    ])
}

#[tokio::test]
async fn test_no_match_swap_is_reverted_and_refunded() {
    let mut session = checkerboard();
    let before = snapshot(&session);

    let outcome = play_swap(
        &mut session,
        Position::new(0, 0),
        Position::new(0, 1),
        &Pacing::zero(),
    )
    .await
    .unwrap();

    assert!(matches!(outcome, MoveOutcome::SwappedBack { .. }));
    // Round trip: the session state is exactly what it was.
    assert_eq!(snapshot(&session), before);
}

#[tokio::test]
async fn test_matching_swap_resolves_to_a_quiescent_board() {
    // Swapping (2,3) down into row 3 completes a run of three 2s.
    let mut session = session_with(&[
        &[0, 1, 0, 1, 0, 1],
        &[1, 0, 1, 0, 1, 0],
        &[0, 1, 1, 2, 0, 1],
        &[1, 2, 2, 0, 1, 0],
        &[0, 1, 0, 1, 0, 1],
        &[1, 0, 1, 0, 1, 0],
    ]);

    let outcome = play_swap(
        &mut session,
        Position::new(2, 3),
        Position::new(3, 3),
        &Pacing::zero(),
    )
    .await
    .unwrap();

    let MoveOutcome::Resolved { cascade, events, .. } = outcome else {
        panic!("expected a resolved move");
    };

    // Fixed point: nothing left to match, no holes on the board.
    assert_eq!(session.scan_matches(), None);
    assert!(session.grid().cells().iter().all(|c| c.is_some()));
    assert!(cascade.iterations >= 1);

    // The move consumed one of the three budgeted moves.
    assert_eq!(session.progress().moves_left, session.task().moves - 1);

    // First event is the swap itself.
    assert!(matches!(events[0], SessionEvent::SwapApplied { .. }));

    // Every clear event in the cascade scores ten points per distinct cell.
    for event in &cascade.events {
        if let SessionEvent::TilesCleared { positions, points } = event {
            assert_eq!(*points, positions.len() as u32 * 10);
        }
    }
}

#[tokio::test]
async fn test_busy_session_rejects_input() {
    let mut session = checkerboard();
    session.try_begin_move();

    let err = play_swap(
        &mut session,
        Position::new(0, 0),
        Position::new(0, 1),
        &Pacing::zero(),
    )
    .await
    .unwrap_err();
    assert_eq!(err, EngineError::Busy { phase: "resolving" });

    let err = activate_line_bonus(&mut session, Position::new(0, 0), &Pacing::zero())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Busy { phase: "resolving" });
}

#[tokio::test]
async fn test_non_adjacent_and_empty_swaps_are_rejected_without_cost() {
    let mut session = checkerboard();
    let budget = session.progress().moves_left;

    let err = play_swap(
        &mut session,
        Position::new(0, 0),
        Position::new(2, 0),
        &Pacing::zero(),
    )
    .await
    .unwrap_err();
    assert_eq!(err, EngineError::NotAdjacent);

    let err = play_swap(
        &mut session,
        Position::new(1, 1),
        Position::new(2, 2),
        &Pacing::zero(),
    )
    .await
    .unwrap_err();
    assert_eq!(err, EngineError::NotAdjacent);

    session.grid_mut().set(Position::new(0, 1), None);
    let err = play_swap(
        &mut session,
        Position::new(0, 0),
        Position::new(0, 1),
        &Pacing::zero(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::Board(_)));

    // None of the rejections consumed a move.
    assert_eq!(session.progress().moves_left, budget);
}

#[tokio::test]
async fn test_horizontal_arrow_clears_its_row_and_nothing_else() {
    // Row 2 holds no task-shape tiles so the collection count stays put.
    let mut session = session_with(&[
        &[0, 1, 0, 1, 0, 1],
        &[1, 0, 1, 0, 1, 0],
        &[2, 1, 2, 1, 2, 1],
        &[1, 0, 1, 0, 1, 0],
        &[0, 1, 0, 1, 0, 1],
        &[1, 0, 1, 0, 1, 0],
    ]);
    let arrow = Position::new(2, 3);
    session
        .grid_mut()
        .place_bonus(arrow, BonusKind::HorizontalArrow)
        .unwrap();

    let outcome = activate_line_bonus(&mut session, arrow, &Pacing::zero())
        .await
        .unwrap();

    let MoveOutcome::Resolved { events, .. } = outcome else {
        panic!("expected a resolved activation");
    };

    assert!(matches!(
        &events[0],
        SessionEvent::BonusActivated { kind, .. } if kind == "horizontal_arrow"
    ));
    let SessionEvent::TilesCleared { positions, points } = &events[1] else {
        panic!("expected the activation clear as the second event");
    };
    // The whole row, the arrow included, and only the row.
    assert_eq!(positions.len(), 6);
    assert!(positions.iter().all(|p| p.row == 2));
    assert_eq!(*points, 60);

    // One move spent; the board settled back to a full quiescent state.
    assert_eq!(session.progress().moves_left, session.task().moves - 1);
    assert_eq!(session.scan_matches(), None);
    assert!(session.grid().cells().iter().all(|c| c.is_some()));
}

#[tokio::test]
async fn test_tapping_a_plain_tile_is_not_an_activation() {
    let mut session = checkerboard();

    let err = activate_line_bonus(&mut session, Position::new(1, 1), &Pacing::zero())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotABonus { row: 1, col: 1 });

    // Stars are swap-activated, not tap-activated.
    session
        .grid_mut()
        .place_bonus(Position::new(1, 1), BonusKind::BonusStar)
        .unwrap();
    let err = activate_line_bonus(&mut session, Position::new(1, 1), &Pacing::zero())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotABonus { row: 1, col: 1 });
}

#[tokio::test(start_paused = true)]
async fn test_default_pacing_completes_under_a_paused_clock() {
    // The suspension points are real sleeps; under a paused clock they
    // auto-advance, so a fully paced move still runs to completion.
    let mut session = checkerboard();
    let outcome = play_swap(
        &mut session,
        Position::new(0, 0),
        Position::new(0, 1),
        &Pacing::default(),
    )
    .await
    .unwrap();
    assert!(matches!(outcome, MoveOutcome::SwappedBack { .. }));
}
