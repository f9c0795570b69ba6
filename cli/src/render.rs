use chrono::prelude::*;
use serde::Serialize;
use sweeper_core::{BoardView, TileView};

use crate::session::{GameSession, Outcome};

fn glyph(tile: TileView) -> char {
    match tile {
        TileView::Hidden => '#',
        TileView::Hovered => '+',
        TileView::Flagged => 'F',
        TileView::Revealed(0) => '.',
        TileView::Revealed(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        TileView::Mine => '*',
        TileView::TriggeredMine => 'X',
    }
}

pub fn caption(session: &GameSession) -> &'static str {
    match session.outcome() {
        None => "Sweeper",
        Some(Outcome::Lost) => "Game Over!",
        Some(Outcome::Won) => "You Win!",
    }
}

/// Draws the board as a character grid followed by the score footer.
pub fn render_text(session: &GameSession, now: DateTime<Utc>) -> String {
    let view = session.game().view();
    let mut out = String::new();

    out.push_str(caption(session));
    out.push('\n');
    for row in &view.rows {
        let line: Vec<String> = row.iter().map(|&tile| glyph(tile).to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out.push_str(&format!("Remaining Bombs: {}\n", view.remaining_flags));
    out.push_str(&format!("Time: {}\n", session.elapsed_secs(now)));
    out
}

#[derive(Serialize)]
struct Frame<'a> {
    caption: &'a str,
    elapsed_secs: u32,
    #[serde(flatten)]
    board: BoardView,
}

/// One JSON object per frame, for scripted consumers.
pub fn render_json(session: &GameSession, now: DateTime<Utc>) -> serde_json::Result<String> {
    serde_json::to_string(&Frame {
        caption: caption(session),
        elapsed_secs: session.elapsed_secs(now),
        board: session.game().view(),
    })
}
