use axum::extract::FromRef;

use crate::board::Board;

#[derive(Clone)]
pub struct AppState {
    pub board: Board,
    pub admin_token: String,
}

impl FromRef<AppState> for Board {
    fn from_ref(state: &AppState) -> Self {
        state.board.clone()
    }
}
