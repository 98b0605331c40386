use std::collections::HashMap;

use axum::{Extension, Json, extract::State};
use grace_db::Storage;
use grace_types::api::{Claims, LeaderboardEntry, PointsSummary};
use grace_types::models::{PointsEntry, User};

use crate::error::ApiError;
use crate::state::{AppState, blocking};

const LEADERBOARD_SIZE: usize = 10;

pub async fn summary(State(state): State<AppState>, Extension(claims): Extension<Claims>) -> Result<Json<PointsSummary>, ApiError> {
    let user_id = claims.sub.to_string();
    let mut entries = blocking(&state, move |store| Ok(store.find_by::<PointsEntry>("user_id", &user_id)?)).await?;
    entries.reverse();
    Ok(Json(PointsSummary {
        balance: entries.iter().map(|e| e.points).sum(),
        entries,
    }))
}

/// Top balances, highest first. Users with no points are left out.
pub fn rank(users: &[User], entries: &[PointsEntry], limit: usize) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<&str, i64> = HashMap::new();
    for entry in entries {
        *totals.entry(entry.user_id.as_str()).or_default() += entry.points;
    }

    let mut board: Vec<LeaderboardEntry> = users
        .iter()
        .filter_map(|u| {
            totals.get(u.id.as_str()).filter(|p| **p > 0).map(|points| LeaderboardEntry {
                display_name: u.display_name.clone(),
                points: *points,
            })
        })
        .collect();
    board.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.display_name.cmp(&b.display_name)));
    board.truncate(limit);
    board
}

pub async fn leaderboard(State(state): State<AppState>) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let board = blocking(&state, |store| {
        let users = store.list::<User>()?;
        let entries = store.list::<PointsEntry>()?;
        Ok(rank(&users, &entries, LEADERBOARD_SIZE))
    })
    .await?;
    Ok(Json(board))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.into(),
            email: format!("{}@example.com", id),
            password_hash: String::new(),
            display_name: name.into(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    fn points(user_id: &str, points: i64) -> PointsEntry {
        PointsEntry {
            id: format!("{}-{}", user_id, points),
            user_id: user_id.into(),
            points,
            reason: "test".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn ranks_by_total() {
        let users = vec![user("a", "Anna"), user("b", "Boaz"), user("c", "Caleb")];
        let entries = vec![points("a", 10), points("b", 30), points("a", 25), points("gone", 99)];

        let board = rank(&users, &entries, 10);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].display_name, "Anna");
        assert_eq!(board[0].points, 35);
        assert_eq!(board[1].display_name, "Boaz");
    }

    #[test]
    fn respects_limit() {
        let users: Vec<_> = (0..15).map(|i| user(&i.to_string(), &format!("user{:02}", i))).collect();
        let entries: Vec<_> = (0..15).map(|i| points(&i.to_string(), i + 1)).collect();
        let board = rank(&users, &entries, 10);
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].points, 15);
    }
}
