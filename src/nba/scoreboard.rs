use serde::Serialize;
use serde_json::Value;

/// One game row from the daily scoreboard.
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub id: String,
    /// Display name, e.g. "20160314/CHIMIA"; falls back to the id when the
    /// feed omits it.
    pub name: String,
}

/// Pull the day's games out of a scoreboard document. A day without games
/// (or a missing games array) yields an empty list; individual entries with
/// no id are skipped.
pub fn parse_scoreboard(raw: &Value) -> Vec<GameSummary> {
    let games = match raw["sports_content"]["games"]["game"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    games
        .iter()
        .filter_map(|game| {
            let id = game["id"].as_str()?.to_string();
            let name = game["game_url"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| id.clone());
            Some(GameSummary { id, name })
        })
        .collect()
}
