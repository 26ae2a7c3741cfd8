use std::path::Path;

use serde_json::Value;

use crate::core::ProbedGame;
use crate::error::Result;

/// Default dump location, relative to the working directory
pub const DEFAULT_DUMP_PATH: &str = "gamedata.json";

/// Write the raw storefront `data` objects of `games` as one JSON array,
/// replacing any existing file.
pub async fn write_game_data(path: impl AsRef<Path>, games: &[ProbedGame]) -> Result<()> {
    let payloads: Vec<&Value> = games.iter().map(|g| &g.data).collect();
    let bytes = serde_json::to_vec(&payloads)?;

    tokio::fs::write(path.as_ref(), bytes).await?;
    tracing::info!("Saved {} store entries to {}", games.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_dump_preserves_payloads_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_DUMP_PATH);
        tokio::fs::write(&path, b"stale contents that are longer than the new dump").await.unwrap();

        let data = json!({
            "name": "Portal",
            "steam_appid": 400,
            "platforms": { "windows": true, "mac": true, "linux": true },
            "genres": [{ "id": "1", "description": "Action" }]
        });
        let games = vec![ProbedGame {
            app_id: 400,
            name: "Portal".to_string(),
            compatible: true,
            data: data.clone(),
        }];

        write_game_data(&path, &games).await.unwrap();

        let written: Value = serde_json::from_slice(&tokio::fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(written, json!([data]));
    }

    #[tokio::test]
    async fn test_empty_dump_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");

        write_game_data(&path, &[]).await.unwrap();
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "[]");
    }
}
