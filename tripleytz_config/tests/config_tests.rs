use chrono::{Duration, Local, TimeZone};
use tempfile::tempdir;
use tripleytz::{Game, HighScoreLedger, ScriptedDice, DEFAULT_CAPACITY};
use tripleytz_config::Config;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(dir.path().join("nope"));
    assert_eq!(config.last_used_name(), "");
    assert_eq!(config.max_high_scores(), DEFAULT_CAPACITY);
    assert!(config.high_scores().is_empty());
}

#[test]
fn garbage_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".tripleytz");
    std::fs::write(&path, "this is not json").unwrap();
    let config = Config::load(&path);
    assert!(config.high_scores().is_empty());
    assert_eq!(config.path(), path.as_path());
}

#[test]
fn save_and_load_again() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(".tripleytz");
    let base = Local.with_ymd_and_hms(2023, 7, 4, 18, 30, 0).unwrap();

    let mut config = Config::new(&path);
    config.set_max_high_scores(3);
    for (i, score) in [700, 900, 800, 600].into_iter().enumerate() {
        config.insert(score, &format!("player {}", i), base + Duration::minutes(i as i64));
    }
    config.try_save().unwrap();

    let loaded = Config::load(&path);
    assert_eq!(loaded.last_used_name(), "player 3");
    assert_eq!(loaded.max_high_scores(), 3);
    let scores: Vec<u32> = loaded.high_scores().entries().iter().map(|hs| hs.score).collect();
    assert_eq!(scores, vec![900, 800, 700]);
    assert_eq!(loaded.high_scores().entries()[0].when, base + Duration::minutes(1));
}

#[test]
fn unsorted_oversized_file_is_normalized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".tripleytz");
    std::fs::write(
        &path,
        r#"{
            "last_used_name": "Kim",
            "max_high_scores": 2,
            "high_scores": [
                {"score": 10, "when": "2023-01-01T10:00:00", "name": "low"},
                {"score": 30, "when": "2023-01-01T10:00:00", "name": "top"},
                {"score": 20, "when": "2023-01-01T10:00:00", "name": "mid"}
            ]
        }"#,
    )
    .unwrap();
    let config = Config::load(&path);
    let names: Vec<&str> = config
        .high_scores()
        .entries()
        .iter()
        .map(|hs| hs.name.as_str())
        .collect();
    assert_eq!(names, vec!["top", "mid"]);
    assert_eq!(HighScoreLedger::last_used_name(&config), Some("Kim"));
}

#[test]
fn finished_game_lands_in_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".tripleytz");
    let mut config = Config::load(&path);
    let mut game = Game::new();
    let mut dice = ScriptedDice::new(&[3, 3, 3, 5, 5]);

    let mut final_score = None;
    for category in tripleytz::Category::ALL {
        for column in tripleytz::Column::ALL {
            game.roll(&mut dice).unwrap();
            if let tripleytz::CommitOutcome::GameOver { final_score: score } =
                game.commit(category, column).unwrap()
            {
                final_score = Some(score);
            }
        }
    }
    let final_score = final_score.unwrap();

    let mut suggested = None;
    let conclusion = game
        .conclude(
            &mut config,
            |_, suggestion| {
                suggested = suggestion.map(String::from);
                Some(String::from("Robin"))
            },
            Local::now(),
        )
        .unwrap();
    assert!(conclusion.ranked);
    assert_eq!(suggested, None);

    let reloaded = Config::load(&path);
    assert_eq!(reloaded.last_used_name(), "Robin");
    assert_eq!(reloaded.high_scores().entries()[0].score, final_score);
}

#[test]
fn clearing_high_scores() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".tripleytz");
    let mut config = Config::new(&path);
    config.insert(100, "x", Local::now());
    config.clear_high_scores();
    config.save();
    assert!(Config::load(&path).high_scores().is_empty());
}
