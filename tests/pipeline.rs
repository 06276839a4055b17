use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};

use weekly_games::config::PipelineConfig;
use weekly_games::http_client::{HttpResponse, HttpSource};
use weekly_games::pipeline::run_weekly_report;
use weekly_games::player::UNKNOWN;
use weekly_games::report::NO_GAMES_MESSAGE;

const BASE: &str = "https://api.test";
const PLAYER_URL: &str = "https://api.test/pub/player/javalle";
const FEB_URL: &str = "https://api.test/pub/player/javalle/games/2024/02/pgn";
const MAR_URL: &str = "https://api.test/pub/player/javalle/games/2024/03/pgn";

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

enum Canned {
    Response(HttpResponse),
    TransportError,
}

/// Serves canned responses by url; anything unknown is a 404.
#[derive(Default)]
struct FakeSource {
    routes: HashMap<String, Canned>,
    requested: Mutex<Vec<String>>,
}

impl FakeSource {
    fn with(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.insert(
            url.to_string(),
            Canned::Response(HttpResponse {
                status,
                body: body.into(),
            }),
        );
        self
    }

    fn failing(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Canned::TransportError);
        self
    }

    fn requested(&self) -> Vec<String> {
        let mut urls = self.requested.lock().expect("request log").clone();
        urls.sort();
        urls
    }
}

impl HttpSource for FakeSource {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requested.lock().expect("request log").push(url.to_string());
        match self.routes.get(url) {
            Some(Canned::Response(resp)) => Ok(resp.clone()),
            Some(Canned::TransportError) => Err(anyhow!("connection reset")),
            None => Ok(HttpResponse {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

fn config() -> PipelineConfig {
    PipelineConfig {
        api_base: BASE.to_string(),
        ..PipelineConfig::default()
    }
}

fn sunday_evening() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10)
        .and_then(|d| d.and_hms_opt(20, 0, 0))
        .expect("valid date")
}

fn date(day_month: (u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, day_month.1, day_month.0).expect("valid date")
}

#[test]
fn missing_month_only_loses_its_own_games() {
    let source = FakeSource::default()
        .with(PLAYER_URL, 200, read_fixture("player.json"))
        .with(MAR_URL, 200, read_fixture("games_2024_03.pgn"));

    let report = run_weekly_report(&source, &config(), sunday_evening());

    assert_eq!(report.player_id, "41224516");
    assert_eq!(source.requested(), vec![PLAYER_URL, FEB_URL, MAR_URL]);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains(FEB_URL));
    assert!(report.errors[0].contains("Status Code: 404"));

    let dates = report.records.iter().map(|r| r.date).collect::<Vec<_>>();
    assert_eq!(dates, vec![date((4, 3)), date((6, 3)), date((9, 3))]);

    let first = &report.records[0];
    assert_eq!(first.white, "A");
    assert_eq!(first.black, "B");
    assert_eq!(first.move_count, 3);
    assert_eq!(first.avg_move_length, 2.33);
    assert_eq!(first.opening, "Kings-Pawn-Opening-Kings-Knight-Variation");
    assert_eq!(first.player_id, "41224516");
    assert_eq!(report.records[1].opening, UNKNOWN);
    assert_eq!(report.records[2].avg_move_length, 2.5);

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.wins, 1);
    assert_eq!(report.summary.losses, 1);
    assert_eq!(report.summary.draws, 1);

    let out = report.render();
    assert!(out.contains("Player javalle Performance (February 26 - March 10, 2024):"));
    assert!(out.contains("Win Percentage: 33.33%"));
}

#[test]
fn both_months_merge_and_sort_by_date() {
    let source = FakeSource::default()
        .with(PLAYER_URL, 200, read_fixture("player.json"))
        .with(MAR_URL, 200, read_fixture("games_2024_03.pgn"))
        .with(FEB_URL, 200, read_fixture("games_2024_02.pgn"));

    let report = run_weekly_report(&source, &config(), sunday_evening());

    assert!(report.errors.is_empty());
    let dates = report.records.iter().map(|r| r.date).collect::<Vec<_>>();
    assert_eq!(
        dates,
        vec![date((27, 2)), date((4, 3)), date((6, 3)), date((9, 3))]
    );
    assert_eq!(report.records[0].opening, "Sicilian-Defense");
    assert_eq!(report.records[0].move_count, 8);
    assert_eq!(report.summary.total, 4);
    assert_eq!(report.summary.losses, 2);
    assert_eq!(report.summary.win_percentage, 25.0);
}

#[test]
fn parallel_fetch_matches_sequential_result() {
    let source = FakeSource::default()
        .with(PLAYER_URL, 200, read_fixture("player.json"))
        .with(MAR_URL, 200, read_fixture("games_2024_03.pgn"))
        .with(FEB_URL, 200, read_fixture("games_2024_02.pgn"));

    let sequential = run_weekly_report(&source, &config(), sunday_evening());
    let parallel_config = PipelineConfig {
        parallel_fetch: true,
        ..config()
    };
    let parallel = run_weekly_report(&source, &parallel_config, sunday_evening());

    assert_eq!(sequential.records, parallel.records);
    assert_eq!(sequential.summary, parallel.summary);
}

#[test]
fn nothing_reachable_prints_only_no_games_message() {
    let source = FakeSource::default();

    let report = run_weekly_report(&source, &config(), sunday_evening());

    assert_eq!(report.player_id, UNKNOWN);
    assert!(report.records.is_empty());
    assert_eq!(report.summary.total, 0);
    assert_eq!(report.summary.win_percentage, 0.0);
    assert_eq!(report.render(), NO_GAMES_MESSAGE);
    assert!(report.errors.iter().any(|e| e.contains(PLAYER_URL)));
    assert!(report.errors.iter().any(|e| e.contains(FEB_URL)));
    assert!(report.errors.iter().any(|e| e.contains(MAR_URL)));
}

#[test]
fn undecodable_profile_falls_back_to_unknown_id() {
    let source = FakeSource::default()
        .with(PLAYER_URL, 200, "<html>Just a moment...</html>")
        .with(MAR_URL, 200, read_fixture("games_2024_03.pgn"));

    let report = run_weekly_report(&source, &config(), sunday_evening());

    assert_eq!(report.player_id, UNKNOWN);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("Failed to decode JSON"))
    );
    assert_eq!(report.records.len(), 3);
    assert!(report.records.iter().all(|r| r.player_id == UNKNOWN));
}

#[test]
fn profile_without_id_field_uses_unknown_silently() {
    let source = FakeSource::default()
        .with(PLAYER_URL, 200, r#"{"username": "javalle"}"#)
        .with(MAR_URL, 200, read_fixture("games_2024_03.pgn"))
        .with(FEB_URL, 200, read_fixture("games_2024_02.pgn"));

    let report = run_weekly_report(&source, &config(), sunday_evening());

    assert_eq!(report.player_id, UNKNOWN);
    assert!(report.errors.is_empty());
}

#[test]
fn transport_error_and_empty_body_are_month_failures() {
    let source = FakeSource::default()
        .with(PLAYER_URL, 200, read_fixture("player.json"))
        .failing(MAR_URL)
        .with(FEB_URL, 200, "   \n");

    let report = run_weekly_report(&source, &config(), sunday_evening());

    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().any(|e| e.contains(MAR_URL)));
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains(FEB_URL) && e.contains("Status Code: 200"))
    );
    assert_eq!(report.render(), NO_GAMES_MESSAGE);
}

#[test]
fn games_on_the_starting_monday_are_kept() {
    let feb = "[Event \"Live Chess\"]\n[Date \"2024.02.26\"]\n[White \"A\"]\n[Black \"H\"]\n[Result \"1-0\"]\n\n1. e4 e5 1-0\n\n\n[Event \"Live Chess\"]\n[Date \"2024.02.25\"]\n[White \"A\"]\n[Black \"I\"]\n[Result \"0-1\"]\n\n1. d4 d5 0-1\n";
    let source = FakeSource::default()
        .with(PLAYER_URL, 200, read_fixture("player.json"))
        .with(FEB_URL, 200, feb);

    let report = run_weekly_report(&source, &config(), sunday_evening());

    assert_eq!(report.window.start.date(), date((26, 2)));
    let dates = report.records.iter().map(|r| r.date).collect::<Vec<_>>();
    assert_eq!(dates, vec![date((26, 2))]);
    assert_eq!(report.records[0].black, "H");
    assert_eq!(report.summary.wins, 1);
}
