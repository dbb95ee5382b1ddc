use clap::Parser;
use taxi_agents::cli::commands::{
    bruteforce::{self, BruteforceArgs},
    evaluate::{self, EvaluateArgs},
    train::{self, TrainArgs},
};
use taxi_agents::q_learning::TdAlgorithm;
use tempfile::tempdir;

fn read_json(path: &std::path::Path) -> serde_json::Value {
    let contents = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[test]
fn bruteforce_summary_without_extension_appends_json() {
    let tmp = tempdir().unwrap();
    let summary_stem = tmp.path().join("bruteforce_run");

    let args = BruteforceArgs::parse_from([
        "taxi-bruteforce",
        "--episodes",
        "5",
        "--seed",
        "1",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);
    let batch = bruteforce::execute(args).expect("bruteforce should succeed");
    assert_eq!(batch.total_solved, 5);

    let expected_path = summary_stem.with_extension("json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );
    let parsed = read_json(&expected_path);
    assert_eq!(parsed["total_attempts"], 5);
    assert_eq!(parsed["total_solved"], 5);
    assert_eq!(parsed["success_rate"], 100.0);
}

#[test]
fn summary_directory_argument_creates_default_file() {
    let tmp = tempdir().unwrap();
    let summary_dir = tmp.path().join("summaries");
    let summary_arg = format!("{}/", summary_dir.display());

    let args = BruteforceArgs::parse_from([
        "taxi-bruteforce",
        "--episodes",
        "3",
        "--summary",
        &summary_arg,
    ]);
    bruteforce::execute(args).expect("bruteforce should succeed");

    let expected_path = summary_dir.join("bruteforce_summary.json");
    assert!(
        expected_path.exists(),
        "expected summary at {}",
        expected_path.display()
    );
}

#[test]
fn train_saves_table_and_evaluate_reloads_it() {
    let tmp = tempdir().unwrap();
    let tables = tmp.path().join("tables");
    let summary_stem = tmp.path().join("train_run");

    let args = TrainArgs::parse_from([
        "taxi-train",
        "sarsa",
        "--training",
        "200",
        "--testing",
        "5",
        "--dir",
        tables.to_str().unwrap(),
        "--name",
        "smoke",
        "--seed",
        "3",
        "--no-progress",
        "--summary",
        summary_stem.to_str().unwrap(),
    ]);
    train::execute(args).expect("training should succeed");

    assert!(tables.join("smoke.msgpack").exists());
    let parsed = read_json(&summary_stem.with_extension("json"));
    assert_eq!(parsed["algorithm"], "sarsa");
    assert_eq!(parsed["training"]["episodes"], 200);
    assert_eq!(parsed["evaluation"]["total_attempts"], 5);
    assert_eq!(parsed["hyperparameters"]["episodes_training"], 200);

    let args = EvaluateArgs::parse_from([
        "taxi-evaluate",
        "smoke",
        "--dir",
        tables.to_str().unwrap(),
        "--episodes",
        "4",
        "--seed",
        "9",
        "--show-playback",
    ]);
    let batch = evaluate::execute(args).expect("evaluation should succeed");
    assert_eq!(batch.total_attempts, 4);
    assert_eq!(batch.total_solved + batch.total_unsolved, 4);
}

#[test]
fn evaluate_reports_missing_table() {
    let tmp = tempdir().unwrap();
    let args = EvaluateArgs::parse_from([
        "taxi-evaluate",
        "absent",
        "--dir",
        tmp.path().to_str().unwrap(),
    ]);
    let err = evaluate::execute(args).unwrap_err();
    assert!(format!("{err:#}").contains("absent"));
}

#[test]
fn algorithm_argument_accepts_aliases() {
    let args = TrainArgs::parse_from(["taxi-train", "q_learning"]);
    assert_eq!(args.algorithm, TdAlgorithm::QLearning);
    let args = TrainArgs::parse_from(["taxi-train", "SARSA"]);
    assert_eq!(args.algorithm, TdAlgorithm::Sarsa);
    assert!(TrainArgs::try_parse_from(["taxi-train", "dqn"]).is_err());
}

#[test]
fn invalid_hyperparameter_flag_fails_before_training() {
    let tmp = tempdir().unwrap();
    let args = TrainArgs::parse_from([
        "taxi-train",
        "q-learning",
        "--alpha",
        "1.5",
        "--dir",
        tmp.path().to_str().unwrap(),
        "--no-progress",
    ]);
    assert!(train::execute(args).is_err());
    assert!(!tmp.path().join("q-learning.msgpack").exists());
}
