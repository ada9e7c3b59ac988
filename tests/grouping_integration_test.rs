use hero_grouping::core::ConfigProvider;
use hero_grouping::{
    EtlEngine, GroupType, GroupingError, GroupingPipeline, GroupingResult, LocalStorage, Profile,
    TomlConfig,
};
use std::path::Path;
use tempfile::TempDir;

const POPULATION: &str = r#"[
    {"file_name": "m1.png", "bbox": [0, 0, 10, 10], "gender": "Male", "emotion": "Neutral", "age": "Baby", "race": "Caucasian"},
    {"file_name": "m2.png", "bbox": [0, 0, 10, 10], "gender": "Male", "emotion": "Happiness", "age": "Kid", "race": "Mongoloid"},
    {"file_name": "m3.png", "bbox": [0, 0, 10, 10], "gender": "Male", "emotion": "Surprise", "age": "Teenager", "race": "Negroid"},
    {"file_name": "m4.png", "bbox": [0, 0, 10, 10], "gender": "Male", "emotion": "Anger", "age": "Senior", "race": "Negroid"},
    {"file_name": "w1.png", "gender": "Female", "emotion": "Fear", "age": "20-30s", "race": "Android"},
    {"file_name": "w2.png", "gender": "Female", "emotion": "Fear", "age": "20-30s", "race": "Android"},
    {"file_name": "x1.png", "gender": "Male", "emotion": "Fear", "age": "Kid", "race": "Caucasian"}
]"#;

fn write_input(dir: &TempDir, name: &str, body: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

fn config_for(input: &str, output: &Path, extra_load: &str) -> TomlConfig {
    let toml_content = format!(
        "[run]\ninput_path = \"{}\"\n\n[load]\noutput_path = \"{}\"\n{}",
        input,
        output.display(),
        extra_load
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

#[tokio::test]
async fn test_end_to_end_grouping_writes_combination_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "heroes.json", POPULATION);
    let output_dir = temp_dir.path().join("run");
    let config = config_for(&input, &output_dir, "write_unmatched = true\n");

    let pipeline = GroupingPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new(pipeline);
    let output_path = engine.run().await.unwrap();

    assert!(output_path.ends_with("combination.json"));
    let json_bytes = std::fs::read(output_dir.join("combination.json")).unwrap();
    let result: GroupingResult = serde_json::from_slice(&json_bytes).unwrap();

    // Only w1 and w2 are female, so the first Balance Guardians pair is m1, m2 with them.
    assert_eq!(result.points, 1);
    assert_eq!(result.groups[0].group_type, GroupType::BalanceGuardians);
    let first: Vec<&str> = result.groups[0].members.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(first, vec!["m1.png", "m2.png", "w1.png", "w2.png"]);
    assert_eq!(result.groups[0].members[0].bbox.as_deref(), Some(&[0.0, 0.0, 10.0, 10.0][..]));

    let unmatched: Vec<Profile> =
        serde_json::from_slice(&std::fs::read(output_dir.join("unmatched.json")).unwrap()).unwrap();
    let rest: Vec<&str> = unmatched.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(rest, vec!["m3.png", "m4.png", "x1.png"]);
}

#[tokio::test]
async fn test_end_to_end_csv_only() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "heroes.json", POPULATION);
    let output_dir = temp_dir.path().join("csv-run");
    let config = config_for(&input, &output_dir, "output_formats = [\"csv\"]\n");
    assert_eq!(config.output_formats(), &["csv".to_string()]);

    let engine = EtlEngine::new_with_monitoring(
        GroupingPipeline::new(LocalStorage::default(), config),
        false,
    );
    let output_path = engine.run().await.unwrap();

    assert_eq!(Path::new(&output_path), output_dir.as_path());
    assert!(!output_dir.join("combination.json").exists());
    let csv_text = std::fs::read_to_string(output_dir.join("combination.csv")).unwrap();
    assert!(csv_text.starts_with("group_index,group_type,id,gender,emotion,age,race"));
    assert!(csv_text.contains("1,Balance Guardians,m1.png,Male,Neutral,Baby,Caucasian"));
}

#[tokio::test]
async fn test_duplicate_ids_fail_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let body = r#"[
        {"id": "a", "gender": "Male", "emotion": "Anger", "age": "Kid", "race": "Android"},
        {"id": "a", "gender": "Female", "emotion": "Fear", "age": "Kid", "race": "Negroid"}
    ]"#;
    let input = write_input(&temp_dir, "dup.json", body);
    let output_dir = temp_dir.path().join("out");
    let config = config_for(&input, &output_dir, "");

    let result = EtlEngine::new(GroupingPipeline::new(LocalStorage::default(), config))
        .run()
        .await;

    assert!(matches!(result, Err(GroupingError::DuplicateId { .. })));
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn test_invalid_enum_value_fails_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let body = r#"[
        {"id": "a", "gender": "Male", "emotion": "Anger", "age": "Kid", "race": "Martian"}
    ]"#;
    let input = write_input(&temp_dir, "bad.json", body);
    let config = config_for(&input, &temp_dir.path().join("out"), "");

    let result = EtlEngine::new(GroupingPipeline::new(LocalStorage::default(), config))
        .run()
        .await;

    assert!(matches!(
        result,
        Err(GroupingError::InvalidRecord { index: 0, .. })
    ));
}

#[tokio::test]
async fn test_missing_input_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.json");
    let config = config_for(&missing.to_string_lossy(), &temp_dir.path().join("out"), "");

    let result = EtlEngine::new(GroupingPipeline::new(LocalStorage::default(), config))
        .run()
        .await;

    assert!(matches!(result, Err(GroupingError::IoError(_))));
}
