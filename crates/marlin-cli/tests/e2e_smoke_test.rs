use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use marlin_cli::{Args, Emit, run};

/// Collects all .mmd files from a directory
fn collect_mmd_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("mmd")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &Path, output: &Path, emit: Emit) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        kind: None,
        emit,
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_mmd_files(demos_path());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();
        let output_path = temp_dir.path().join(format!("{stem}.json"));

        if let Err(e) = run(&args(demo_path, &output_path, Emit::Ast)) {
            failed_demos.push((demo_path.clone(), e));
            continue;
        }

        // Every demo is named after its kind
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
        assert_eq!(json["$type"], stem.as_str(), "{}", demo_path.display());
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_mmd_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.json",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if run(&args(demo_path, &output_path, Emit::Ast)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_labels_use_configured_width() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("pets.mmd");
    let config = temp_dir.path().join("config.toml");
    let output = temp_dir.path().join("labels.txt");

    fs::write(&input, "pie title Pets adopted\n\"Dogs\": 386\n\"Cats\": 85\n").unwrap();
    fs::write(&config, "[layout]\nmax_width = 6\n").unwrap();

    let mut args = args(&input, &output, Emit::Labels);
    args.config = Some(config.to_string_lossy().to_string());
    run(&args).expect("Failed to emit labels");

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Pets\nadopte\nd\nDogs\nCats\n"
    );
}

#[test]
fn e2e_explicit_kind_overrides_detection() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("flows.csv");
    let output = temp_dir.path().join("flows.json");
    fs::write(&input, "sankey\nA,B,1\n").unwrap();

    let mut args = args(&input, &output, Emit::Ast);
    args.kind = Some("sankey".to_string());
    run(&args).expect("Failed to parse with explicit kind");

    args.kind = Some("gantt".to_string());
    let err = run(&args).unwrap_err();
    assert_eq!(err.to_string(), "unknown diagram kind: `gantt`");
}

#[test]
fn e2e_missing_config_file_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("info.mmd");
    let output = temp_dir.path().join("info.json");

    let mut args = args(&input, &output, Emit::Ast);
    args.config = Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string());

    let err = run(&args).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error: Missing configuration file"));
}
