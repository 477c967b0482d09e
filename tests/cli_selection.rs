//! Run selection via the --runs flag.

mod common;

use common::TestEnv;

const CONFIG: &str = r#"
runs:
  - id: 1
    name: one
    local:
      run: ["echo 1 > n.txt"]
  - id: 5
    name: five
    local:
      run: ["echo 5 > n.txt"]
  - id: 6
    name: six
    local:
      run: ["echo 6 > n.txt"]
  - id: 7
    name: seven
    local:
      run: ["echo 7 > n.txt"]
"#;

#[test]
fn deploys_only_the_selected_subset() {
    let env = TestEnv::new();
    env.write_config(CONFIG);

    let result = env.deploy(&["--runs", "1,5-6"]);
    assert!(result.success, "{}", result.combined_output());

    assert!(env.exists("output/1_one"));
    assert!(env.exists("output/5_five"));
    assert!(env.exists("output/6_six"));
    assert!(!env.exists("output/7_seven"));
}

#[test]
fn unmatched_ids_are_silently_ignored() {
    let env = TestEnv::new();
    env.write_config(CONFIG);

    let result = env.deploy(&["--runs", "5,99"]);
    assert!(result.success, "{}", result.combined_output());

    assert!(env.exists("output/5_five"));
    assert!(result
        .combined_output()
        .contains("1 succeeded, 0 failed, 0 skipped"));
}

#[test]
fn selection_matching_nothing_deploys_nothing() {
    let env = TestEnv::new();
    env.write_config(CONFIG);

    let result = env.deploy(&["--runs", "42"]);
    assert_eq!(result.exit_code, 0);
    assert!(!env.exists("output"));
    assert!(result.combined_output().contains("matched no runs"));
}

#[test]
fn malformed_selection_aborts_before_any_run() {
    let env = TestEnv::new();
    env.write_config(CONFIG);

    for expression in ["a", "3-1", "1,,2"] {
        let result = env.deploy(&["--runs", expression]);
        assert_eq!(result.exit_code, 1, "expression {expression:?}");
        assert!(!env.exists("output"), "expression {expression:?}");
    }
}

#[test]
fn blank_selection_means_all_runs() {
    let env = TestEnv::new();
    env.write_config(CONFIG);

    let result = env.deploy(&["--runs", ""]);
    assert!(result.success, "{}", result.combined_output());
    assert!(result
        .combined_output()
        .contains("4 succeeded, 0 failed, 0 skipped"));
}
