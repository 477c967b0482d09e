//! Dry-run mode: directories and inputs only, no command execution.

mod common;

use common::TestEnv;

const CONFIG: &str = r#"
runs:
  - id: 1
    name: calc
    scripts: [input/calc.sh]
    local:
      run: ["echo ran > marker.txt"]
"#;

fn env_with_inputs() -> TestEnv {
    let env = TestEnv::new();
    env.write("input/calc.sh", "echo script");
    env.write_config(CONFIG);
    env
}

#[test]
fn stages_inputs_but_runs_no_commands() {
    let env = env_with_inputs();

    let result = env.deploy(&["--dry-run"]);
    assert!(result.success, "{}", result.combined_output());

    assert!(env.exists("output/1_calc/calc.sh"));
    assert!(!env.exists("output/1_calc/marker.txt"));
    assert!(result
        .combined_output()
        .contains("1 succeeded, 0 failed, 0 skipped"));
}

#[test]
fn test_run_alias_behaves_the_same() {
    let env = env_with_inputs();

    let result = env.deploy(&["--test-run"]);
    assert!(result.success, "{}", result.combined_output());
    assert!(!env.exists("output/1_calc/marker.txt"));
}

#[test]
fn dry_run_still_clears_under_remove_policy() {
    let env = env_with_inputs();
    env.write("output/1_calc/stale.txt", "old");

    let result = env.deploy(&["--dry-run", "--if-exists", "remove", "--yes"]);
    assert!(result.success, "{}", result.combined_output());

    assert!(!env.exists("output/1_calc/stale.txt"));
    assert!(env.exists("output/1_calc/calc.sh"));
    assert!(!env.exists("output/1_calc/marker.txt"));
}

#[test]
fn dry_run_still_honors_the_abort_policy() {
    let env = env_with_inputs();
    env.write("output/1_calc/stale.txt", "old");

    let result = env.deploy(&["--dry-run"]);
    assert_eq!(result.exit_code, 1);
    assert!(result.combined_output().contains("already exists"));
}
