//! Conflict policy behavior when an output directory already exists.

mod common;

use common::TestEnv;

const CONFIG: &str = r#"
runs:
  - id: 1
    name: first
    local:
      run: ["echo one > out.txt"]
  - id: 2
    name: second
    local:
      run: ["echo two > out.txt"]
  - id: 3
    name: third
    local:
      run: ["echo three > out.txt"]
"#;

#[test]
fn abort_policy_fails_the_conflicting_run_and_halts() {
    let env = TestEnv::new();
    env.write_config(CONFIG);
    env.write("output/2_second/stale.txt", "old");

    let result = env.deploy(&[]);
    assert_eq!(result.exit_code, 1);

    // Run 1 succeeded, run 2 failed on the conflict, run 3 never started.
    assert_eq!(env.read("output/1_first/out.txt"), "one\n");
    assert!(!env.exists("output/2_second/out.txt"));
    assert!(env.exists("output/2_second/stale.txt"));
    assert!(!env.exists("output/3_third"));

    let output = result.combined_output();
    assert!(output.contains("already exists"));
    assert!(output.contains("1 succeeded, 1 failed, 1 skipped"));
}

#[test]
fn abort_policy_is_fine_with_fresh_directories() {
    let env = TestEnv::new();
    env.write_config(CONFIG);

    let result = env.deploy(&[]);
    assert!(result.success, "{}", result.combined_output());
}

#[test]
fn remove_policy_clears_prior_contents_before_running() {
    let env = TestEnv::new();
    env.write_config(CONFIG);
    env.write("output/2_second/stale.txt", "old");

    let result = env.deploy(&["--if-exists", "remove", "--yes"]);
    assert!(result.success, "{}", result.combined_output());

    assert!(!env.exists("output/2_second/stale.txt"));
    assert_eq!(env.read("output/2_second/out.txt"), "two\n");
}

#[test]
fn use_policy_keeps_existing_files() {
    let env = TestEnv::new();
    env.write_config(CONFIG);
    env.write("output/2_second/stale.txt", "old");

    let result = env.deploy(&["--if-exists", "use", "--yes"]);
    assert!(result.success, "{}", result.combined_output());

    assert_eq!(env.read("output/2_second/stale.txt"), "old");
    assert_eq!(env.read("output/2_second/out.txt"), "two\n");
}

#[test]
fn declined_confirmation_deploys_nothing() {
    let env = TestEnv::new();
    env.write_config(CONFIG);

    // Closed stdin reads as a declined prompt.
    let result = env.deploy(&["--if-exists", "remove"]);
    assert_eq!(result.exit_code, 0);
    assert!(!env.exists("output/1_first"));
}
