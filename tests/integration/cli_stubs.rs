use predicates::prelude::*;

use crate::common::TestEnv;

fn assert_not_implemented(env: &TestEnv, args: &[&str], command: &str) {
    env.cmd()
        .args(args)
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!(
            "`{command}` is not yet implemented"
        )));
}

#[test]
fn update_is_not_implemented() {
    let env = TestEnv::new();
    assert_not_implemented(&env, &["update", "fastqc"], "update");
    assert!(env.github.requests().is_empty());
}

#[test]
fn remove_is_not_implemented() {
    let env = TestEnv::new();
    std::fs::create_dir_all(env.module_dir("fastqc")).unwrap();

    assert_not_implemented(&env, &["remove", "fastqc"], "remove");
    assert!(env.module_dir("fastqc").exists());
    assert!(env.github.requests().is_empty());
}

#[test]
fn check_is_not_implemented() {
    let env = TestEnv::new();
    assert_not_implemented(&env, &["check"], "check");
    assert!(env.github.requests().is_empty());
}
