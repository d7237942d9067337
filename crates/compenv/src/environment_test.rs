// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::fixtures::docker_component;

fn setup() -> (TempDir, Layout) {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::new(tmp.path()).ensure().unwrap();
    (tmp, layout)
}

fn persist(layout: &Layout, env: &Environment) {
    std::fs::create_dir_all(layout.environment_dir(env.id)).unwrap();
    env.save(layout).unwrap();
}

#[rstest]
fn test_parse_minimal_record() {
    let yaml = r#"
name: dev
uuid: 6f1c2a0e-3c1b-4d0a-9d8e-2f4b5a6c7d8e
"#;
    let env = Environment::from_yaml(yaml, Path::new("config.yaml")).unwrap();

    assert_eq!(env.api, ApiVersion::V0);
    assert_eq!(env.name, "dev");
    assert_eq!(
        env.id.to_string(),
        "6f1c2a0e-3c1b-4d0a-9d8e-2f4b5a6c7d8e"
    );
    assert!(env.installed.is_empty());
    assert!(env.ssh.is_none());
}

#[rstest]
fn test_parse_rejects_unknown_api() {
    let yaml = r#"
api: compenv/v9
name: dev
uuid: 6f1c2a0e-3c1b-4d0a-9d8e-2f4b5a6c7d8e
"#;
    let err = Environment::from_yaml(yaml, Path::new("config.yaml")).unwrap_err();

    assert!(matches!(err, Error::InvalidYaml { .. }));
}

#[rstest]
fn test_parse_invalid_yaml() {
    let yaml = "name: [unclosed";
    let result = Environment::from_yaml(yaml, Path::new("config.yaml"));

    assert!(result.is_err(), "Should fail on invalid YAML");
}

#[rstest]
fn test_save_and_get_round_trip() {
    let (_tmp, layout) = setup();
    let mut env = Environment::new("dev");
    env.installed.push(docker_component("azbi", "0.1.0"));
    env.installed.push(docker_component("azks", "0.2.0"));
    env.ssh = Some(SshConfig {
        public_key: "ssh-rsa AAAA".to_string(),
        private_key: "-----BEGIN-----".to_string(),
    });
    persist(&layout, &env);

    let loaded = Environment::get(&layout, env.id).unwrap();
    assert_eq!(loaded, env);
}

#[rstest]
fn test_save_rejects_nil_id() {
    let (_tmp, layout) = setup();
    let mut env = Environment::new("dev");
    env.id = Uuid::nil();
    std::fs::create_dir_all(layout.environment_dir(env.id)).unwrap();

    let err = env.save(&layout).unwrap_err();
    assert!(matches!(err, Error::NilEnvironmentId));
    assert!(!layout.environment_config(env.id).exists());
}

#[rstest]
fn test_get_missing_environment() {
    let (_tmp, layout) = setup();
    let id = Uuid::new_v4();

    match Environment::get(&layout, id) {
        Err(Error::EnvironmentNotFound(missing)) => assert_eq!(missing, id),
        other => panic!("Expected EnvironmentNotFound, got: {:?}", other),
    }
}

#[rstest]
fn test_get_reports_corrupt_record() {
    let (_tmp, layout) = setup();
    let id = Uuid::new_v4();
    std::fs::create_dir_all(layout.environment_dir(id)).unwrap();
    std::fs::write(layout.environment_config(id), "uuid: [").unwrap();

    let err = Environment::get(&layout, id).unwrap_err();
    assert!(matches!(err, Error::InvalidYaml { .. }));
}

#[rstest]
fn test_get_all_returns_unique_ids() {
    let (_tmp, layout) = setup();
    let first = Environment::new("a");
    let second = Environment::new("a");
    persist(&layout, &first);
    persist(&layout, &second);
    std::fs::create_dir_all(layout.environments_dir().join("not-a-uuid")).unwrap();
    std::fs::write(layout.environments_dir().join("stray.txt"), "x").unwrap();

    let all = Environment::get_all(&layout).unwrap();

    assert_eq!(all.len(), 2);
    let ids: HashSet<Uuid> = all.iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
}

#[rstest]
fn test_get_all_rejects_misplaced_record() {
    let (_tmp, layout) = setup();
    let env = Environment::new("a");
    let other = Uuid::new_v4();
    std::fs::create_dir_all(layout.environment_dir(other)).unwrap();
    std::fs::write(layout.environment_config(other), env.to_yaml().unwrap()).unwrap();

    let err = Environment::get_all(&layout).unwrap_err();
    assert!(matches!(err, Error::IdMismatch { found, .. } if found == env.id));
}

#[rstest]
fn test_component_lookup() {
    let mut env = Environment::new("dev");
    env.installed.push(docker_component("azbi", "0.1.0"));
    env.installed.push(docker_component("azbi", "0.2.0"));

    assert_eq!(env.component("azbi").unwrap().version, "0.1.0");
    assert!(env.is_installed("azbi", "0.2.0"));
    assert!(!env.is_installed("azbi", "0.3.0"));
    assert!(matches!(
        env.component("missing"),
        Err(Error::ComponentNotFound(_))
    ));
}
