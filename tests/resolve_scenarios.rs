//! End-to-end resolution scenarios through the public API

use apkplan::{
    enumerate_artifacts, ArtifactKind, BuildType, EnvSnapshot, Resolver, SigningOverrides,
    ValidationError, VariantConfig,
};
use std::fs;
use std::path::Path;

fn write_config(dir: &Path, contents: &str) -> VariantConfig {
    let path = dir.join("variants.toml");
    fs::write(&path, contents).unwrap();
    VariantConfig::from_file(&path).unwrap()
}

fn env_of(pairs: &[(&str, &str)]) -> EnvSnapshot {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn release_with_split_and_universal_yields_three_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("release.jks");
    fs::write(&store, b"keystore").unwrap();

    let config = write_config(
        dir.path(),
        r#"
            application_id = "com.mkproject.brain_blocks"
            abis = ["arm64-v8a", "armeabi-v7a"]

            [splits]
            abi = true
            universal = true

            [shrink]
            minify = true
            resources = true
        "#,
    );
    let resolver = Resolver::new(config);

    let overrides = SigningOverrides {
        store_file: Some(store.to_string_lossy().into_owned()),
        key_alias: Some("upload".to_string()),
        key_password: Some("secret".to_string()),
        store_password: Some("secret".to_string()),
    };
    let plan = resolver
        .resolve(BuildType::Release, &overrides, &EnvSnapshot::empty())
        .unwrap();

    assert_eq!(plan.signing.store_file, store);
    assert!(plan.minify_code);
    assert!(plan.shrink_resources);
    assert!(plan.warnings.is_empty());

    let artifacts = enumerate_artifacts(&plan);
    assert_eq!(artifacts.len(), 3);
    assert!(artifacts
        .iter()
        .any(|a| a.file_name == "app-arm64-v8a-release.apk"));
    assert!(artifacts
        .iter()
        .any(|a| a.file_name == "app-armeabi-v7a-release.apk"));
    assert!(artifacts
        .iter()
        .any(|a| a.kind == ArtifactKind::UniversalApk));
}

#[test]
fn debug_uses_fixed_identity_regardless_of_environment() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
            application_id = "com.mkproject.brain_blocks"
            abis = ["arm64-v8a"]
        "#,
    );
    let resolver = Resolver::new(config);

    let env = env_of(&[
        ("KEY_ALIAS", "prod-alias"),
        ("KEY_PASSWORD", "prod-pass"),
        ("STORE_FILE", "/keys/prod.jks"),
        ("STORE_PASSWORD", "prod-pass"),
    ]);
    let overrides = SigningOverrides {
        key_alias: Some("override-alias".to_string()),
        ..Default::default()
    };

    let plan = resolver
        .resolve(BuildType::Debug, &overrides, &env)
        .unwrap();

    assert!(plan.signing.is_development());
    assert_eq!(plan.signing.key_alias, "androiddebugkey");
    assert_eq!(plan.application_id, "com.mkproject.brain_blocks.debug");
}

#[test]
fn release_with_nothing_resolvable_fails_missing_credential() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
            application_id = "com.mkproject.brain_blocks"
            abis = ["arm64-v8a"]
        "#,
    );
    let resolver = Resolver::new(config);

    let err = resolver
        .resolve(
            BuildType::Release,
            &SigningOverrides::default(),
            &EnvSnapshot::empty(),
        )
        .unwrap_err();

    assert!(matches!(err, ValidationError::MissingCredential(_)));
}

#[test]
fn release_honors_environment_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("env.jks");
    fs::write(&store, b"keystore").unwrap();

    let config = write_config(
        dir.path(),
        r#"
            application_id = "com.mkproject.brain_blocks"
            abis = ["arm64-v8a"]
        "#,
    );
    let resolver = Resolver::new(config);

    let env = env_of(&[("STORE_FILE", store.to_string_lossy().as_ref())]);
    let plan = resolver
        .resolve(BuildType::Release, &SigningOverrides::default(), &env)
        .unwrap();

    assert_eq!(plan.signing.store_file, store);
}

#[test]
fn two_resolutions_of_the_same_inputs_are_equal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("debug.keystore"), b"keystore").unwrap();

    let config = write_config(
        dir.path(),
        r#"
            application_id = "com.mkproject.brain_blocks"
            abis = ["arm64-v8a", "x86_64"]

            [targets]
            apk = true
            bundle = true

            [splits]
            abi = true
        "#,
    );
    let resolver = Resolver::new(config);
    let env = env_of(&[("STORE_PASSWORD", "secret")]);

    let a = resolver
        .resolve(BuildType::Release, &SigningOverrides::default(), &env)
        .unwrap();
    let b = resolver
        .resolve(BuildType::Release, &SigningOverrides::default(), &env)
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(enumerate_artifacts(&a), enumerate_artifacts(&b));
}

#[test]
fn apk_and_bundle_targets_compose() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
            application_id = "com.mkproject.brain_blocks"
            abis = ["arm64-v8a", "armeabi-v7a", "x86_64"]

            [targets]
            apk = true
            bundle = true

            [splits]
            abi = true
            universal = true
        "#,
    );
    let resolver = Resolver::new(config);

    let plan = resolver
        .resolve(
            BuildType::Debug,
            &SigningOverrides::default(),
            &EnvSnapshot::empty(),
        )
        .unwrap();

    // 3 per-ABI APKs + universal APK + one bundle container.
    let artifacts = enumerate_artifacts(&plan);
    assert_eq!(artifacts.len(), 5);
    assert_eq!(
        artifacts
            .iter()
            .filter(|a| a.kind == ArtifactKind::Bundle)
            .count(),
        1
    );
}

#[test]
fn declared_abi_outside_universe_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
            application_id = "com.mkproject.brain_blocks"
            abis = ["arm64-v8a", "armeabi"]
        "#,
    );
    let resolver = Resolver::new(config);

    let err = resolver
        .resolve(
            BuildType::Debug,
            &SigningOverrides::default(),
            &EnvSnapshot::empty(),
        )
        .unwrap_err();

    assert_eq!(err, ValidationError::UnsupportedAbi("armeabi".to_string()));
}
