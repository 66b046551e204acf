// tests/config_loading.rs
use doc_normalizer::config::ENV_CONFIG_PATH;
use doc_normalizer::ingest::types::DocumentSource;
use doc_normalizer::{build_state, AppConfig, OutputMode, StemMode};
use std::{env, fs};

#[test]
fn repo_default_config_parses() {
    let p = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/normalizer.toml");
    let cfg = AppConfig::load_from(&p).unwrap();
    assert_eq!(cfg.language, "english");
    assert_eq!(cfg.pipeline.stem_mode, StemMode::LemmatizeOnly);
    assert_eq!(cfg.pipeline.output, OutputMode::Joined);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    // 1) Nothing anywhere: defaults
    let d = AppConfig::load_default().unwrap();
    assert_eq!(d.pipeline.output, OutputMode::Joined);

    // 2) ./config/normalizer.toml
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(
        tmp.path().join("config/normalizer.toml"),
        "[pipeline]\noutput = \"tokens\"\n",
    )
    .unwrap();
    let f = AppConfig::load_default().unwrap();
    assert_eq!(f.pipeline.output, OutputMode::Tokens);

    // 3) Env wins
    let p_env = tmp.path().join("other.toml");
    fs::write(&p_env, "[pipeline]\nstem_mode = \"lemmatize_then_stem\"\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    let e = AppConfig::load_default().unwrap();
    assert_eq!(e.pipeline.stem_mode, StemMode::LemmatizeThenStem);
    assert_eq!(e.pipeline.output, OutputMode::Joined);

    // 4) Env pointing nowhere is an error, not a silent fallback
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(AppConfig::load_default().is_err());

    env::remove_var(ENV_CONFIG_PATH);
    env::set_current_dir(&old).unwrap();
}

#[test]
fn unknown_language_fails_startup() {
    let cfg = AppConfig::from_toml_str("language = \"klingon\"").unwrap();
    assert!(build_state(cfg).is_err());
}

#[test]
fn file_root_selects_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = AppConfig::default();
    cfg.fetch.file_root = Some(dir.path().to_path_buf());
    let state = build_state(cfg).unwrap();
    assert_eq!(state.source.name(), "file");
}

#[test]
fn noun_pos_without_noun_table_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("stopwords")).unwrap();
    fs::create_dir_all(dir.path().join("lemmas")).unwrap();
    fs::write(dir.path().join("stopwords/english.txt"), "the\n").unwrap();
    fs::write(dir.path().join("lemmas/verb.txt"), "run\n").unwrap();

    let toml = format!(
        "resources_dir = {:?}\n[pipeline]\nlemma_pos = \"noun\"\n",
        dir.path().display().to_string()
    );
    let cfg = AppConfig::from_toml_str(&toml).unwrap();
    let err = build_state(cfg).err().expect("missing noun table must fail");
    assert!(err.to_string().contains("noun"), "{err:#}");

    fs::write(dir.path().join("lemmas/noun.txt"), "dog\n").unwrap();
    let cfg = AppConfig::from_toml_str(&toml).unwrap();
    assert!(build_state(cfg).is_ok());
}

#[test]
fn builtin_resources_reject_noun_pos() {
    assert!(AppConfig::from_toml_str("[pipeline]\nlemma_pos = \"noun\"").is_err());
}
