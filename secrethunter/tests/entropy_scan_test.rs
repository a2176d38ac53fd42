//! End-to-end tests for the entropy classifier over real files.

#![allow(clippy::unwrap_used)]

use secrethunter::engine::{Engine, EntropyEngine, Likelihood};
use secrethunter::refdata;
use secrethunter::scanner::scan_file;

fn entropy_engine() -> Engine {
    Engine::Entropy(EntropyEngine::new(refdata::load().unwrap()))
}

#[test]
fn test_generated_password_is_the_only_finding() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(
        &path,
        "the quick brown fox\n\
         login with password over at /etc/passwd\n\
         api token is Xk7#mQ9!pZ@4vB2\n\
         backup from 2023-08-15 kept under /var/tmp\n",
    )
    .unwrap();

    let report = scan_file(&path, &entropy_engine()).unwrap();
    assert_eq!(report.secret_count(), 1);
    let secrets = report.secrets.get(&3).unwrap();
    assert_eq!(secrets[0].kind, "entropy");
    assert_eq!(secrets[0].value, "Xk7#mQ9!pZ@4vB2");
    assert_eq!(secrets[0].likelihood, Some(Likelihood::VeryLikely));
}

#[test]
fn test_dictionary_heavy_file_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prose.txt");
    std::fs::write(
        &path,
        "people often choose simple words like password or welcome\n\
         system paths such as /etc/passwd never qualify either\n",
    )
    .unwrap();
    assert!(scan_file(&path, &entropy_engine()).is_none());
}

#[test]
fn test_quoted_and_delimited_tokens_are_split() {
    // the tokenizer breaks on quotes, colons and semicolons, so the secret
    // is recovered from inside structured content
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.yaml");
    std::fs::write(&path, "credentials: 'Xk7#mQ9!pZ@4vB2';\n").unwrap();

    let report = scan_file(&path, &entropy_engine()).unwrap();
    let secrets = report.secrets.get(&1).unwrap();
    assert_eq!(secrets[0].value, "Xk7#mQ9!pZ@4vB2");
}

#[test]
fn test_engine_classification_agrees_with_scan() {
    let engine = EntropyEngine::new(refdata::load().unwrap());
    assert_eq!(engine.classify("/etc/passwd"), Likelihood::VeryUnlikely);
    assert_eq!(engine.classify("password"), Likelihood::VeryUnlikely);
    assert_eq!(engine.classify("Xk7#mQ9!pZ@4vB2"), Likelihood::VeryLikely);
}
