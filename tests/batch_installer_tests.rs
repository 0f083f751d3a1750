//! Integration tests for FontBatchInstaller and FontRegistrar
//!
//! These tests verify:
//! - Extension filtering is case-insensitive and non-recursive
//! - One failing font never stops the batch
//! - Registry names and copied file names

mod common;

use common::{FakeFontSystem, temp_dir};
use font_installer::services::{FontBatchInstaller, FontRegistrar};
use font_installer::{FontFile, FontInstallError, InstallationOutcome};
use proptest::prelude::*;
use std::fs;

#[test]
fn test_batch_installs_recognized_fonts_only() {
    let (_temp, root) = temp_dir();
    let source = root.join("source");
    fs::create_dir(&source).unwrap();
    for name in ["Alpha.TTF", "Beta.Otf", "readme.md", "Gamma.ttf.bak"] {
        fs::write(source.join(name), b"font").unwrap();
    }
    let system = FakeFontSystem::new(&root.join("Fonts"));

    let installer = FontBatchInstaller::new(FontRegistrar::new(&system, &system));
    let results = installer.install_all(&source).unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.outcome.is_installed()));
    assert_eq!(system.mapping("Alpha").as_deref(), Some("Alpha.TTF"));
    assert_eq!(system.mapping("Beta (OpenType)").as_deref(), Some("Beta.Otf"));
    assert_eq!(system.broadcasts.get(), 2);
}

#[test]
fn test_rejected_font_is_isolated() {
    let (_temp, root) = temp_dir();
    let source = root.join("source");
    fs::create_dir(&source).unwrap();
    for name in ["A.ttf", "B.ttf", "C.otf"] {
        fs::write(source.join(name), b"font").unwrap();
    }
    let system = FakeFontSystem::new(&root.join("Fonts")).rejecting("B.ttf");

    let installer = FontBatchInstaller::new(FontRegistrar::new(&system, &system));
    let results = installer.install_all(&source).unwrap();

    assert_eq!(results.len(), 3);
    let failed: Vec<_> = results
        .iter()
        .filter(|r| !r.outcome.is_installed())
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].path.file_name(), Some("B.ttf"));
    assert_eq!(
        failed[0].outcome,
        InstallationOutcome::Failed(FontInstallError::RegistrationRejected("B.ttf".into()))
    );

    // Rejected before the copy step
    assert!(!root.join("Fonts").join("B.ttf").exists());
    assert!(root.join("Fonts").join("C.otf").exists());
    assert_eq!(system.mappings.borrow().len(), 2);
}

#[test]
fn test_missing_font_leaves_no_trace() {
    let (_temp, root) = temp_dir();
    let system = FakeFontSystem::new(&root.join("Fonts"));
    let ghost = FontFile::from_path(root.join("Ghost.ttf")).unwrap();

    let installer = FontBatchInstaller::new(FontRegistrar::new(&system, &system));
    let results = installer.install_fonts(&[ghost]);

    assert!(matches!(
        results[0].outcome,
        InstallationOutcome::Failed(FontInstallError::NotFound(_))
    ));
    assert!(system.registered.borrow().is_empty());
    assert!(system.mappings.borrow().is_empty());
    assert!(!root.join("Fonts").join("Ghost.ttf").exists());
}

#[test]
fn test_registry_failure_keeps_copied_file() {
    let (_temp, root) = temp_dir();
    let source = root.join("source");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("A.ttf"), b"font").unwrap();
    let mut system = FakeFontSystem::new(&root.join("Fonts"));
    system.registry_available = false;

    let installer = FontBatchInstaller::new(FontRegistrar::new(&system, &system));
    let results = installer.install_all(&source).unwrap();

    assert!(matches!(
        results[0].outcome,
        InstallationOutcome::Failed(FontInstallError::RegistryUnavailable(_))
    ));
    // No rollback of earlier steps
    assert!(root.join("Fonts").join("A.ttf").exists());
}

#[test]
fn test_existing_font_file_is_not_overwritten() {
    let (_temp, root) = temp_dir();
    let source = root.join("source");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("A.ttf"), b"new").unwrap();
    let system = FakeFontSystem::new(&root.join("Fonts"));
    fs::write(root.join("Fonts").join("A.ttf"), b"old").unwrap();

    let installer = FontBatchInstaller::new(FontRegistrar::new(&system, &system));
    let results = installer.install_all(&source).unwrap();

    assert!(results[0].outcome.is_installed());
    assert_eq!(fs::read(root.join("Fonts").join("A.ttf")).unwrap(), b"old");
    assert_eq!(system.mapping("A").as_deref(), Some("A.ttf"));
}

fn any_case(ext: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), ext.len()).prop_map(move |upper| {
        ext.chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_one_attempt_per_recognized_file(
        ttf in proptest::collection::vec(any_case("ttf"), 0..4),
        otf in proptest::collection::vec(any_case("otf"), 0..4),
        other in proptest::collection::vec("(txt|woff|fon|ini)", 0..4),
    ) {
        let (_temp, root) = temp_dir();
        let source = root.join("source");
        fs::create_dir(&source).unwrap();

        let mut expected = 0;
        for (i, ext) in ttf.iter().chain(otf.iter()).enumerate() {
            fs::write(source.join(format!("font{i}.{ext}")), b"font").unwrap();
            expected += 1;
        }
        for (i, ext) in other.iter().enumerate() {
            fs::write(source.join(format!("other{i}.{ext}")), b"data").unwrap();
        }

        let system = FakeFontSystem::new(&root.join("Fonts"));
        let installer = FontBatchInstaller::new(FontRegistrar::new(&system, &system));
        let results = installer.install_all(&source).unwrap();

        prop_assert_eq!(results.len(), expected);
        prop_assert_eq!(system.registered.borrow().len(), expected);
        prop_assert!(results.iter().all(|r| r.outcome.is_installed()));
    }
}
