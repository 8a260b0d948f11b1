use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn trsync_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("trsync"))
}

fn setup_mod(root: &Path, tr_content: &str) {
    fs::create_dir_all(root.join("locale")).unwrap();
    fs::write(root.join("mod.conf"), "name = mymod\n").unwrap();
    fs::write(root.join("locale/mymod.fr.tr"), tr_content).unwrap();
}

#[test]
fn test_translate_without_translator_fails() {
    let temp_dir = TempDir::new().unwrap();
    setup_mod(temp_dir.path(), "# textdomain: mymod\nHello=\n");

    let out = trsync_cmd()
        .args(["translate", temp_dir.path().to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("No translator configured"));
}

#[test]
fn test_translate_rejects_malformed_lang_filter() {
    let temp_dir = TempDir::new().unwrap();
    setup_mod(temp_dir.path(), "# textdomain: mymod\nHello=\n");

    let out = trsync_cmd()
        .args([
            "translate",
            "--translator",
            "true",
            "--lang",
            "not a language",
            temp_dir.path().to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(!out.status.success());
}

#[test]
fn test_translate_rejects_unsupported_lang_filter() {
    let temp_dir = TempDir::new().unwrap();
    setup_mod(temp_dir.path(), "# textdomain: mymod\nHello=\n");

    let out = trsync_cmd()
        .args([
            "translate",
            "--translator",
            "true",
            "--lang",
            "jbo",
            temp_dir.path().to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("not supported"));
}

#[cfg(unix)]
#[test]
fn test_translate_with_shell_translator() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    setup_mod(
        root,
        "# textdomain: mymod\nHello=\nStone=Pierre\n##### not used anymore #####\n",
    );

    let out = trsync_cmd()
        .args([
            "translate",
            "--translator",
            "sh",
            "--translator-arg",
            "-c",
            "--translator-arg",
            r#"cat > /dev/null; printf '{"Hello":"Bonjour"}'"#,
            root.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let translated = fs::read_to_string(root.join("locale/mymod.fr.tr")).unwrap();
    assert_eq!(
        translated,
        "# textdomain: mymod\n#WARNING: AUTOTRANSLATED BY MACHINE TRANSLATION\nHello=Bonjour\nStone=Pierre\n##### not used anymore #####\n"
    );
}

#[cfg(unix)]
#[test]
fn test_translate_from_config_and_lang_filter() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    setup_mod(root, "# textdomain: mymod\nHello=\n");
    fs::write(root.join("locale/mymod.de.tr"), "# textdomain: mymod\nHello=\n").unwrap();
    fs::write(
        root.join("trsync.toml"),
        "[translator]\nprogram = \"sh\"\nargs = [\"-c\", \"cat > /dev/null; printf '{\\\"Hello\\\":\\\"Hallo\\\"}'\"]\n",
    )
    .unwrap();

    let out = trsync_cmd()
        .args(["translate", "--lang", "de", root.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    assert!(
        fs::read_to_string(root.join("locale/mymod.de.tr"))
            .unwrap()
            .contains("Hello=Hallo")
    );
    assert_eq!(
        fs::read_to_string(root.join("locale/mymod.fr.tr")).unwrap(),
        "# textdomain: mymod\nHello=\n"
    );
}

#[cfg(unix)]
#[test]
fn test_translator_failure_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let original = "# textdomain: mymod\nHello=\n";
    setup_mod(root, original);

    let out = trsync_cmd()
        .args([
            "translate",
            "--translator",
            "sh",
            "--translator-arg",
            "-c",
            "--translator-arg",
            "cat > /dev/null; echo service down >&2; exit 1",
            root.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("service down"));
    assert_eq!(
        fs::read_to_string(root.join("locale/mymod.fr.tr")).unwrap(),
        original
    );
}
