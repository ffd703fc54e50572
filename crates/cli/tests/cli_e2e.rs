//! End-to-end runs of the `dime` binary through its documented exit codes.

use std::path::Path;
use std::process::{Command, Output};

fn dime(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dime"))
        .args(args)
        .output()
        .expect("failed to spawn the dime binary")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

#[test]
fn org_generate_verify_dump() {
    let dir = tempfile::tempdir().unwrap();
    let signet = dir.path().join("org.signet.pem");
    let keys = dir.path().join("org.keys.pem");

    let out = dime(&[
        "generate",
        "--kind",
        "org",
        "--out",
        path_str(&signet),
        "--keychain",
        path_str(&keys),
        "--id",
        "example.tld",
    ]);
    assert!(out.status.success(), "{:?}", out);

    let out = dime(&["verify", "--in", path_str(&signet)]);
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "identified");

    let out = dime(&["dump", "--in", path_str(&signet)]);
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout).into_owned();
    assert!(text.contains("Primary-Organizational-Key"));
    assert!(text.contains("example.tld"));
}

#[test]
fn user_countersigning_flow() {
    let dir = tempfile::tempdir().unwrap();
    let org_signet = dir.path().join("org.signet.pem");
    let org_keys = dir.path().join("org.keys.pem");
    let user_signet = dir.path().join("user.signet.pem");
    let user_keys = dir.path().join("user.keys.pem");

    for args in [
        vec![
            "generate",
            "--kind",
            "org",
            "--out",
            path_str(&org_signet),
            "--keychain",
            path_str(&org_keys),
        ],
        vec![
            "generate",
            "--kind",
            "user",
            "--out",
            path_str(&user_signet),
            "--keychain",
            path_str(&user_keys),
        ],
    ] {
        let out = dime(&args);
        assert!(out.status.success(), "{:?}", out);
    }

    // An uncountersigned user signet classifies as an SSR-stage signet.
    let out = dime(&["verify", "--in", path_str(&user_signet)]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "ssr");

    let out = dime(&[
        "sign",
        "--in",
        path_str(&user_signet),
        "--org-key",
        path_str(&org_keys),
        "--stage",
        "id",
        "--id",
        "nils@example.tld",
    ]);
    assert!(out.status.success(), "{:?}", out);

    let out = dime(&[
        "verify",
        "--in",
        path_str(&user_signet),
        "--org-key",
        path_str(&org_signet),
    ]);
    assert!(out.status.success(), "{:?}", out);
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "identified");
}

#[test]
fn exit_codes_surface_failures() {
    let dir = tempfile::tempdir().unwrap();

    // 1: argument error.
    let out = dime(&["generate", "--kind", "org"]);
    assert_eq!(out.status.code(), Some(1));

    // 2: missing input file.
    let out = dime(&["dump", "--in", path_str(&dir.path().join("absent.pem"))]);
    assert_eq!(out.status.code(), Some(2));

    // 3: structurally broken signet file.
    let garbage = dir.path().join("garbage.pem");
    std::fs::write(&garbage, "-----BEGIN SIGNET-----\nAAAA\n-----END SIGNET-----\n").unwrap();
    let out = dime(&["verify", "--in", path_str(&garbage)]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn wrong_org_key_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let org_a_signet = dir.path().join("a.signet.pem");
    let org_a_keys = dir.path().join("a.keys.pem");
    let org_b_signet = dir.path().join("b.signet.pem");
    let org_b_keys = dir.path().join("b.keys.pem");
    let user_signet = dir.path().join("user.signet.pem");
    let user_keys = dir.path().join("user.keys.pem");

    for (signet, keys) in [(&org_a_signet, &org_a_keys), (&org_b_signet, &org_b_keys)] {
        let out = dime(&[
            "generate",
            "--kind",
            "org",
            "--out",
            path_str(signet),
            "--keychain",
            path_str(keys),
        ]);
        assert!(out.status.success(), "{:?}", out);
    }
    let out = dime(&[
        "generate",
        "--kind",
        "user",
        "--out",
        path_str(&user_signet),
        "--keychain",
        path_str(&user_keys),
    ]);
    assert!(out.status.success());

    let out = dime(&[
        "sign",
        "--in",
        path_str(&user_signet),
        "--org-key",
        path_str(&org_a_keys),
    ]);
    assert!(out.status.success(), "{:?}", out);

    // 4: signature verification failure under the wrong organization.
    let out = dime(&[
        "verify",
        "--in",
        path_str(&user_signet),
        "--org-key",
        path_str(&org_b_signet),
    ]);
    assert_eq!(out.status.code(), Some(4));
    assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "invalid");
}
