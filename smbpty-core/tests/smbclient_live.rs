//! Integration tests against a real smbclient and SMB server
//!
//! Prerequisites:
//! - `smbclient` in PATH
//! - A share reachable as `//$SMBPTY_TEST_HOST/$SMBPTY_TEST_SHARE` that the
//!   guest account may write to
//!
//! Run with: `cargo test -p smbpty-core --test smbclient_live -- --ignored`

use smbpty_core::pty::{PtyConfig, check_installation};
use smbpty_core::{ClientOptions, SmbClient};

/// Log to the test output; filter with RUST_LOG
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Options for the test share, if one is configured
fn test_share() -> Option<ClientOptions> {
    let host = std::env::var("SMBPTY_TEST_HOST").ok()?;
    let share = std::env::var("SMBPTY_TEST_SHARE").ok()?;
    Some(ClientOptions::new(host, share))
}

/// Skip test if smbclient or the test share is not available
macro_rules! require_share {
    () => {{
        if check_installation(&PtyConfig::from_command_line("smbclient")).is_none() {
            eprintln!("Skipping test: smbclient not available");
            return;
        }
        match test_share() {
            Some(options) => options,
            None => {
                eprintln!("Skipping test: SMBPTY_TEST_HOST/SMBPTY_TEST_SHARE not set");
                return;
            }
        }
    }};
}

#[test]
#[ignore = "requires smbclient and an SMB share"]
fn upload_list_and_remove_tree() {
    init_tracing();
    let options = require_share!();
    let mut client = SmbClient::connect(options).expect("Failed to connect");

    let dir = format!("smbpty-{}", std::process::id());
    let created = client.ask(&smbpty_core::wrap("mkdir", [dir.as_str()])).unwrap();
    assert!(smbpty_core::classify_structural(&created).is_success());

    let uploaded = client.put_content(b"hello", &format!("{dir}/hello.txt"));
    assert!(uploaded.is_success(), "{}", uploaded.message());

    assert!(client.cd(&dir).is_success());
    let listing = client.ls("*").expect("listing failed");
    assert_eq!(listing["hello.txt"].size, 5);
    assert!(client.cd("..").is_success());

    let removed = client.rmdir(&dir);
    assert!(removed.is_success(), "{}", removed.message());
    assert!(client.cd(&dir).is_failure());

    client.close();
}

#[test]
#[ignore = "requires smbclient"]
fn unreachable_host_fails_to_connect() {
    init_tracing();
    if check_installation(&PtyConfig::from_command_line("smbclient")).is_none() {
        eprintln!("Skipping test: smbclient not available");
        return;
    }

    // TEST-NET-1, never routed
    let options = ClientOptions {
        timeout_secs: 3,
        ..ClientOptions::new("192.0.2.1", "nothing")
    };
    assert!(SmbClient::connect(options).is_err());
}
