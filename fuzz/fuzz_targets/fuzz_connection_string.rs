#![no_main]

use libfuzzer_sys::fuzz_target;
use taos_connect::{ConnectionInfo, Properties};

fuzz_target!(|data: &[u8]| {
    let Ok(url) = std::str::from_utf8(data) else {
        return;
    };

    let _ = ConnectionInfo::redact(url);
    if let Ok(info) = ConnectionInfo::parse(url) {
        assert!(!info.host.is_empty());
        assert_eq!(info.scheme, info.scheme.to_ascii_lowercase());

        let config = info.to_config(Properties::new());
        assert!(!config.options().contains("password"));
        assert!(!config.options().contains("user"));
    }
});
