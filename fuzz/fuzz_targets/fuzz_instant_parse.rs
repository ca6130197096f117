#![no_main]
use jsonsafe::Instant;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let instant = Instant::parse(s);
        if let Some(iso) = instant.to_iso_string() {
            let back = Instant::parse(&iso);
            if back.timestamp_millis() != instant.timestamp_millis() {
                panic!("ISO round trip changed the instant\ninput: {}\niso: {}\nback: {:?}", s, iso, back);
            }
        }
    }
});
