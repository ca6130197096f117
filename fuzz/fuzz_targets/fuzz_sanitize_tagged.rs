#![no_main]
use jsonsafe::{Options, from_tagged_str, sanitize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(value) = from_tagged_str(s) {
            let once = sanitize(&value);
            let twice = sanitize(&once);
            if once != twice {
                panic!("sanitize is not idempotent\ninput: {}\nonce: {:?}\ntwice: {:?}", s, once, twice);
            }

            let text = jsonsafe::to_string(&value, &Options::default())
                .expect("sanitized values always encode");
            if let Err(e) = serde_json::from_str::<serde_json::Value>(&text) {
                panic!("encoded output is not JSON\ninput: {}\noutput: {}\nerror: {}", s, text, e);
            }
        }
    }
});
