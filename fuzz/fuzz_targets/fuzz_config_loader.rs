#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    let Ok(cfg) = bolus_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    // A config that validates must also convert into an engine config.
    let _ = bolus_core::DosingConfig::try_from(&cfg);
});
