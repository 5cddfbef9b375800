#![no_main]
use bolus_core::{DosingConfig, ProfileCfg, SafetyCfg, recommend_dose};
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

#[derive(Debug, Arbitrary)]
struct Input {
    current_bg: f64,
    target_bg: f64,
    carbs: f64,
    bg_trend: f64,
}

fuzz_target!(|input: Input| {
    let Ok(cfg) = DosingConfig::builder()
        .with_safety(SafetyCfg::default())
        .with_profile(ProfileCfg::default())
        .build()
    else {
        return;
    };
    if let Ok(rec) = recommend_dose(
        input.current_bg,
        input.target_bg,
        input.carbs,
        input.bg_trend,
        &cfg,
    ) {
        let s = cfg.safety();
        assert!(rec.clamped_total >= s.min_insulin_dose);
        assert!(rec.clamped_total <= s.max_insulin_dose);
    }
});
