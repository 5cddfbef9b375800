//! Command execution: config mapping, log loading, and result rendering.

use std::path::Path;

use bolus_core::{
    DoseAssessment, DoseEngine, DoseInputs, DoseRecommendation, DoseSource, DosingConfig,
    GlucoseReading, InsulinAdministration, clamp_external_suggestion,
};
use bolus_traits::Clock;
use serde_json::json;

/// Build the validated engine config from the parsed file.
pub fn engine_from(cfg: &bolus_config::Config) -> eyre::Result<DoseEngine> {
    let dosing = DosingConfig::try_from(cfg)?;
    Ok(DoseEngine::new(dosing))
}

pub fn load_history(path: Option<&Path>) -> eyre::Result<Vec<InsulinAdministration>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let rows = bolus_config::load_history_csv(path)?;
    tracing::debug!(rows = rows.len(), path = %path.display(), "insulin history loaded");
    Ok(rows.iter().map(InsulinAdministration::from).collect())
}

pub fn load_readings(path: Option<&Path>) -> eyre::Result<Vec<GlucoseReading>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let rows = bolus_config::load_readings_csv(path)?;
    tracing::debug!(rows = rows.len(), path = %path.display(), "cgm readings loaded");
    Ok(rows.iter().map(GlucoseReading::from).collect())
}

pub fn source_name(s: DoseSource) -> &'static str {
    match s {
        DoseSource::Calculator => "calculator",
        DoseSource::External => "external",
    }
}

fn recommendation_json(r: &DoseRecommendation) -> serde_json::Value {
    json!({
        "correction": r.correction,
        "meal": r.meal,
        "trend_adjustment": r.trend_adjustment,
        "raw_total": r.raw_total,
        "clamped_total": r.clamped_total,
        "clamped": r.clamped,
        "source": source_name(r.source),
    })
}

fn print_recommendation(r: &DoseRecommendation) {
    println!("correction:        {:>7.2} U", r.correction);
    println!("meal:              {:>7.2} U", r.meal);
    println!("trend adjustment:  {:>7.2} U", r.trend_adjustment);
    println!("raw total:         {:>7.2} U", r.raw_total);
    println!("recommended dose:  {:>7.2} U", r.clamped_total);
    if r.clamped {
        println!("note: limited by safety bounds");
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run_recommend(
    engine: &DoseEngine,
    clock: &dyn Clock,
    bg: f64,
    carbs: f64,
    trend: Option<f64>,
    target: Option<f64>,
    history: Option<&Path>,
    readings: Option<&Path>,
    json_out: bool,
) -> eyre::Result<DoseAssessment> {
    let history = load_history(history)?;
    let readings = load_readings(readings)?;
    let assessment = engine.assess(&DoseInputs {
        current_bg: bg,
        carbs,
        bg_trend: trend,
        target_bg: target,
        history: &history,
        readings: &readings,
        now: clock.now(),
    })?;

    if json_out {
        let mut obj = recommendation_json(&assessment.recommendation);
        obj["insulin_on_board"] = json!(assessment.insulin_on_board);
        obj["bg_trend"] = json!(assessment.bg_trend);
        obj["trend"] = json!({
            "rate_5min": assessment.trend.rate_5min,
            "rate_15min": assessment.trend.rate_15min,
            "rate_30min": assessment.trend.rate_30min,
        });
        println!("{obj}");
    } else {
        print_recommendation(&assessment.recommendation);
        println!("insulin on board:  {:>7.2} U", assessment.insulin_on_board);
        println!("glucose trend:     {:>7.2} mg/dL/min", assessment.bg_trend);
    }
    Ok(assessment)
}

pub fn run_iob(
    engine: &DoseEngine,
    clock: &dyn Clock,
    history: &Path,
    json_out: bool,
) -> eyre::Result<f64> {
    let history = load_history(Some(history))?;
    let iob = engine.insulin_on_board(&history, clock.now())?;
    if json_out {
        println!("{}", json!({ "insulin_on_board": iob, "entries": history.len() }));
    } else {
        println!("insulin on board: {iob:.2} U");
    }
    Ok(iob)
}

pub fn run_clamp(
    engine: &DoseEngine,
    raw: f64,
    json_out: bool,
) -> eyre::Result<DoseRecommendation> {
    let rec = clamp_external_suggestion(raw, engine.config())?;
    if json_out {
        println!("{}", recommendation_json(&rec));
    } else {
        println!("suggested:         {:>7.2} U", rec.raw_total);
        println!("recommended dose:  {:>7.2} U", rec.clamped_total);
        if rec.clamped {
            println!("note: limited by safety bounds");
        }
    }
    Ok(rec)
}

pub fn run_check_config(engine: &DoseEngine, json_out: bool) {
    let c = engine.config();
    let (s, p, t) = (c.safety(), c.profile(), c.trend());
    if json_out {
        println!(
            "{}",
            json!({
                "safety": {
                    "min_insulin_dose": s.min_insulin_dose,
                    "max_insulin_dose": s.max_insulin_dose,
                    "max_bg_rate_change": s.max_bg_rate_change,
                },
                "profile": {
                    "insulin_sensitivity_factor": p.insulin_sensitivity_factor,
                    "insulin_to_carb_ratio": p.insulin_to_carb_ratio,
                    "insulin_duration_h": p.insulin_duration_h,
                    "target_bg": p.target_bg,
                },
                "trend": { "adjustment_coefficient": t.adjustment_coefficient },
            })
        );
    } else {
        println!("config ok");
        println!(
            "dose bounds: {:.2}..={:.2} U, max trend {:.2} mg/dL/min",
            s.min_insulin_dose, s.max_insulin_dose, s.max_bg_rate_change
        );
        println!(
            "ISF {:.1} mg/dL/U, ICR {:.1} g/U, action {:.1} h, target {:.0} mg/dL",
            p.insulin_sensitivity_factor, p.insulin_to_carb_ratio, p.insulin_duration_h, p.target_bg
        );
        println!("trend coefficient {:.2} U per mg/dL/min", t.adjustment_coefficient);
    }
}
