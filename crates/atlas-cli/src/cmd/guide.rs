use crate::output::print_json;
use atlas_core::score;
use atlas_core::types::{Effort, Level, Status};
use serde_json::{json, Map, Value};

fn table<T: Copy>(keys: &[T], name: impl Fn(T) -> &'static str, f: impl Fn(T) -> Value) -> Value {
    let map: Map<String, Value> = keys
        .iter()
        .map(|k| (name(*k).to_string(), f(*k)))
        .collect();
    Value::Object(map)
}

/// Print the scoring tables the ranking is built from.
pub fn run() -> anyhow::Result<()> {
    print_json(&json!({
        "method": "base(priority) + type bonus + status boost + age bonus",
        "base": table(Level::all(), Level::as_str, |l| score::base_score(l).into()),
        "type_bonus": {
            "feature": "round(value_weight(business_value) * effort_multiplier(effort))",
            "bug": "value_weight(severity) + impact_weight(user_impact)",
            "tech_debt": "round(value_weight(risk) * effort_multiplier(effort))",
            "epic": "0",
        },
        "value_weight": table(Level::all(), Level::as_str, |l| score::value_weight(l).into()),
        "impact_weight": table(Level::all(), Level::as_str, |l| score::impact_weight(l).into()),
        "effort_multiplier": table(Effort::all(), Effort::as_str, |e| score::effort_multiplier(e).into()),
        "status_boost": table(Status::all(), Status::as_str, |s| score::status_boost(s).into()),
        "age_bonus": {
            "points_per_day": score::AGE_POINTS_PER_DAY,
            "max": score::MAX_AGE_BONUS,
        },
    }))
}
