//! Plain-text rendering for the console.

use bastion_ranker::{SettlementScore, WeightGroup, WeightSet, WeightSource};

pub fn score_table(scores: &[SettlementScore]) -> String {
    let mut out = format!(
        "{:>3}  {:<24} {:<9} {:>8} {:>9} {:>6}  {}\n",
        "#", "SETTLEMENT", "TIER", "PRIORITY", "READINESS", "RISK", "NOTES"
    );
    for (i, s) in scores.iter().enumerate() {
        let notes = if s.degraded {
            let domains: Vec<_> = s.metrics.degraded.iter().map(|d| d.as_str()).collect();
            format!("incomplete: {}", domains.join(","))
        } else {
            String::new()
        };
        out.push_str(&format!(
            "{:>3}  {:<24} {:<9} {:>8.1} {:>9.1} {:>6.1}  {}\n",
            i + 1,
            s.name,
            s.tier.as_str(),
            s.card.priority,
            s.card.readiness,
            s.card.risk,
            notes
        ));
    }
    out
}

pub fn weights_report(weights: &WeightSet, meta: Option<(u64, WeightSource)>) -> String {
    let mut out = String::new();
    if let Some((version, source)) = meta {
        let source = match source {
            WeightSource::Persisted => "saved",
            WeightSource::Default => "defaults",
            WeightSource::Fallback => "defaults (store unreachable)",
        };
        out.push_str(&format!("version {version}, {source}\n"));
    }
    for (name, value) in weights.named() {
        out.push_str(&format!("  {name:<22} {value:.3}\n"));
    }
    let warnings = weights.validate();
    for group in WeightGroup::ALL {
        let sum = weights.group_sum(group);
        let flag = if warnings.iter().any(|w| w.group == group) { "  <- check" } else { "" };
        out.push_str(&format!("  {:<22} {sum:.3}{flag}\n", format!("sum({})", group.as_str())));
    }
    out
}
