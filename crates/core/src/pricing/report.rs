use crate::pricing::{Factor, PricingResult};

/// Plain-text tier summary followed by the per-factor breakdown table.
pub fn render_breakdown(result: &PricingResult) -> String {
    let mut lines = vec![
        format!(
            "base {:.2}, composite adjustment {}",
            result.base_price,
            signed(result.composite_adjustment)
        ),
        format!("- conservative: {:.2}", result.conservative_price),
        format!("- suggested:    {:.2}", result.suggested_price),
        format!("- aggressive:   {:.2}", result.aggressive_price),
        String::new(),
        format!("{:<24} {:>10} {:>8} {:>13}", "factor", "adjustment", "weight", "contribution"),
    ];

    for factor in Factor::ALL {
        let Some(detail) = result.detail(factor) else {
            continue;
        };
        lines.push(format!(
            "{:<24} {:>10} {:>8.2} {:>13}",
            factor.as_str(),
            signed(detail.adjustment),
            detail.weight,
            signed(detail.contribution())
        ));
    }

    lines.join("\n")
}

fn signed(value: f64) -> String {
    // Avoid rendering "-0.0000" for tiny negative rounding residue.
    if value.abs() < 0.00005 {
        return "+0.0000".to_string();
    }
    format!("{value:+.4}")
}
