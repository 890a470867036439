// crates/debt_cli/src/table.rs
//
// Plain-text payoff table for stdout: one row per debt in plan order, then a
// Total row. Presentation only; every number comes from the PlanResult.

use debt_core::{Debt, Money};
use debt_pipeline::{PayoffStatus, PlanResult};

const HEADERS: [&str; 8] = [
    "Banker",
    "Debt",
    "Balance",
    "Rate",
    "Min Payment",
    "Total Interest",
    "Months",
    "Payoff Date",
];

/// Render the table. Text columns are left-aligned, numeric ones right-aligned.
pub fn render(debts: &[Debt], result: &PlanResult) -> String {
    let sym = result.currency_symbol.as_str();
    let mut rows: Vec<[String; 8]> = Vec::with_capacity(debts.len() + 1);

    for d in debts {
        let Some(p) = result.payoff_details.get(&d.id) else { continue };
        let (months, date) = match p.status {
            PayoffStatus::PaidOff => (
                p.months_to_payoff.map(|m| m.to_string()).unwrap_or_default(),
                p.payoff_date.map(|ym| ym.long_label()).unwrap_or_default(),
            ),
            PayoffStatus::NeverPaysOff { reason } => {
                ("never".to_string(), format!("never ({})", reason.code().replace('_', " ")))
            }
        };
        let label = if d.name.is_empty() { d.id.to_string() } else { d.name.clone() };
        rows.push([
            d.banker_name.clone(),
            label,
            money(sym, d.balance),
            format!("{}%", d.interest_rate.normalize()),
            money(sym, d.minimum_payment),
            money(sym, p.total_interest_paid),
            months,
            date,
        ]);
    }

    let t = &result.totals;
    rows.push([
        "Total".to_string(),
        String::new(),
        money(sym, t.balance),
        String::new(),
        money(sym, t.minimum_payment),
        money(sym, t.total_interest),
        t.months_to_debt_free.map(|m| m.to_string()).unwrap_or_default(),
        t.debt_free_date.map(|ym| ym.long_label()).unwrap_or_default(),
    ]);

    let mut widths = HEADERS.map(|h| h.chars().count());
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header: [String; 8] = HEADERS.map(str::to_string);
    let rule: [String; 8] = widths.map(|w| "-".repeat(w));
    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(line(&header, &widths));
    lines.push(line(&rule, &widths));
    let (body, total) = rows.split_at(rows.len() - 1);
    lines.extend(body.iter().map(|r| line(r, &widths)));
    lines.push(line(&rule, &widths));
    lines.extend(total.iter().map(|r| line(r, &widths)));
    lines.join("\n")
}

fn money(sym: &str, v: Money) -> String {
    format!("{sym}{v:.2}")
}

fn line(cells: &[String; 8], widths: &[usize; 8]) -> String {
    cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (c, &w))| if is_numeric_col(i) { format!("{c:>w$}") } else { format!("{c:<w$}") })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn is_numeric_col(i: usize) -> bool {
    (2..=6).contains(&i)
}
